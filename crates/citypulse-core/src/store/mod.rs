// ── In-memory stores ──
//
// The device registry and the bounded alert/feed logs. Owned by the
// simulation engine; snapshots hand out shared read-only copies.

mod bounded;
mod registry;

pub use bounded::{AlertLog, BoundedLog, FeedLog};
pub use registry::DeviceRegistry;
