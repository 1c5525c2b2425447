// ── Simulation ──
//
// Clock, tick step and the engine that ties them to dashboard state.

mod clock;
mod engine;
pub mod phrases;
mod tick;

pub use clock::{ClockState, SimulationClock, Visibility};
pub use engine::Engine;
pub use tick::{TickOutcome, TickRates, advance};
