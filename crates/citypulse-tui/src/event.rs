//! Terminal input pump.
//!
//! A background task merges crossterm input with a redraw ticker and hands
//! the result to the app as [`Event`]s. Focus changes arrive already
//! translated into dashboard [`Visibility`], since that is all the app
//! does with them.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use citypulse_core::Visibility;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// New terminal size as (cols, rows).
    Resize(u16, u16),
    /// Terminal focus changed.
    Focus(Visibility),
    /// Time to redraw.
    Render,
}

/// Map a raw terminal event to an app event. Key releases and repeats,
/// mouse and paste input are dropped.
pub fn translate(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Resize(cols, rows) => Some(Event::Resize(cols, rows)),
        CrosstermEvent::FocusGained => Some(Event::Focus(Visibility::Visible)),
        CrosstermEvent::FocusLost => Some(Event::Focus(Visibility::Hidden)),
        _ => None,
    }
}

/// Owns the input task. Dropping the reader stops it.
pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    /// Start reading. `frame_period` is the redraw cadence.
    pub fn new(frame_period: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        tokio::spawn(pump(tx, frame_period, cancel.clone()));
        Self { rx, cancel }
    }

    /// Next event, or `None` once the pump has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn pump(tx: mpsc::UnboundedSender<Event>, frame_period: Duration, cancel: CancellationToken) {
    let mut input = EventStream::new();
    let mut frames = tokio::time::interval(frame_period);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => break,
            _ = frames.tick() => Event::Render,
            raw = input.next() => match raw {
                Some(Ok(raw)) => match translate(raw) {
                    Some(event) => event,
                    None => continue,
                },
                Some(Err(e)) => {
                    trace!(error = %e, "terminal read failed");
                    continue;
                }
                // stdin closed
                None => break,
            },
        };

        if tx.send(event).is_err() {
            break;
        }
    }
}
