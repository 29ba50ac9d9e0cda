//! Terminal input pump.
//!
//! crossterm's `poll`/`read` block, so they run on a blocking thread that
//! forwards translated events over a channel.  A `Tick` goes out whenever the
//! terminal stays quiet for one tick period; it drives the spinner.

use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind, MouseEvent};
use tokio::sync::mpsc;

/// Events consumed by the main loop.
#[derive(Debug, PartialEq, Eq)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Tick,
}

/// Map a raw terminal event.  Key releases, focus changes and pastes are of
/// no interest to the grid.
fn translate(ev: CtEvent) -> Option<AppEvent> {
    match ev {
        CtEvent::Key(k) if k.kind != KeyEventKind::Release => Some(AppEvent::Key(k)),
        CtEvent::Mouse(m) => Some(AppEvent::Mouse(m)),
        CtEvent::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        _ => None,
    }
}

/// Start the input thread.  It exits once the receiver is dropped.
pub fn spawn_event_reader(tick_rate: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::task::spawn_blocking(move || loop {
        let next = match event::poll(tick_rate) {
            Ok(true) => match event::read() {
                Ok(ev) => translate(ev),
                Err(err) => {
                    tracing::warn!(error = %err, "terminal read failed");
                    None
                }
            },
            Ok(false) => Some(AppEvent::Tick),
            Err(err) => {
                tracing::error!(error = %err, "terminal poll failed; input stops");
                break;
            }
        };
        if let Some(app_event) = next {
            if tx.send(app_event).is_err() {
                break;
            }
        }
    });

    rx
}
