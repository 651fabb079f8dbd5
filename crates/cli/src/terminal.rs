//! Terminal rendering of notices and session events

use numen_http::{InvalidationReason, Notice, NoticeVariant, Notifier, SessionEvent};
use tokio::sync::broadcast::{self, error::TryRecvError};

/// Prints notices to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        eprintln!("{}", render(&notice));
    }
}

fn render(notice: &Notice) -> String {
    match notice.variant {
        NoticeVariant::Destructive => format!("✗ {}: {}", notice.title, notice.description),
        NoticeVariant::Default => format!("• {}: {}", notice.title, notice.description),
    }
}

/// Print what the user has to do after the session changed
///
/// Called once the command finished, so hints never interleave with output.
pub fn drain_session_events(events: &mut broadcast::Receiver<SessionEvent>) {
    loop {
        match events.try_recv() {
            Ok(SessionEvent::Invalidated(reason)) => {
                tracing::debug!(?reason, "Session invalidated");
                eprintln!("{}", login_hint(reason));
            }
            Ok(event) => tracing::debug!(?event, "Session event"),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "Session events dropped");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
}

fn login_hint(reason: InvalidationReason) -> &'static str {
    match reason {
        InvalidationReason::MissingRefreshToken => "Not logged in. Run `numen login` first.",
        InvalidationReason::StoreUnreadable => {
            "Stored session could not be read. Run `numen login` to start a new session."
        }
        _ => "Run `numen login` to start a new session.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use numen_http::events::SessionEvents;

    #[test]
    fn test_render_destructive() {
        let rendered = render(&Notice::error("Server error. Please try again later."));
        assert_eq!(rendered, "✗ Error: Server error. Please try again later.");
    }

    #[test]
    fn test_login_hint() {
        assert!(login_hint(InvalidationReason::MissingRefreshToken).contains("numen login"));
        assert!(login_hint(InvalidationReason::RefreshRejected).contains("numen login"));
        assert!(login_hint(InvalidationReason::StoreUnreadable).contains("could not be read"));
    }

    #[test]
    fn test_drain_consumes_pending_events() {
        let events = SessionEvents::new();
        let mut receiver = events.subscribe();
        events.emit(SessionEvent::TokenRefreshed);
        events.emit(SessionEvent::Invalidated(InvalidationReason::RefreshRejected));

        drain_session_events(&mut receiver);
        assert!(matches!(receiver.try_recv(), Err(TryRecvError::Empty)));
    }
}
