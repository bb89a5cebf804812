use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Id reported while no trace is active on the current thread
pub const UNTRACED_ID: &str = "no-trace";

struct ActiveTrace {
    id: String,
    started: Instant,
    started_at: DateTime<Utc>,
}

thread_local! {
    static ACTIVE_TRACE: RefCell<Option<ActiveTrace>> = const { RefCell::new(None) };
}

/// Per-request correlation id and start time, scoped to the calling thread.
///
/// The trace is not cleaned up implicitly: whoever calls [`RequestTrace::initialize`]
/// must call [`RequestTrace::clear`] when the request ends, or the next request
/// served by the same thread inherits the stale id.
pub struct RequestTrace;

impl RequestTrace {
    /// Start a trace with `custom_id`, or a fresh UUID when absent or blank.
    /// Returns the active id.
    pub fn initialize(custom_id: Option<&str>) -> String {
        let id = match custom_id.map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => Uuid::new_v4().to_string(),
        };
        ACTIVE_TRACE.with(|slot| {
            *slot.borrow_mut() = Some(ActiveTrace {
                id: id.clone(),
                started: Instant::now(),
                started_at: Utc::now(),
            });
        });
        id
    }

    /// Active id, or [`UNTRACED_ID`]
    pub fn id() -> String {
        ACTIVE_TRACE.with(|slot| {
            slot.borrow()
                .as_ref()
                .map_or_else(|| UNTRACED_ID.to_string(), |trace| trace.id.clone())
        })
    }

    /// Time since [`RequestTrace::initialize`]; zero when inactive
    pub fn elapsed() -> Duration {
        ACTIVE_TRACE.with(|slot| {
            slot.borrow()
                .as_ref()
                .map_or(Duration::ZERO, |trace| trace.started.elapsed())
        })
    }

    pub fn started_at() -> Option<DateTime<Utc>> {
        ACTIVE_TRACE.with(|slot| slot.borrow().as_ref().map(|trace| trace.started_at))
    }

    pub fn is_active() -> bool {
        ACTIVE_TRACE.with(|slot| slot.borrow().is_some())
    }

    pub fn clear() {
        ACTIVE_TRACE.with(|slot| {
            slot.borrow_mut().take();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uninitialized_trace_reports_sentinel() {
        RequestTrace::clear();
        assert_eq!(RequestTrace::id(), UNTRACED_ID);
        assert_eq!(RequestTrace::elapsed(), Duration::ZERO);
        assert!(RequestTrace::started_at().is_none());
        assert!(!RequestTrace::is_active());
    }

    #[test]
    fn custom_id_is_kept_and_blank_is_replaced() {
        let id = RequestTrace::initialize(Some("req-42"));
        assert_eq!(id, "req-42");
        assert_eq!(RequestTrace::id(), "req-42");

        let generated = RequestTrace::initialize(Some("  "));
        assert_ne!(generated, UNTRACED_ID);
        assert!(Uuid::parse_str(&generated).is_ok());
        assert_eq!(RequestTrace::id(), generated);
        RequestTrace::clear();
    }

    #[test]
    fn elapsed_grows_while_active() {
        RequestTrace::initialize(None);
        std::thread::sleep(Duration::from_millis(5));
        assert!(RequestTrace::elapsed() >= Duration::from_millis(5));
        assert!(RequestTrace::started_at().is_some());
        RequestTrace::clear();
        assert_eq!(RequestTrace::elapsed(), Duration::ZERO);
    }
}
