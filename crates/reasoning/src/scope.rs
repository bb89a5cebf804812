use crate::context::ReasoningContext;
use crate::trace::RequestTrace;
use std::marker::PhantomData;
use std::time::Duration;

/// Marks the lifetime of one request on the current thread.
///
/// [`RequestScope::begin`] discards whatever a previous request left behind and
/// starts a trace; dropping the scope clears both the trace and the
/// [`ReasoningContext`]. The guard is `!Send`: the scope belongs to the thread
/// whose thread-local slots it manages.
#[must_use = "the request ends when the scope is dropped"]
pub struct RequestScope {
    id: String,
    _thread_bound: PhantomData<*const ()>,
}

impl RequestScope {
    pub fn begin(custom_id: Option<&str>) -> Self {
        if RequestTrace::is_active() || ReasoningContext::has_state() {
            log::debug!(
                "Discarding stale request state left by trace {}",
                RequestTrace::id()
            );
        }
        ReasoningContext::clear();
        let id = RequestTrace::initialize(custom_id);
        log::debug!("[trace={id}] request started");
        Self {
            id,
            _thread_bound: PhantomData,
        }
    }

    /// Run `f` inside a fresh scope and tear it down afterwards
    pub fn run<R>(custom_id: Option<&str>, f: impl FnOnce(&RequestScope) -> R) -> R {
        let scope = Self::begin(custom_id);
        f(&scope)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn elapsed(&self) -> Duration {
        RequestTrace::elapsed()
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        log::debug!(
            "[trace={}] request finished in {:?}",
            self.id,
            RequestTrace::elapsed()
        );
        RequestTrace::clear();
        ReasoningContext::clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ReasoningState;
    use crate::trace::UNTRACED_ID;

    #[test]
    fn begin_discards_leftovers_and_drop_clears() {
        RequestTrace::initialize(Some("leaked"));
        ReasoningContext::set_state(ReasoningState::new("old query"));
        ReasoningContext::put("old", true);

        {
            let scope = RequestScope::begin(Some("fresh"));
            assert_eq!(scope.id(), "fresh");
            assert_eq!(RequestTrace::id(), "fresh");
            assert!(!ReasoningContext::has_state());
            assert!(!ReasoningContext::contains_key("old"));
            ReasoningContext::put("new", 1);
        }

        assert_eq!(RequestTrace::id(), UNTRACED_ID);
        assert!(ReasoningContext::snapshot().is_empty());
    }

    #[test]
    fn run_returns_closure_result() {
        let id = RequestScope::run(Some("r-1"), |scope| {
            assert_eq!(RequestTrace::id(), scope.id());
            scope.id().to_string()
        });
        assert_eq!(id, "r-1");
        assert!(!RequestTrace::is_active());
    }
}
