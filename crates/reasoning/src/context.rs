use crate::error::Result;
use crate::state::ReasoningState;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;

#[derive(Default)]
struct ContextSlot {
    state: Option<ReasoningState>,
    values: BTreeMap<String, Value>,
}

thread_local! {
    static CONTEXT: RefCell<ContextSlot> = RefCell::new(ContextSlot::default());
}

/// Request-scoped store shared by pipeline stages that do not call each other.
///
/// Holds at most one [`ReasoningState`] plus a free-form key/value bag, both
/// local to the current thread. Nothing is cleared automatically: call
/// [`ReasoningContext::clear`] at request end (or use
/// [`RequestScope`](crate::RequestScope)), otherwise the next request on this
/// thread observes stale data.
pub struct ReasoningContext;

impl ReasoningContext {
    /// Install `state`, replacing any previous one
    pub fn set_state(state: ReasoningState) {
        CONTEXT.with(|ctx| ctx.borrow_mut().state = Some(state));
    }

    /// Copy of the installed state
    pub fn get_state() -> Option<ReasoningState> {
        CONTEXT.with(|ctx| ctx.borrow().state.clone())
    }

    pub fn has_state() -> bool {
        CONTEXT.with(|ctx| ctx.borrow().state.is_some())
    }

    pub fn take_state() -> Option<ReasoningState> {
        CONTEXT.with(|ctx| ctx.borrow_mut().state.take())
    }

    /// Mutate the installed state in place; `None` when no state is installed.
    ///
    /// `f` may itself use the context. If it installs a new state, that one wins.
    pub fn with_state_mut<R>(f: impl FnOnce(&mut ReasoningState) -> R) -> Option<R> {
        let mut state = Self::take_state()?;
        let result = f(&mut state);
        CONTEXT.with(|ctx| {
            ctx.borrow_mut().state.get_or_insert(state);
        });
        Some(result)
    }

    /// Store `value` under `key`, returning the previous value
    pub fn put(key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let value = value.into();
        CONTEXT.with(|ctx| ctx.borrow_mut().values.insert(key.into(), value))
    }

    pub fn put_serialized<T: Serialize>(key: impl Into<String>, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        Self::put(key, value);
        Ok(())
    }

    pub fn get(key: &str) -> Option<Value> {
        CONTEXT.with(|ctx| ctx.borrow().values.get(key).cloned())
    }

    /// Deserialize the value under `key`; `Ok(None)` when absent
    pub fn get_as<T: DeserializeOwned>(key: &str) -> Result<Option<T>> {
        Self::get(key)
            .map(serde_json::from_value::<T>)
            .transpose()
            .map_err(Into::into)
    }

    pub fn contains_key(key: &str) -> bool {
        CONTEXT.with(|ctx| ctx.borrow().values.contains_key(key))
    }

    pub fn remove(key: &str) -> Option<Value> {
        CONTEXT.with(|ctx| ctx.borrow_mut().values.remove(key))
    }

    /// Copy of the key/value bag, sorted by key
    pub fn snapshot() -> BTreeMap<String, Value> {
        CONTEXT.with(|ctx| ctx.borrow().values.clone())
    }

    /// Drop the state and every stored value
    pub fn clear() {
        CONTEXT.with(|ctx| *ctx.borrow_mut() = ContextSlot::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn state_round_trip() {
        ReasoningContext::clear();
        assert!(ReasoningContext::get_state().is_none());

        ReasoningContext::set_state(ReasoningState::new("first"));
        ReasoningContext::set_state(ReasoningState::new("second"));
        let state = ReasoningContext::get_state().expect("state installed");
        assert_eq!(state.original_query(), "second");
        ReasoningContext::clear();
        assert!(!ReasoningContext::has_state());
    }

    #[test]
    fn with_state_mut_updates_in_place() {
        ReasoningContext::clear();
        assert_eq!(ReasoningContext::with_state_mut(|s| s.approve_tool("x")), None);

        ReasoningContext::set_state(ReasoningState::new("q"));
        let approved = ReasoningContext::with_state_mut(|s| {
            // nested reads see no state while it is checked out
            assert!(!ReasoningContext::has_state());
            s.approve_tool("search")
        });
        assert_eq!(approved, Some(true));
        let state = ReasoningContext::get_state().expect("state restored");
        assert!(state.is_tool_approved("search"));
        ReasoningContext::clear();
    }

    #[test]
    fn value_bag_operations() {
        ReasoningContext::clear();
        assert_eq!(ReasoningContext::put("b", 2), None);
        assert_eq!(ReasoningContext::put("a", "one"), None);
        assert_eq!(ReasoningContext::put("b", 3), Some(json!(2)));
        assert!(ReasoningContext::contains_key("a"));
        assert_eq!(ReasoningContext::get("missing"), None);

        let snapshot = ReasoningContext::snapshot();
        let keys: Vec<&str> = snapshot.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);

        assert_eq!(ReasoningContext::remove("a"), Some(json!("one")));
        assert!(!ReasoningContext::contains_key("a"));
        ReasoningContext::clear();
        assert!(ReasoningContext::snapshot().is_empty());
    }

    #[test]
    fn typed_values() {
        ReasoningContext::clear();
        ReasoningContext::put_serialized("tools", &vec!["a", "b"]).expect("serializes");
        let tools: Option<Vec<String>> = ReasoningContext::get_as("tools").expect("decodes");
        assert_eq!(tools, Some(vec!["a".to_string(), "b".to_string()]));

        let missing: Option<u32> = ReasoningContext::get_as("nope").expect("absent is ok");
        assert_eq!(missing, None);
        assert!(ReasoningContext::get_as::<u32>("tools").is_err());
        ReasoningContext::clear();
    }
}
