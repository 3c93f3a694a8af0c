//! Event hook table and dispatch.
//!
//! Each terminal event has at most one script callback. A callback's return
//! value decides whether the event counts as handled:
//!
//! | return value         | handled        | value        |
//! |----------------------|----------------|--------------|
//! | `true` / `false`     | as given       | the bool     |
//! | non-empty string     | yes            | the string   |
//! | `[flag, value]`      | `flag`         | `value`      |
//! | `()` or anything else| no             | as returned  |

use crate::error::ScriptError;
use crate::handle::CallbackHandle;
use crate::runtime::ScriptRuntime;
use crate::value::ScriptValue;
use std::fmt;
use std::str::FromStr;

/// The closed set of hookable events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookName {
    Title,
    Bell,
    Clicked,
    Scroll,
    Drag,
    Activated,
    Deactivated,
    Selected,
    Unselected,
    Resized,
    Signal,
}

impl HookName {
    pub const ALL: [HookName; 11] = [
        HookName::Title,
        HookName::Bell,
        HookName::Clicked,
        HookName::Scroll,
        HookName::Drag,
        HookName::Activated,
        HookName::Deactivated,
        HookName::Selected,
        HookName::Unselected,
        HookName::Resized,
        HookName::Signal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HookName::Title => "title",
            HookName::Bell => "bell",
            HookName::Clicked => "clicked",
            HookName::Scroll => "scroll",
            HookName::Drag => "drag",
            HookName::Activated => "activated",
            HookName::Deactivated => "deactivated",
            HookName::Selected => "selected",
            HookName::Unselected => "unselected",
            HookName::Resized => "resized",
            HookName::Signal => "signal",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for HookName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown hook '{0}'")]
pub struct UnknownHook(pub String);

impl FromStr for HookName {
    type Err = UnknownHook;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HookName::ALL
            .into_iter()
            .find(|h| h.as_str() == s)
            .ok_or_else(|| UnknownHook(s.to_string()))
    }
}

/// One optional callback per hook.
#[derive(Debug, Clone, Default)]
pub struct HookTable {
    slots: [Option<CallbackHandle>; HookName::ALL.len()],
}

impl HookTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a callback, returning the one it replaces.
    pub fn set(&mut self, hook: HookName, handle: CallbackHandle) -> Option<CallbackHandle> {
        self.slots[hook.index()].replace(handle)
    }

    pub fn set_by_name(
        &mut self,
        name: &str,
        handle: CallbackHandle,
    ) -> Result<Option<CallbackHandle>, UnknownHook> {
        let hook = name.parse::<HookName>()?;
        Ok(self.set(hook, handle))
    }

    pub fn get(&self, hook: HookName) -> Option<CallbackHandle> {
        self.slots[hook.index()]
    }

    pub fn take(&mut self, hook: HookName) -> Option<CallbackHandle> {
        self.slots[hook.index()].take()
    }

    /// Unbind every hook, returning the released handles.
    pub fn clear(&mut self) -> Vec<CallbackHandle> {
        self.slots.iter_mut().filter_map(Option::take).collect()
    }

    pub fn bound(&self) -> impl Iterator<Item = (HookName, CallbackHandle)> + '_ {
        HookName::ALL
            .into_iter()
            .filter_map(|h| self.get(h).map(|cb| (h, cb)))
    }
}

/// Result of running a hook.
#[derive(Debug, Default)]
pub struct HookOutcome {
    pub handled: bool,
    pub value: ScriptValue,
    pub error: Option<ScriptError>,
}

impl HookOutcome {
    pub fn unhandled() -> Self {
        Self::default()
    }

    fn from_result(result: ScriptValue) -> Self {
        let (handled, value) = match result {
            ScriptValue::Bool(b) => (b, ScriptValue::Bool(b)),
            ScriptValue::Str(s) => (!s.is_empty(), ScriptValue::Str(s)),
            ScriptValue::Array(mut items)
                if items.len() == 2 && matches!(items[0], ScriptValue::Bool(_)) =>
            {
                let value = items.pop().unwrap_or_default();
                (items[0] == ScriptValue::Bool(true), value)
            }
            other => (false, other),
        };
        Self {
            handled,
            value,
            error: None,
        }
    }

    /// The title a `title` hook chose, if it consumed the event.
    pub fn title_decision(&self) -> Option<String> {
        if !self.handled {
            return None;
        }
        self.value.as_str().map(str::to_string)
    }
}

/// Run `handle` (if any) with `args` and interpret its return value.
///
/// Script errors are captured in the outcome, never propagated.
pub fn dispatch(
    runtime: &dyn ScriptRuntime,
    handle: Option<CallbackHandle>,
    args: Vec<ScriptValue>,
) -> HookOutcome {
    let Some(handle) = handle else {
        return HookOutcome::unhandled();
    };
    match runtime.invoke(handle, args) {
        Ok(result) => HookOutcome::from_result(result),
        Err(error) => HookOutcome {
            handled: false,
            value: ScriptValue::Unit,
            error: Some(error),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(id: u64) -> CallbackHandle {
        CallbackHandle::from_raw(id)
    }

    #[test]
    fn test_names_round_trip() {
        for hook in HookName::ALL {
            assert_eq!(hook.as_str().parse::<HookName>().unwrap(), hook);
        }
        assert!("keypress".parse::<HookName>().is_err());
    }

    #[test]
    fn test_set_replaces_and_clear_releases() {
        let mut table = HookTable::new();
        assert_eq!(table.set(HookName::Bell, h(1)), None);
        assert_eq!(table.set_by_name("bell", h(2)).unwrap(), Some(h(1)));
        table.set(HookName::Title, h(3));
        assert_eq!(table.get(HookName::Bell), Some(h(2)));

        let mut released = table.clear();
        released.sort();
        assert_eq!(released, vec![h(2), h(3)]);
        assert_eq!(table.bound().count(), 0);
    }

    #[test]
    fn test_unknown_hook_name() {
        let mut table = HookTable::new();
        assert_eq!(
            table.set_by_name("nope", h(1)),
            Err(UnknownHook("nope".into()))
        );
    }

    #[test]
    fn test_truthiness() {
        let outcome = HookOutcome::from_result(ScriptValue::Bool(true));
        assert!(outcome.handled);
        assert!(!HookOutcome::from_result(ScriptValue::Unit).handled);
        assert!(!HookOutcome::from_result(ScriptValue::Bool(false)).handled);
        assert!(HookOutcome::from_result(ScriptValue::from("x")).handled);
        assert!(!HookOutcome::from_result(ScriptValue::from("")).handled);
    }

    #[test]
    fn test_pair_return() {
        let yes = HookOutcome::from_result(ScriptValue::Array(vec![
            ScriptValue::Bool(true),
            ScriptValue::from("X"),
        ]));
        assert_eq!(yes.title_decision(), Some("X".to_string()));

        let no = HookOutcome::from_result(ScriptValue::Array(vec![
            ScriptValue::Bool(false),
            ScriptValue::from("X"),
        ]));
        assert!(!no.handled);
        assert_eq!(no.title_decision(), None);
    }
}
