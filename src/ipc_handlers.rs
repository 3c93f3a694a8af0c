//! Built-in IPC signals and methods served by every context.

use crate::context::Context;
use hookterm_ipc::{Invocation, IpcRouter, IpcValue};
use hookterm_scripting::{ScriptError, ScriptValue};
use std::path::Path;

/// Convert an IPC payload for a script callback.
pub fn to_script_value(value: &IpcValue) -> ScriptValue {
    match value {
        IpcValue::Unit => ScriptValue::Unit,
        IpcValue::Bool(b) => ScriptValue::Bool(*b),
        IpcValue::Int(i) => ScriptValue::Int(*i),
        IpcValue::Str(s) => ScriptValue::Str(s.clone()),
        IpcValue::Tuple(items) => ScriptValue::Array(items.iter().map(to_script_value).collect()),
    }
}

/// The router every context is reachable through.
pub fn standard_router() -> IpcRouter<Context> {
    IpcRouter::builder()
        .with_standard_methods()
        .method("eval", |inv: &Invocation<'_, Context>| {
            with_source(inv, |ctx, src| eval_response(ctx, "eval", ctx.eval(src)))
        })
        .method("eval_file", |inv: &Invocation<'_, Context>| {
            with_source(inv, |ctx, path| {
                eval_response(ctx, "eval_file", ctx.eval_file(Path::new(path)))
            })
        })
        .method("exec", |inv: &Invocation<'_, Context>| {
            with_source(inv, |ctx, src| exec_response(ctx, "exec", ctx.eval(src)))
        })
        .method("exec_file", |inv: &Invocation<'_, Context>| {
            with_source(inv, |ctx, path| {
                exec_response(ctx, "exec_file", ctx.eval_file(Path::new(path)))
            })
        })
        .signal("reload", |inv: &Invocation<'_, Context>| {
            inv.target.load_config();
        })
        .signal("reload_theme", |inv: &Invocation<'_, Context>| {
            inv.target.reload_theme();
        })
        .signal("hook", |inv: &Invocation<'_, Context>| {
            inv.target.signal_hook(to_script_value(inv.params));
        })
        .build()
}

/// Run `f` with the request's string parameter, or answer with a usage
/// message when there is none.
fn with_source<F>(inv: &Invocation<'_, Context>, f: F) -> IpcValue
where
    F: FnOnce(&Context, &str) -> IpcValue,
{
    match inv.params.as_str() {
        Some(src) => f(inv.target, src),
        None => IpcValue::from(format!("expected a string parameter, got {}", inv.params)),
    }
}

fn failure(ctx: &Context, what: &str, err: ScriptError) -> IpcValue {
    ctx.report(&format!("IPC {what}"), &err);
    IpcValue::from(err.to_string())
}

/// String form of the single result. Unit is reported like a script error.
fn eval_response(ctx: &Context, what: &str, result: Result<ScriptValue, ScriptError>) -> IpcValue {
    match result {
        Ok(value) if value.is_unit() => failure(ctx, what, ScriptError::NoResult),
        Ok(value) => IpcValue::from(value.to_string()),
        Err(e) => failure(ctx, what, e),
    }
}

fn exec_response(ctx: &Context, what: &str, result: Result<ScriptValue, ScriptError>) -> IpcValue {
    match result {
        Ok(_) => IpcValue::empty_tuple(),
        Err(e) => failure(ctx, what, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_script_value() {
        let v = IpcValue::Tuple(vec![IpcValue::from("a"), IpcValue::Int(2)]);
        assert_eq!(
            to_script_value(&v),
            ScriptValue::Array(vec![ScriptValue::from("a"), ScriptValue::Int(2)])
        );
    }

    #[test]
    fn test_router_names() {
        let router = standard_router();
        for m in ["echo", "get_ids", "eval", "eval_file", "exec", "exec_file"] {
            assert!(router.has_method(m), "{m}");
        }
        for s in ["reload", "reload_theme", "hook"] {
            assert!(router.has_signal(s), "{s}");
        }
    }
}
