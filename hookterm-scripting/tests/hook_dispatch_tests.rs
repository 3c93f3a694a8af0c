//! Integration tests for hook dispatch through the Rhai runtime.

use hookterm_scripting::rhai::{EvalAltResult, FnPtr};
use hookterm_scripting::{
    CallbackHandle, HookName, HookTable, RhaiRuntime, ScriptRuntime, ScriptValue, UnknownHook,
    dispatch,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Runtime exposing `on(name, fn)` that fills a shared hook table.
fn runtime_with_hooks() -> (RhaiRuntime, Rc<RefCell<HookTable>>) {
    let mut rt = RhaiRuntime::new();
    let table = Rc::new(RefCell::new(HookTable::new()));
    let registrar = rt.registrar();
    let hooks = table.clone();
    rt.engine_mut().register_fn(
        "on",
        move |name: &str, f: FnPtr| -> Result<(), Box<EvalAltResult>> {
            let hook: HookName = name.parse().map_err(|e: UnknownHook| e.to_string())?;
            let handle = registrar.register(f).map_err(|e| e.to_string())?;
            let old = hooks.borrow_mut().set(hook, handle);
            if let Some(old) = old {
                registrar.release(old);
            }
            Ok(())
        },
    );
    (rt, table)
}

fn title_hook(rt: &RhaiRuntime, table: &Rc<RefCell<HookTable>>, native: &str) -> String {
    let handle = table.borrow().get(HookName::Title);
    dispatch(rt, handle, vec![ScriptValue::from(native)])
        .title_decision()
        .unwrap_or_else(|| native.to_string())
}

#[test]
fn unbound_title_hook_adopts_native_title() {
    let (rt, table) = runtime_with_hooks();
    assert_eq!(title_hook(&rt, &table, "vim"), "vim");
}

#[test]
fn title_hook_pair_return() {
    let (rt, table) = runtime_with_hooks();
    rt.eval(r#"on("title", |t| [true, "X"])"#).unwrap();
    assert_eq!(title_hook(&rt, &table, "vim"), "X");

    rt.eval(r#"on("title", |t| [false, "ignored"])"#).unwrap();
    assert_eq!(title_hook(&rt, &table, "vim"), "vim");
}

#[test]
fn rebinding_hook_releases_previous_callback() {
    let (rt, _table) = runtime_with_hooks();
    rt.eval(r#"on("bell", || true)"#).unwrap();
    rt.eval(r#"on("bell", || false)"#).unwrap();
    assert_eq!(rt.live_callbacks(), 1);
}

#[test]
fn failing_hook_is_unhandled_with_error() {
    let (rt, table) = runtime_with_hooks();
    rt.eval(r#"on("bell", || { throw "no bell"; })"#).unwrap();
    let outcome = dispatch(&rt, table.borrow().get(HookName::Bell), vec![]);
    assert!(!outcome.handled);
    assert!(outcome.error.unwrap().to_string().contains("no bell"));
}

#[test]
fn unknown_hook_name_is_a_script_error() {
    let (rt, _table) = runtime_with_hooks();
    let err = rt.eval(r#"on("keypress", || true)"#).unwrap_err();
    assert!(err.to_string().contains("keypress"));
}

#[test]
fn dispatch_without_handle_is_unhandled() {
    let rt = RhaiRuntime::new();
    let outcome = dispatch(&rt, None::<CallbackHandle>, vec![]);
    assert!(!outcome.handled);
    assert!(outcome.error.is_none());
}
