//! Rhai implementation of [`ScriptRuntime`].
//!
//! Script functions handed to the host (`bind("<Ctrl>t", |key| ...)`) are
//! stored as `FnPtr`s in a callback table and referred to by
//! [`CallbackHandle`]. A function pointer can only be called together with
//! the AST that defined it, so every evaluation pushes its AST on a stack
//! and the registrar pairs each new callback with the AST on top.

use crate::error::ScriptError;
use crate::handle::CallbackHandle;
use crate::runtime::ScriptRuntime;
use crate::value::ScriptValue;
use rhai::{AST, Dynamic, Engine, FnPtr};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

struct Callback {
    func: FnPtr,
    ast: Rc<AST>,
}

#[derive(Default)]
struct CallbackTable {
    next_id: u64,
    callbacks: HashMap<CallbackHandle, Callback>,
}

/// Shared handle for registering callbacks from inside host functions.
///
/// Cloned into `register_fn` closures that receive `FnPtr` arguments.
#[derive(Clone)]
pub struct CallbackRegistrar {
    table: Rc<RefCell<CallbackTable>>,
    asts: Rc<RefCell<Vec<Rc<AST>>>>,
}

impl CallbackRegistrar {
    /// Store `func` against the AST currently being evaluated.
    pub fn register(&self, func: FnPtr) -> Result<CallbackHandle, ScriptError> {
        let ast = self.asts.borrow().last().cloned().ok_or_else(|| {
            ScriptError::Runtime("callbacks can only be registered from a running script".into())
        })?;
        let mut table = self.table.borrow_mut();
        table.next_id += 1;
        let handle = CallbackHandle::from_raw(table.next_id);
        log::debug!("Registered callback {} ({})", handle, func.fn_name());
        table.callbacks.insert(handle, Callback { func, ast });
        Ok(handle)
    }

    pub fn release(&self, handle: CallbackHandle) {
        if self.table.borrow_mut().callbacks.remove(&handle).is_some() {
            log::debug!("Released callback {}", handle);
        }
    }
}

/// Rhai-backed script runtime.
pub struct RhaiRuntime {
    engine: Engine,
    registrar: CallbackRegistrar,
}

impl RhaiRuntime {
    /// Create an engine whose `print`/`debug` output goes to the log.
    pub fn new() -> Self {
        let mut engine = Engine::new();
        engine.on_print(|s| log::info!(target: "hookterm::script", "{}", s));
        engine.on_debug(|s, source, pos| match source {
            Some(src) => log::debug!(target: "hookterm::script", "{} @ {:?}: {}", src, pos, s),
            None => log::debug!(target: "hookterm::script", "{:?}: {}", pos, s),
        });

        Self {
            engine,
            registrar: CallbackRegistrar {
                table: Rc::new(RefCell::new(CallbackTable::default())),
                asts: Rc::new(RefCell::new(Vec::new())),
            },
        }
    }

    /// Mutable engine access, for registering host functions before any
    /// script runs.
    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn registrar(&self) -> CallbackRegistrar {
        self.registrar.clone()
    }

    /// Evaluate `ast` with it on top of the AST stack.
    fn run_ast(&self, ast: AST) -> Result<Dynamic, ScriptError> {
        let ast = Rc::new(ast);
        self.registrar.asts.borrow_mut().push(ast.clone());
        let result = self.engine.eval_ast::<Dynamic>(&ast);
        self.registrar.asts.borrow_mut().pop();
        Ok(result?)
    }
}

impl Default for RhaiRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptRuntime for RhaiRuntime {
    fn eval(&self, source: &str) -> Result<ScriptValue, ScriptError> {
        let ast = self.engine.compile(source)?;
        let result = self.run_ast(ast)?;
        Ok(ScriptValue::from_dynamic(&result))
    }

    fn eval_file(&self, path: &Path) -> Result<ScriptValue, ScriptError> {
        let source = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut ast = self.engine.compile(&source)?;
        ast.set_source(path.display().to_string());
        log::debug!("Evaluating {}", path.display());
        let result = self.run_ast(ast)?;
        Ok(ScriptValue::from_dynamic(&result))
    }

    fn invoke(
        &self,
        handle: CallbackHandle,
        args: Vec<ScriptValue>,
    ) -> Result<ScriptValue, ScriptError> {
        // Copy out so no borrow is held while the script runs.
        let (func, ast) = {
            let table = self.registrar.table.borrow();
            let cb = table
                .callbacks
                .get(&handle)
                .ok_or(ScriptError::UnknownCallback(handle))?;
            (cb.func.clone(), cb.ast.clone())
        };

        let args: Vec<Dynamic> = args.into_iter().map(ScriptValue::into_dynamic).collect();
        self.registrar.asts.borrow_mut().push(ast.clone());
        let result = func.call::<Dynamic>(&self.engine, &ast, args);
        self.registrar.asts.borrow_mut().pop();
        Ok(ScriptValue::from_dynamic(&result?))
    }

    fn release(&self, handle: CallbackHandle) {
        self.registrar.release(handle);
    }

    fn live_callbacks(&self) -> usize {
        self.registrar.table.borrow().callbacks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rhai::EvalAltResult;
    use std::cell::Cell;

    /// Runtime with a `keep(fn)` host function recording the last handle.
    fn runtime_with_keep() -> (RhaiRuntime, Rc<Cell<Option<CallbackHandle>>>) {
        let mut rt = RhaiRuntime::new();
        let registrar = rt.registrar();
        let slot = Rc::new(Cell::new(None));
        let kept = slot.clone();
        rt.engine_mut().register_fn(
            "keep",
            move |f: FnPtr| -> Result<(), Box<EvalAltResult>> {
                let handle = registrar.register(f).map_err(|e| e.to_string())?;
                kept.set(Some(handle));
                Ok(())
            },
        );
        (rt, slot)
    }

    #[test]
    fn test_top_level_return() {
        let rt = RhaiRuntime::new();
        assert_eq!(rt.eval("return 1 + 1").unwrap(), ScriptValue::Int(2));
        assert_eq!(rt.eval("").unwrap(), ScriptValue::Unit);
    }

    #[test]
    fn test_syntax_error_is_runtime_error() {
        let rt = RhaiRuntime::new();
        assert!(matches!(rt.eval("let = ;"), Err(ScriptError::Runtime(_))));
    }

    #[test]
    fn test_invoke_closure_with_capture() {
        let (rt, slot) = runtime_with_keep();
        rt.eval("let k = 10; keep(|x| x + k);").unwrap();
        let handle = slot.get().unwrap();
        assert_eq!(
            rt.invoke(handle, vec![ScriptValue::Int(32)]).unwrap(),
            ScriptValue::Int(42)
        );
    }

    #[test]
    fn test_invoke_named_script_function() {
        let (rt, slot) = runtime_with_keep();
        rt.eval("fn double(x) { x * 2 } keep(Fn(\"double\"));").unwrap();
        let handle = slot.get().unwrap();
        assert_eq!(
            rt.invoke(handle, vec![ScriptValue::Int(4)]).unwrap(),
            ScriptValue::Int(8)
        );
    }

    #[test]
    fn test_callback_outlives_later_evals() {
        let (rt, slot) = runtime_with_keep();
        rt.eval("fn greet() { \"first\" } keep(Fn(\"greet\"));").unwrap();
        let first = slot.get().unwrap();
        rt.eval("fn greet() { \"second\" } keep(Fn(\"greet\"));").unwrap();
        let second = slot.get().unwrap();
        assert_eq!(rt.invoke(first, vec![]).unwrap(), ScriptValue::from("first"));
        assert_eq!(rt.invoke(second, vec![]).unwrap(), ScriptValue::from("second"));
    }

    #[test]
    fn test_release() {
        let (rt, slot) = runtime_with_keep();
        rt.eval("keep(|| 1)").unwrap();
        let handle = slot.get().unwrap();
        assert_eq!(rt.live_callbacks(), 1);
        rt.release(handle);
        assert_eq!(rt.live_callbacks(), 0);
        assert!(matches!(
            rt.invoke(handle, vec![]),
            Err(ScriptError::UnknownCallback(h)) if h == handle
        ));
    }

    #[test]
    fn test_callback_error_is_reported() {
        let (rt, slot) = runtime_with_keep();
        rt.eval("keep(|| { throw \"boom\"; })").unwrap();
        let err = rt.invoke(slot.get().unwrap(), vec![]).unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_register_outside_script_fails() {
        let rt = RhaiRuntime::new();
        let registrar = rt.registrar();
        let func = FnPtr::new("anything").unwrap();
        assert!(registrar.register(func).is_err());
    }

    #[test]
    fn test_eval_file() {
        let rt = RhaiRuntime::new();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.rhai");
        std::fs::write(&path, "40 + 2").unwrap();
        assert_eq!(rt.eval_file(&path).unwrap(), ScriptValue::Int(42));
        assert!(matches!(
            rt.eval_file(&dir.path().join("missing.rhai")),
            Err(ScriptError::Io { .. })
        ));
    }
}
