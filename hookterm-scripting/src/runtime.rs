use crate::error::ScriptError;
use crate::handle::CallbackHandle;
use crate::value::ScriptValue;
use std::path::Path;

/// An embedded script interpreter.
///
/// All methods take `&self`: scripts may call back into the host, which may
/// in turn evaluate more script on the same runtime.
pub trait ScriptRuntime {
    /// Evaluate source text and return its result.
    fn eval(&self, source: &str) -> Result<ScriptValue, ScriptError>;

    /// Evaluate a script file and return its result.
    fn eval_file(&self, path: &Path) -> Result<ScriptValue, ScriptError>;

    /// Call a previously registered callback.
    fn invoke(
        &self,
        handle: CallbackHandle,
        args: Vec<ScriptValue>,
    ) -> Result<ScriptValue, ScriptError>;

    /// Drop a callback. Releasing an unknown handle is a no-op.
    fn release(&self, handle: CallbackHandle);

    /// Number of callbacks currently held.
    fn live_callbacks(&self) -> usize;
}
