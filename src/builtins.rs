//! Host functions exposed to config, theme and callback scripts.
//!
//! Every builtin captures a `Weak<Context>` and upgrades it per call; a call
//! after the window closed is a script error, not a panic.

use crate::context::Context;
use crate::notify::DEFAULT_TITLE;
use hookterm_config::{Rgba, Value, parse_color, paths};
use hookterm_keybindings::{key_combo_to_bytes, parse_key_combo};
use hookterm_scripting::rhai::{Array, Dynamic, Engine, EvalAltResult, FnPtr, Map, Position};
use hookterm_scripting::{CallbackRegistrar, HookName, ScriptValue};
use std::rc::{Rc, Weak};

type RhaiResult<T> = Result<T, Box<EvalAltResult>>;

fn script_error(msg: impl Into<String>) -> Box<EvalAltResult> {
    let msg: String = msg.into();
    EvalAltResult::ErrorRuntime(Dynamic::from(msg), Position::NONE).into()
}

fn upgrade(weak: &Weak<Context>) -> RhaiResult<Rc<Context>> {
    weak.upgrade()
        .ok_or_else(|| script_error("terminal context is closed"))
}

fn value_to_dynamic(value: Value) -> Dynamic {
    match value {
        Value::String(s) => Dynamic::from(s),
        Value::Integer(i) => Dynamic::from(i),
        Value::Boolean(b) => Dynamic::from(b),
    }
}

fn dynamic_to_value(key: &str, value: &Dynamic) -> RhaiResult<Value> {
    match ScriptValue::from_dynamic(value) {
        ScriptValue::Str(s) => Ok(Value::String(s)),
        ScriptValue::Int(i) => Ok(Value::Integer(i)),
        ScriptValue::Bool(b) => Ok(Value::Boolean(b)),
        other => Err(script_error(format!(
            "'{key}' cannot hold {other} (expected a string, integer or boolean)"
        ))),
    }
}

/// Register every builtin on `engine`.
pub fn register(engine: &mut Engine, registrar: CallbackRegistrar, weak: Weak<Context>) {
    register_config(engine, &weak);
    register_keymap(engine, &registrar, &weak);
    register_hooks(engine, &registrar, &weak);
    register_lifecycle(engine, &weak);
    register_terminal(engine, &weak);
    register_info(engine, &weak);
    register_color(engine);
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn register_config(engine: &mut Engine, weak: &Weak<Context>) {
    let w = weak.clone();
    engine.register_fn("set", move |key: &str, value: Dynamic| -> RhaiResult<()> {
        let ctx = upgrade(&w)?;
        let value = dynamic_to_value(key, &value)?;
        ctx.set(key, value).map_err(|e| script_error(e.to_string()))
    });

    let w = weak.clone();
    engine.register_fn("get", move |key: &str| -> RhaiResult<Dynamic> {
        let ctx = upgrade(&w)?;
        ctx.get(key)
            .map(value_to_dynamic)
            .ok_or_else(|| script_error(format!("unknown config key '{key}'")))
    });

    let w = weak.clone();
    engine.register_fn("get_default", move |key: &str| -> RhaiResult<Dynamic> {
        let ctx = upgrade(&w)?;
        ctx.default_of(key)
            .map(value_to_dynamic)
            .ok_or_else(|| script_error(format!("unknown config key '{key}'")))
    });

    let w = weak.clone();
    engine.register_fn("reset", move |key: &str| -> RhaiResult<()> {
        let ctx = upgrade(&w)?;
        ctx.reset_key(key).map_err(|e| script_error(e.to_string()))
    });

    // Applies every valid pair; failures are collected into one error.
    let w = weak.clone();
    engine.register_fn("set_config", move |map: Map| -> RhaiResult<()> {
        let ctx = upgrade(&w)?;
        let mut failures = Vec::new();
        for (key, value) in map {
            let result = dynamic_to_value(&key, &value)
                .and_then(|v| ctx.set(&key, v).map_err(|e| script_error(e.to_string())));
            if let Err(e) = result {
                failures.push(e.to_string());
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(script_error(failures.join("; ")))
        }
    });

    let w = weak.clone();
    engine.register_fn("get_config", move || -> RhaiResult<Map> {
        let ctx = upgrade(&w)?;
        Ok(ctx
            .snapshot()
            .into_iter()
            .map(|(k, v)| (k.into(), value_to_dynamic(v)))
            .collect())
    });

    let w = weak.clone();
    engine.register_fn("reset_config", move || -> RhaiResult<()> {
        upgrade(&w)?.reset_all();
        Ok(())
    });
}

// ---------------------------------------------------------------------------
// Keymap
// ---------------------------------------------------------------------------

fn bind_one(
    ctx: &Context,
    registrar: &CallbackRegistrar,
    accel: &str,
    func: FnPtr,
) -> RhaiResult<()> {
    let handle = registrar
        .register(func)
        .map_err(|e| script_error(e.to_string()))?;
    if let Err(e) = ctx.bind_key(accel, handle) {
        registrar.release(handle);
        return Err(script_error(e.to_string()));
    }
    Ok(())
}

fn register_keymap(engine: &mut Engine, registrar: &CallbackRegistrar, weak: &Weak<Context>) {
    let (w, r) = (weak.clone(), registrar.clone());
    engine.register_fn("bind", move |accel: &str, func: FnPtr| -> RhaiResult<()> {
        let ctx = upgrade(&w)?;
        bind_one(&ctx, &r, accel, func)
    });

    let w = weak.clone();
    engine.register_fn("unbind", move |accel: &str| -> RhaiResult<bool> {
        upgrade(&w)?
            .unbind_key(accel)
            .map_err(|e| script_error(e.to_string()))
    });

    let (w, r) = (weak.clone(), registrar.clone());
    engine.register_fn("set_keymaps", move |map: Map| -> RhaiResult<()> {
        let ctx = upgrade(&w)?;
        for (accel, value) in map {
            let func = value
                .try_cast::<FnPtr>()
                .ok_or_else(|| script_error(format!("binding for '{accel}' is not a function")))?;
            bind_one(&ctx, &r, &accel, func)?;
        }
        Ok(())
    });

    let w = weak.clone();
    engine.register_fn("reset_keymaps", move || -> RhaiResult<()> {
        upgrade(&w)?.reset_keymap();
        Ok(())
    });
}

// ---------------------------------------------------------------------------
// Hooks
// ---------------------------------------------------------------------------

fn hook_one(
    ctx: &Context,
    registrar: &CallbackRegistrar,
    name: &str,
    func: FnPtr,
) -> RhaiResult<()> {
    // Validate before registering so an unknown name holds no callback.
    name.parse::<HookName>()
        .map_err(|e| script_error(e.to_string()))?;
    let handle = registrar
        .register(func)
        .map_err(|e| script_error(e.to_string()))?;
    ctx.set_hook(name, handle)
        .map_err(|e| script_error(e.to_string()))
}

fn register_hooks(engine: &mut Engine, registrar: &CallbackRegistrar, weak: &Weak<Context>) {
    let (w, r) = (weak.clone(), registrar.clone());
    engine.register_fn("on", move |name: &str, func: FnPtr| -> RhaiResult<()> {
        let ctx = upgrade(&w)?;
        hook_one(&ctx, &r, name, func)
    });

    let (w, r) = (weak.clone(), registrar.clone());
    engine.register_fn("set_hooks", move |map: Map| -> RhaiResult<()> {
        let ctx = upgrade(&w)?;
        for (name, value) in map {
            let func = value
                .try_cast::<FnPtr>()
                .ok_or_else(|| script_error(format!("hook '{name}' is not a function")))?;
            hook_one(&ctx, &r, &name, func)?;
        }
        Ok(())
    });
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

fn register_lifecycle(engine: &mut Engine, weak: &Weak<Context>) {
    let w = weak.clone();
    engine.register_fn("reload", move || -> RhaiResult<bool> {
        Ok(upgrade(&w)?.load_config())
    });

    let w = weak.clone();
    engine.register_fn("reload_theme", move || -> RhaiResult<()> {
        upgrade(&w)?.reload_theme();
        Ok(())
    });
}

// ---------------------------------------------------------------------------
// Terminal
// ---------------------------------------------------------------------------

fn register_terminal(engine: &mut Engine, weak: &Weak<Context>) {
    let w = weak.clone();
    engine.register_fn("put", move |text: &str| -> RhaiResult<()> {
        upgrade(&w)?.widget().feed_child(text.as_bytes());
        Ok(())
    });

    let w = weak.clone();
    engine.register_fn("send_key", move |accel: &str| -> RhaiResult<()> {
        let ctx = upgrade(&w)?;
        let bytes = parse_key_combo(accel)
            .and_then(|combo| key_combo_to_bytes(&combo))
            .map_err(|e| script_error(e.to_string()))?;
        ctx.widget().feed_child(&bytes);
        Ok(())
    });

    let w = weak.clone();
    engine.register_fn("bell", move || -> RhaiResult<()> {
        upgrade(&w)?.widget().bell();
        Ok(())
    });

    let w = weak.clone();
    engine.register_fn("copy", move |text: &str| -> RhaiResult<()> {
        upgrade(&w)?.widget().copy_clipboard(text);
        Ok(())
    });

    let w = weak.clone();
    engine.register_fn("copy_selection", move || -> RhaiResult<()> {
        upgrade(&w)?.widget().copy_selection();
        Ok(())
    });

    let w = weak.clone();
    engine.register_fn("paste", move || -> RhaiResult<()> {
        upgrade(&w)?.widget().paste_clipboard();
        Ok(())
    });

    let w = weak.clone();
    engine.register_fn("get_selection", move || -> RhaiResult<Dynamic> {
        Ok(upgrade(&w)?
            .widget()
            .selection()
            .map(Dynamic::from)
            .unwrap_or(Dynamic::UNIT))
    });

    let w = weak.clone();
    engine.register_fn("increase_font_scale", move || -> RhaiResult<()> {
        upgrade(&w)?.adjust_font_scale(crate::context::FONT_SCALE_STEP);
        Ok(())
    });

    let w = weak.clone();
    engine.register_fn("decrease_font_scale", move || -> RhaiResult<()> {
        upgrade(&w)?.adjust_font_scale(-crate::context::FONT_SCALE_STEP);
        Ok(())
    });

    let w = weak.clone();
    engine.register_fn("reset_font_scale", move || -> RhaiResult<()> {
        upgrade(&w)?.reset_font_scale();
        Ok(())
    });

    let w = weak.clone();
    engine.register_fn("notify", move |body: &str| -> RhaiResult<()> {
        upgrade(&w)?.notify(DEFAULT_TITLE, body);
        Ok(())
    });

    let w = weak.clone();
    engine.register_fn("notify", move |body: &str, title: &str| -> RhaiResult<()> {
        upgrade(&w)?.notify(title, body);
        Ok(())
    });
}

// ---------------------------------------------------------------------------
// Info
// ---------------------------------------------------------------------------

fn register_info(engine: &mut Engine, weak: &Weak<Context>) {
    engine.register_fn("get_version", || env!("CARGO_PKG_VERSION").to_string());

    let w = weak.clone();
    engine.register_fn("get_id", move || -> RhaiResult<i64> {
        Ok(upgrade(&w)?.id() as i64)
    });

    engine.register_fn("get_config_path", || {
        paths::config_dir().display().to_string()
    });

    let w = weak.clone();
    engine.register_fn("get_config_file_path", move || -> RhaiResult<String> {
        Ok(upgrade(&w)?
            .config_file()
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_default())
    });

    let w = weak.clone();
    engine.register_fn("get_theme_path", move || -> RhaiResult<String> {
        Ok(upgrade(&w)?
            .theme_file()
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_default())
    });
}

// ---------------------------------------------------------------------------
// Colour helpers
// ---------------------------------------------------------------------------

fn register_color(engine: &mut Engine) {
    engine.register_fn("color_to_rgba", |s: &str| -> RhaiResult<Array> {
        let c = parse_color(s).map_err(|e| script_error(e.to_string()))?;
        Ok([c.r, c.g, c.b, c.a]
            .into_iter()
            .map(|ch| Dynamic::from(ch as i64))
            .collect())
    });

    engine.register_fn(
        "rgb_to_color",
        |r: i64, g: i64, b: i64| -> RhaiResult<String> {
            let channel = |v: i64| {
                u8::try_from(v)
                    .map_err(|_| script_error(format!("colour channel {v} is outside 0..=255")))
            };
            Ok(Rgba::rgb(channel(r)?, channel(g)?, channel(b)?).to_hex())
        },
    );
}
