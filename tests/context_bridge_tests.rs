//! Config access from scripts through the property bridge.

mod common;

use common::Fixture;
use hookterm::{BridgeError, ColorChoice};
use hookterm_config::{ColorRole, ColorSetting, ConfigError, DEFAULT_PALETTE, Rgba, Value};
use hookterm_scripting::ScriptValue;

// ---------------------------------------------------------------------------
// get / set
// ---------------------------------------------------------------------------

#[test]
fn get_reads_live_widget_state() {
    let fx = Fixture::new(None, None, &[]);
    let (ctx, widget) = fx.open();
    widget.resize(200, 60);

    assert_eq!(ctx.eval(r#"get("width")"#).unwrap(), ScriptValue::Int(200));
    assert_eq!(ctx.eval(r#"get("height")"#).unwrap(), ScriptValue::Int(60));
    // The store still holds the configured size.
    assert_eq!(ctx.stored("width"), Some(Value::Integer(80)));
}

#[test]
fn get_of_store_only_key() {
    let fx = Fixture::with_config(r#"set("uri_schemes", "https");"#);
    let (ctx, _widget) = fx.open();
    assert_eq!(ctx.eval(r#"get("uri_schemes")"#).unwrap(), ScriptValue::from("https"));
    assert_eq!(
        ctx.eval(r#"get_default("uri_schemes")"#).unwrap(),
        ScriptValue::from("http https file mailto")
    );
}

#[test]
fn set_rejects_unknown_keys_and_wrong_types() {
    let fx = Fixture::new(None, None, &[]);
    let (ctx, widget) = fx.open();

    let err = ctx.eval(r#"set("no_such_key", 1)"#).unwrap_err();
    assert!(err.to_string().contains("unknown config key"));

    let err = ctx.eval(r#"set("width", "wide")"#).unwrap_err();
    assert!(err.to_string().contains("expects integer"));
    assert_eq!(widget.state().columns, 80);

    assert!(matches!(
        ctx.set("silent", Value::from("yes")),
        Err(BridgeError::Config(ConfigError::TypeMismatch { .. }))
    ));
}

#[test]
fn set_rejects_out_of_range_values() {
    let fx = Fixture::new(None, None, &[]);
    let (ctx, widget) = fx.open();
    assert!(matches!(
        ctx.set("width", Value::Integer(0)),
        Err(BridgeError::InvalidValue { .. })
    ));
    assert_eq!(widget.state().columns, 80);
    assert_eq!(ctx.stored("width"), Some(Value::Integer(80)));
}

#[test]
fn set_rejects_unknown_enum_names() {
    let fx = Fixture::new(None, None, &[]);
    let (ctx, _widget) = fx.open();
    assert!(ctx.eval(r#"set("cursor_shape", "triangle")"#).is_err());
    assert_eq!(ctx.stored("cursor_shape"), Some(Value::from("block")));
}

#[test]
fn nested_values_are_rejected() {
    let fx = Fixture::new(None, None, &[]);
    let (ctx, _widget) = fx.open();
    let err = ctx.eval(r#"set("title", [1, 2])"#).unwrap_err();
    assert!(err.to_string().contains("cannot hold"));
}

// ---------------------------------------------------------------------------
// Colours
// ---------------------------------------------------------------------------

#[test]
fn colour_roles_reach_the_widget() {
    let fx = Fixture::with_config(
        r##"
        set("color_foreground", "#112233");
        set("color_cursor", "NONE");
        "##,
    );
    let (ctx, widget) = fx.open();
    let state = widget.state();
    assert_eq!(
        state.colors.get(&ColorRole::Foreground),
        Some(&ColorChoice::Custom(Rgba::rgb(0x11, 0x22, 0x33)))
    );
    assert_eq!(state.colors.get(&ColorRole::Cursor), Some(&ColorChoice::Disabled));
    assert_eq!(
        state.colors.get(&ColorRole::Background),
        Some(&ColorChoice::Default)
    );
    drop(state);

    assert_eq!(ctx.color_setting("color_cursor"), ColorSetting::Disabled);
    assert_eq!(ctx.color_setting("color_bold"), ColorSetting::Default);
}

#[test]
fn invalid_palette_entry_leaves_palette_unchanged() {
    let fx = Fixture::with_config(r##"set("color_3", "#102030");"##);
    let (ctx, widget) = fx.open();
    let pushes = widget.state().palette_pushes;

    assert!(ctx.eval(r#"set("color_3", "not-a-colour")"#).is_err());

    let state = widget.state();
    assert_eq!(state.palette[3], Rgba::rgb(0x10, 0x20, 0x30));
    assert_eq!(state.palette_pushes, pushes);
    drop(state);
    assert_eq!(ctx.stored("color_3"), Some(Value::from("#102030")));
}

#[test]
fn palette_slot_write_pushes_whole_palette() {
    let fx = Fixture::new(None, None, &[]);
    let (ctx, widget) = fx.open();
    ctx.eval(r#"set("color_9", "rgb(1, 2, 3)")"#).unwrap();

    let state = widget.state();
    assert_eq!(state.palette[9], Rgba::rgb(1, 2, 3));
    assert_eq!(state.palette[8], DEFAULT_PALETTE[8]);
}

#[test]
fn none_palette_slot_uses_default_colour() {
    let fx = Fixture::with_config(r#"set("color_2", "NONE");"#);
    let (_ctx, widget) = fx.open();
    assert_eq!(widget.state().palette[2], DEFAULT_PALETTE[2]);
}

#[test]
fn colour_helpers() {
    let fx = Fixture::new(None, None, &[]);
    let (ctx, _widget) = fx.open();
    assert_eq!(
        ctx.eval(r##"color_to_rgba("#ff8000")"##).unwrap(),
        ScriptValue::Array(vec![
            ScriptValue::Int(255),
            ScriptValue::Int(128),
            ScriptValue::Int(0),
            ScriptValue::Int(255),
        ])
    );
    assert_eq!(
        ctx.eval("rgb_to_color(16, 32, 48)").unwrap(),
        ScriptValue::from("#102030")
    );
    assert!(ctx.eval("rgb_to_color(256, 0, 0)").is_err());
    assert!(ctx.eval(r#"color_to_rgba("nope")"#).is_err());
}

// ---------------------------------------------------------------------------
// Bulk access
// ---------------------------------------------------------------------------

#[test]
fn get_config_snapshots_every_key() {
    let fx = Fixture::with_config(r#"set("scale", 120);"#);
    let (ctx, _widget) = fx.open();
    let ScriptValue::Map(map) = ctx.eval("get_config()").unwrap() else {
        panic!("get_config should return a map");
    };
    assert_eq!(map.get("scale"), Some(&ScriptValue::Int(120)));
    assert_eq!(map.get("term"), Some(&ScriptValue::from("xterm-256color")));
    assert!(!map.contains_key("color_0 .. color_15"));
}

#[test]
fn set_config_applies_valid_pairs_and_reports_the_rest() {
    let fx = Fixture::new(None, None, &[]);
    let (ctx, widget) = fx.open();

    let err = ctx
        .eval(r#"set_config(#{ width: 100, bogus: 1, silent: true })"#)
        .unwrap_err();
    assert!(err.to_string().contains("bogus"));

    assert_eq!(widget.state().columns, 100);
    assert!(widget.state().silent);
}

#[test]
fn reset_restores_defaults() {
    let fx = Fixture::with_config(r#"set("scale", 140); set("title", "x");"#);
    let (ctx, widget) = fx.open();

    ctx.eval(r#"reset("scale")"#).unwrap();
    assert_eq!(widget.state().scale, 100);
    assert_eq!(widget.state().title, "x");

    ctx.eval("reset_config()").unwrap();
    assert_eq!(widget.state().title, "hookterm");
    assert!(ctx.eval(r#"reset("missing")"#).is_err());
}
