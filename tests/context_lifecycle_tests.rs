//! Config/theme loading, reentrancy and reload behaviour of a Context.

mod common;

use common::{Fixture, RecordingNotifier, ReentrantWidget};
use hookterm::{App, ColorChoice, HeadlessWidget, LoadState, TerminalWidget};
use hookterm_config::paths::CONTEXT_ID_ENV;
use hookterm_config::{ColorRole, CursorShape, MetaRegistry, Rgba, Value, parse_args};
use hookterm_scripting::ScriptRuntime;
use std::rc::Rc;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Defaults and overrides
// ---------------------------------------------------------------------------

#[test]
fn fresh_context_holds_every_default() {
    let fx = Fixture::new(None, None, &[]);
    let (ctx, _widget) = fx.open();
    let meta = fx.app.meta().clone();
    for key in meta.keys() {
        assert_eq!(ctx.stored(key), ctx.default_of(key), "{key}");
    }
    assert!(fx.notes.bodies().is_empty());
}

#[test]
fn cli_overrides_replace_only_present_keys() {
    let fx = Fixture::new(
        Some(r#"set("width", 80); set("height", 24);"#),
        None,
        &["--width", "123"],
    );
    let (ctx, widget) = fx.open();
    assert_eq!(ctx.stored("width"), Some(Value::Integer(123)));
    assert_eq!(ctx.stored("height"), Some(Value::Integer(24)));
    assert_eq!(widget.columns(), 123);
    assert_eq!(widget.rows(), 24);
}

#[test]
fn config_values_reach_the_widget() {
    let fx = Fixture::with_config(
        r#"
        set("title", "dev shell");
        set("cursor_shape", "underline");
        set("scrollback_length", 10000);
        "#,
    );
    let (_ctx, widget) = fx.open();
    let state = widget.state();
    assert_eq!(state.title, "dev shell");
    assert_eq!(state.cursor_shape.as_str(), "underline");
    assert_eq!(state.scrollback_length, 10000);
}

#[test]
fn invalid_cli_values_are_reported_and_not_stored() {
    let fx = Fixture::new(
        None,
        None,
        &[
            "--padding_horizontal",
            "-7",
            "--cursor_shape",
            "round",
            "--width",
            "90",
        ],
    );
    let (ctx, widget) = fx.open();
    assert_eq!(
        ctx.stored("padding_horizontal"),
        ctx.default_of("padding_horizontal")
    );
    assert_eq!(ctx.stored("cursor_shape"), ctx.default_of("cursor_shape"));
    assert_eq!(widget.cursor_shape(), CursorShape::Block);
    assert_eq!(ctx.stored("width"), Some(Value::Integer(90)));

    let bodies = fx.notes.bodies();
    assert!(
        bodies
            .iter()
            .any(|b| b.starts_with("Command line") && b.contains("padding_horizontal"))
    );
    assert!(bodies.iter().any(|b| b.contains("cursor_shape")));
}

#[test]
fn invalid_cli_value_does_not_replace_config_value() {
    let fx = Fixture::new(
        Some(r#"set("cursor_shape", "underline");"#),
        None,
        &["--cursor_shape", "round"],
    );
    let (ctx, widget) = fx.open();
    assert_eq!(ctx.stored("cursor_shape"), Some(Value::from("underline")));
    assert_eq!(widget.cursor_shape(), CursorShape::Underline);
    assert_eq!(fx.notes.bodies().len(), 1);
}

// ---------------------------------------------------------------------------
// Load state machine
// ---------------------------------------------------------------------------

#[test]
fn config_script_runs_while_loading() {
    let fx = Fixture::with_config(r#"set("title", "from config");"#);
    let widget = ReentrantWidget::default();
    let ctx = fx.open_with(Rc::new(widget.clone()));
    widget.attach(&ctx);

    assert!(ctx.load_config());
    assert!(!ctx.is_loading());
    let seen = widget.seen.borrow();
    assert!(!seen.is_empty());
    assert!(seen.iter().all(|(loading, _)| *loading));
}

#[test]
fn widget_setter_may_read_back_through_the_context() {
    let fx = Fixture::with_config(r#"set("title", "from config");"#);
    let widget = ReentrantWidget::default();
    let ctx = fx.open_with(Rc::new(widget.clone()));
    widget.attach(&ctx);

    ctx.set("title", Value::from("later")).unwrap();
    ctx.eval(r#"set("title", "scripted")"#).unwrap();

    assert_eq!(
        *widget.seen.borrow(),
        vec![
            (false, Some(Value::from("from config"))),
            (false, Some(Value::from("later"))),
        ]
    );
    assert_eq!(ctx.stored("title"), Some(Value::from("scripted")));
    assert_eq!(widget.title(), "scripted");
}

#[test]
fn nested_reload_is_a_noop() {
    let fx = Fixture::with_config(
        r#"
        let nested = reload();
        set("title", if nested { "nested" } else { "guarded" });
        "#,
    );
    let (ctx, widget) = fx.open();
    assert_eq!(widget.title(), "guarded");
    assert_eq!(ctx.state().load, LoadState::Idle);
    assert!(!ctx.is_loading());
    assert!(ctx.is_initialized());
}

#[test]
fn reload_from_callback_runs_a_full_load() {
    let fx = Fixture::with_config(r#"on("bell", || { reload(); true });"#);
    let (ctx, _widget) = fx.open();
    fx.rewrite_config(r#"set("title", "reloaded");"#);

    ctx.bell();

    assert_eq!(ctx.get("title"), Some(Value::from("reloaded")));
    assert!(!ctx.is_loading());
    assert_eq!(ctx.runtime().live_callbacks(), 0);
}

#[test]
fn script_error_keeps_partial_mutations_and_notifies() {
    let fx = Fixture::with_config(
        r#"
        set("width", 100);
        throw "config exploded";
        set("height", 40);
        "#,
    );
    let (ctx, _widget) = fx.open();
    assert_eq!(ctx.stored("width"), Some(Value::Integer(100)));
    assert_eq!(ctx.stored("height"), ctx.default_of("height"));
    assert!(fx.notes.bodies().iter().any(|b| b.contains("config exploded")));
    assert!(!ctx.is_loading());
}

#[test]
fn reload_rebuilds_keymap_and_hooks() {
    let fx = Fixture::with_config(
        r#"
        bind("<Ctrl>a", || 1);
        bind("<Ctrl>b", || 2);
        on("bell", || true);
        "#,
    );
    let (ctx, _widget) = fx.open();
    assert_eq!(ctx.keymap_len(), 2);
    assert_eq!(ctx.runtime().live_callbacks(), 3);

    fx.rewrite_config(r#"bind("<Ctrl>c", || 3);"#);
    assert!(ctx.load_config());

    assert_eq!(ctx.keymap_len(), 1);
    assert_eq!(ctx.runtime().live_callbacks(), 1);
}

#[test]
fn reload_resets_values_the_new_config_no_longer_sets() {
    let fx = Fixture::with_config(r#"set("scale", 150);"#);
    let (ctx, widget) = fx.open();
    assert_eq!(widget.scale(), 150);

    fx.rewrite_config("");
    ctx.load_config();
    assert_eq!(widget.scale(), 100);
}

#[test]
fn structural_keys_freeze_after_initialisation() {
    let fx = Fixture::with_config(r#"set("term", "vt100");"#);
    let (ctx, _widget) = fx.open();
    assert_eq!(ctx.stored("term"), Some(Value::from("vt100")));

    ctx.eval(r#"set("term", "dumb")"#).unwrap();
    assert_eq!(ctx.stored("term"), Some(Value::from("vt100")));
}

#[test]
fn structural_keys_survive_reload() {
    let fx = Fixture::with_config(r#"set("term", "vt100"); set("shell", "/bin/zsh");"#);
    let (ctx, _widget) = fx.open();
    fx.rewrite_config(r#"set("term", "dumb");"#);

    assert!(ctx.load_config());
    assert_eq!(ctx.stored("term"), Some(Value::from("vt100")));
    assert_eq!(ctx.stored("shell"), Some(Value::from("/bin/zsh")));
    assert!(
        ctx.child_env()
            .iter()
            .any(|(k, v)| *k == "TERM" && v == "vt100")
    );
}

// ---------------------------------------------------------------------------
// Script sources
// ---------------------------------------------------------------------------

#[test]
fn missing_config_file_is_skipped_silently() {
    let fx = Fixture::new(None, None, &[]);
    let (ctx, _widget) = fx.open();
    assert!(!fx.config_path.exists());
    assert!(fx.notes.bodies().is_empty());
    assert!(ctx.is_initialized());
}

#[test]
fn none_disables_config_and_theme() {
    let meta = Arc::new(MetaRegistry::new());
    let args = parse_args(["hookterm", "--use", "NONE", "--theme", "NONE"], &meta).unwrap();
    let notes = RecordingNotifier::default();
    let app = App::new(meta, args, Rc::new(notes.clone()));
    let ctx = app.open_window(Rc::new(HeadlessWidget::new()));

    assert!(ctx.config_file().path().is_none());
    assert!(ctx.theme_file().path().is_none());
    assert_eq!(ctx.eval("get_config_file_path()").unwrap().to_string(), "");
    assert!(notes.bodies().is_empty());
}

#[test]
fn theme_stores_only_colour_strings() {
    let fx = Fixture::new(
        None,
        Some(
            r##"
            #{
                color_foreground: "#ffffff",
                color_3: "#00ff00",
                width: 10,
                color_bold: 7,
                colour_typo: "#000000",
            }
            "##,
        ),
        &[],
    );
    let (ctx, widget) = fx.open();
    assert_eq!(ctx.stored("color_foreground"), Some(Value::from("#ffffff")));
    assert_eq!(ctx.stored("width"), ctx.default_of("width"));
    assert_eq!(ctx.stored("color_bold"), Some(Value::from("")));
    assert_eq!(widget.state().palette[3], hookterm_config::Rgba::rgb(0, 255, 0));
    assert!(fx.notes.bodies().is_empty());
}

#[test]
fn invalid_theme_colours_are_reported_and_not_stored() {
    let fx = Fixture::new(
        None,
        Some(
            r##"
            #{
                color_foreground: "notacolor",
                color_3: "#zz0000",
                color_cursor: "#ff0000",
            }
            "##,
        ),
        &[],
    );
    let (ctx, widget) = fx.open();
    assert_eq!(
        ctx.stored("color_foreground"),
        ctx.default_of("color_foreground")
    );
    assert_eq!(ctx.stored("color_3"), ctx.default_of("color_3"));
    assert_eq!(ctx.stored("color_cursor"), Some(Value::from("#ff0000")));

    let state = widget.state();
    assert_eq!(state.colors[&ColorRole::Foreground], ColorChoice::Default);
    assert_eq!(state.colors[&ColorRole::Cursor], ColorChoice::Custom(Rgba::rgb(255, 0, 0)));

    let bodies = fx.notes.bodies();
    assert_eq!(bodies.len(), 2);
    assert!(
        bodies
            .iter()
            .any(|b| b.starts_with("Theme") && b.contains("color_foreground"))
    );
    assert!(bodies.iter().any(|b| b.contains("color_3")));
}

#[test]
fn theme_that_is_not_a_map_is_reported() {
    let fx = Fixture::new(None, Some("42"), &[]);
    let (_ctx, _widget) = fx.open();
    assert!(fx.notes.bodies().iter().any(|b| b.contains("map")));
}

#[test]
fn config_overrides_theme() {
    let fx = Fixture::new(
        Some(r##"set("color_cursor", "#0000ff");"##),
        Some(r##"#{ color_cursor: "#ff0000" }"##),
        &[],
    );
    let (ctx, _widget) = fx.open();
    assert_eq!(ctx.stored("color_cursor"), Some(Value::from("#0000ff")));
}

#[test]
fn reload_theme_applies_immediately() {
    let fx = Fixture::new(None, Some(r##"#{ color_1: "#010101" }"##), &[]);
    let (ctx, widget) = fx.open();
    fx.rewrite_theme(r##"#{ color_1: "#020202" }"##);

    ctx.reload_theme();
    assert_eq!(widget.state().palette[1], hookterm_config::Rgba::rgb(2, 2, 2));
}

// ---------------------------------------------------------------------------
// Window lifecycle
// ---------------------------------------------------------------------------

#[test]
fn child_env_exports_context_id() {
    let fx = Fixture::new(None, None, &[]);
    let (ctx, _widget) = fx.open();
    let env = ctx.child_env();
    assert!(env.contains(&(CONTEXT_ID_ENV, ctx.id().to_string())));
    assert!(env.iter().any(|(k, v)| *k == "TERM" && v == "xterm-256color"));
}

#[test]
fn close_window_releases_callbacks() {
    let fx = Fixture::with_config(r#"bind("<Ctrl>x", || 0);"#);
    let (ctx, _widget) = fx.open();
    let id = ctx.id();
    assert!(fx.app.close_window(id));
    assert_eq!(ctx.runtime().live_callbacks(), 0);
    assert!(fx.app.context(id).is_none());
    assert!(!fx.app.close_window(id));
}
