use anyhow::Result;
use hookterm::app::App;
use hookterm::cli;
use hookterm::notify::{DesktopNotifier, Notifier};
use hookterm::widget::HeadlessWidget;
use hookterm_config::MetaRegistry;
use std::rc::Rc;
use std::sync::Arc;

fn main() -> Result<()> {
    let meta = Arc::new(MetaRegistry::new());

    // Process CLI arguments first (before logging init for cleaner output)
    let args = match cli::process_cli(&meta) {
        cli::CliResult::Exit(0) => return Ok(()),
        // No app state exists yet, so no destructors are skipped.
        cli::CliResult::Exit(code) => std::process::exit(code),
        cli::CliResult::Continue(args) => args,
    };

    // --log-level takes precedence over RUST_LOG and DEBUG_LEVEL
    hookterm::debug::init_log_bridge(args.options.log_level.as_deref());
    log::info!("Starting hookterm {}", hookterm::VERSION);

    let notifier: Rc<dyn Notifier> = Rc::new(DesktopNotifier);
    let app = App::new(meta, args, notifier);

    #[cfg(unix)]
    {
        app.run_daemon(Rc::new(HeadlessWidget::new()))
    }
    #[cfg(not(unix))]
    {
        let _ = (app, HeadlessWidget::new());
        anyhow::bail!("the hookterm daemon needs Unix domain sockets")
    }
}
