//! Process scope: the schema, parsed arguments, live contexts and the IPC
//! router shared between them.

use crate::context::Context;
use crate::ipc_handlers::standard_router;
use crate::notify::Notifier;
use crate::widget::TerminalWidget;
use hookterm_config::{MetaRegistry, ParsedArgs, paths};
use hookterm_ipc::{ContextRegistry, IpcRouter, RequestHandler, WireRequest, WireResponse};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

pub struct App {
    meta: Arc<MetaRegistry>,
    args: Rc<ParsedArgs>,
    contexts: Rc<RefCell<ContextRegistry<Context>>>,
    router: Rc<IpcRouter<Context>>,
    notifier: Rc<dyn Notifier>,
}

impl App {
    pub fn new(meta: Arc<MetaRegistry>, args: ParsedArgs, notifier: Rc<dyn Notifier>) -> Self {
        let read_only = meta.validate();
        if !read_only.is_empty() {
            log::warn!("Schema has {} getter-only entries", read_only.len());
        }
        Self {
            meta,
            args: Rc::new(args),
            contexts: Rc::new(RefCell::new(ContextRegistry::new())),
            router: Rc::new(standard_router()),
            notifier,
        }
    }

    pub fn meta(&self) -> &Arc<MetaRegistry> {
        &self.meta
    }

    /// Create and initialise a context for a new window.
    pub fn open_window(&self, widget: Rc<dyn TerminalWidget>) -> Rc<Context> {
        let id = self.contexts.borrow_mut().allocate_id();
        let ctx = Context::new(
            id,
            self.meta.clone(),
            self.args.clone(),
            widget,
            self.notifier.clone(),
        );
        self.contexts.borrow_mut().insert(id, ctx.clone());
        ctx.initialize();
        log::info!("Opened window {}", id);
        ctx
    }

    /// Destroy a window's context. Returns false for an unknown id.
    pub fn close_window(&self, id: u64) -> bool {
        let removed = self.contexts.borrow_mut().remove(id);
        match removed {
            Some(ctx) => {
                ctx.shutdown();
                log::info!("Closed window {}", id);
                true
            }
            None => false,
        }
    }

    pub fn close_all(&self) {
        for id in self.ids() {
            self.close_window(id);
        }
    }

    pub fn context(&self, id: u64) -> Option<Rc<Context>> {
        self.contexts.borrow().get(id)
    }

    pub fn ids(&self) -> Vec<u64> {
        self.contexts.borrow().ids()
    }

    /// Route one IPC request.
    pub fn dispatch(&self, request: &WireRequest) -> WireResponse {
        dispatch_request(&self.contexts, &self.router, request)
    }

    /// Handler for the socket server, sharing this app's contexts.
    pub fn request_handler(&self) -> RequestHandler {
        let contexts = self.contexts.clone();
        let router = self.router.clone();
        Rc::new(move |request: WireRequest| dispatch_request(&contexts, &router, &request))
    }

    /// Serve IPC for one headless window until interrupted.
    #[cfg(unix)]
    pub fn run_daemon(self, widget: Rc<dyn TerminalWidget>) -> anyhow::Result<()> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let local = tokio::task::LocalSet::new();
        let socket = paths::socket_path();

        let result = local.block_on(&runtime, async {
            let listener = hookterm_ipc::bind_listener(&socket)?;
            let ctx = self.open_window(widget);
            for (name, value) in ctx.child_env() {
                log::debug!("Child environment: {}={}", name, value);
            }
            let server = tokio::task::spawn_local(hookterm_ipc::serve(
                listener,
                self.request_handler(),
            ));
            tokio::signal::ctrl_c().await?;
            log::info!("Interrupted, shutting down");
            server.abort();
            anyhow::Ok(())
        });

        self.close_all();
        if let Err(e) = std::fs::remove_file(&socket) {
            log::debug!("Socket cleanup: {}", e);
        }
        result
    }
}

fn dispatch_request(
    contexts: &RefCell<ContextRegistry<Context>>,
    router: &IpcRouter<Context>,
    request: &WireRequest,
) -> WireResponse {
    // Snapshot so no registry borrow is held while scripts run.
    let (targets, ids) = {
        let registry = contexts.borrow();
        match registry.resolve(request.dest) {
            Ok(targets) => (targets, registry.ids()),
            Err(e) => return WireResponse::failure(e.to_string()),
        }
    };
    router.route(request, &targets, request.is_broadcast(), &ids)
}
