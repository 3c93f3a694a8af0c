//! Signal and method routing.
//!
//! An `IpcRouter` maps signal and method names to handlers. It is built once
//! with a [`RouterBuilder`] and read-only afterwards. Handlers receive the
//! target context, the request parameters and a directory of live context
//! ids; they never see the transport.

use crate::error::IpcError;
use crate::value::IpcValue;
use crate::wire::{RequestKind, WireRequest, WireResponse};
use std::collections::HashMap;
use std::rc::Rc;

/// Read-only view of the live context ids.
pub trait ContextDirectory {
    /// Live ids in ascending order.
    fn ids(&self) -> Vec<u64>;
}

impl ContextDirectory for Vec<u64> {
    fn ids(&self) -> Vec<u64> {
        self.clone()
    }
}

/// Everything a handler gets to see.
pub struct Invocation<'a, C> {
    pub target: &'a C,
    pub params: &'a IpcValue,
    pub directory: &'a dyn ContextDirectory,
}

type SignalHandler<C> = Box<dyn Fn(&Invocation<'_, C>)>;
type MethodHandler<C> = Box<dyn Fn(&Invocation<'_, C>) -> IpcValue>;

pub struct RouterBuilder<C> {
    signals: HashMap<String, SignalHandler<C>>,
    methods: HashMap<String, MethodHandler<C>>,
}

impl<C> Default for RouterBuilder<C> {
    fn default() -> Self {
        Self {
            signals: HashMap::new(),
            methods: HashMap::new(),
        }
    }
}

impl<C: 'static> RouterBuilder<C> {
    pub fn signal<F>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(&Invocation<'_, C>) + 'static,
    {
        if self.signals.insert(name.to_string(), Box::new(handler)).is_some() {
            log::warn!("IPC signal '{}' registered twice; last one wins", name);
        }
        self
    }

    pub fn method<F>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(&Invocation<'_, C>) -> IpcValue + 'static,
    {
        if self.methods.insert(name.to_string(), Box::new(handler)).is_some() {
            log::warn!("IPC method '{}' registered twice; last one wins", name);
        }
        self
    }

    /// Add the context-independent methods `echo` and `get_ids`.
    pub fn with_standard_methods(self) -> Self {
        self.method("echo", echo).method("get_ids", get_ids)
    }

    pub fn build(self) -> IpcRouter<C> {
        IpcRouter {
            signals: self.signals,
            methods: self.methods,
        }
    }
}

/// Immutable name → handler tables.
pub struct IpcRouter<C> {
    signals: HashMap<String, SignalHandler<C>>,
    methods: HashMap<String, MethodHandler<C>>,
}

impl<C> IpcRouter<C> {
    pub fn builder() -> RouterBuilder<C> {
        RouterBuilder::default()
    }

    /// Deliver a signal. Returns false when no handler matches.
    pub fn perform_signal(
        &self,
        target: &C,
        name: &str,
        params: &IpcValue,
        directory: &dyn ContextDirectory,
    ) -> bool {
        let Some(handler) = self.signals.get(name) else {
            log::debug!("Unhandled IPC signal '{}'", name);
            return false;
        };
        handler(&Invocation {
            target,
            params,
            directory,
        });
        true
    }

    /// Call a method. `sink` receives the response exactly once when the
    /// method exists and is never called otherwise.
    pub fn perform_method<S>(
        &self,
        target: &C,
        name: &str,
        params: &IpcValue,
        directory: &dyn ContextDirectory,
        sink: S,
    ) -> bool
    where
        S: FnOnce(IpcValue),
    {
        let Some(handler) = self.methods.get(name) else {
            log::debug!("Unhandled IPC method '{}'", name);
            return false;
        };
        sink(handler(&Invocation {
            target,
            params,
            directory,
        }));
        true
    }

    pub fn has_signal(&self, name: &str) -> bool {
        self.signals.contains_key(name)
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Route a wire request to `targets`.
    ///
    /// `broadcast` marks a request sent without a destination: method
    /// responses are then collected into a tuple in target order.
    pub fn route(
        &self,
        request: &WireRequest,
        targets: &[Rc<C>],
        broadcast: bool,
        directory: &dyn ContextDirectory,
    ) -> WireResponse {
        match request.kind {
            RequestKind::Signal => {
                if !self.has_signal(&request.name) {
                    return WireResponse::failure(format!("unknown signal '{}'", request.name));
                }
                for target in targets {
                    self.perform_signal(target, &request.name, &request.params, directory);
                }
                WireResponse::success(IpcValue::Unit)
            }
            RequestKind::Method => {
                if !self.has_method(&request.name) {
                    return WireResponse::failure(format!("unknown method '{}'", request.name));
                }
                let mut responses = Vec::with_capacity(targets.len());
                for target in targets {
                    self.perform_method(
                        target,
                        &request.name,
                        &request.params,
                        directory,
                        |value| responses.push(value),
                    );
                }
                if broadcast {
                    WireResponse::success(IpcValue::Tuple(responses))
                } else {
                    WireResponse::success(responses.into_iter().next().unwrap_or_default())
                }
            }
        }
    }
}

/// Pick the contexts a request addresses: `dest`, or everyone.
pub fn select_targets<C>(
    dest: Option<u64>,
    lookup: impl Fn(u64) -> Option<Rc<C>>,
    all: impl FnOnce() -> Vec<Rc<C>>,
) -> Result<Vec<Rc<C>>, IpcError> {
    match dest {
        Some(id) => lookup(id)
            .map(|c| vec![c])
            .ok_or(IpcError::UnknownDestination(id)),
        None => Ok(all()),
    }
}

/// `echo`: respond with the parameters unchanged.
pub fn echo<C>(inv: &Invocation<'_, C>) -> IpcValue {
    inv.params.clone()
}

/// `get_ids`: the ids of every live context.
pub fn get_ids<C>(inv: &Invocation<'_, C>) -> IpcValue {
    IpcValue::Tuple(
        inv.directory
            .ids()
            .into_iter()
            .map(|id| IpcValue::Int(id as i64))
            .collect(),
    )
}
