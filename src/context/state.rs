//! Load state machine.

/// Whether a config (re)load is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct State {
    pub load: LoadState,
    /// Set once the first load has finished; freezes structural keys.
    pub initialized: bool,
}

impl State {
    /// Idle → Loading. Returns false, leaving the state alone, when a load
    /// is already running.
    pub fn begin_load(&mut self) -> bool {
        match self.load {
            LoadState::Idle => {
                self.load = LoadState::Loading;
                true
            }
            LoadState::Loading => false,
        }
    }

    /// Loading → Idle.
    pub fn finish_load(&mut self) {
        if self.load == LoadState::Idle {
            log::warn!("finish_load called while idle");
        }
        self.load = LoadState::Idle;
    }

    pub fn is_loading(&self) -> bool {
        self.load == LoadState::Loading
    }
}
