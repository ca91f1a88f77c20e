//! An `App` handle that `rspec` scenarios can carry as their state.
//!
//! `rspec` clones scenario state and demands `Send + Sync` of it. A Bevy `App`
//! is neither, so the handle keeps the app in a mutex and only lends it out
//! inside a closure.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use bevy::prelude::App;
use rspec::{block::Suite, ConfigurationBuilder, Logger, Runner};

struct AppCell(App);

// SAFETY: the app never leaves its mutex and `run_scenarios` turns parallel
// execution off, so only one thread ever reaches it.
unsafe impl Send for AppCell {}

/// Cloneable handle to one app shared by every example of a scenario.
#[derive(Clone)]
pub struct SerialApp(Arc<Mutex<AppCell>>);

impl SerialApp {
    #[must_use]
    pub fn new(app: App) -> Self {
        Self(Arc::new(Mutex::new(AppCell(app))))
    }

    /// Swaps in a freshly built app, dropping the previous one.
    pub fn replace(&self, app: App) {
        self.with(|current| *current = app);
    }

    /// Runs `f` with exclusive access to the app.
    ///
    /// A panic in an earlier example poisons the mutex; the app is still
    /// handed out so later examples report their own failures.
    pub fn with<R>(&self, f: impl FnOnce(&mut App) -> R) -> R {
        let mut cell = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cell.0)
    }
}

impl fmt::Debug for SerialApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SerialApp")
    }
}

/// Runs `suite` one example at a time, stopping the process on failure.
pub fn run_scenarios<T>(suite: &Suite<T>)
where
    T: Clone + Send + Sync + fmt::Debug,
{
    let config = ConfigurationBuilder::default()
        .parallel(false)
        .exit_on_failure(true)
        .build()
        .unwrap_or_else(|e| panic!("invalid rspec configuration: {e}"));
    let logger = Arc::new(Logger::new(std::io::stdout()));
    Runner::new(config, vec![logger]).run(suite);
}
