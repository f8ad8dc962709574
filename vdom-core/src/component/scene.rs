//! Scene hooks: callbacks around a deferred re-render.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// A callback plus an optional delay override, returned by a component's
/// pre- and post-mount hooks.
///
/// The pre-mount hook's callback runs synchronously inside `set_state`, and
/// its `forward_delay` (if any) replaces the configured delay. The post-mount
/// hook's callback runs after the deferred reconciliation succeeds; its delay
/// is ignored.
#[derive(Clone, Default)]
pub struct SceneHook {
    callback: Option<Arc<dyn Fn() + Send + Sync>>,
    forward_delay: Option<Duration>,
}

impl SceneHook {
    /// A hook that does nothing and keeps the configured delay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the callback.
    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// Override the delay before the re-render.
    pub fn with_forward_delay(mut self, delay: Duration) -> Self {
        self.forward_delay = Some(delay);
        self
    }

    /// The delay override, if any.
    pub fn forward_delay(&self) -> Option<Duration> {
        self.forward_delay
    }

    /// Run the callback, if any.
    pub fn run(&self) {
        if let Some(callback) = &self.callback {
            callback();
        }
    }
}

impl fmt::Debug for SceneHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneHook")
            .field("has_callback", &self.callback.is_some())
            .field("forward_delay", &self.forward_delay)
            .finish()
    }
}
