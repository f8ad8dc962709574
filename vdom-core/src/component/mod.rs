//! Components
//!
//! A thin wrapper that owns component state and re-renders into a surface
//! when the state changes.
//!
//! # Lifecycle
//!
//! 1. [`Mounted::mount`] renders once and appends the result to the target.
//!
//! 2. [`Mounted::set_state`] renders the *current* view, applies the state
//!    update, runs the pre-mount callback, and schedules a task that waits
//!    for the forward delay, renders again, reconciles the new view against
//!    the one captured before the update, and finally runs the post-mount
//!    callback.
//!
//! 3. [`Mounted::force_update`] renders twice and reconciles synchronously.
//!    Only nodes marked `forceUpdate` end up replaced.
//!
//! # Overlapping Updates
//!
//! Deferred re-renders are not debounced: every `set_state` schedules its
//! own task, each diffing against the view captured when it was called
//! rather than against what is on the surface when it runs. Tasks lock the
//! surface for the duration of their walk, so writes to one mount point
//! never interleave.
//!
//! When a second `set_state` lands before the first task has run, one of
//! the two tasks diffs against a stale view. If the child lists differ in
//! length, that task fails with [`SurfaceError::MissingChild`] partway
//! through its walk and its post-mount callback is skipped.
//!
//! [`SurfaceError::MissingChild`]: crate::SurfaceError::MissingChild

mod scene;

pub use scene::SceneHook;

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::MountConfig;
use crate::error::Result;
use crate::node::VNode;
use crate::reconcile::update_element;
use crate::surface::Surface;

/// A renderable unit with its own state type.
pub trait Component: Send + Sync + 'static {
    /// The state `render` reads from.
    type State: Send + 'static;

    /// Describe the desired output for `state`.
    fn render(&self, state: &Self::State) -> VNode;

    /// Hook consulted before a deferred re-render is scheduled.
    fn pre_scene_mount(&self) -> SceneHook {
        SceneHook::default()
    }

    /// Hook consulted after a deferred re-render completes.
    fn post_scene_mount(&self) -> SceneHook {
        SceneHook::default()
    }
}

/// A component bound to a mount point on a shared surface.
pub struct Mounted<C, S>
where
    C: Component,
    S: Surface,
{
    component: Arc<C>,
    state: Arc<Mutex<C::State>>,
    surface: Arc<Mutex<S>>,
    target: Arc<Mutex<S::Node>>,
    config: MountConfig,
}

impl<C, S> Mounted<C, S>
where
    C: Component,
    S: Surface + Send + 'static,
    S::Node: Send + 'static,
{
    /// Bind `component` with initial `state` to `target` on `surface`.
    pub fn new(component: C, state: C::State, surface: Arc<Mutex<S>>, target: S::Node) -> Self {
        Self {
            component: Arc::new(component),
            state: Arc::new(Mutex::new(state)),
            surface,
            target: Arc::new(Mutex::new(target)),
            config: MountConfig::default(),
        }
    }

    /// Use `config` instead of the defaults.
    pub fn with_config(mut self, config: MountConfig) -> Self {
        self.config = config;
        self
    }

    /// Render the current state.
    pub fn render(&self) -> VNode {
        self.component.render(&self.state.lock())
    }

    /// Read the current state.
    pub fn with_state<R>(&self, f: impl FnOnce(&C::State) -> R) -> R {
        f(&*self.state.lock())
    }

    /// The shared surface.
    pub fn surface(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.surface)
    }

    /// The mount point.
    pub fn target(&self) -> S::Node {
        self.target.lock().clone()
    }

    /// Move the mount point. Takes effect for the next reconciliation.
    pub fn set_target(&self, target: S::Node) {
        *self.target.lock() = target;
    }

    /// Initial render: append the current view to the target.
    pub fn mount(&self) -> Result<()> {
        let view = self.render();
        let target = self.target();
        let mut surface = self.surface.lock();
        update_element(&mut *surface, &target, Some(&view), None, 0)
    }

    /// Re-render synchronously against a fresh render of the same state.
    pub fn force_update(&self) -> Result<()> {
        let previous = self.render();
        let next = self.render();
        let target = self.target();
        let mut surface = self.surface.lock();
        update_element(&mut *surface, &target, Some(&next), Some(&previous), 0)
    }

    /// Update the state and schedule a deferred re-render.
    ///
    /// Must be called within a tokio runtime. The returned handle resolves to
    /// the reconciliation result once the re-render has run.
    pub fn set_state<F>(&self, update: F) -> JoinHandle<Result<()>>
    where
        F: FnOnce(&mut C::State),
    {
        let previous = self.render();
        update(&mut *self.state.lock());

        let pre = self.component.pre_scene_mount();
        let post = self.component.post_scene_mount();
        pre.run();

        let delay = pre
            .forward_delay()
            .unwrap_or_else(|| self.config.forward_delay());
        debug!(delay_ms = delay.as_millis() as u64, "scheduling re-render");

        let component = Arc::clone(&self.component);
        let state = Arc::clone(&self.state);
        let surface = Arc::clone(&self.surface);
        let target = Arc::clone(&self.target);

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let next = component.render(&state.lock());
            let target = target.lock().clone();
            let result = {
                let mut surface = surface.lock();
                update_element(&mut *surface, &target, Some(&next), Some(&previous), 0)
            };

            match &result {
                Ok(()) => post.run(),
                Err(e) => warn!(error = %e, "deferred reconciliation failed"),
            }
            result
        })
    }
}

impl<C, S> std::fmt::Debug for Mounted<C, S>
where
    C: Component,
    S: Surface,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mounted")
            .field("target", &*self.target.lock())
            .field("config", &self.config)
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
