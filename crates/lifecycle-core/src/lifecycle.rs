use std::fmt::Debug;

use serde::Serialize;
use serde_json::Value;

use crate::error::{LifecycleError, Result};
use crate::events::{EventSink, LifecycleEvent, Step};
use crate::node::{DomHandle, Node};
use crate::props::Props;

/// A partial state update returned by `derive_state_from_props`.
pub trait StatePatch<S> {
    fn apply(self, state: &mut S);
}

/// Patch type for components that never derive state from props.
#[derive(Clone, Copy, Debug, Serialize)]
pub enum NoPatch {}

impl<S> StatePatch<S> for NoPatch {
    fn apply(self, _state: &mut S) {
        match self {}
    }
}

/// Veto gate consulted before every update render.
pub trait UpdatePolicy<S> {
    fn should_update(&self, next_props: &Props, next_state: &S) -> bool;
}

impl<S, F> UpdatePolicy<S> for F
where
    F: Fn(&Props, &S) -> bool,
{
    fn should_update(&self, next_props: &Props, next_state: &S) -> bool {
        self(next_props, next_state)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysUpdate;

impl<S> UpdatePolicy<S> for AlwaysUpdate {
    fn should_update(&self, _next_props: &Props, _next_state: &S) -> bool {
        true
    }
}

/// What a component sees while rendering.
pub struct RenderContext<'a> {
    component: &'static str,
    props: &'a Props,
    strict: bool,
}

impl<'a> RenderContext<'a> {
    pub fn new(component: &'static str, props: &'a Props, strict: bool) -> Self {
        Self {
            component,
            props,
            strict,
        }
    }

    pub fn props(&self) -> &'a Props {
        self.props
    }

    /// Deep prop read. An absent path fails the render in strict mode and
    /// reads as `None` (with a warning) otherwise.
    pub fn read(&self, path: &str) -> Result<Option<&'a Value>> {
        match self.props.lookup(path) {
            Some(v) => Ok(Some(v)),
            None if self.strict => Err(LifecycleError::MissingPropPath {
                path: path.to_string(),
            }),
            None => {
                log::warn!(
                    "{}: render read missing prop path `{}`; treating as absent",
                    self.component,
                    path
                );
                Ok(None)
            }
        }
    }
}

/// Handed to the post-commit hooks: mount, update and unmount.
pub struct HookContext<'a> {
    pub(crate) component: &'static str,
    pub(crate) sink: &'a dyn EventSink,
    pub(crate) surface: Option<&'a DomHandle>,
}

impl<'a> HookContext<'a> {
    pub fn surface(&self) -> Option<&'a DomHandle> {
        self.surface
    }

    /// Records a handler-style event from inside a hook.
    pub fn emit(&self, name: &'static str, args: Value) {
        self.sink
            .record(LifecycleEvent::new(self.component, Step::Handler(name), args));
    }
}

/// The hooks an instance's owner invokes. Only `initial_state` and `render`
/// are mandatory.
///
/// Update order: `derive_state_from_props` → `should_update` → `render` →
/// `capture_snapshot` → surface apply → `did_update`. A veto from
/// `should_update` stops after the second step.
pub trait Lifecycle: 'static {
    type State: Clone + Debug + Serialize;
    type Patch: StatePatch<Self::State> + Debug + Serialize;
    type Snapshot: Clone + Debug + Serialize;

    const NAME: &'static str;

    fn initial_state(&self, props: &Props) -> Self::State;

    /// Pure: no `self`, shared inputs only.
    fn derive_state_from_props(_next_props: &Props, _prev_state: &Self::State) -> Option<Self::Patch> {
        None
    }

    fn render(&self, cx: &RenderContext<'_>, state: &Self::State) -> Result<Node>;

    fn did_mount(&mut self, _cx: &HookContext<'_>, _props: &Props, _state: &Self::State) {}

    fn should_update(&self, _next_props: &Props, _next_state: &Self::State) -> bool {
        true
    }

    /// Runs with the previous output still on the surface.
    fn capture_snapshot(
        &self,
        _prev_props: &Props,
        _current_props: &Props,
        _surface: &DomHandle,
    ) -> Option<Self::Snapshot> {
        None
    }

    fn did_update(
        &mut self,
        _cx: &HookContext<'_>,
        _prev_props: &Props,
        _prev_state: &Self::State,
        _snapshot: Option<Self::Snapshot>,
    ) {
    }

    fn will_unmount(&mut self, _cx: &HookContext<'_>) {}
}
