use std::rc::Rc;

use serde::Serialize;
use serde_json::{Value, json};

use crate::config::TrackerConfig;
use crate::error::{LifecycleError, Result};
use crate::events::{EventSink, LifecycleEvent, LogSink, Step};
use crate::lifecycle::{HookContext, Lifecycle, RenderContext, StatePatch};
use crate::node::{DomHandle, Node};
use crate::props::Props;
use crate::scope::Scope;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Phase {
    Unmounted,
    Mounting,
    Mounted,
    Updating,
}

pub type StateFn<S> = Box<dyn FnOnce(&mut S)>;

/// A proposed change, not yet past the veto gate. State updaters run in
/// order against a copy of the committed state.
pub struct UpdateRequest<S> {
    props: Option<Props>,
    state: Vec<StateFn<S>>,
    forced: bool,
}

impl<S> Default for UpdateRequest<S> {
    fn default() -> Self {
        Self {
            props: None,
            state: Vec::new(),
            forced: false,
        }
    }
}

impl<S> UpdateRequest<S> {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn props(props: Props) -> Self {
        Self::new().with_props(props)
    }
    pub fn state(f: impl FnOnce(&mut S) + 'static) -> Self {
        Self::new().with_state(f)
    }
    /// Re-render with unchanged inputs. Still subject to `should_update`.
    pub fn force() -> Self {
        Self::new().forced()
    }

    pub fn with_props(mut self, props: Props) -> Self {
        self.props = Some(props);
        self
    }
    pub fn with_state(mut self, f: impl FnOnce(&mut S) + 'static) -> Self {
        self.state.push(Box::new(f));
        self
    }
    pub fn forced(mut self) -> Self {
        self.forced = true;
        self
    }

    pub fn is_forced(&self) -> bool {
        self.forced
    }
    pub fn has_props(&self) -> bool {
        self.props.is_some()
    }

    /// Later props win, updaters queue up, `forced` is sticky.
    pub fn merge(mut self, other: UpdateRequest<S>) -> Self {
        if other.props.is_some() {
            self.props = other.props;
        }
        self.state.extend(other.state);
        self.forced |= other.forced;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    Rendered,
    Skipped,
}

fn to_args<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// One component instance and the state machine around it.
///
/// ```text
/// Mounting --mount()--> Mounted --request_update()--> Updating --> Mounted
///                          |
///                          +--request_teardown()--> Unmounted (terminal)
/// ```
pub struct Instance<C: Lifecycle> {
    component: C,
    props: Props,
    state: C::State,
    phase: Phase,
    surface: Option<DomHandle>,
    scope: Scope,
    sink: Rc<dyn EventSink>,
    config: TrackerConfig,
}

impl<C: Lifecycle> Instance<C> {
    /// Logs through `LogSink` with the default config.
    pub fn new(component: C, initial_props: Props) -> Self {
        Self::create(
            component,
            initial_props,
            Rc::new(LogSink::default()),
            TrackerConfig::default(),
        )
    }

    pub fn create(
        component: C,
        initial_props: Props,
        sink: Rc<dyn EventSink>,
        config: TrackerConfig,
    ) -> Self {
        let state = component.initial_state(&initial_props);
        let inst = Self {
            component,
            props: initial_props,
            state,
            phase: Phase::Mounting,
            surface: None,
            scope: Scope::new(),
            sink,
            config,
        };
        inst.record(Step::Constructor, json!({ "props": inst.props }));
        inst
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn props(&self) -> &Props {
        &self.props
    }
    pub fn state(&self) -> &C::State {
        &self.state
    }
    pub fn component(&self) -> &C {
        &self.component
    }
    pub fn surface(&self) -> Option<&DomHandle> {
        self.surface.as_ref()
    }
    pub fn scope(&self) -> &Scope {
        &self.scope
    }
    pub fn config(&self) -> TrackerConfig {
        self.config
    }
    pub fn is_mounted(&self) -> bool {
        matches!(self.phase, Phase::Mounted | Phase::Updating)
    }

    /// Errors unless the instance is mounted and not yet torn down.
    pub fn ensure_mounted(&self, op: &'static str) -> Result<()> {
        match self.phase {
            Phase::Unmounted => Err(LifecycleError::PostUnmount { op }),
            Phase::Mounting => Err(LifecycleError::NotMounted { op }),
            Phase::Mounted | Phase::Updating => Ok(()),
        }
    }

    /// Records a handler event (click, change, alert, ...) for this instance.
    pub fn emit(&self, name: &'static str, args: Value) {
        self.record(Step::Handler(name), args);
    }

    fn record(&self, step: Step, args: Value) {
        self.sink.record(LifecycleEvent::new(C::NAME, step, args));
    }

    /// First render, surface attach, then `did_mount`. A failed render leaves
    /// the instance in `Mounting` with nothing committed.
    pub fn mount(&mut self) -> Result<()> {
        match self.phase {
            Phase::Unmounted => return Err(LifecycleError::PostUnmount { op: "mount" }),
            Phase::Mounted | Phase::Updating => return Err(LifecycleError::DoubleMount),
            Phase::Mounting => {}
        }

        let mut state = self.state.clone();
        self.derive(&self.props, &mut state);
        let node = self.render_pass(&self.props, &state)?;

        self.state = state;
        let surface = DomHandle::attach(node);
        self.record(Step::SurfaceApply, json!({ "surface": surface.id(), "applied": 1 }));
        self.surface = Some(surface);
        self.phase = Phase::Mounted;
        log::debug!("{}: mounted", C::NAME);

        self.record(Step::DidMount, Value::Null);
        let cx = HookContext {
            component: C::NAME,
            sink: self.sink.as_ref(),
            surface: self.surface.as_ref(),
        };
        let component = &mut self.component;
        let (props, state) = (&self.props, &self.state);
        self.scope.run(|| component.did_mount(&cx, props, state));
        Ok(())
    }

    pub fn set_props(&mut self, props: Props) -> Result<UpdateOutcome> {
        self.request_update(UpdateRequest::props(props))
    }

    pub fn set_state(&mut self, f: impl FnOnce(&mut C::State) + 'static) -> Result<UpdateOutcome> {
        self.request_update(UpdateRequest::state(f))
    }

    pub fn force_update(&mut self) -> Result<UpdateOutcome> {
        self.request_update(UpdateRequest::force())
    }

    /// Runs one update through the gate and, if approved, to `did_update`.
    pub fn request_update(&mut self, request: UpdateRequest<C::State>) -> Result<UpdateOutcome> {
        self.ensure_mounted("request_update")?;

        let UpdateRequest {
            props,
            state: updaters,
            forced,
        } = request;
        let next_props = props.unwrap_or_else(|| self.props.clone());
        let mut next_state = self.state.clone();
        for f in updaters {
            f(&mut next_state);
        }

        self.derive(&next_props, &mut next_state);

        let approved = self.component.should_update(&next_props, &next_state);
        self.record(
            Step::ShouldUpdate,
            json!({
                "nextProps": next_props,
                "nextState": to_args(&next_state),
                "forced": forced,
                "approved": approved,
            }),
        );
        if !approved {
            log::debug!("{}: update vetoed", C::NAME);
            if self.config.commit_vetoed_state {
                self.props = next_props;
                self.state = next_state;
            }
            return Ok(UpdateOutcome::Skipped);
        }

        self.phase = Phase::Updating;
        let node = match self.render_pass(&next_props, &next_state) {
            Ok(node) => node,
            Err(err) => {
                self.phase = Phase::Mounted;
                return Err(err);
            }
        };

        let snapshot = self
            .surface
            .as_ref()
            .and_then(|s| self.component.capture_snapshot(&self.props, &next_props, s));
        self.record(
            Step::CaptureSnapshot,
            json!({
                "prevProps": self.props,
                "props": next_props,
                "snapshot": to_args(&snapshot),
            }),
        );

        let prev_props = std::mem::replace(&mut self.props, next_props);
        let prev_state = std::mem::replace(&mut self.state, next_state);
        if let Some(surface) = self.surface.as_mut() {
            surface.apply(node);
            let args = json!({ "surface": surface.id(), "applied": surface.applied() });
            self.record(Step::SurfaceApply, args);
        }

        self.record(
            Step::DidUpdate,
            json!({
                "prevProps": prev_props,
                "prevState": to_args(&prev_state),
                "snapshot": to_args(&snapshot),
            }),
        );
        let cx = HookContext {
            component: C::NAME,
            sink: self.sink.as_ref(),
            surface: self.surface.as_ref(),
        };
        self.component.did_update(&cx, &prev_props, &prev_state, snapshot);

        self.phase = Phase::Mounted;
        Ok(UpdateOutcome::Rendered)
    }

    /// Runs `will_unmount`, disposes everything registered while mounted and
    /// releases the surface. Terminal.
    pub fn request_teardown(&mut self) -> Result<()> {
        match self.phase {
            Phase::Unmounted => {
                return Err(LifecycleError::PostUnmount {
                    op: "request_teardown",
                });
            }
            Phase::Mounting => {
                log::debug!("{}: discarded before mount", C::NAME);
            }
            Phase::Mounted | Phase::Updating => {
                self.record(Step::WillUnmount, Value::Null);
                let cx = HookContext {
                    component: C::NAME,
                    sink: self.sink.as_ref(),
                            surface: self.surface.as_ref(),
                };
                self.component.will_unmount(&cx);
                log::debug!("{}: unmounted", C::NAME);
            }
        }

        self.scope.dispose();
        self.surface = None;
        self.phase = Phase::Unmounted;
        Ok(())
    }

    fn derive(&self, next_props: &Props, state: &mut C::State) {
        let patch = C::derive_state_from_props(next_props, state);
        self.record(
            Step::DeriveStateFromProps,
            json!({
                "nextProps": next_props,
                "prevState": to_args(&*state),
                "patch": to_args(&patch),
            }),
        );
        if let Some(patch) = patch {
            patch.apply(state);
        }
    }

    fn render_pass(&self, props: &Props, state: &C::State) -> Result<Node> {
        let cx = RenderContext::new(C::NAME, props, self.config.strict_prop_access);
        match self.component.render(&cx, state) {
            Ok(node) => {
                self.record(Step::Render, json!({ "props": props, "state": to_args(state) }));
                Ok(node)
            }
            Err(err) => {
                log::warn!("{}: render failed: {}", C::NAME, err);
                self.record(Step::Render, json!({ "error": err.to_string() }));
                Err(err)
            }
        }
    }
}
