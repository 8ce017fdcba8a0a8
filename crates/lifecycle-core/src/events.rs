use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Step {
    Constructor,
    DeriveStateFromProps,
    Render,
    DidMount,
    ShouldUpdate,
    CaptureSnapshot,
    SurfaceApply,
    DidUpdate,
    WillUnmount,
    /// Emitted by a component's own event handler (click, change, ...).
    Handler(&'static str),
}

impl Step {
    pub fn name(self) -> &'static str {
        match self {
            Step::Constructor => "constructor",
            Step::DeriveStateFromProps => "deriveStateFromProps",
            Step::Render => "render",
            Step::DidMount => "didMount",
            Step::ShouldUpdate => "shouldUpdate",
            Step::CaptureSnapshot => "captureSnapshot",
            Step::SurfaceApply => "surfaceApply",
            Step::DidUpdate => "didUpdate",
            Step::WillUnmount => "willUnmount",
            Step::Handler(name) => name,
        }
    }

    pub fn is_lifecycle(self) -> bool {
        !matches!(self, Step::Handler(_))
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LifecycleEvent {
    pub component: &'static str,
    pub step: Step,
    pub args: Value,
}

impl LifecycleEvent {
    pub fn new(component: &'static str, step: Step, args: Value) -> Self {
        Self {
            component,
            step,
            args,
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{} {}", self.component, self.step, self.args)
    }
}

/// Destination for lifecycle events.
pub trait EventSink {
    fn record(&self, event: LifecycleEvent);
}

impl<T: EventSink + ?Sized> EventSink for Rc<T> {
    fn record(&self, event: LifecycleEvent) {
        (**self).record(event)
    }
}

/// Keeps every event in order. Clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingSink(Rc<RefCell<Vec<LifecycleEvent>>>);

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.0.borrow().clone()
    }

    pub fn steps(&self) -> Vec<Step> {
        self.0.borrow().iter().map(|e| e.step).collect()
    }

    /// Steps without handler events.
    pub fn lifecycle_steps(&self) -> Vec<Step> {
        self.0
            .borrow()
            .iter()
            .map(|e| e.step)
            .filter(|s| s.is_lifecycle())
            .collect()
    }

    pub fn last(&self, step: Step) -> Option<LifecycleEvent> {
        self.0.borrow().iter().rev().find(|e| e.step == step).cloned()
    }

    pub fn count(&self, step: Step) -> usize {
        self.0.borrow().iter().filter(|e| e.step == step).count()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn timeline(&self) -> Vec<String> {
        self.0.borrow().iter().map(|e| e.to_string()).collect()
    }
}

impl EventSink for RecordingSink {
    fn record(&self, event: LifecycleEvent) {
        self.0.borrow_mut().push(event);
    }
}

/// Writes each event as a `log` record under the `lifecycle` target.
#[derive(Clone, Copy, Debug)]
pub struct LogSink {
    pub level: log::Level,
}

impl Default for LogSink {
    fn default() -> Self {
        Self {
            level: log::Level::Debug,
        }
    }
}

impl EventSink for LogSink {
    fn record(&self, event: LifecycleEvent) {
        log::log!(target: "lifecycle", self.level, "{event}");
    }
}

/// Fan-out to two sinks, left first.
pub struct Tee<A, B>(pub A, pub B);

impl<A: EventSink, B: EventSink> EventSink for Tee<A, B> {
    fn record(&self, event: LifecycleEvent) {
        self.0.record(event.clone());
        self.1.record(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn recording_sink_shares_log_across_clones() {
        let sink = RecordingSink::new();
        let tee = Tee(sink.clone(), LogSink::default());

        tee.record(LifecycleEvent::new("T", Step::Render, json!({})));
        tee.record(LifecycleEvent::new("T", Step::Handler("alert"), json!({"message": "hi"})));

        assert_eq!(sink.steps(), vec![Step::Render, Step::Handler("alert")]);
        assert_eq!(sink.lifecycle_steps(), vec![Step::Render]);
        assert_eq!(sink.timeline()[1], r#"T::alert {"message":"hi"}"#);
    }
}
