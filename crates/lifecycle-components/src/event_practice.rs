use lifecycle_core::prelude::*;
use serde::Serialize;
use serde_json::json;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PracticeState {
    pub message: String,
}

/// A controlled text input with a confirm button.
#[derive(Default)]
pub struct EventPractice;

impl EventPractice {
    pub const PLACEHOLDER: &'static str = "Type anything";

    /// Input `change` handler.
    pub fn handle_change(
        instance: &mut Instance<Self>,
        value: impl Into<String>,
    ) -> Result<UpdateOutcome> {
        let value = value.into();
        instance.ensure_mounted("handle_change")?;
        instance.emit("change", json!({ "value": value }));
        instance.set_state(move |s| s.message = value)
    }

    /// Confirm button: raises an alert with the current message, then clears
    /// the input. Returns the alerted message.
    pub fn handle_click(instance: &mut Instance<Self>) -> Result<String> {
        instance.ensure_mounted("handle_click")?;
        let message = instance.state().message.clone();
        instance.emit("alert", json!({ "message": message }));
        instance.set_state(|s| s.message.clear())?;
        Ok(message)
    }
}

impl Lifecycle for EventPractice {
    type State = PracticeState;
    type Patch = NoPatch;
    type Snapshot = ();
    const NAME: &'static str = "EventPractice";

    fn initial_state(&self, _props: &Props) -> PracticeState {
        PracticeState::default()
    }

    fn render(&self, _cx: &RenderContext<'_>, state: &PracticeState) -> Result<Node> {
        Ok(Node::div().with_children(vec![
            Node::heading("Event practice"),
            Node::input(state.message.clone(), Self::PLACEHOLDER).with_ref("message"),
            Node::button("Confirm"),
        ]))
    }
}
