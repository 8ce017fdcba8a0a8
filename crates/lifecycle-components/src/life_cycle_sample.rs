use lifecycle_core::prelude::*;
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SampleState {
    pub number: u32,
    /// Mirrors `props.color` as of the last derive step.
    pub color: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ColorPatch {
    pub color: Option<String>,
}

impl StatePatch<SampleState> for ColorPatch {
    fn apply(self, state: &mut SampleState) {
        state.color = self.color;
    }
}

/// Skips renders whose proposed `number % modulus == remainder`.
#[derive(Clone, Copy, Debug)]
pub struct SkipRemainder {
    pub modulus: u32,
    pub remainder: u32,
}

impl Default for SkipRemainder {
    fn default() -> Self {
        Self {
            modulus: 10,
            remainder: 4,
        }
    }
}

impl UpdatePolicy<SampleState> for SkipRemainder {
    fn should_update(&self, _next_props: &Props, next_state: &SampleState) -> bool {
        self.modulus == 0 || next_state.number % self.modulus != self.remainder
    }
}

pub const HEADING_REF: &str = "heading";

/// A counter whose heading is painted in `props.color`. Walks every hook and
/// reads `props.missing.value` while rendering.
pub struct LifeCycleSample {
    policy: Box<dyn UpdatePolicy<SampleState>>,
}

impl Default for LifeCycleSample {
    fn default() -> Self {
        Self::new()
    }
}

impl LifeCycleSample {
    pub fn new() -> Self {
        Self::with_policy(SkipRemainder::default())
    }

    pub fn with_policy(policy: impl UpdatePolicy<SampleState> + 'static) -> Self {
        Self {
            policy: Box::new(policy),
        }
    }

    /// The "Add" button.
    pub fn increment() -> UpdateRequest<SampleState> {
        UpdateRequest::state(|s: &mut SampleState| s.number = s.number.saturating_add(1))
    }

    pub fn click(instance: &mut Instance<Self>) -> Result<UpdateOutcome> {
        instance.ensure_mounted("click")?;
        instance.emit("click", json!({ "button": "add" }));
        instance.request_update(Self::increment())
    }
}

fn display(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Lifecycle for LifeCycleSample {
    type State = SampleState;
    type Patch = ColorPatch;
    type Snapshot = String;
    const NAME: &'static str = "LifeCycleSample";

    fn initial_state(&self, _props: &Props) -> SampleState {
        SampleState::default()
    }

    fn derive_state_from_props(next_props: &Props, prev_state: &SampleState) -> Option<ColorPatch> {
        let next = next_props.color();
        if next != prev_state.color.as_deref() {
            return Some(ColorPatch {
                color: next.map(str::to_owned),
            });
        }
        None
    }

    fn render(&self, cx: &RenderContext<'_>, state: &SampleState) -> Result<Node> {
        let mut root = Node::div();
        if let Some(v) = cx.read("missing.value")? {
            root = root.child(Node::text(display(v)));
        }

        let mut heading = Node::heading(state.number.to_string()).with_ref(HEADING_REF);
        if let Some(color) = cx.props().color() {
            heading = heading.style("color", color);
        }

        Ok(root
            .child(heading)
            .child(Node::paragraph(format!(
                "color: {}",
                state.color.as_deref().unwrap_or("")
            )))
            .child(Node::button("Add")))
    }

    fn did_mount(&mut self, _cx: &HookContext<'_>, props: &Props, _state: &SampleState) {
        let color = props.color().unwrap_or("").to_string();
        effect(move || {
            log::info!("LifeCycleSample mounted ({color})");
            on_unmount(|| log::info!("LifeCycleSample released mount resources"))
        });
    }

    fn should_update(&self, next_props: &Props, next_state: &SampleState) -> bool {
        self.policy.should_update(next_props, next_state)
    }

    fn capture_snapshot(
        &self,
        prev_props: &Props,
        current_props: &Props,
        surface: &DomHandle,
    ) -> Option<String> {
        if prev_props.color() == current_props.color() {
            return None;
        }
        surface
            .find_ref(HEADING_REF)
            .and_then(|h| h.style_of("color"))
            .map(str::to_owned)
    }

    /// Reports the heading repaint when the snapshot carried the old colour.
    fn did_update(
        &mut self,
        cx: &HookContext<'_>,
        _prev_props: &Props,
        _prev_state: &SampleState,
        snapshot: Option<String>,
    ) {
        let Some(before) = snapshot else {
            return;
        };
        log::info!("color before update: {before}");
        let after = cx
            .surface()
            .and_then(|s| s.find_ref(HEADING_REF))
            .and_then(|h| h.style_of("color"));
        cx.emit("color_change", json!({ "from": before, "to": after }));
    }

    fn will_unmount(&mut self, _cx: &HookContext<'_>) {
        log::info!("LifeCycleSample unmounting");
    }
}
