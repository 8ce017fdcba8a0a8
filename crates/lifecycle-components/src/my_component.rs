use lifecycle_core::prelude::*;
use serde_json::Value;

pub const DEFAULT_NAME: &str = "영희";

/// Stateless greeting card with declared prop types.
pub struct MyComponent {
    schema: PropSchema,
}

impl Default for MyComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl MyComponent {
    pub fn new() -> Self {
        Self {
            schema: PropSchema::new()
                .with_default("name", PropKind::String, DEFAULT_NAME)
                .required("favoriteNum", PropKind::Number)
                .optional("children", PropKind::Any),
        }
    }

    pub fn validate(&self, props: &Props) -> Vec<PropWarning> {
        self.schema.resolve(props).1
    }
}

fn show(v: Option<&Value>) -> String {
    match v {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

impl Lifecycle for MyComponent {
    type State = ();
    type Patch = NoPatch;
    type Snapshot = ();
    const NAME: &'static str = "MyComponent";

    fn initial_state(&self, _props: &Props) {}

    fn render(&self, cx: &RenderContext<'_>, _state: &()) -> Result<Node> {
        let (props, warnings) = self.schema.resolve(cx.props());
        for w in &warnings {
            log::warn!("{}: {}", Self::NAME, w);
        }

        Ok(Node::div().with_children(vec![
            Node::text(format!("Hello, my name is {}.", show(props.get("name")))),
            Node::text(format!("children: {}", show(props.get("children")))),
            Node::text(format!(
                "My favorite number is {}.",
                show(props.get("favoriteNum"))
            )),
        ]))
    }
}
