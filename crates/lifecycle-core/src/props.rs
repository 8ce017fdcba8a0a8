use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Owner-supplied inputs of a component. Immutable for the duration of a
/// render pass; a new `Props` value replaces the old one on update.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Props(Map<String, Value>);

impl Props {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Non-object values have no fields; they become empty props.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            other => {
                log::warn!("props must be a JSON object, got {other}; using empty props");
                Self::new()
            }
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn color(&self) -> Option<&str> {
        self.str("color")
    }

    /// Dotted deep read, e.g. `"missing.value"`. Array segments are indices.
    /// Every segment but the last must resolve to an object or array.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut cur = self.0.get(first)?;
        for seg in segments {
            cur = match cur {
                Value::Object(map) => map.get(seg)?,
                Value::Array(items) => items.get(seg.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(cur)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl From<Map<String, Value>> for Props {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PropKind {
    String,
    Number,
    Bool,
    Any,
}

impl PropKind {
    fn matches(self, value: &Value) -> bool {
        match self {
            PropKind::String => value.is_string(),
            PropKind::Number => value.is_number(),
            PropKind::Bool => value.is_boolean(),
            PropKind::Any => true,
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Prop-type checks are advisory: they are reported, never fatal.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PropWarning {
    #[error("required prop `{name}` was not provided")]
    MissingRequired { name: String },

    #[error("prop `{name}` should be {expected:?}, got {found}")]
    WrongType {
        name: String,
        expected: PropKind,
        found: &'static str,
    },
}

#[derive(Clone, Debug)]
struct PropSpec {
    name: String,
    kind: PropKind,
    required: bool,
    default: Option<Value>,
}

/// Declared prop types and defaults for a component.
#[derive(Clone, Debug, Default)]
pub struct PropSchema {
    specs: Vec<PropSpec>,
}

impl PropSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn optional(self, name: impl Into<String>, kind: PropKind) -> Self {
        self.push(name.into(), kind, false, None)
    }

    pub fn required(self, name: impl Into<String>, kind: PropKind) -> Self {
        self.push(name.into(), kind, true, None)
    }

    pub fn with_default(self, name: impl Into<String>, kind: PropKind, value: impl Into<Value>) -> Self {
        self.push(name.into(), kind, false, Some(value.into()))
    }

    fn push(mut self, name: String, kind: PropKind, required: bool, default: Option<Value>) -> Self {
        self.specs.push(PropSpec {
            name,
            kind,
            required,
            default,
        });
        self
    }

    /// Fills defaults for absent props, then checks types. An explicit `null`
    /// is kept as-is (no default), but counts as missing for required props.
    pub fn resolve(&self, props: &Props) -> (Props, Vec<PropWarning>) {
        let mut out = props.clone();
        let mut warnings = Vec::new();

        for spec in &self.specs {
            if !out.contains(&spec.name)
                && let Some(default) = &spec.default
            {
                out.0.insert(spec.name.clone(), default.clone());
            }

            match out.get(&spec.name) {
                None | Some(Value::Null) => {
                    if spec.required {
                        warnings.push(PropWarning::MissingRequired {
                            name: spec.name.clone(),
                        });
                    }
                }
                Some(v) if !spec.kind.matches(v) => warnings.push(PropWarning::WrongType {
                    name: spec.name.clone(),
                    expected: spec.kind,
                    found: kind_of(v),
                }),
                Some(_) => {}
            }
        }

        (out, warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lookup_walks_nested_objects() {
        let props = Props::from_value(json!({
            "color": "red",
            "missing": { "value": 3 },
            "list": [ { "x": 1 } ],
        }));

        assert_eq!(props.color(), Some("red"));
        assert_eq!(props.lookup("missing.value"), Some(&json!(3)));
        assert_eq!(props.lookup("list.0.x"), Some(&json!(1)));
        assert_eq!(props.lookup("color.value"), None);
        assert_eq!(props.lookup("nope.value"), None);
    }

    #[test]
    fn schema_applies_defaults_and_reports() {
        let schema = PropSchema::new()
            .with_default("name", PropKind::String, "anon")
            .required("favoriteNum", PropKind::Number);

        let (resolved, warnings) = schema.resolve(&Props::new());
        assert_eq!(resolved.str("name"), Some("anon"));
        assert_eq!(
            warnings,
            vec![PropWarning::MissingRequired {
                name: "favoriteNum".into()
            }]
        );

        let (_, warnings) = schema.resolve(&Props::new().with("favoriteNum", "seven"));
        assert_eq!(
            warnings,
            vec![PropWarning::WrongType {
                name: "favoriteNum".into(),
                expected: PropKind::Number,
                found: "string",
            }]
        );
    }
}
