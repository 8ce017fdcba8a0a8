use serde::{Deserialize, Serialize};

/// Per-tracker switches. Every field defaults to `false`, so `{}` is a valid
/// JSON config.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Reading an absent prop path during render fails the render with
    /// `MissingPropPath` instead of yielding nothing.
    pub strict_prop_access: bool,
    /// Keep the proposed props/state when `should_update` vetoes a render.
    /// Off by default: a vetoed request is discarded.
    pub commit_vetoed_state: bool,
}

impl TrackerConfig {
    pub fn strict() -> Self {
        Self {
            strict_prop_access: true,
            ..Self::default()
        }
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = TrackerConfig::from_json(r#"{ "strict_prop_access": true }"#).unwrap();
        assert!(cfg.strict_prop_access);
        assert!(!cfg.commit_vetoed_state);

        assert_eq!(TrackerConfig::from_json("{}").unwrap(), TrackerConfig::default());
    }
}
