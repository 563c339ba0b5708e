//! Declarative machine specs loaded from JSON.

use crate::builder::error::BuildError;
use serde::{Deserialize, Serialize};

/// A machine configuration in serializable form.
///
/// ```rust
/// use lifecycle_fsm::builder::MachineSpec;
///
/// let spec = MachineSpec::from_json(r#"{
///     "init": "solid",
///     "transitions": [
///         { "name": "melt", "from": "solid", "to": "liquid" },
///         { "name": "freeze", "from": ["liquid", "gas"], "to": "solid" },
///         { "name": "reset" }
///     ]
/// }"#).unwrap();
///
/// assert_eq!(spec.transitions.len(), 3);
/// assert!(!spec.observe_unchanged_state);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init: Option<InitSpec>,
    #[serde(default)]
    pub transitions: Vec<TransitionSpec>,
    #[serde(default)]
    pub observe_unchanged_state: bool,
}

impl MachineSpec {
    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, BuildError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Init transition: either just the target state, or the full transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InitSpec {
    State(String),
    Transition {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from: Option<String>,
        to: String,
    },
}

/// One declared transition. Missing `from` or `to` means the wildcard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Sources>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

/// A single source state or a list of them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sources {
    One(String),
    Many(Vec<String>),
}

impl From<Sources> for Vec<String> {
    fn from(sources: Sources) -> Self {
        match sources {
            Sources::One(state) => vec![state],
            Sources::Many(states) => states,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::StateMachineBuilder;
    use futures::FutureExt;

    #[test]
    fn parses_short_and_full_init() {
        let short = MachineSpec::from_json(r#"{ "init": "idle" }"#).unwrap();
        assert_eq!(short.init, Some(InitSpec::State("idle".to_string())));

        let full = MachineSpec::from_json(
            r#"{ "init": { "name": "boot", "from": "off", "to": "on" } }"#,
        )
        .unwrap();
        assert_eq!(
            full.init,
            Some(InitSpec::Transition {
                name: Some("boot".to_string()),
                from: Some("off".to_string()),
                to: "on".to_string(),
            })
        );
    }

    #[test]
    fn parses_source_forms() {
        let spec = MachineSpec::from_json(
            r#"{ "transitions": [
                { "name": "a", "from": "x", "to": "y" },
                { "name": "b", "from": ["x", "y"], "to": "z" },
                { "name": "c" }
            ], "observeUnchangedState": true }"#,
        )
        .unwrap();

        assert!(spec.observe_unchanged_state);
        assert_eq!(spec.transitions[0].from, Some(Sources::One("x".to_string())));
        assert_eq!(
            spec.transitions[1].from,
            Some(Sources::Many(vec!["x".to_string(), "y".to_string()]))
        );
        assert_eq!(spec.transitions[2].from, None);
        assert_eq!(spec.transitions[2].to, None);
    }

    #[test]
    fn malformed_json_is_a_spec_error() {
        let result = MachineSpec::from_json(r#"{ "transitions": [ { "from": "x" } ] }"#);
        assert!(matches!(result, Err(BuildError::Spec(_))));
    }

    #[test]
    fn serializes_back_to_equivalent_spec() {
        let spec = MachineSpec::from_json(
            r#"{ "init": "idle", "transitions": [ { "name": "walk", "from": "idle", "to": "walking" } ] }"#,
        )
        .unwrap();

        let json = spec.to_json().unwrap();
        assert!(json.contains("observeUnchangedState"));
        assert_eq!(MachineSpec::from_json(&json).unwrap(), spec);
    }

    #[test]
    fn spec_drives_a_machine() {
        let spec = MachineSpec::from_json(
            r#"{
                "init": "solid",
                "transitions": [
                    { "name": "melt", "from": "solid", "to": "liquid" },
                    { "name": "freeze", "from": ["liquid", "gas"], "to": "solid" },
                    { "name": "stir" }
                ]
            }"#,
        )
        .unwrap();

        let fsm = StateMachineBuilder::<(), ()>::new().spec(spec).build().unwrap();
        fsm.init(()).now_or_never().unwrap().unwrap();
        assert!(fsm.is("solid"));

        fsm.fire("stir", ()).now_or_never().unwrap().unwrap();
        assert!(fsm.is("solid"));

        fsm.fire("melt", ()).now_or_never().unwrap().unwrap();
        assert_eq!(fsm.transitions(), vec!["freeze", "stir"]);
    }
}
