//! Variables and environment entries
//!
//! A variable is either a static value or a dynamic one computed by a
//! shell command:
//!
//! ```yaml
//! vars:
//!   GREETING: Hello
//!   RETRIES: 3
//!   GIT_COMMIT:
//!     sh: git log -n 1 --format=%h
//! ```
//!
//! Scalars that aren't strings (numbers, bools) are kept as their textual
//! form. Nothing here evaluates `sh` commands.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// Ordered variable map, used for both `vars` and `env`
pub type Vars = IndexMap<String, Var>;

/// A single variable value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, try_from = "RawVar")]
pub enum Var {
    /// A literal value
    Static(String),
    /// A value produced by running a shell command
    Dynamic { sh: String },
}

impl Var {
    /// Creates a static variable
    pub fn new(value: impl Into<String>) -> Self {
        Var::Static(value.into())
    }

    /// Creates a dynamic variable
    pub fn sh(command: impl Into<String>) -> Self {
        Var::Dynamic { sh: command.into() }
    }

    /// Returns the static value, if this is one
    pub fn as_static(&self) -> Option<&str> {
        match self {
            Var::Static(s) => Some(s),
            Var::Dynamic { .. } => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawVar {
    Dynamic { sh: String },
    Scalar(Value),
}

impl TryFrom<RawVar> for Var {
    type Error = String;

    fn try_from(raw: RawVar) -> Result<Self, Self::Error> {
        match raw {
            RawVar::Dynamic { sh } => Ok(Var::Dynamic { sh }),
            RawVar::Scalar(value) => scalar_to_string(&value).map(Var::Static),
        }
    }
}

/// Converts a YAML scalar to its textual form
pub(crate) fn scalar_to_string(value: &Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        Value::Sequence(_) => Err("expected a scalar or {sh: ...}, found a sequence".to_string()),
        Value::Mapping(_) => Err("expected a scalar or {sh: ...}, found a mapping".to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_static_and_dynamic() {
        let yaml = r#"
GREETING: Hello
RETRIES: 3
DEBUG: true
EMPTY:
COMMIT:
  sh: git rev-parse HEAD
"#;
        let vars: Vars = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(vars["GREETING"], Var::new("Hello"));
        assert_eq!(vars["RETRIES"], Var::new("3"));
        assert_eq!(vars["DEBUG"], Var::new("true"));
        assert_eq!(vars["EMPTY"], Var::new(""));
        assert_eq!(vars["COMMIT"], Var::sh("git rev-parse HEAD"));
    }

    #[test]
    fn keeps_declaration_order() {
        let yaml = "B: 1\nA: 2\nC: 3\n";
        let vars: Vars = serde_yaml::from_str(yaml).unwrap();
        let keys: Vec<_> = vars.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["B", "A", "C"]);
    }

    #[test]
    fn rejects_sequences() {
        let result: Result<Vars, _> = serde_yaml::from_str("LIST: [1, 2]\n");
        assert!(result.is_err());
    }

    #[test]
    fn serializes_back_to_yaml_shapes() {
        let mut vars = Vars::new();
        vars.insert("A".to_string(), Var::new("x"));
        vars.insert("B".to_string(), Var::sh("echo y"));

        let yaml = serde_yaml::to_string(&vars).unwrap();
        assert!(yaml.contains("A: x"));
        assert!(yaml.contains("sh: echo y"));
    }
}
