use crate::address::PathAddress;
use crate::error::TreeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Untyped input graph, as handed over by a parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Real(f64),
    Str(String),
    List(Vec<Value>),
    /// Entries in insertion order.
    Map(Vec<(String, Value)>),
    /// A source value with no scalar mapping, described by its source type.
    Other(String),
}

impl Value {
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Real(_) => "real",
            Value::Str(_) => "string",
            Value::List(_) => "sequence",
            Value::Map(_) => "map",
            Value::Other(_) => "other",
        }
    }

    /// Converts a parsed YAML document. Non-string scalar keys are
    /// stringified; composite keys are rejected.
    pub fn from_yaml(value: serde_yaml::Value) -> Result<Self, TreeError> {
        Ok(match value {
            serde_yaml::Value::Null => Value::Null,
            serde_yaml::Value::Bool(b) => Value::Bool(b),
            serde_yaml::Value::Number(n) => number_value(n.as_i64(), n.as_u64(), n.as_f64()),
            serde_yaml::Value::String(s) => Value::Str(s),
            serde_yaml::Value::Sequence(items) => Value::List(
                items
                    .into_iter()
                    .map(Value::from_yaml)
                    .collect::<Result<_, _>>()?,
            ),
            serde_yaml::Value::Mapping(mapping) => {
                let mut entries = Vec::with_capacity(mapping.len());
                for (key, value) in mapping {
                    entries.push((yaml_key(key)?, Value::from_yaml(value)?));
                }
                Value::Map(entries)
            }
            serde_yaml::Value::Tagged(tagged) => Value::Other(format!("tagged {}", tagged.tag)),
        })
    }
}

fn number_value(int: Option<i64>, uint: Option<u64>, real: Option<f64>) -> Value {
    match (int, uint, real) {
        (Some(i), _, _) => Value::Int(i),
        (None, Some(u), _) => Value::Other(format!("unsigned integer {} out of range", u)),
        (None, None, Some(r)) => Value::Real(r),
        (None, None, None) => Value::Other("number".to_string()),
    }
}

pub(crate) fn yaml_key(key: serde_yaml::Value) -> Result<String, TreeError> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        other => Err(TreeError::MalformedDocument(format!(
            "unsupported mapping key {:?}",
            other
        ))),
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => number_value(n.as_i64(), n.as_u64(), n.as_f64()),
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(object) => {
                Value::Map(object.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

/// Node kind, with the wire codes used across the sink boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i32)]
pub enum NodeKind {
    Scalar = 1,
    Sequence = 2,
    Map = 3,
}

impl NodeKind {
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeKind::Scalar => "scalar",
            NodeKind::Sequence => "sequence",
            NodeKind::Map => "map",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarValue {
    Int(i64),
    Real(f64),
    Bool(bool),
    Str(String),
}

impl ScalarValue {
    /// Maps an input value onto a scalar, if it is one.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(ScalarValue::Int(*v)),
            Value::Real(v) => Some(ScalarValue::Real(*v)),
            Value::Bool(v) => Some(ScalarValue::Bool(*v)),
            Value::Str(v) => Some(ScalarValue::Str(v.clone())),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ScalarValue::Int(_) => "integer",
            ScalarValue::Real(_) => "real",
            ScalarValue::Bool(_) => "boolean",
            ScalarValue::Str(_) => "string",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    address: PathAddress,
    kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<ScalarValue>,
}

impl TreeNode {
    pub fn scalar(address: PathAddress, value: ScalarValue) -> Self {
        Self {
            address,
            kind: NodeKind::Scalar,
            value: Some(value),
        }
    }

    pub fn sequence(address: PathAddress) -> Self {
        Self {
            address,
            kind: NodeKind::Sequence,
            value: None,
        }
    }

    pub fn map(address: PathAddress) -> Self {
        Self {
            address,
            kind: NodeKind::Map,
            value: None,
        }
    }

    pub fn address(&self) -> &PathAddress {
        &self.address
    }

    pub fn name(&self) -> &str {
        self.address.name()
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn value(&self) -> Option<&ScalarValue> {
        self.value.as_ref()
    }

    /// Scalar type name for scalars, kind name otherwise.
    pub fn type_name(&self) -> &'static str {
        match (&self.value, self.kind) {
            (Some(value), _) => value.type_name(),
            (None, NodeKind::Sequence) => "sequence",
            (None, _) => "map",
        }
    }
}
