use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// Key/value settings as stored in the `configuration` table.
pub type Configuration = BTreeMap<String, ConfigValue>;

/// A stored setting, tagged by how its text decoded.
///
/// Values are kept as text in a single column. Lists and maps are written as
/// JSON; plain strings are written verbatim. On load, text that parses as JSON
/// becomes `Structured`, anything else stays `Scalar`. A plain string that
/// happens to be valid JSON (`"42"`, `"true"`, `"[1]"`) therefore comes back
/// as `Structured`; the storage format cannot tell the two apart.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Scalar(String),
    Structured(Value),
}

impl ConfigValue {
    /// Decode the stored text of a setting.
    pub fn decode(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(v) => ConfigValue::Structured(v),
            Err(_) => ConfigValue::Scalar(raw.to_string()),
        }
    }

    /// Text written to the database.
    pub fn encode(&self) -> String {
        match self {
            ConfigValue::Scalar(s) => s.clone(),
            ConfigValue::Structured(v) => v.to_string(),
        }
    }

    /// Text of a single value. Numbers and booleans that decoded as JSON are
    /// rendered back to text; lists, maps and null have none.
    pub fn as_str(&self) -> Option<Cow<'_, str>> {
        match self {
            ConfigValue::Scalar(s) => Some(Cow::Borrowed(s)),
            ConfigValue::Structured(Value::String(s)) => Some(Cow::Borrowed(s)),
            ConfigValue::Structured(v @ (Value::Number(_) | Value::Bool(_))) => {
                Some(Cow::Owned(v.to_string()))
            }
            ConfigValue::Structured(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Scalar(s) => s.trim().parse().ok(),
            ConfigValue::Structured(v) => v.as_i64(),
        }
    }

    pub fn as_json(&self) -> Value {
        match self {
            ConfigValue::Scalar(s) => Value::String(s.clone()),
            ConfigValue::Structured(v) => v.clone(),
        }
    }
}

impl From<Value> for ConfigValue {
    fn from(v: Value) -> Self {
        match v {
            Value::String(s) => ConfigValue::Scalar(s),
            other => ConfigValue::Structured(other),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::Scalar(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::Scalar(s)
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        ConfigValue::Structured(Value::from(n))
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
