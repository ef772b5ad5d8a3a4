//! Numeric dataset cells

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A numeric dataset cell kept exactly as recorded
///
/// Cells may hold a JSON number or numeric text (`100` or `"100"`). They
/// are only read when a query reaches them, so one bad cell fails that
/// query and nothing else.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NumericCell(Value);

impl NumericCell {
    /// The cell as a number, or `None` when it is not numeric
    pub fn as_f64(&self) -> Option<f64> {
        match &self.0 {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

impl From<f64> for NumericCell {
    fn from(value: f64) -> Self {
        Self(Value::from(value))
    }
}

impl std::fmt::Display for NumericCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Value::String(s) => write!(f, "{}", s),
            other => write!(f, "{}", other),
        }
    }
}
