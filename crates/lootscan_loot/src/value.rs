use serde::Deserialize;

/// Numeric value as written in loot tables: a bare number, a constant provider
/// or a ranged provider. Anything else is kept as [`NumberProvider::Other`] and
/// has no bounds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberProvider {
    Constant(f64),
    Value {
        value: f64,
    },
    Uniform {
        min: Box<NumberProvider>,
        max: Box<NumberProvider>,
    },
    Binomial {
        n: f64,
        p: f64,
    },
    Other(serde_json::Value),
}

impl NumberProvider {
    pub fn from_json(value: &serde_json::Value) -> Self {
        NumberProvider::deserialize(value).unwrap_or_else(|_| NumberProvider::Other(value.clone()))
    }

    pub fn lower(&self) -> Option<f64> {
        match self {
            NumberProvider::Constant(v) | NumberProvider::Value { value: v } => Some(*v),
            NumberProvider::Uniform { min, .. } => min.lower(),
            NumberProvider::Binomial { .. } => Some(0.0),
            NumberProvider::Other(_) => None,
        }
    }

    pub fn upper(&self) -> Option<f64> {
        match self {
            NumberProvider::Constant(v) | NumberProvider::Value { value: v } => Some(*v),
            NumberProvider::Uniform { max, .. } => max.upper(),
            NumberProvider::Binomial { n, .. } => Some(*n),
            NumberProvider::Other(_) => None,
        }
    }
}
