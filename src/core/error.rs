/// Failures the simulation core can report.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FireError {
    /// An input is outside its domain. Raised before any simulation work.
    #[error("invalid {field}: {reason}")]
    Configuration { field: &'static str, reason: String },

    /// Aggregation was asked to reduce something it cannot.
    #[error("computation failed: {0}")]
    Computation(String),
}

impl FireError {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Configuration {
            field,
            reason: reason.into(),
        }
    }

    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Configuration { field, .. } => Some(field),
            Self::Computation(_) => None,
        }
    }
}
