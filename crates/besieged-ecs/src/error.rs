use crate::entity::Entity;

/// A component value outside its valid domain. The rejected value is never stored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: i64 },

    #[error("{field} must not exceed {max}, got {value}")]
    AboveMaximum {
        field: &'static str,
        value: i64,
        max: i64,
    },
}

/// Errors a system can return from its update.
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    #[error("{0}")]
    Message(String),

    #[error("entity {entity} is missing component {component}")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl SystemError {
    pub fn message(msg: impl Into<String>) -> Self {
        Self::Message(msg.into())
    }

    pub fn missing<T>(entity: Entity) -> Self {
        Self::MissingComponent {
            entity,
            component: std::any::type_name::<T>(),
        }
    }
}

/// Why a system failed during a tick.
#[derive(Debug, thiserror::Error)]
pub enum FailureCause {
    #[error(transparent)]
    Error(#[from] SystemError),

    #[error("panicked: {0}")]
    Panicked(String),
}

/// A system that failed during a tick. The remaining systems still ran.
#[derive(Debug, thiserror::Error)]
#[error("system '{system}' failed: {cause}")]
pub struct SystemFailure {
    pub system: String,
    pub cause: FailureCause,
}
