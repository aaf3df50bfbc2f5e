//! Conversions from domain validation errors into the errors of the layers
//! that report them.
//!
//! The domain layer compiles under the `data` feature alone, so it cannot
//! name form, service or repository errors itself.

use crate::domain::types::TypeConstraintError;
use crate::forms::FormError;
use crate::repository::errors::RepositoryError;
use crate::services::ServiceError;

impl From<TypeConstraintError> for FormError {
    fn from(err: TypeConstraintError) -> Self {
        match err {
            TypeConstraintError::InvalidId => FormError::InvalidId,
            TypeConstraintError::InvalidEmail => FormError::InvalidEmail,
            TypeConstraintError::EmptyString => FormError::InvalidName,
            TypeConstraintError::InvalidValue(value) => {
                FormError::InvalidValue(format!("مقدار «{value}» معتبر نیست"))
            }
        }
    }
}

/// A malformed record id in a path can never name an existing record.
impl From<TypeConstraintError> for ServiceError {
    fn from(err: TypeConstraintError) -> Self {
        match err {
            TypeConstraintError::InvalidId => ServiceError::NotFound,
            other => ServiceError::TypeConstraint(other.to_string()),
        }
    }
}

/// Stored documents that no longer decode are reported as validation errors.
impl From<TypeConstraintError> for RepositoryError {
    fn from(err: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_path_id_is_not_found() {
        let err = ServiceError::from(TypeConstraintError::InvalidId);
        assert!(matches!(err, ServiceError::NotFound));
    }

    #[test]
    fn unknown_values_are_quoted_in_forms() {
        let err = FormError::from(TypeConstraintError::InvalidValue("gold".to_string()));
        assert_eq!(err.to_string(), "مقدار «gold» معتبر نیست");
    }
}
