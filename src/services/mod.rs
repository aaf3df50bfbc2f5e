//! Services coordinating forms, the backend API and the local store.
//!
//! Route handlers stay thin: they extract the request, call one service
//! function and turn its [`ServiceResult`] into a redirect or a page.

use thiserror::Error;

use crate::api::errors::ApiError;
use crate::forms::FormError;
use crate::repository::errors::RepositoryError;

pub mod auth;
pub mod dashboard;
pub mod export;
pub mod lists;
pub mod mutations;
pub mod settings;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    /// User input was rejected; the message is shown as is.
    #[error("{0}")]
    Form(String),

    #[error("backend error: {0}")]
    Api(#[from] ApiError),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("type constraint violated: {0}")]
    TypeConstraint(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.to_string())
    }
}

impl ServiceError {
    /// The backend no longer accepts the session token.
    pub fn is_session_expired(&self) -> bool {
        matches!(
            self,
            ServiceError::Unauthorized | ServiceError::Api(ApiError::Unauthorized(_))
        )
    }

    /// Text for the flash message shown after a failed action.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Unauthorized => "دسترسی به این بخش مجاز نیست".to_string(),
            ServiceError::NotFound => "مورد درخواستی یافت نشد".to_string(),
            ServiceError::Form(message) => message.clone(),
            ServiceError::Api(err) => err.user_message(),
            ServiceError::TypeConstraint(_) => "اطلاعات وارد شده معتبر نیست".to_string(),
            ServiceError::Repository(_) | ServiceError::Internal(_) => {
                "خطای داخلی رخ داد. لطفا دوباره تلاش کنید.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_errors_keep_their_message() {
        let err = ServiceError::from(FormError::MissingNotes);
        assert_eq!(err.user_message(), "برای رد کردن، توضیحات الزامی است");
    }

    #[test]
    fn backend_401_means_expired_session() {
        let err = ServiceError::from(ApiError::Unauthorized("token expired".to_string()));
        assert!(err.is_session_expired());
        assert!(!ServiceError::NotFound.is_session_expired());
    }
}
