use thiserror::Error;

/// Message shown when the backend gave no usable error text.
pub const GENERIC_SERVER_MESSAGE: &str = "خطا در دریافت پاسخ از سرور";

/// Failure of a single backend call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("Network error: {0}")]
    Network(String),

    #[error("{0} (404)")]
    NotFound(String),

    /// 401: the backend token is missing, expired or revoked.
    #[error("{0} (401)")]
    Unauthorized(String),

    /// Any other 4xx.
    #[error("{message} ({status})")]
    Rejected { status: u16, message: String },

    #[error("{message} ({status})")]
    Server { status: u16, message: String },

    /// A 2xx response whose body was not the JSON we expected.
    #[error("Invalid response: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Maps a non-success status and the message read from its body.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => ApiError::Unauthorized(message),
            404 => ApiError::NotFound(message),
            400..=499 => ApiError::Rejected { status, message },
            _ => ApiError::Server { status, message },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Network(_) | ApiError::Decode(_) => None,
            ApiError::NotFound(_) => Some(404),
            ApiError::Unauthorized(_) => Some(401),
            ApiError::Rejected { status, .. } | ApiError::Server { status, .. } => Some(*status),
        }
    }

    /// Text suitable for a flash message.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => "خطا در اتصال به سرور. اتصال اینترنت را بررسی کنید.".to_string(),
            ApiError::Unauthorized(_) => "نشست شما منقضی شده است. دوباره وارد شوید.".to_string(),
            ApiError::Decode(_) => GENERIC_SERVER_MESSAGE.to_string(),
            ApiError::NotFound(message)
            | ApiError::Rejected { message, .. }
            | ApiError::Server { message, .. } => message.clone(),
        }
    }

    /// Throttle class for repeated toasts. `None` means always show.
    pub fn toast_class(&self) -> Option<&'static str> {
        match self {
            ApiError::Network(_) => Some("network"),
            ApiError::Server { .. } => Some("5xx"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_map_to_kinds() {
        assert_eq!(
            ApiError::from_status(404, "x".into()),
            ApiError::NotFound("x".into())
        );
        assert!(matches!(
            ApiError::from_status(422, "bad".into()),
            ApiError::Rejected { status: 422, .. }
        ));
        assert!(matches!(
            ApiError::from_status(503, "down".into()),
            ApiError::Server { status: 503, .. }
        ));
        assert_eq!(ApiError::from_status(401, "x".into()).status(), Some(401));
    }

    #[test]
    fn only_network_and_server_errors_are_throttled() {
        assert_eq!(ApiError::Network("reset".into()).toast_class(), Some("network"));
        assert_eq!(
            ApiError::from_status(500, "boom".into()).toast_class(),
            Some("5xx")
        );
        assert_eq!(ApiError::from_status(400, "bad".into()).toast_class(), None);
    }

    #[test]
    fn display_keeps_status_suffix() {
        let err = ApiError::from_status(422, "نام تکراری است".into());
        assert_eq!(err.to_string(), "نام تکراری است (422)");
        assert_eq!(err.user_message(), "نام تکراری است");
    }
}
