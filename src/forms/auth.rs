use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{EmailAddress, LoginIdentifier};
use crate::forms::{FormError, checked, optional_text};

#[derive(Debug, Deserialize, Validate)]
/// Sign-in form.
pub struct LoginForm {
    /// Username, phone number or email.
    #[validate(length(min = 3, max = 100))]
    pub username: String,
    #[validate(length(min = 6, max = 100))]
    pub password: String,
    #[serde(default)]
    pub remember_me: Option<String>,
    /// Page to return to after signing in.
    #[serde(default)]
    pub next: Option<String>,
}

/// Validated credentials.
#[derive(Debug)]
pub struct LoginPayload {
    pub identifier: LoginIdentifier,
    pub password: String,
    pub remember_me: bool,
    pub next: Option<String>,
}

impl TryFrom<LoginForm> for LoginPayload {
    type Error = FormError;

    fn try_from(form: LoginForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            identifier: LoginIdentifier::new(form.username)?,
            remember_me: checked(&form.remember_me),
            next: form.next.as_deref().and_then(optional_text),
            password: form.password,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

impl TryFrom<ForgotPasswordForm> for EmailAddress {
    type Error = FormError;

    fn try_from(form: ForgotPasswordForm) -> Result<Self, Self::Error> {
        Ok(EmailAddress::new(form.email)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::parse_form;

    #[test]
    fn login_form_reads_checkbox_and_next() {
        let form: LoginForm =
            parse_form(b"username=09120000000&password=secret1&remember_me=on&next=%2Fusers")
                .unwrap();
        let payload = LoginPayload::try_from(form).unwrap();
        assert_eq!(payload.identifier.as_str(), "09120000000");
        assert!(payload.remember_me);
        assert_eq!(payload.next.as_deref(), Some("/users"));
    }

    #[test]
    fn short_passwords_are_rejected() {
        let form: LoginForm = parse_form(b"username=admin&password=12345").unwrap();
        assert!(matches!(
            LoginPayload::try_from(form),
            Err(FormError::Validation(_))
        ));
    }

    #[test]
    fn forgot_password_needs_a_valid_email() {
        let bad = ForgotPasswordForm {
            email: "nope".to_string(),
        };
        assert!(matches!(EmailAddress::try_from(bad), Err(FormError::InvalidEmail)));
    }
}
