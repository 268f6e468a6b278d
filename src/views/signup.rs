use tokio_util::sync::CancellationToken;

use crate::api::{RegisterError, Registration};
use crate::message::{Command, Effect, SignupMessage};

pub const MISSING_FIELDS: &str = "Email, password, and a name are required.";
pub const GENERIC_FAILURE: &str = "An error occurred. Please try again.";

/// Account creation form.
#[derive(Debug, Default)]
pub struct SignupForm {
    name: String,
    email: String,
    password: String,
    password_visible: bool,
    error: Option<String>,
    submitting: bool,
    registered: bool,
    lifetime: CancellationToken,
}

impl SignupForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, message: SignupMessage) -> Option<Command> {
        match message {
            SignupMessage::NameChanged(value) => self.name = value,
            SignupMessage::EmailChanged(value) => self.email = value,
            SignupMessage::PasswordChanged(value) => self.password = value,
            SignupMessage::TogglePasswordVisible => {
                self.password_visible = !self.password_visible;
            }

            SignupMessage::Submit => {
                self.error = None;
                if self.name.is_empty() || self.email.is_empty() || self.password.is_empty() {
                    self.error = Some(MISSING_FIELDS.to_string());
                    return None;
                }
                self.submitting = true;
                let registration = Registration {
                    name: self.name.clone(),
                    email: self.email.clone(),
                    password: self.password.clone(),
                };
                return Some(Command::new(Effect::Register(registration), &self.lifetime));
            }

            SignupMessage::Registered(result) => {
                self.submitting = false;
                match result {
                    Ok(()) => self.registered = true,
                    Err(RegisterError::Rejected(msg)) => self.error = Some(msg),
                    Err(RegisterError::Transport(e)) => {
                        log::error!("Registration request failed: {}", e);
                        self.error = Some(GENERIC_FAILURE.to_string());
                    }
                }
            }
        }
        None
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// True once the account exists and the user should be sent to login.
    pub fn should_navigate_to_login(&self) -> bool {
        self.registered
    }

    /// The password as the field shows it.
    pub fn password_display(&self) -> String {
        if self.password_visible {
            self.password.clone()
        } else {
            "•".repeat(self.password.chars().count())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> SignupForm {
        let mut form = SignupForm::new();
        form.update(SignupMessage::NameChanged("Ada".to_string()));
        form.update(SignupMessage::EmailChanged("ada@example.com".to_string()));
        form.update(SignupMessage::PasswordChanged("hunter2".to_string()));
        form
    }

    #[test]
    fn empty_field_blocks_submit() {
        let mut form = SignupForm::new();
        form.update(SignupMessage::NameChanged("Ada".to_string()));
        assert!(form.update(SignupMessage::Submit).is_none());
        assert_eq!(form.error(), Some(MISSING_FIELDS));
    }

    #[test]
    fn submit_builds_registration_and_clears_error() {
        let mut form = SignupForm::new();
        form.update(SignupMessage::Submit);
        assert!(form.error().is_some());

        form.update(SignupMessage::NameChanged("Ada".to_string()));
        form.update(SignupMessage::EmailChanged("ada@example.com".to_string()));
        form.update(SignupMessage::PasswordChanged("hunter2".to_string()));
        let command = form.update(SignupMessage::Submit).unwrap();
        assert_eq!(form.error(), None);
        assert!(form.is_submitting());
        match command.effect {
            Effect::Register(reg) => {
                assert_eq!(reg.name, "Ada");
                assert_eq!(reg.email, "ada@example.com");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn outcomes() {
        let mut form = filled();
        form.update(SignupMessage::Submit);
        form.update(SignupMessage::Registered(Err(RegisterError::Rejected(
            "Email already registered".to_string(),
        ))));
        assert_eq!(form.error(), Some("Email already registered"));
        assert!(!form.should_navigate_to_login());

        form.update(SignupMessage::Registered(Err(RegisterError::Transport(
            "connection refused".to_string(),
        ))));
        assert_eq!(form.error(), Some(GENERIC_FAILURE));

        form.update(SignupMessage::Registered(Ok(())));
        assert!(form.should_navigate_to_login());
        assert!(!form.is_submitting());
    }

    #[test]
    fn password_masking() {
        let mut form = filled();
        assert_eq!(form.password_display(), "•••••••");
        form.update(SignupMessage::TogglePasswordVisible);
        assert_eq!(form.password_display(), "hunter2");
    }
}
