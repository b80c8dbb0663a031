use crate::models::{ErrorKind, Field, FormErrors};

/// Check the form before anything is sent to the identity provider.
///
/// A username made only of whitespace counts as missing. Passwords are taken
/// verbatim, so only the empty password is rejected.
pub fn validate_username_password(username: &str, password: &str) -> Result<(), FormErrors> {
    let mut errors = FormErrors::new();

    if username.trim().is_empty() {
        errors.set(Field::Username, ErrorKind::MissingUsername);
    }
    if password.is_empty() {
        errors.set(Field::Password, ErrorKind::MissingPassword);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
