use dioxus::prelude::*;
use dioxus_i18n::t;
use logon_flow::ErrorKind;

/// Translated text for an error. `what` names the field for messages like
/// "Enter your username".
pub fn error_text(error: &ErrorKind, what: Option<&str>) -> String {
    match error {
        ErrorKind::MissingUsername => {
            t!("error-login-validate-missing-username", what: what.unwrap_or_default())
        }
        ErrorKind::MissingPassword => t!("error-login-validate-missing-password"),
        ErrorKind::LogonFailed => t!("error-login-failed"),
        ErrorKind::Network(_) => t!("error-http-network"),
        ErrorKind::UnexpectedStatus(status) => {
            t!("error-http-unexpected-status", status: status.to_string())
        }
        ErrorKind::InvalidResponse(_) => t!("error-http-invalid-response"),
    }
}

#[component]
pub fn ErrorMessage(error: Option<ErrorKind>, #[props(default)] what: Option<String>) -> Element {
    match error {
        Some(error) => {
            let text = error_text(&error, what.as_deref());
            rsx! {
                span { class: "helper-text error", "{text}" }
            }
        }
        None => rsx! {},
    }
}
