use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Branding copy delivered with the hello handshake
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username_hint_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signin_page_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locales: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HelloDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branding: Option<Branding>,
}

/// Snapshot of the identity provider hello handshake.
///
/// `state` tells whether the provider already knows a signed-in user for this
/// browser. Everything else is optional and only used for display or routing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelloInfo {
    #[serde(default)]
    pub state: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HelloDetails>,
}

impl HelloInfo {
    pub fn branding(&self) -> Option<&Branding> {
        self.details.as_ref().and_then(|d| d.branding.as_ref())
    }

    /// Branded placeholder for the username field, if the provider sets one
    pub fn username_hint_text(&self) -> Option<&str> {
        self.branding()
            .and_then(|b| b.username_hint_text.as_deref())
            .filter(|s| !s.is_empty())
    }

    pub fn signin_page_text(&self) -> Option<&str> {
        self.branding()
            .and_then(|b| b.signin_page_text.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// Locales the branding allows; empty when unrestricted
    pub fn branding_locales(&self) -> &[String] {
        self.branding()
            .and_then(|b| b.locales.as_deref())
            .unwrap_or(&[])
    }

    /// Name to show for the remembered account in the account chooser
    pub fn account_label(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.username.as_deref())
    }
}

/// Form fields which can carry an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Username,
    Password,
    Http,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Username => "username",
            Field::Password => "password",
            Field::Http => "http",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What went wrong with a field or with the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    MissingUsername,
    MissingPassword,
    LogonFailed,
    Network(String),
    UnexpectedStatus(u16),
    InvalidResponse(String),
}

impl ErrorKind {
    /// Stable message id, looked up in the translation catalogs
    pub fn message_id(&self) -> &'static str {
        match self {
            ErrorKind::MissingUsername => "error-login-validate-missing-username",
            ErrorKind::MissingPassword => "error-login-validate-missing-password",
            ErrorKind::LogonFailed => "error-login-failed",
            ErrorKind::Network(_) => "error-http-network",
            ErrorKind::UnexpectedStatus(_) => "error-http-unexpected-status",
            ErrorKind::InvalidResponse(_) => "error-http-invalid-response",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::MissingUsername => write!(f, "username is missing"),
            ErrorKind::MissingPassword => write!(f, "password is missing"),
            ErrorKind::LogonFailed => write!(f, "logon failed"),
            ErrorKind::Network(msg) => write!(f, "network error: {}", msg),
            ErrorKind::UnexpectedStatus(status) => {
                write!(f, "unexpected response status: {}", status)
            }
            ErrorKind::InvalidResponse(msg) => write!(f, "invalid response: {}", msg),
        }
    }
}

/// Errors keyed by field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormErrors(BTreeMap<Field, ErrorKind>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: Field, kind: ErrorKind) {
        self.0.insert(field, kind);
    }

    pub fn get(&self, field: Field) -> Option<&ErrorKind> {
        self.0.get(&field)
    }

    pub fn clear(&mut self, field: Field) -> Option<ErrorKind> {
        self.0.remove(&field)
    }

    pub fn has(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn username(&self) -> Option<&ErrorKind> {
        self.get(Field::Username)
    }

    pub fn password(&self) -> Option<&ErrorKind> {
        self.get(Field::Password)
    }

    pub fn http(&self) -> Option<&ErrorKind> {
        self.get(Field::Http)
    }

    /// Single transport error
    pub fn http_error(kind: ErrorKind) -> Self {
        let mut errors = Self::new();
        errors.set(Field::Http, kind);
        errors
    }
}

/// Username and password as typed into the form
#[derive(Clone, Default, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn clear(&mut self) {
        self.username.clear();
        self.password.clear();
    }
}

// Keep passwords out of debug logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Result of a logon attempt as seen by the form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogonResponse {
    pub success: bool,
    pub errors: Option<FormErrors>,
    pub hello: Option<HelloInfo>,
}

impl LogonResponse {
    pub fn succeeded(hello: Option<HelloInfo>) -> Self {
        Self {
            success: true,
            errors: None,
            hello,
        }
    }

    pub fn failed(errors: FormErrors) -> Self {
        Self {
            success: false,
            errors: Some(errors),
            hello: None,
        }
    }
}
