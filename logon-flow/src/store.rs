//! Form state store.
//!
//! All state the sign-in screen renders lives in [`LogonState`] and only
//! changes through [`reduce`]. [`LogonStore`] wraps the state together with
//! the dispatch entry point and the submission bookkeeping.

use crate::models::{Credentials, ErrorKind, Field, FormErrors, HelloInfo, LogonResponse};
use crate::query::Query;
use crate::validate::validate_username_password;

/// Editable inputs of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Username,
    Password,
}

impl From<InputField> for Field {
    fn from(field: InputField) -> Self {
        match field {
            InputField::Username => Field::Username,
            InputField::Password => Field::Password,
        }
    }
}

/// Actions understood by the reducer
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    UpdateInput { field: InputField, value: String },
    ReceiveValidateLogon(FormErrors),
    RequestLogon { ticket: u64 },
    ReceiveLogon { ticket: u64, response: LogonResponse },
    ReceiveHello(HelloInfo),
    ReceiveHelloFailed(ErrorKind),
    DismissError(Field),
    AdvanceLogon,
    ResetLogon,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogonState {
    pub credentials: Credentials,
    pub loading: bool,
    pub errors: FormErrors,
    pub hello: Option<HelloInfo>,
    pub query: Query,
    /// Ticket of the submission currently in flight
    pub pending: Option<u64>,
}

impl LogonState {
    pub fn new(query: Query, hello: Option<HelloInfo>) -> Self {
        Self {
            query,
            hello,
            ..Self::default()
        }
    }

    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    pub fn password(&self) -> &str {
        &self.credentials.password
    }
}

/// Pure state transition
pub fn reduce(mut state: LogonState, action: Action) -> LogonState {
    match action {
        Action::UpdateInput { field, value } => {
            match field {
                InputField::Username => state.credentials.username = value,
                InputField::Password => state.credentials.password = value,
            }
            state.errors.clear(field.into());
        }
        Action::ReceiveValidateLogon(errors) => {
            state.errors = errors;
            state.loading = false;
        }
        Action::RequestLogon { ticket } => {
            state.errors = FormErrors::new();
            state.loading = true;
            state.pending = Some(ticket);
        }
        Action::ReceiveLogon { ticket, response } => {
            if state.pending != Some(ticket) {
                log::debug!("Dropping stale logon response (ticket {})", ticket);
                return state;
            }
            state.pending = None;
            state.loading = false;
            state.errors = response.errors.unwrap_or_default();
            if let Some(hello) = response.hello {
                state.hello = Some(hello);
            }
        }
        Action::ReceiveHello(hello) => {
            state.hello = Some(hello);
        }
        Action::ReceiveHelloFailed(kind) => {
            state.errors.set(Field::Http, kind);
        }
        Action::DismissError(field) => {
            state.errors.clear(field);
        }
        Action::AdvanceLogon => {
            state.credentials.clear();
            state.errors = FormErrors::new();
        }
        Action::ResetLogon => {
            state.credentials.clear();
            state.errors = FormErrors::new();
            state.loading = false;
            state.pending = None;
        }
    }
    state
}

/// Why a submission did not start
#[derive(Debug, Clone, PartialEq)]
pub enum Rejected {
    /// A previous submission is still in flight
    Busy,
    /// Local validation failed; the errors are already in the store
    Invalid(FormErrors),
}

/// Everything needed to send one logon request
#[derive(Clone, PartialEq)]
pub struct LogonRequest {
    pub ticket: u64,
    pub username: String,
    pub password: String,
    pub remember: bool,
    pub query: Query,
}

impl std::fmt::Debug for LogonRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogonRequest")
            .field("ticket", &self.ticket)
            .field("username", &self.username)
            .field("remember", &self.remember)
            .finish_non_exhaustive()
    }
}

/// Store with dispatch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogonStore {
    state: LogonState,
    next_ticket: u64,
}

impl LogonStore {
    pub fn new(state: LogonState) -> Self {
        Self {
            state,
            next_ticket: 1,
        }
    }

    pub fn state(&self) -> &LogonState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) {
        log::trace!("dispatch {:?}", ActionName(&action));
        self.state = reduce(std::mem::take(&mut self.state), action);
    }

    pub fn update_input(&mut self, field: InputField, value: String) {
        self.dispatch(Action::UpdateInput { field, value });
    }

    /// Validate the form and mark a submission as in flight.
    ///
    /// Returns the request to send, or why nothing should be sent. While a
    /// submission is pending every further call is rejected with `Busy`.
    pub fn prepare_logon(&mut self, remember: bool) -> Result<LogonRequest, Rejected> {
        if self.state.loading {
            return Err(Rejected::Busy);
        }

        let username = self.state.credentials.username.clone();
        let password = self.state.credentials.password.clone();

        if let Err(errors) = validate_username_password(&username, &password) {
            self.dispatch(Action::ReceiveValidateLogon(errors.clone()));
            return Err(Rejected::Invalid(errors));
        }

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.dispatch(Action::RequestLogon { ticket });

        Ok(LogonRequest {
            ticket,
            username,
            password,
            remember,
            query: self.state.query.clone(),
        })
    }

    /// Store the outcome of a submission. Returns false if the response
    /// belongs to a submission that is no longer current.
    pub fn finish_logon(&mut self, ticket: u64, response: LogonResponse) -> bool {
        let current = self.state.pending == Some(ticket);
        self.dispatch(Action::ReceiveLogon { ticket, response });
        current
    }

    pub fn dismiss_error(&mut self, field: Field) {
        self.dispatch(Action::DismissError(field));
    }

    pub fn http_error(&self) -> Option<&ErrorKind> {
        self.state.errors.http()
    }
}

// Action names only; values may hold passwords.
struct ActionName<'a>(&'a Action);

impl std::fmt::Debug for ActionName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self.0 {
            Action::UpdateInput { .. } => "UpdateInput",
            Action::ReceiveValidateLogon(_) => "ReceiveValidateLogon",
            Action::RequestLogon { .. } => "RequestLogon",
            Action::ReceiveLogon { .. } => "ReceiveLogon",
            Action::ReceiveHello(_) => "ReceiveHello",
            Action::ReceiveHelloFailed(_) => "ReceiveHelloFailed",
            Action::DismissError(_) => "DismissError",
            Action::AdvanceLogon => "AdvanceLogon",
            Action::ResetLogon => "ResetLogon",
        };
        f.write_str(name)
    }
}
