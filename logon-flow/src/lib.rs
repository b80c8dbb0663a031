//! # Logon Flow
//!
//! Framework independent core of the identifier sign-in screen.
//!
//! This crate provides:
//! - Form state store with a pure reducer
//! - Local validation of username and password
//! - Submission to the identity provider with stale response protection
//! - The flow advancer deciding between form, account chooser, consent,
//!   `continue` redirect and welcome screen
//! - A small navigation history model
//!
//! ## Separation of Concerns
//!
//! This crate does **not**:
//! - Render anything (handled by the application)
//! - Authenticate users or issue tokens (handled by the identity provider)
//! - Persist sessions
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use logon_flow::{actions, History, IdentifierClient, LogonState, LogonStore, Query};
//!
//! let history = History::new("/identifier?flow=oidc");
//! let query = Query::parse(&history.location().search);
//! let client = IdentifierClient::new("https://id.example.com")?;
//! let hello = client.hello(&query).await?;
//!
//! let mut store = LogonStore::new(LogonState::new(query, Some(hello)));
//! let response = actions::execute_logon_if_form_valid(&mut store, &client, false).await;
//! ```

pub mod actions;
pub mod flow;
pub mod history;
pub mod models;
pub mod query;
pub mod service;
pub mod store;
pub mod validate;

pub use flow::{advance, AdvanceOptions, AdvanceTarget, FlowDecision, InitialStep};
pub use history::{History, Location, NavigationAction};
pub use models::{Branding, Credentials, ErrorKind, Field, FormErrors, HelloInfo, LogonResponse};
pub use query::Query;
pub use service::{AuthError, HelloRequest, IdentifierClient, LogonBackend};
pub use store::{Action, InputField, LogonRequest, LogonState, LogonStore, Rejected};
pub use validate::validate_username_password;
