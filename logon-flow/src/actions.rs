//! Async entry points combining the store with a [`LogonBackend`].

use crate::flow::{advance_logon_flow, AdvanceOptions, AdvanceTarget};
use crate::history::History;
use crate::models::{ErrorKind, FormErrors, LogonResponse};
use crate::service::LogonBackend;
use crate::store::{Action, LogonRequest, LogonStore, Rejected};

/// Send one prepared request. Transport failures become an `http` error.
pub async fn submit_logon<B: LogonBackend>(backend: &B, request: &LogonRequest) -> LogonResponse {
    match backend.logon(request).await {
        Ok(response) => {
            if response.success {
                log::info!("Logon accepted for {}", request.username);
            } else {
                log::info!("Logon refused for {}", request.username);
            }
            response
        }
        Err(e) => {
            log::warn!("Logon request failed: {}", e);
            LogonResponse::failed(FormErrors::http_error(ErrorKind::from(e)))
        }
    }
}

/// Validate the form in `store` and, if it is valid, submit it.
///
/// Invalid forms and duplicate submissions never reach the backend. The
/// store ends up with `loading == false` and the errors of the attempt.
pub async fn execute_logon_if_form_valid<B: LogonBackend>(
    store: &mut LogonStore,
    backend: &B,
    remember: bool,
) -> LogonResponse {
    let request = match store.prepare_logon(remember) {
        Ok(request) => request,
        Err(Rejected::Invalid(errors)) => return LogonResponse::failed(errors),
        Err(Rejected::Busy) => {
            log::debug!("Logon already in progress");
            return LogonResponse::default();
        }
    };

    let response = submit_logon(backend, &request).await;
    store.finish_logon(request.ticket, response.clone());
    response
}

/// Move on after a logon attempt: clear the credentials and navigate.
pub fn advance_logon(
    store: &mut LogonStore,
    success: bool,
    history: &mut History,
    options: AdvanceOptions<'_>,
) -> AdvanceTarget {
    let target = advance_logon_flow(success, &store.state().query, history, options);
    if target != AdvanceTarget::Stay {
        store.dispatch(Action::AdvanceLogon);
    }
    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HelloInfo;
    use crate::query::Query;
    use crate::service::AuthError;
    use crate::store::{InputField, LogonState};
    use std::cell::Cell;

    struct FakeBackend {
        calls: Cell<usize>,
        reply: fn() -> Result<LogonResponse, AuthError>,
    }

    impl FakeBackend {
        fn new(reply: fn() -> Result<LogonResponse, AuthError>) -> Self {
            Self {
                calls: Cell::new(0),
                reply,
            }
        }
    }

    impl LogonBackend for FakeBackend {
        async fn logon(&self, _request: &LogonRequest) -> Result<LogonResponse, AuthError> {
            self.calls.set(self.calls.get() + 1);
            (self.reply)()
        }
    }

    fn store_with(username: &str, password: &str, search: &str) -> LogonStore {
        let mut store = LogonStore::new(LogonState::new(Query::parse(search), None));
        store.update_input(InputField::Username, username.to_string());
        store.update_input(InputField::Password, password.to_string());
        store
    }

    #[tokio::test]
    async fn test_empty_password_never_reaches_backend() {
        let backend = FakeBackend::new(|| Ok(LogonResponse::succeeded(None)));
        let mut store = store_with("jdoe", "", "");
        let mut history = History::new("/identifier");

        let response = execute_logon_if_form_valid(&mut store, &backend, false).await;

        assert!(!response.success);
        assert_eq!(backend.calls.get(), 0);
        assert_eq!(
            store.state().errors.password(),
            Some(&ErrorKind::MissingPassword)
        );
        let target = advance_logon(&mut store, response.success, &mut history, AdvanceOptions::default());
        assert_eq!(target, AdvanceTarget::Stay);
        assert_eq!(history.location().pathname, "/identifier");
    }

    #[tokio::test]
    async fn test_transport_failure_sets_http_error() {
        let backend =
            FakeBackend::new(|| Err(AuthError::NetworkError("connection refused".to_string())));
        let mut store = store_with("jdoe", "secret", "");

        let response = execute_logon_if_form_valid(&mut store, &backend, false).await;

        assert!(!response.success);
        assert_eq!(backend.calls.get(), 1);
        assert!(matches!(store.http_error(), Some(ErrorKind::Network(_))));
        assert!(!store.state().loading);
        // Credentials stay so the user can retry.
        assert_eq!(store.state().password(), "secret");
    }

    #[tokio::test]
    async fn test_refused_credentials() {
        let backend = FakeBackend::new(|| {
            Ok(LogonResponse::failed(FormErrors::http_error(
                ErrorKind::LogonFailed,
            )))
        });
        let mut store = store_with("jdoe", "wrong", "");

        execute_logon_if_form_valid(&mut store, &backend, false).await;

        assert_eq!(store.http_error(), Some(&ErrorKind::LogonFailed));
        assert!(!store.state().loading);

        store.update_input(InputField::Password, "right".to_string());
        assert_eq!(store.http_error(), Some(&ErrorKind::LogonFailed));
        store.dismiss_error(crate::models::Field::Http);
        assert_eq!(store.http_error(), None);
    }

    #[tokio::test]
    async fn test_success_advances_to_consent_and_clears_credentials() {
        let backend = FakeBackend::new(|| {
            Ok(LogonResponse::succeeded(Some(HelloInfo {
                state: true,
                ..HelloInfo::default()
            })))
        });
        let mut store = store_with("jdoe", "secret", "?flow=oidc&client_id=app");
        let mut history = History::new("/identifier?flow=oidc&client_id=app");

        let response = execute_logon_if_form_valid(&mut store, &backend, false).await;
        assert!(response.success);

        let target = advance_logon(&mut store, response.success, &mut history, AdvanceOptions::default());

        assert_eq!(
            target,
            AdvanceTarget::Navigate("/consent?flow=oidc&client_id=app".to_string())
        );
        assert_eq!(store.state().username(), "");
        assert_eq!(store.state().password(), "");
        assert!(store.state().hello.as_ref().map(|h| h.state).unwrap_or(false));
    }
}
