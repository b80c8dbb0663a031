//! Logon flow advancer.
//!
//! Two decisions are made here: which step to show when the sign-in screen
//! is entered ([`advance`], run once through [`InitialStep`]) and where to go
//! after the identity provider accepted the credentials
//! ([`advance_logon_flow`]).

use crate::history::{History, NavigationAction};
use crate::models::HelloInfo;
use crate::query::Query;
use url::Url;

pub const CHOOSE_ACCOUNT_PATH: &str = "/chooseaccount";
pub const CONSENT_PATH: &str = "/consent";
pub const WELCOME_PATH: &str = "/welcome";
pub const IDENTIFIER_PATH: &str = "/identifier";

pub const FLOW_OIDC: &str = "oidc";
pub const FLOW_OAUTH: &str = "oauth";

/// What the sign-in screen does on entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowDecision {
    /// Prior session exists; skip the form and advance
    Proceed,
    /// Show the account chooser at this path (search and hash preserved)
    RedirectToChooser(String),
    ShowForm,
}

/// Decide the entry step.
///
/// A prior session only short-circuits the form when the page was not
/// reached by forward navigation, so that "use another account" from the
/// chooser lands on a usable form.
pub fn advance(hello: Option<&HelloInfo>, history: &History, query: &Query) -> FlowDecision {
    let has_session = hello.map(|h| h.state).unwrap_or(false);
    if !has_session || history.action() == NavigationAction::Push {
        return FlowDecision::ShowForm;
    }

    if query.wants_account_selection() {
        FlowDecision::RedirectToChooser(history.location().with_pathname(CHOOSE_ACCOUNT_PATH))
    } else {
        FlowDecision::Proceed
    }
}

/// One-shot guard around [`advance`], owned by the host shell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitialStep {
    done: bool,
}

impl InitialStep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_run(&self) -> bool {
        self.done
    }

    /// Evaluate the entry step the first time only; later calls yield `None`
    pub fn run_once(
        &mut self,
        hello: Option<&HelloInfo>,
        history: &History,
        query: &Query,
    ) -> Option<FlowDecision> {
        if self.done {
            return None;
        }
        self.done = true;

        let decision = advance(hello, history, query);
        log::debug!(
            "initial logon step: {:?} (navigation {})",
            decision,
            history.action()
        );
        Some(decision)
    }
}

/// Where to go after a logon attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceTarget {
    /// Logon did not succeed; stay on the form
    Stay,
    /// Replace the current history entry with this path
    Navigate(String),
    /// Leave the application for this absolute URL
    External(String),
}

/// Options for [`advance_logon_flow`]
#[derive(Debug, Clone, Default)]
pub struct AdvanceOptions<'a> {
    /// Consent was already handled; do not route to the consent screen
    pub done: bool,
    /// Origin (scheme, host and port) `continue` URLs must share to be followed
    pub origin: Option<&'a str>,
    /// Extra parameters forwarded to the `continue` URL
    pub extra: Option<&'a Query>,
}

/// Decide the step after a logon and apply it to `history`.
pub fn advance_logon_flow(
    success: bool,
    query: &Query,
    history: &mut History,
    options: AdvanceOptions<'_>,
) -> AdvanceTarget {
    if !success {
        return AdvanceTarget::Stay;
    }

    let target = next_step(query, history, &options);
    if let AdvanceTarget::Navigate(path) = &target {
        history.replace(path);
    }
    log::info!("advancing logon flow: {:?}", target);
    target
}

fn next_step(query: &Query, history: &History, options: &AdvanceOptions<'_>) -> AdvanceTarget {
    let flow = query.flow();
    if matches!(flow, Some(FLOW_OIDC) | Some(FLOW_OAUTH)) && !options.done {
        return AdvanceTarget::Navigate(history.location().with_pathname(CONSENT_PATH));
    }

    if let (Some(continue_uri), Some(origin)) = (query.continue_uri(), options.origin) {
        if same_origin(continue_uri, origin) {
            let mut forwarded = query.clone();
            forwarded.remove("flow");
            forwarded.remove("prompt");
            forwarded.remove("continue");
            if let Some(extra) = options.extra {
                for (key, value) in extra.pairs() {
                    forwarded.set(key, value);
                }
            }
            return AdvanceTarget::External(join_query(continue_uri, &forwarded));
        } else {
            log::warn!("ignoring continue URL outside of origin: {}", continue_uri);
        }
    }

    AdvanceTarget::Navigate(WELCOME_PATH.to_string())
}

/// Compare scheme, host and port. Anything that does not parse is foreign.
fn same_origin(candidate: &str, origin: &str) -> bool {
    match (Url::parse(candidate), Url::parse(origin)) {
        (Ok(candidate), Ok(origin)) => {
            candidate.origin().is_tuple() && candidate.origin() == origin.origin()
        }
        _ => false,
    }
}

fn join_query(base: &str, query: &Query) -> String {
    if query.is_empty() {
        return base.to_string();
    }
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{}{}{}", base, sep, query.to_query_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hello_with_session() -> HelloInfo {
        HelloInfo {
            state: true,
            username: Some("jdoe".to_string()),
            ..HelloInfo::default()
        }
    }

    #[test]
    fn test_proceed_with_session_exactly_once() {
        let history = History::new("/identifier?flow=oidc");
        let query = Query::parse(&history.location().search);
        let hello = hello_with_session();
        let mut step = InitialStep::new();

        assert_eq!(
            step.run_once(Some(&hello), &history, &query),
            Some(FlowDecision::Proceed)
        );
        assert_eq!(step.run_once(Some(&hello), &history, &query), None);
        assert!(step.has_run());
    }

    #[test]
    fn test_select_account_redirects_to_chooser() {
        let history = History::new("/identifier?prompt=select_account&flow=oidc#state");
        let query = Query::parse(&history.location().search);

        let decision = advance(Some(&hello_with_session()), &history, &query);

        assert_eq!(
            decision,
            FlowDecision::RedirectToChooser(
                "/chooseaccount?prompt=select_account&flow=oidc#state".to_string()
            )
        );
    }

    #[test]
    fn test_push_navigation_shows_form() {
        let mut history = History::new("/chooseaccount");
        history.push("/identifier");
        let query = Query::default();

        assert_eq!(
            advance(Some(&hello_with_session()), &history, &query),
            FlowDecision::ShowForm
        );
    }

    #[test]
    fn test_without_session_shows_form() {
        let history = History::new("/identifier?prompt=select_account");
        let query = Query::parse(&history.location().search);

        assert_eq!(advance(None, &history, &query), FlowDecision::ShowForm);
        let hello = HelloInfo::default();
        assert_eq!(advance(Some(&hello), &history, &query), FlowDecision::ShowForm);
    }

    #[test]
    fn test_failed_logon_stays() {
        let mut history = History::new("/identifier");
        let target =
            advance_logon_flow(false, &Query::default(), &mut history, AdvanceOptions::default());
        assert_eq!(target, AdvanceTarget::Stay);
        assert_eq!(history.location().pathname, "/identifier");
    }

    #[test]
    fn test_oidc_flow_goes_to_consent() {
        let mut history = History::new("/identifier?flow=oidc&client_id=app#x");
        let query = Query::parse(&history.location().search);

        let target = advance_logon_flow(true, &query, &mut history, AdvanceOptions::default());

        assert_eq!(
            target,
            AdvanceTarget::Navigate("/consent?flow=oidc&client_id=app#x".to_string())
        );
        assert_eq!(history.location().pathname, "/consent");
        assert_eq!(history.action(), NavigationAction::Replace);
    }

    #[test]
    fn test_continue_url_within_origin() {
        let mut history =
            History::new("/identifier?continue=https%3A%2F%2Fid.example.com%2Fauthorize&prompt=login&scope=openid");
        let query = Query::parse(&history.location().search);
        let options = AdvanceOptions {
            origin: Some("https://id.example.com"),
            ..AdvanceOptions::default()
        };

        let target = advance_logon_flow(true, &query, &mut history, options);

        assert_eq!(
            target,
            AdvanceTarget::External("https://id.example.com/authorize?scope=openid".to_string())
        );
    }

    #[test]
    fn test_continue_url_outside_origin_goes_to_welcome() {
        let mut history = History::new("/identifier?continue=https%3A%2F%2Fevil.example.org%2F");
        let query = Query::parse(&history.location().search);
        let options = AdvanceOptions {
            origin: Some("https://id.example.com"),
            ..AdvanceOptions::default()
        };

        let target = advance_logon_flow(true, &query, &mut history, options);

        assert_eq!(target, AdvanceTarget::Navigate(WELCOME_PATH.to_string()));
        assert_eq!(history.location().pathname, WELCOME_PATH);
    }

    #[test]
    fn test_done_oidc_flow_skips_consent() {
        let mut history = History::new("/identifier?flow=oidc");
        let query = Query::parse(&history.location().search);
        let options = AdvanceOptions {
            done: true,
            ..AdvanceOptions::default()
        };

        let target = advance_logon_flow(true, &query, &mut history, options);
        assert_eq!(target, AdvanceTarget::Navigate(WELCOME_PATH.to_string()));
    }

    fn continue_options(origin: &str) -> AdvanceOptions<'_> {
        AdvanceOptions {
            origin: Some(origin),
            ..AdvanceOptions::default()
        }
    }

    #[test]
    fn test_lookalike_continue_host_goes_to_welcome() {
        for target in [
            "https%3A%2F%2Fid.example.com.evil.org%2Fsteal",
            "https%3A%2F%2Fid.example.com%3A8443%40evil.org%2F",
            "https%3A%2F%2Fid.example.com%3A8443%2Fauthorize",
            "http%3A%2F%2Fid.example.com%2Fauthorize",
            "%2Fauthorize",
        ] {
            let mut history = History::new(&format!("/identifier?continue={}", target));
            let query = Query::parse(&history.location().search);

            let result = advance_logon_flow(
                true,
                &query,
                &mut history,
                continue_options("https://id.example.com"),
            );

            assert_eq!(
                result,
                AdvanceTarget::Navigate(WELCOME_PATH.to_string()),
                "{}",
                target
            );
        }
    }

    #[test]
    fn test_same_origin() {
        assert!(same_origin("https://id.example.com/a?b=c", "https://id.example.com"));
        assert!(same_origin("https://id.example.com:443/", "https://id.example.com/"));
        assert!(!same_origin("https://id.example.com.evil.org/", "https://id.example.com"));
        assert!(!same_origin("https://id.example.com@evil.org/", "https://id.example.com"));
        assert!(!same_origin("not a url", "https://id.example.com"));
        assert!(!same_origin("https://id.example.com/", ""));
    }

    #[test]
    fn test_extra_params_are_forwarded() {
        let mut history = History::new(
            "/identifier?continue=https%3A%2F%2Fid.example.com%2Fauthorize&scope=openid&prompt=login",
        );
        let query = Query::parse(&history.location().search);
        let extra = Query::parse("konnect=1&scope=openid+profile");
        let options = AdvanceOptions {
            origin: Some("https://id.example.com"),
            extra: Some(&extra),
            ..AdvanceOptions::default()
        };

        let target = advance_logon_flow(true, &query, &mut history, options);

        assert_eq!(
            target,
            AdvanceTarget::External(
                "https://id.example.com/authorize?konnect=1&scope=openid+profile".to_string()
            )
        );
    }

    #[test]
    fn test_continue_with_own_query_joins_with_ampersand() {
        let mut history = History::new(
            "/identifier?continue=https%3A%2F%2Fid.example.com%2Fauthorize%3Fclient_id%3Dapp&state=xyz",
        );
        let query = Query::parse(&history.location().search);

        let target = advance_logon_flow(
            true,
            &query,
            &mut history,
            continue_options("https://id.example.com"),
        );

        assert_eq!(
            target,
            AdvanceTarget::External(
                "https://id.example.com/authorize?client_id=app&state=xyz".to_string()
            )
        );
    }
}
