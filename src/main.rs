use dioxus::prelude::*;
use dioxus_i18n::prelude::*;
use logon_flow::flow::{CHOOSE_ACCOUNT_PATH, CONSENT_PATH, WELCOME_PATH};
use logon_flow::{
    actions, Action, AdvanceOptions, AdvanceTarget, ErrorKind, FlowDecision, History,
    IdentifierClient, InitialStep, Location, LogonState, LogonStore, Query,
};
use std::time::Duration;

mod components;
mod config;
mod error;
mod i18n;
mod platform;

use components::{ChooseAccountScreen, LoadingScreen, LoginScreen, RedirectScreen, WelcomeScreen};
use config::AppConfig;
use error::AppError;

const MAIN_CSS: Asset = asset!("/assets/main.css");

const HELLO_ATTEMPTS: u32 = 3;

fn main() {
    init_logging();

    let config = AppConfig::load().unwrap_or_else(|e| {
        log::error!("{} ({})", e.user_message(), e);
        AppConfig::default()
    });
    log::info!(
        "Starting identifier for {} at {}",
        config.server_url,
        config.start_path
    );

    dioxus::LaunchBuilder::new().with_context(config).launch(App);
}

#[cfg(target_os = "android")]
fn init_logging() {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Info)
            .with_tag("identifier"),
    );
}

#[cfg(target_arch = "wasm32")]
fn init_logging() {
    let _ = console_log::init_with_level(log::Level::Info);
}

#[cfg(not(any(target_os = "android", target_arch = "wasm32")))]
fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Screens of the sign-in flow, derived from the history location
#[derive(Clone, PartialEq, Debug)]
pub enum Screen {
    Login,
    ChooseAccount,
    Consent,
    Welcome,
    External(String),
}

impl Screen {
    pub fn from_location(location: &Location) -> Self {
        match location.pathname.trim_end_matches('/') {
            CHOOSE_ACCOUNT_PATH => Screen::ChooseAccount,
            CONSENT_PATH => Screen::Consent,
            WELCOME_PATH => Screen::Welcome,
            _ => Screen::Login,
        }
    }
}

/// Settings the screens need to talk to the identity provider
#[derive(Clone, PartialEq, Debug)]
pub struct FlowSettings {
    pub server_url: String,
    pub origin: String,
    pub remember_me: bool,
}

impl FlowSettings {
    pub fn advance_options(&self) -> AdvanceOptions<'_> {
        AdvanceOptions {
            origin: Some(&self.origin),
            ..AdvanceOptions::default()
        }
    }
}

/// Apply a flow target to the app. Navigation already happened in `history`.
pub fn follow_target(target: AdvanceTarget, mut external: Signal<Option<String>>) {
    if let AdvanceTarget::External(url) = target {
        external.set(Some(url));
    }
}

/// History for the location the app was opened with. `fallback` is used
/// when there is no browser location (native builds).
pub fn initial_history(fallback: &str) -> History {
    let start = platform::initial_location(fallback);
    log::debug!("start location {}", start);
    History::new(&start)
}

#[component]
fn App() -> Element {
    let config = use_context::<AppConfig>();
    let mut translations = use_init_i18n({
        let language = config.default_language.clone();
        move || i18n::init_i18n(&language)
    });

    let settings = FlowSettings {
        server_url: config.server_url.clone(),
        origin: config.effective_origin(),
        remember_me: config.remember_me,
    };

    let mut history = use_signal(|| initial_history(&config.start_path));
    let mut store = use_signal(|| {
        let query = Query::parse(&history.peek().location().search);
        LogonStore::new(LogonState::new(query, None))
    });
    let mut initial_step = use_signal(InitialStep::new);
    let mut hello_ready = use_signal(|| false);
    let external = use_signal(|| None::<String>);

    // Keep the address bar in step with the in-memory history.
    let mut synced = use_signal(|| history.peek().location().to_string());
    use_effect(move || {
        let history = history.read();
        let current = history.location().to_string();
        if *synced.peek() != current {
            platform::sync_location(&current, history.action());
            synced.set(current);
        }
    });

    // Hello handshake once on startup, then decide the entry step.
    use_hook({
        let settings = settings.clone();
        let language = config.default_language.clone();
        move || {
            spawn(async move {
                let query = store.peek().state().query.clone();
                match fetch_hello(&settings.server_url, &query).await {
                    Ok(hello) => {
                        if let Some(lang) =
                            i18n::branding_language(&language, hello.branding_locales())
                        {
                            log::info!("Switching to branded language {}", lang);
                            translations.set_language(lang);
                        }
                        store.write().dispatch(Action::ReceiveHello(hello));
                    }
                    Err(e) => {
                        log::error!("Hello failed: {}", e);
                        let kind = match e {
                            AppError::Auth(auth) => ErrorKind::from(auth),
                            other => ErrorKind::Network(other.to_string()),
                        };
                        store.write().dispatch(Action::ReceiveHelloFailed(kind));
                    }
                }

                let decision = {
                    let store_ref = store.peek();
                    let state = store_ref.state();
                    initial_step
                        .write()
                        .run_once(state.hello.as_ref(), &history.peek(), &state.query)
                };
                match decision {
                    Some(FlowDecision::Proceed) => {
                        let target = actions::advance_logon(
                            &mut store.write(),
                            true,
                            &mut history.write(),
                            settings.advance_options(),
                        );
                        follow_target(target, external);
                    }
                    Some(FlowDecision::RedirectToChooser(path)) => history.write().replace(&path),
                    Some(FlowDecision::ShowForm) | None => {}
                }
                hello_ready.set(true);
            });
        }
    });

    let screen = match external() {
        Some(url) => Screen::External(url),
        None => Screen::from_location(history.read().location()),
    };

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        div { class: "identifier-page",
            div { class: "identifier-dialog",
                if !hello_ready() {
                    LoadingScreen {}
                } else {
                    match screen {
                        Screen::Login => rsx! {
                            LoginScreen { store, history, external, settings: settings.clone() }
                        },
                        Screen::ChooseAccount => rsx! {
                            ChooseAccountScreen { store, history, external, settings: settings.clone() }
                        },
                        Screen::Consent => rsx! {
                            RedirectScreen { target: None::<String> }
                        },
                        Screen::Welcome => rsx! {
                            WelcomeScreen { store }
                        },
                        Screen::External(url) => rsx! {
                            RedirectScreen { target: Some(url) }
                        },
                    }
                }
            }
        }
    }
}

/// Hello with a short retry on transport errors
async fn fetch_hello(server_url: &str, query: &Query) -> Result<logon_flow::HelloInfo, AppError> {
    let client = IdentifierClient::new(server_url)?;

    let mut attempt = 0;
    loop {
        attempt += 1;
        match client.hello(query).await {
            Ok(hello) => {
                log::info!("Hello received (session: {})", hello.state);
                return Ok(hello);
            }
            Err(logon_flow::AuthError::NetworkError(msg)) if attempt < HELLO_ATTEMPTS => {
                log::warn!("Hello attempt {} failed: {}", attempt, msg);
                platform::sleep(Duration::from_millis(500 * 2u64.pow(attempt - 1))).await;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logon_flow::flow::IDENTIFIER_PATH;

    #[test]
    fn test_screen_from_location() {
        assert_eq!(
            Screen::from_location(&Location::parse("/chooseaccount?prompt=select_account")),
            Screen::ChooseAccount
        );
        assert_eq!(Screen::from_location(&Location::parse("/consent")), Screen::Consent);
        assert_eq!(Screen::from_location(&Location::parse("/welcome/")), Screen::Welcome);
        assert_eq!(Screen::from_location(&Location::parse(IDENTIFIER_PATH)), Screen::Login);
        assert_eq!(Screen::from_location(&Location::parse("/")), Screen::Login);
    }

    #[test]
    fn test_start_location_feeds_entry_decision() {
        let history = initial_history("/identifier?prompt=select_account&flow=oidc#x");
        let query = Query::parse(&history.location().search);
        let hello = logon_flow::HelloInfo {
            state: true,
            ..Default::default()
        };

        assert!(query.wants_account_selection());
        assert_eq!(query.flow(), Some("oidc"));
        assert_eq!(
            InitialStep::new().run_once(Some(&hello), &history, &query),
            Some(FlowDecision::RedirectToChooser(
                "/chooseaccount?prompt=select_account&flow=oidc#x".to_string()
            ))
        );
    }

    #[test]
    fn test_advance_options_carry_origin() {
        let settings = FlowSettings {
            server_url: "https://id.example.com".to_string(),
            origin: "https://id.example.com".to_string(),
            remember_me: false,
        };
        let options = settings.advance_options();
        assert_eq!(options.origin, Some("https://id.example.com"));
        assert!(!options.done);
    }
}
