use dioxus::prelude::*;
use dioxus_i18n::t;
use logon_flow::LogonStore;

#[component]
pub fn WelcomeScreen(store: Signal<LogonStore>) -> Element {
    let name = store
        .read()
        .state()
        .hello
        .as_ref()
        .and_then(|h| h.account_label())
        .map(str::to_string);
    let message = match name {
        Some(name) => t!("welcome-message-user", name: name),
        None => t!("welcome-message"),
    };

    rsx! {
        div { class: "dialog-content",
            h3 { class: "headline", {t!("welcome-headline")} }
            p { "{message}" }
        }
    }
}
