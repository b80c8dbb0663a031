use crate::platform;
use dioxus::prelude::*;
use dioxus_i18n::t;

#[component]
pub fn LoadingScreen() -> Element {
    rsx! {
        div { class: "dialog-content centered",
            div { class: "spinner" }
            p { {t!("app-loading")} }
        }
    }
}

/// Hand-off to the consent screen (`target == None`) or to an external URL.
///
/// External targets are opened with `location.replace`; the link stays as a
/// fallback for hosts without a browser location.
#[component]
pub fn RedirectScreen(target: Option<String>) -> Element {
    let redirect_to = target.clone();
    use_effect(move || {
        if let Some(url) = &redirect_to {
            platform::redirect(url);
        }
    });

    rsx! {
        div { class: "dialog-content centered",
            div { class: "spinner" }
            match target {
                Some(url) => rsx! {
                    p { {t!("redirect-external")} }
                    a { class: "btn-primary", href: "{url}", {t!("redirect-link")} }
                },
                None => rsx! {
                    p { {t!("redirect-consent")} }
                },
            }
        }
    }
}
