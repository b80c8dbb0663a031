use crate::components::ErrorMessage;
use crate::i18n::lower_first;
use crate::{follow_target, FlowSettings};
use dioxus::prelude::*;
use dioxus_i18n::t;
use logon_flow::{actions, Field, History, IdentifierClient, InputField, LogonResponse, LogonStore};

/// Sign-in form.
///
/// Reads everything from `store` and changes it only through store actions.
/// The entry step (proceed / account chooser) is decided by the app shell
/// before this screen is shown.
#[component]
pub fn LoginScreen(
    mut store: Signal<LogonStore>,
    mut history: Signal<History>,
    external: Signal<Option<String>>,
    settings: FlowSettings,
) -> Element {
    let state = store.read().state().clone();

    let username_placeholder = state
        .hello
        .as_ref()
        .and_then(|h| h.username_hint_text())
        .map(str::to_string)
        .unwrap_or_else(|| t!("login-username-placeholder"));
    let username_what = lower_first(&username_placeholder);
    let username = state.credentials.username.clone();
    let password = state.credentials.password.clone();
    let signin_page_text = state
        .hello
        .as_ref()
        .and_then(|h| h.signin_page_text())
        .map(str::to_string);

    let mut handle_next = move |evt: FormEvent| {
        evt.prevent_default();

        let request = match store.write().prepare_logon(settings.remember_me) {
            Ok(request) => request,
            Err(rejected) => {
                log::debug!("Logon not sent: {:?}", rejected);
                return;
            }
        };

        let settings = settings.clone();
        spawn(async move {
            let response = match IdentifierClient::new(&settings.server_url) {
                Ok(client) => actions::submit_logon(&client, &request).await,
                Err(e) => {
                    log::error!("Cannot create identifier client: {}", e);
                    LogonResponse::failed(logon_flow::FormErrors::http_error(e.into()))
                }
            };

            let success = response.success;
            if !store.write().finish_logon(request.ticket, response) {
                return;
            }
            if success {
                let target = actions::advance_logon(
                    &mut store.write(),
                    success,
                    &mut history.write(),
                    settings.advance_options(),
                );
                follow_target(target, external);
            }
        });
    };

    rsx! {
        div { class: "dialog-content",
            h3 { class: "headline", {t!("login-headline")} }

            form {
                onsubmit: move |evt| handle_next(evt),

                div { class: "field",
                    input {
                        r#type: "text",
                        class: if state.errors.has(Field::Username) { "input input-error" } else { "input" },
                        placeholder: "{username_placeholder}",
                        value: "{username}",
                        autofocus: true,
                        "autocapitalize": "off",
                        "spellcheck": "false",
                        autocomplete: "username",
                        oninput: move |e| store.write().update_input(InputField::Username, e.value()),
                    }
                    ErrorMessage {
                        error: state.errors.username().cloned(),
                        what: username_what,
                    }
                }

                div { class: "field",
                    input {
                        r#type: "password",
                        class: if state.errors.has(Field::Password) { "input input-error" } else { "input" },
                        placeholder: t!("login-password-label"),
                        value: "{password}",
                        autocomplete: "current-password",
                        oninput: move |e| store.write().update_input(InputField::Password, e.value()),
                    }
                    ErrorMessage { error: state.errors.password().cloned() }
                }

                div { class: "dialog-actions",
                    div { class: "button-wrapper",
                        button {
                            r#type: "submit",
                            class: "btn-primary",
                            disabled: state.loading,
                            {t!("login-next-button")}
                        }
                        if state.loading {
                            div { class: "button-progress" }
                        }
                    }
                }

                if let Some(http) = state.errors.http().cloned() {
                    div { class: "message error",
                        ErrorMessage { error: Some(http) }
                        button {
                            r#type: "button",
                            class: "btn-dismiss",
                            title: t!("login-dismiss"),
                            onclick: move |_| store.write().dismiss_error(Field::Http),
                            "×"
                        }
                    }
                }

                if let Some(text) = signin_page_text {
                    p { class: "signin-page-text", "{text}" }
                }
            }
        }
    }
}
