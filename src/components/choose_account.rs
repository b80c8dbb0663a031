use crate::{follow_target, FlowSettings};
use dioxus::prelude::*;
use dioxus_i18n::t;
use logon_flow::flow::IDENTIFIER_PATH;
use logon_flow::{actions, Action, History, LogonStore};

/// Account chooser shown for `prompt=select_account` when a session exists
#[component]
pub fn ChooseAccountScreen(
    mut store: Signal<LogonStore>,
    mut history: Signal<History>,
    external: Signal<Option<String>>,
    settings: FlowSettings,
) -> Element {
    let account = store
        .read()
        .state()
        .hello
        .as_ref()
        .and_then(|h| h.account_label())
        .map(str::to_string);

    let continue_as = move |_| {
        let target = actions::advance_logon(
            &mut store.write(),
            true,
            &mut history.write(),
            settings.advance_options(),
        );
        follow_target(target, external);
    };

    let use_other = move |_| {
        store.write().dispatch(Action::ResetLogon);
        let path = history.read().location().with_pathname(IDENTIFIER_PATH);
        history.write().push(&path);
    };

    rsx! {
        div { class: "dialog-content",
            h3 { class: "headline", {t!("chooseaccount-headline")} }

            div { class: "account-list",
                if let Some(name) = account {
                    button {
                        class: "account-entry",
                        onclick: continue_as,
                        {t!("chooseaccount-continue-as", name: name)}
                    }
                }
                button {
                    class: "account-entry secondary",
                    onclick: use_other,
                    {t!("chooseaccount-use-other")}
                }
            }
        }
    }
}
