//! Browser integration.
//!
//! In the browser (wasm) the app starts from the real `window.location`,
//! mirrors its in-memory history into `window.history` and leaves the app
//! through `location.replace`. Native builds have no browser, so the start
//! path comes from the configuration and history changes stay in memory.

use logon_flow::NavigationAction;
use std::time::Duration;

/// Path, search and hash the app was opened with
pub fn initial_location(fallback: &str) -> String {
    imp::current_location().unwrap_or_else(|| fallback.to_string())
}

/// Mirror a history change into the browser's address bar
pub fn sync_location(path: &str, action: NavigationAction) {
    match action {
        NavigationAction::Push => imp::push_location(path),
        NavigationAction::Replace | NavigationAction::Pop => imp::replace_location(path),
    }
}

/// Leave the application for `url`. Returns false when nothing navigated.
pub fn redirect(url: &str) -> bool {
    imp::redirect(url)
}

pub async fn sleep(duration: Duration) {
    imp::sleep(duration).await
}

#[cfg(target_arch = "wasm32")]
mod imp {
    use std::time::Duration;
    use wasm_bindgen::JsValue;

    pub fn current_location() -> Option<String> {
        let location = web_sys::window()?.location();
        let pathname = location.pathname().ok()?;
        let search = location.search().unwrap_or_default();
        let hash = location.hash().unwrap_or_default();
        Some(format!("{}{}{}", pathname, search, hash))
    }

    fn browser_history() -> Result<web_sys::History, JsValue> {
        web_sys::window()
            .ok_or_else(|| JsValue::from_str("no window"))?
            .history()
    }

    pub fn push_location(path: &str) {
        if let Err(e) =
            browser_history().and_then(|h| h.push_state_with_url(&JsValue::NULL, "", Some(path)))
        {
            log::warn!("Cannot push browser location {}: {:?}", path, e);
        }
    }

    pub fn replace_location(path: &str) {
        if let Err(e) =
            browser_history().and_then(|h| h.replace_state_with_url(&JsValue::NULL, "", Some(path)))
        {
            log::warn!("Cannot replace browser location with {}: {:?}", path, e);
        }
    }

    pub fn redirect(url: &str) -> bool {
        let Some(window) = web_sys::window() else {
            return false;
        };
        match window.location().replace(url) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Redirect to {} failed: {:?}", url, e);
                false
            }
        }
    }

    pub async fn sleep(duration: Duration) {
        gloo_timers::future::sleep(duration).await
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use std::time::Duration;

    pub fn current_location() -> Option<String> {
        None
    }

    pub fn push_location(path: &str) {
        log::debug!("location {}", path);
    }

    pub fn replace_location(path: &str) {
        log::debug!("location {}", path);
    }

    pub fn redirect(url: &str) -> bool {
        log::info!("External redirect to {} left to the user", url);
        false
    }

    pub async fn sleep(duration: Duration) {
        tokio::time::sleep(duration).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_start_path_is_the_fallback() {
        assert_eq!(
            initial_location("/identifier?prompt=select_account#x"),
            "/identifier?prompt=select_account#x"
        );
    }

    #[test]
    fn test_native_redirect_does_not_navigate() {
        assert!(!redirect("https://id.example.com/authorize"));
    }
}
