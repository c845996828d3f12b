//! Functions callable from page scripts.

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use super::{BrowserHost, with_site};
use crate::navigator::{NavKind, NavigationHost};
use crate::theme::Theme;

/// Flip the theme; returns the new value, or `undefined` before boot.
#[wasm_bindgen(js_name = toggleTheme)]
pub fn toggle_theme() -> Option<String> {
    with_site(|site| site.theme.controller().toggle().as_str().to_owned())
}

/// Apply and persist `"light"` or `"dark"`.
///
/// # Errors
///
/// Throws for any other value.
#[wasm_bindgen(js_name = applyTheme)]
pub fn apply_theme(value: &str) -> Result<(), JsError> {
    let theme = Theme::parse(value).ok_or_else(|| {
        JsError::new(&format!("unknown theme {value:?}; expected \"light\" or \"dark\""))
    })?;
    with_site(|site| site.theme.controller().apply_preference(theme));
    Ok(())
}

/// The preference that would be applied on a fresh load.
#[wasm_bindgen(js_name = getThemePreference)]
pub fn theme_preference() -> String {
    with_site(|site| site.theme.controller().resolve_preference())
        .unwrap_or_default()
        .as_str()
        .to_owned()
}

/// Forget the stored choice and remove the theme attribute. The next
/// system change or page load resolves the theme afresh.
#[wasm_bindgen(js_name = clearThemePreference)]
pub fn clear_theme_preference() {
    with_site(|site| site.theme.controller().clear_preference());
}

/// Navigate to `url`, animated where possible and a plain load otherwise.
#[wasm_bindgen(js_name = navigateWithTransition)]
pub fn navigate_with_transition(url: String) {
    let Some(navigator) = with_site(|site| Rc::clone(&site.navigator)) else {
        BrowserHost::new(false).load_page(&url);
        return;
    };
    spawn_local(async move {
        let outcome = navigator.navigate(url, NavKind::Push).await;
        log::debug!("scripted navigation finished: {outcome:?}");
    });
}
