//! Platform detection and wallet deeplinks.

use crate::config::METAMASK_DEEPLINK_BASE;
use crate::dom::window;

const MOBILE_MARKERS: &[&str] = &["Android", "iPhone", "iPad", "iPod", "webOS", "Mobile"];

/// Coarse user-agent sniff. Only used to decide between the install
/// hint and the in-app browser deeplink.
pub fn is_mobile() -> bool {
    let ua = window().navigator().user_agent().unwrap_or_default();
    MOBILE_MARKERS.iter().any(|marker| ua.contains(marker))
}

/// Open this page inside the MetaMask in-app browser.
pub fn open_metamask_deeplink() {
    let window = window();
    let Ok(host) = window.location().host() else {
        return;
    };
    let Ok(path) = window.location().pathname() else {
        return;
    };
    let url = format!("{METAMASK_DEEPLINK_BASE}{host}{path}");
    let _ = window.open_with_url_and_target(&url, "_blank");
}
