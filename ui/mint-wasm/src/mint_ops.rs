//! Async UI handlers. Each takes the app out of its slot, works on it,
//! puts it back, and re-renders.

use mp_flow::{MintError, MintOutcome};
use mp_provider::ProviderEvent;
use mp_session::SessionEffect;

use crate::config;
use crate::dom::{Elements, get_input_value, window};
use crate::platform;
use crate::state;
use crate::view;

pub async fn on_connect(els: &Elements) {
    let has_provider = state::with(|app| app.session.has_provider()).unwrap_or(false);
    if !has_provider {
        // In-app wallet browsers inject a provider, so a mobile visitor
        // without one is in a regular browser. Send them to the dapp
        // deeplink; desktop users go to the extension install page.
        if platform::is_mobile() {
            platform::open_metamask_deeplink();
        } else {
            let _ = window().open_with_url_and_target(config::METAMASK_INSTALL_URL, "_blank");
        }
        return;
    }

    let Some(mut app) = state::take() else {
        return;
    };
    if let Err(err) = app.session.connect_wallet().await {
        view::show_snackbar(els, &format!("Error - {err}"));
        state::put(app);
        return;
    }
    app.sync_connection().await;
    state::put(app);
    view::render(els);
}

pub async fn on_mint(els: &Elements) {
    let Ok(quantity) = get_input_value(&els.quantity_input).parse::<i64>() else {
        view::set_input_invalid(els, true);
        view::show_snackbar(els, "Not valid Amount");
        return;
    };

    let Some(mut app) = state::take() else {
        return;
    };
    let result = app.flow.mint(quantity, &app.session).await;
    state::put(app);

    match result {
        Ok(MintOutcome::Minted) => {
            view::set_input_invalid(els, false);
            view::hide_snackbar(els);
            view::render(els);
        }
        Ok(MintOutcome::SwitchedNetwork) => {
            // The wallet fires chainChanged once the switch lands; the
            // event handler rebuilds state then.
        }
        Err(MintError::InvalidQuantity) => {
            view::set_input_invalid(els, true);
            view::show_snackbar(els, &MintError::InvalidQuantity.to_string());
        }
        Err(MintError::NetworkSwitch(err)) => {
            let _ = window().alert_with_message(&err.to_string());
        }
        Err(err) => {
            view::show_snackbar(els, &format!("Error - {err}"));
        }
    }
}

pub async fn on_disconnect(els: &Elements) {
    let Some(mut app) = state::take() else {
        return;
    };
    app.session.disconnect_local();
    let _ = app.flow.on_connected_change(None).await;
    state::put(app);
    view::render(els);
}

/// Fold a provider event into the session and rebuild derived state.
pub async fn on_provider_event(els: &Elements, event: ProviderEvent) {
    let Some(mut app) = state::take() else {
        return;
    };

    match app.session.handle_event(event) {
        SessionEffect::None => {}
        SessionEffect::AccountChanged(None) => {
            let _ = app.flow.on_connected_change(None).await;
        }
        SessionEffect::AccountChanged(Some(_)) => {
            // New signer: drop the old binding and rebuild against the
            // new active account.
            let _ = app.flow.on_connected_change(None).await;
            app.sync_connection().await;
        }
        SessionEffect::Reset => {
            // The session was torn down; re-initialize from the provider
            // so the fresh chain id lands in the session. Skipping this
            // leaves is_correct_network() false after a switch to the
            // target chain.
            let _ = app.flow.on_connected_change(None).await;
            app.sync_connection().await;
        }
    }

    state::put(app);
    view::render(els);
}
