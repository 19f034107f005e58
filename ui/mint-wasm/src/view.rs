//! Rendering. Pure DOM writes from a snapshot of the app state.

use mp_types::AccountAddress;

use crate::dom::{
    Elements, add_class, remove_class, set_input_value, set_text, toggle_class,
};
use crate::platform;
use crate::state;

struct ViewSnapshot {
    has_provider: bool,
    connected: bool,
    account: Option<AccountAddress>,
    quantity: u32,
    mint_more: bool,
    mint_disabled: bool,
    supply: Option<(u64, u64)>,
}

fn snapshot() -> Option<ViewSnapshot> {
    // Connectivity comes from the locally-owned flag, not from
    // is_connected(): the provider keeps reporting a selected address
    // after a local disconnect.
    state::with(|app| ViewSnapshot {
        has_provider: app.session.has_provider(),
        connected: app.session.session().connected,
        account: app.session.active_account().cloned(),
        quantity: app.flow.quantity(),
        mint_more: app.flow.mint_more(),
        mint_disabled: app.flow.mint_disabled(),
        supply: app
            .flow
            .sale()
            .map(|sale| (sale.total_supply, sale.max_supply)),
    })
}

/// Redraw the whole widget from current state. Cheap enough to call
/// after every handler.
pub fn render(els: &Elements) {
    let Some(view) = snapshot() else {
        return;
    };

    toggle_class(&els.connect_section, "hidden", view.connected);
    toggle_class(&els.mint_section, "hidden", !view.connected);

    // Hint desktop users without an extension; mobile users get the
    // in-app browser deeplink from the connect button instead.
    let show_hint = !view.has_provider && !platform::is_mobile();
    toggle_class(&els.install_hint, "hidden", !show_hint);

    if view.connected {
        match &view.account {
            Some(account) => set_text(&els.account_label, &account.short()),
            None => set_text(&els.account_label, ""),
        }

        set_input_value(&els.quantity_input, &view.quantity.to_string());
        set_text(
            els.mint_btn.as_ref(),
            if view.mint_more { "MINT MORE" } else { "MINT" },
        );
        els.mint_btn.set_disabled(view.mint_disabled);

        match view.supply {
            Some((total, max)) => {
                set_text(&els.supply_counter, &format!("{total} / {max} minted"));
                remove_class(&els.supply_counter, "hidden");
            }
            None => add_class(&els.supply_counter, "hidden"),
        }
    }
}

pub fn show_snackbar(els: &Elements, message: &str) {
    set_text(&els.snackbar_message, message);
    remove_class(&els.snackbar, "hidden");
}

pub fn hide_snackbar(els: &Elements) {
    add_class(&els.snackbar, "hidden");
}

/// Mark or clear the quantity input's error styling.
pub fn set_input_invalid(els: &Elements, invalid: bool) {
    toggle_class(els.quantity_input.as_ref(), "error", invalid);
}
