//! MintPort browser frontend.
//!
//! Pure Rust + WASM mint widget: connect a browser wallet, pick a
//! quantity, mint. Each concern lives in its own module.

pub mod config;
pub mod dom;
pub mod eip1193;
pub mod events;
pub mod mint_ops;
pub mod platform;
pub mod rpc;
pub mod state;
pub mod view;

use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::prelude::*;

/// WASM entry point, called when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();

    init().await
}

/// Main initialisation sequence.
async fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;

    let provider = eip1193::Eip1193Provider::detect();
    state::init(state::App::new(provider.clone()));

    // Forward provider events into the session manager.
    if let Some(provider) = &provider {
        let els2 = els.clone();
        provider.subscribe(move |event| {
            let els3 = els2.clone();
            wasm_bindgen_futures::spawn_local(async move {
                mint_ops::on_provider_event(&els3, event).await;
            });
        });
    }

    events::bind_events(&els);
    view::render(&els);

    // The extension takes a moment to restore a pre-existing session;
    // check again shortly after load.
    TimeoutFuture::new(300).await;
    if state::with(|app| app.session.is_connected()).unwrap_or(false) {
        if let Some(mut app) = state::take() {
            app.sync_connection().await;
            state::put(app);
        }
        view::render(&els);
    }

    Ok(())
}
