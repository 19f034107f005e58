//! Event wiring. Closures are leaked on purpose; they live for the
//! page lifetime.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::dom::{Elements, remove_class};
use crate::mint_ops;
use crate::view;

macro_rules! on_click {
    ($el:expr, $els:ident, $body:expr) => {{
        let el = &$el;
        let $els = $els.clone();
        let closure = Closure::wrap(Box::new(move |_event: web_sys::MouseEvent| {
            $body
        }) as Box<dyn FnMut(web_sys::MouseEvent)>);
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }};
}

macro_rules! on_click_async {
    ($el:expr, $els:ident, $handler:path) => {{
        let el = &$el;
        let $els = $els.clone();
        let closure = Closure::wrap(Box::new(move |_event: web_sys::MouseEvent| {
            let els = $els.clone();
            spawn_local(async move {
                $handler(&els).await;
            });
        }) as Box<dyn FnMut(web_sys::MouseEvent)>);
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }};
}

pub fn bind_events(els: &Elements) {
    on_click_async!(els.connect_btn, els, mint_ops::on_connect);
    on_click_async!(els.mint_btn, els, mint_ops::on_mint);

    on_click_async!(els.account_chip, els, mint_ops::on_disconnect);
    on_click!(els.snackbar_close, els, view::hide_snackbar(&els));

    // Clear the error highlight as soon as the user edits the quantity.
    {
        let input = els.quantity_input.clone();
        let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            remove_class(input.as_ref(), "error");
        }) as Box<dyn FnMut(web_sys::Event)>);
        let _ = els
            .quantity_input
            .add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
