//! DOM element bindings.
//!
//! All fields are resolved once at startup. To add new UI elements, add
//! a field here and bind it in `Elements::bind()`.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, HtmlInputElement};

// ── Helpers ──

fn doc() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

pub fn by_id(id: &str) -> Option<Element> {
    doc().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn get_input_value(el: &HtmlInputElement) -> String {
    el.value().trim().to_string()
}

pub fn set_input_value(el: &HtmlInputElement, val: &str) {
    el.set_value(val);
}

pub fn add_class(el: &Element, cls: &str) {
    let _ = el.class_list().add_1(cls);
}

pub fn remove_class(el: &Element, cls: &str) {
    let _ = el.class_list().remove_1(cls);
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

pub fn window() -> web_sys::Window {
    web_sys::window().unwrap()
}

// ── Elements struct ──

/// All DOM element references used by the mint widget.
/// Clone-friendly (all inner types are reference-counted via JS GC).
#[derive(Clone)]
pub struct Elements {
    // Disconnected view
    pub connect_section: HtmlElement,
    pub install_hint: HtmlElement,
    pub connect_btn: HtmlElement,

    // Connected view
    pub mint_section: HtmlElement,
    pub quantity_input: HtmlInputElement,
    pub mint_btn: HtmlButtonElement,
    pub supply_counter: Element,
    pub account_chip: HtmlElement,
    pub account_label: Element,

    // Notifications
    pub snackbar: HtmlElement,
    pub snackbar_message: Element,
    pub snackbar_close: HtmlElement,
}

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_input {
    ($id:expr) => {
        by_id_typed::<HtmlInputElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing input #{}", $id)))?
    };
}

macro_rules! get_button {
    ($id:expr) => {
        by_id_typed::<HtmlButtonElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing button #{}", $id)))?
    };
}

macro_rules! get_html {
    ($id:expr) => {
        by_id_typed::<HtmlElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing html element #{}", $id)))?
    };
}

impl Elements {
    /// Resolve all DOM references. Call once after DOMContentLoaded.
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            connect_section: get_html!("connectSection"),
            install_hint: get_html!("installHint"),
            connect_btn: get_html!("connectWalletBtn"),

            mint_section: get_html!("mintSection"),
            quantity_input: get_input!("quantityInput"),
            mint_btn: get_button!("mintBtn"),
            supply_counter: get_el!("supplyCounter"),
            account_chip: get_html!("accountChip"),
            account_label: get_el!("accountLabel"),

            snackbar: get_html!("snackbar"),
            snackbar_message: get_el!("snackbarMessage"),
            snackbar_close: get_html!("snackbarClose"),
        })
    }
}
