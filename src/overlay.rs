use crate::constants::{LOADING_ID, LOADING_TEXT};
use web_sys as web;

#[inline]
pub fn show_loading(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(LOADING_ID) {
        el.set_text_content(Some(LOADING_TEXT));
        _ = el.class_list().remove_2("hidden", "error");
        _ = el.set_attribute("style", "");
    }
}

#[inline]
pub fn hide(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(LOADING_ID) {
        _ = el.class_list().add_1("hidden");
        // fallback for pages without the CSS class
        _ = el.set_attribute("style", "display:none");
    }
}

/// Replace the loading message with a start-up failure. Shown once; there is
/// no retry.
pub fn show_error(document: &web::Document, message: &str) {
    if let Some(el) = document.get_element_by_id(LOADING_ID) {
        el.set_text_content(Some(message));
        let cl = el.class_list();
        _ = cl.remove_1("hidden");
        _ = cl.add_1("error");
        _ = el.set_attribute("style", "");
    }
}
