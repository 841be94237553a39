//! Browser render layer: [`Page`] on top of the live document.
//!
//! Selectors and ids follow the server templates. Anything missing from the
//! current page is skipped without complaint.

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, Element, HtmlElement, Window};

use crate::config::{REMOVE_TOAST_HOLD, TOAST_FADE_IN, TOAST_FADE_OUT};
use crate::effects;
use crate::model::structs::{CartButtonLabel, CartItemId, CartRow, CourseId, FavoriteIcon, RemovedItem};

use super::page::{Page, CART_EMPTY_TEXT, WISHLIST_EMPTY_TEXT};
use super::timer;

#[derive(Debug, Clone)]
pub struct DomPage {
    window: Window,
    document: Document,
}

impl DomPage {
    pub fn new(window: Window, document: Document) -> Self {
        Self { window, document }
    }

    /// The page for the current browsing context, if there is one.
    pub fn current() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self::new(window, document))
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn query(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    pub fn query_all(&self, selector: &str) -> Vec<Element> {
        query_all(&self.document, selector)
    }

    fn set_text(&self, selector: &str, text: &str) {
        if let Some(el) = self.query(selector) {
            el.set_text_content(Some(text));
        }
    }

    fn remove_all(&self, selector: &str) {
        for el in self.query_all(selector) {
            el.remove();
        }
    }

    fn append_empty_state(&self, icon: &str, text: &str) {
        let markup = empty_state_markup(icon, text);
        if let Some(section) = self.query(".cart-sec1") {
            if let Err(e) = section.insert_adjacent_html("beforeend", &markup) {
                log::warn!("could not insert empty-state panel: {e:?}");
            }
        }
    }
}

pub fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn set_style(el: &Element, property: &str, value: &str) {
    if let Some(el) = el.dyn_ref::<HtmlElement>() {
        let _ = el.style().set_property(property, value);
    }
}

pub fn style_value(el: &Element, property: &str) -> String {
    el.dyn_ref::<HtmlElement>()
        .and_then(|el| el.style().get_property_value(property).ok())
        .unwrap_or_default()
}

fn empty_state_markup(icon: &str, text: &str) -> String {
    format!(
        r#"<div class="empty-cart"><p><i class="fa-solid {icon}"></i>{text}</p><a href="/courses/"><button>Return to Courses</button></a></div>"#
    )
}

fn parse_row(el: &Element) -> Option<CartRow> {
    let id = el.get_attribute("data-id")?.parse::<CartItemId>().ok()?;
    let course_id = match el.get_attribute("data-course-id").map(|v| v.parse::<CourseId>()) {
        Some(Ok(course_id)) => course_id,
        _ => {
            log::warn!("cart row {id} has no usable data-course-id");
            return None;
        }
    };
    let price = el
        .get_attribute("data-price")
        .and_then(|p| p.trim().parse::<f64>().ok())
        .unwrap_or(0.0);
    let name = el
        .query_selector("p")
        .ok()
        .flatten()
        .and_then(|p| p.text_content())
        .map(|t| t.trim().to_string())
        .unwrap_or_default();

    Some(CartRow {
        id,
        course_id,
        name,
        price,
        markup: el.outer_html(),
    })
}

impl Page for DomPage {
    fn wishlist_count(&self) -> Option<i64> {
        self.query("#wishlist-count")?
            .text_content()?
            .trim()
            .parse()
            .ok()
    }

    fn set_wishlist_count(&self, count: i64) {
        self.set_text("#wishlist-count", &count.to_string());
    }

    fn set_favorite_icon(&self, course: CourseId, icon: FavoriteIcon) {
        for el in self.query_all(&format!(".add-fav[data-id=\"{course}\"] i")) {
            let classes = el.class_list();
            for class in icon.classes_to_remove() {
                let _ = classes.remove_1(class);
            }
            for class in icon.classes_to_add() {
                let _ = classes.add_1(class);
            }
        }
    }

    fn favorite_rows(&self) -> usize {
        self.query_all(".fav-item").len()
    }

    fn remove_favorite_rows(&self, course: CourseId) {
        self.remove_all(&format!(".fav-item[data-id=\"{course}\"]"));
    }

    fn show_empty_wishlist(&self) {
        self.remove_all("#fav-list");
        self.remove_all(".fav-table");
        self.remove_all(".mobile-cart");
        self.append_empty_state("fa-heart-circle-exclamation", WISHLIST_EMPTY_TEXT);
    }

    fn cart_count(&self) -> Option<i64> {
        self.query("#cart-count")?.text_content()?.trim().parse().ok()
    }

    fn set_cart_count(&self, count: i64) {
        self.set_text("#cart-count", &count.to_string());
    }

    fn set_cart_button_label(&self, course: CourseId, label: CartButtonLabel) {
        for el in self.query_all(&format!(".add-to-cart[data-id=\"{course}\"]")) {
            el.set_text_content(Some(label.text()));
        }
    }

    fn set_cart_message(&self, message: &str) {
        self.set_text("#cart-message", message);
    }

    fn set_cart_snippet(&self, html: &str) {
        if let Some(el) = self.query("#cart-snippet-wrapper") {
            el.set_inner_html(html);
        }
    }

    fn cart_row(&self, item: CartItemId) -> Option<CartRow> {
        let el = self.query(&format!(".cart-item[data-id=\"{item}\"]"))?;
        parse_row(&el)
    }

    fn cart_rows(&self) -> usize {
        self.query_all(".cart-item").len()
    }

    fn remove_cart_row(&self, item: CartItemId) {
        self.remove_all(&format!(".cart-item[data-id=\"{item}\"]"));
    }

    fn prepend_cart_row(&self, item: &RemovedItem) {
        if let Some(list) = self.query("#cart-items-list") {
            if let Err(e) = list.insert_adjacent_html("afterbegin", &item.markup) {
                log::warn!("could not restore cart row {}: {e:?}", item.cart_id);
            }
        }
    }

    fn show_empty_cart(&self) {
        self.remove_all("#cart-items-list");
        self.remove_all(".cart-table");
        self.remove_all(".mobile-cart");
        self.remove_all(".cart-totals");
        self.append_empty_state("fa-cart-shopping", CART_EMPTY_TEXT);
    }

    fn set_cart_total(&self, total: &str) {
        self.set_text("#cart-total", total);
        self.set_text("#cart-total1", total);
    }

    fn show_undo(&self, text: &str) {
        self.set_text("#undo-text", text);
        if let Some(el) = self.query("#undo-message") {
            set_style(&el, "display", "block");
        }
    }

    fn hide_undo(&self) {
        if let Some(el) = self.query("#undo-message") {
            set_style(&el, "display", "none");
        }
    }

    fn show_toast(&self, message: &str) {
        let (Some(body), Ok(toast)) = (self.document.body(), self.document.create_element("div")) else {
            return;
        };
        toast.set_class_name("custom-toast");
        toast.set_text_content(Some(message));
        set_style(&toast, "opacity", "0");
        set_style(&toast, "transition", &format!("opacity {}ms", TOAST_FADE_IN.as_millis()));
        if body.append_child(&toast).is_err() {
            return;
        }
        let window = self.window.clone();
        let schedule = effects::toast_fade();
        spawn_local(async move {
            // opacity 0 has to be painted once or the transition is skipped
            next_animation_frame(&window).await;
            next_animation_frame(&window).await;
            set_style(&toast, "opacity", "1");
            timer::sleep(schedule.fade_at).await;
            set_style(&toast, "opacity", "0");
            timer::sleep(schedule.hide_at - schedule.fade_at).await;
            toast.remove();
        });
    }

    fn show_remove_toast(&self, message: &str) {
        let Some(el) = self.query("#remove-toast") else {
            return;
        };
        el.set_text_content(Some(message));
        set_style(&el, "display", "block");
        spawn_local(async move {
            timer::sleep(TOAST_FADE_IN + REMOVE_TOAST_HOLD + TOAST_FADE_OUT).await;
            set_style(&el, "display", "none");
        });
    }

    fn reload(&self) {
        if let Err(e) = self.window.location().reload() {
            log::warn!("reload failed: {e:?}");
        }
    }
}

/// Resolves at the next `requestAnimationFrame` callback.
pub async fn next_animation_frame(window: &Window) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let _ = window.request_animation_frame(&resolve);
    });
    let _ = JsFuture::from(promise).await;
}
