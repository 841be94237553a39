//! Render layer: everything the controller is allowed to do to the page.
//!
//! [`MemoryPage`] keeps the same state the DOM would show, for the native
//! binary and for tests; `dom::DomPage` does the real thing in the browser.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::model::structs::{CartButtonLabel, CartItemId, CartRow, CourseId, FavoriteIcon, RemovedItem};

pub const WISHLIST_EMPTY_TEXT: &str = "Your Wishlist is currently empty.";
pub const CART_EMPTY_TEXT: &str = "Your cart is currently empty.";

pub trait Page {
    /// Badge value as rendered by the server, if the badge exists.
    fn wishlist_count(&self) -> Option<i64>;
    fn set_wishlist_count(&self, count: i64);
    fn set_favorite_icon(&self, course: CourseId, icon: FavoriteIcon);
    /// Favorite rows still listed (desktop and mobile layouts both count).
    fn favorite_rows(&self) -> usize;
    fn remove_favorite_rows(&self, course: CourseId);
    fn show_empty_wishlist(&self);

    fn cart_count(&self) -> Option<i64>;
    fn set_cart_count(&self, count: i64);
    fn set_cart_button_label(&self, course: CourseId, label: CartButtonLabel);
    fn set_cart_message(&self, message: &str);
    fn set_cart_snippet(&self, html: &str);
    fn cart_row(&self, item: CartItemId) -> Option<CartRow>;
    fn cart_rows(&self) -> usize;
    fn remove_cart_row(&self, item: CartItemId);
    fn prepend_cart_row(&self, item: &RemovedItem);
    fn show_empty_cart(&self);
    fn set_cart_total(&self, total: &str);

    fn show_undo(&self, text: &str);
    fn hide_undo(&self);

    fn show_toast(&self, message: &str);
    fn show_remove_toast(&self, message: &str);
    fn reload(&self);
}

/// Observable page state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageModel {
    pub wishlist_count: Option<i64>,
    pub favorite_icons: HashMap<CourseId, FavoriteIcon>,
    pub favorite_rows: Vec<CourseId>,
    pub wishlist_empty_panels: usize,

    pub cart_count: Option<i64>,
    pub cart_labels: HashMap<CourseId, CartButtonLabel>,
    pub cart_message: Option<String>,
    pub cart_snippet: Option<String>,
    pub cart_rows: Vec<CartRow>,
    pub cart_empty_panels: usize,
    pub cart_total: Option<String>,
    /// Rows taken off the page, newest last.
    pub removed_rows: Vec<CartRow>,

    /// Text of the undo panel while it is visible.
    pub undo: Option<String>,
    pub toasts: Vec<String>,
    pub remove_toasts: Vec<String>,
    pub reloads: usize,
}

#[derive(Debug, Default)]
pub struct MemoryPage {
    model: RefCell<PageModel>,
}

impl MemoryPage {
    pub fn new(model: PageModel) -> Self {
        Self {
            model: RefCell::new(model),
        }
    }

    pub fn snapshot(&self) -> PageModel {
        self.model.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&PageModel) -> R) -> R {
        f(&self.model.borrow())
    }
}

impl Page for MemoryPage {
    fn wishlist_count(&self) -> Option<i64> {
        self.model.borrow().wishlist_count
    }

    fn set_wishlist_count(&self, count: i64) {
        self.model.borrow_mut().wishlist_count = Some(count);
    }

    fn set_favorite_icon(&self, course: CourseId, icon: FavoriteIcon) {
        self.model.borrow_mut().favorite_icons.insert(course, icon);
    }

    fn favorite_rows(&self) -> usize {
        self.model.borrow().favorite_rows.len()
    }

    fn remove_favorite_rows(&self, course: CourseId) {
        self.model.borrow_mut().favorite_rows.retain(|id| *id != course);
    }

    fn show_empty_wishlist(&self) {
        self.model.borrow_mut().wishlist_empty_panels += 1;
    }

    fn cart_count(&self) -> Option<i64> {
        self.model.borrow().cart_count
    }

    fn set_cart_count(&self, count: i64) {
        self.model.borrow_mut().cart_count = Some(count);
    }

    fn set_cart_button_label(&self, course: CourseId, label: CartButtonLabel) {
        self.model.borrow_mut().cart_labels.insert(course, label);
    }

    fn set_cart_message(&self, message: &str) {
        self.model.borrow_mut().cart_message = Some(message.to_string());
    }

    fn set_cart_snippet(&self, html: &str) {
        self.model.borrow_mut().cart_snippet = Some(html.to_string());
    }

    fn cart_row(&self, item: CartItemId) -> Option<CartRow> {
        self.model.borrow().cart_rows.iter().find(|r| r.id == item).cloned()
    }

    fn cart_rows(&self) -> usize {
        self.model.borrow().cart_rows.len()
    }

    fn remove_cart_row(&self, item: CartItemId) {
        let mut model = self.model.borrow_mut();
        if let Some(pos) = model.cart_rows.iter().position(|r| r.id == item) {
            let row = model.cart_rows.remove(pos);
            model.removed_rows.push(row);
        }
    }

    fn prepend_cart_row(&self, item: &RemovedItem) {
        let mut model = self.model.borrow_mut();
        let row = model
            .removed_rows
            .iter()
            .rev()
            .find(|r| r.id == item.cart_id)
            .cloned()
            .unwrap_or_else(|| CartRow {
                id: item.cart_id,
                course_id: item.course_id,
                name: item.name.clone(),
                price: 0.0,
                markup: item.markup.clone(),
            });
        model.cart_rows.insert(0, row);
    }

    fn show_empty_cart(&self) {
        self.model.borrow_mut().cart_empty_panels += 1;
    }

    fn set_cart_total(&self, total: &str) {
        self.model.borrow_mut().cart_total = Some(total.to_string());
    }

    fn show_undo(&self, text: &str) {
        self.model.borrow_mut().undo = Some(text.to_string());
    }

    fn hide_undo(&self) {
        self.model.borrow_mut().undo = None;
    }

    fn show_toast(&self, message: &str) {
        self.model.borrow_mut().toasts.push(message.to_string());
    }

    fn show_remove_toast(&self, message: &str) {
        self.model.borrow_mut().remove_toasts.push(message.to_string());
    }

    fn reload(&self) {
        self.model.borrow_mut().reloads += 1;
    }
}
