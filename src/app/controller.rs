//! Cart and wishlist controller.
//!
//! Owns every piece of mutable client state (wishlist counter, undo buffer,
//! in-flight actions) and is the only thing that writes to it. Methods take
//! `&self` so a single controller can be shared by all event handlers on the
//! page; no `RefCell` borrow is ever held across an `.await`.

use std::cell::{Cell, RefCell};

use crate::config::{RELOAD_DELAY, UNDO_WINDOW};
use crate::error::{Error, ErrorKind, Result};
use crate::interface::ShopApi;
use crate::model::dtos::{format_amount, FavoriteStatus, STATUS_SUCCESS};
use crate::model::structs::{CartButtonLabel, CartItemId, CourseId, FavoriteIcon, RemovedItem};

use super::page::Page;
use super::state::{ActionKey, InFlight, InFlightGuard, UndoBuffer, UndoTicket};
use super::timer;

pub const FAILURE_TOAST: &str = "❌ Failed. Please try again.";
pub const UNKNOWN_STATUS_TOAST: &str = "⚠️ Something went wrong.";
pub const FAVORITE_ADDED_TOAST: &str = "✅ Course added to wishlist!";
pub const FAVORITE_REMOVED_TOAST: &str = "❌ Course removed from wishlist!";
pub const FAVORITE_DROPPED_TOAST: &str = "Removed from favorites!";
pub const CART_ADDED_TOAST: &str = "✅ Course added to cart!";
pub const CART_ALREADY_TOAST: &str = "✅ Course is already in your cart.";
pub const CART_ADDED_MESSAGE: &str = "✔ Course added to cart!";
pub const CART_ALREADY_MESSAGE: &str = "ℹ Course is already in your cart.";
pub const CART_REMOVED_TOAST: &str = "❌ Course removed from cart!";
pub const CART_REMOVED_NOTICE: &str = "✔ Course removed from cart!";

/// Result of a successful add-to-cart exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartAdd {
    pub added: bool,
    pub count: i64,
}

pub struct ShopController<A, P> {
    api: A,
    page: P,
    /// `None` when the page rendered no badge.
    wishlist_count: Cell<Option<i64>>,
    undo: RefCell<UndoBuffer>,
    in_flight: InFlight,
    wishlist_emptied: Cell<bool>,
    cart_emptied: Cell<bool>,
}

impl<A: ShopApi, P: Page> ShopController<A, P> {
    /// Seeds the wishlist counter from the server-rendered badge.
    pub fn new(api: A, page: P) -> Self {
        let wishlist_count = page.wishlist_count();
        Self {
            api,
            page,
            wishlist_count: Cell::new(wishlist_count),
            undo: RefCell::new(UndoBuffer::default()),
            in_flight: InFlight::default(),
            wishlist_emptied: Cell::new(false),
            cart_emptied: Cell::new(false),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn wishlist_count(&self) -> Option<i64> {
        self.wishlist_count.get()
    }

    /// The row an undo would restore right now.
    pub fn pending_undo(&self) -> Option<RemovedItem> {
        self.undo.borrow().peek().cloned()
    }

    fn claim(&self, key: ActionKey) -> Result<InFlightGuard<'_>> {
        self.in_flight.begin(key).inspect_err(|_| {
            log::debug!("ignoring repeated {key} while the first is pending");
        })
    }

    fn fail(&self, key: ActionKey, err: Error) -> Error {
        log::warn!("{key} failed: {err}");
        self.page.show_toast(FAILURE_TOAST);
        err
    }

    /// Applies the server count when it sent one, else `delta` to the badge.
    /// With neither there is nothing to show.
    fn adjust_wishlist_count(&self, server: Option<i64>, delta: i64) {
        let Some(count) = server.or_else(|| self.wishlist_count.get().map(|c| c + delta)) else {
            return;
        };
        let count = count.max(0);
        self.wishlist_count.set(Some(count));
        self.page.set_wishlist_count(count);
    }

    pub async fn toggle_favorite(&self, course: CourseId) -> Result<FavoriteStatus> {
        let key = ActionKey::ToggleFavorite(course);
        let _guard = self.claim(key)?;

        let resp = self
            .api
            .toggle_favorite(course)
            .await
            .map_err(|e| self.fail(key, e))?;

        let status = resp.favorite_status();
        match &status {
            FavoriteStatus::Added => {
                self.page.set_favorite_icon(course, FavoriteIcon::Solid);
                self.adjust_wishlist_count(resp.count, 1);
                self.page.show_toast(FAVORITE_ADDED_TOAST);
            }
            FavoriteStatus::Removed => {
                self.page.set_favorite_icon(course, FavoriteIcon::Regular);
                self.adjust_wishlist_count(resp.count, -1);
                self.page.show_toast(FAVORITE_REMOVED_TOAST);
            }
            FavoriteStatus::Other(other) => {
                log::warn!("{key}: unexpected status {other:?}");
                self.page.show_toast(UNKNOWN_STATUS_TOAST);
            }
        }
        Ok(status)
    }

    pub async fn remove_favorite(&self, course: CourseId) -> Result<()> {
        let key = ActionKey::RemoveFavorite(course);
        let _guard = self.claim(key)?;

        let resp = self
            .api
            .remove_favorite(course)
            .await
            .map_err(|e| self.fail(key, e))?;
        if resp.status != STATUS_SUCCESS {
            return Err(self.fail(key, ErrorKind::UnexpectedStatus(resp.status).into()));
        }

        self.page.remove_favorite_rows(course);
        self.page.show_toast(FAVORITE_DROPPED_TOAST);
        self.adjust_wishlist_count(None, -1);
        self.page.show_toast(FAVORITE_REMOVED_TOAST);

        if self.page.favorite_rows() == 0 && !self.wishlist_emptied.replace(true) {
            self.page.show_empty_wishlist();
        }
        Ok(())
    }

    pub async fn add_to_cart(&self, course: CourseId) -> Result<CartAdd> {
        let key = ActionKey::AddToCart(course);
        let _guard = self.claim(key)?;

        let resp = self
            .api
            .add_to_cart(course)
            .await
            .map_err(|e| self.fail(key, e))?;
        if resp.status != STATUS_SUCCESS {
            return Err(self.fail(key, ErrorKind::UnexpectedStatus(resp.status).into()));
        }

        self.page.set_cart_count(resp.count);
        if resp.added {
            self.page.set_cart_button_label(course, CartButtonLabel::Added);
            self.page.set_cart_message(CART_ADDED_MESSAGE);
            self.page.show_toast(CART_ADDED_TOAST);
        } else {
            self.page.set_cart_button_label(course, CartButtonLabel::AlreadyInCart);
            self.page.set_cart_message(CART_ALREADY_MESSAGE);
            self.page.show_toast(CART_ALREADY_TOAST);
        }

        self.refresh_snippet().await;
        Ok(CartAdd {
            added: resp.added,
            count: resp.count,
        })
    }

    /// Returns the undo ticket when the row was on this page and got buffered.
    pub async fn remove_from_cart(&self, item: CartItemId) -> Result<Option<UndoTicket>> {
        let key = ActionKey::RemoveFromCart(item);
        let _guard = self.claim(key)?;

        let resp = self
            .api
            .remove_from_cart(item)
            .await
            .map_err(|e| self.fail(key, e))?;
        if resp.status != STATUS_SUCCESS {
            return Err(self.fail(key, ErrorKind::UnexpectedStatus(resp.status).into()));
        }

        self.page.set_cart_count(resp.count);
        self.page.show_toast(CART_REMOVED_TOAST);

        let ticket = match self.page.cart_row(item) {
            Some(row) => {
                let removed = RemovedItem::from(row);
                let text = format!("\"{}\" removed.", removed.name);
                let ticket = self.undo.borrow_mut().store(removed);

                self.page.remove_cart_row(item);
                self.page.set_cart_total(&format_amount(resp.total));
                if self.page.cart_rows() == 0 && !self.cart_emptied.replace(true) {
                    self.page.show_empty_cart();
                }
                self.page.show_undo(&text);
                Some(ticket)
            }
            None => {
                log::debug!("cart row {item} not on this page");
                None
            }
        };

        self.page.show_remove_toast(CART_REMOVED_NOTICE);
        self.refresh_snippet().await;
        Ok(ticket)
    }

    /// Puts the last removed row back. `Ok(false)` when there is nothing to undo.
    pub async fn undo_last_removal(&self) -> Result<bool> {
        let Some((ticket, item)) = self
            .undo
            .borrow()
            .current()
            .map(|(ticket, item)| (ticket, item.clone()))
        else {
            return Ok(false);
        };
        let key = ActionKey::Undo;
        let _guard = self.claim(key)?;

        let resp = self
            .api
            .add_to_cart(item.course_id)
            .await
            .map_err(|e| self.fail(key, e))?;
        if resp.status != STATUS_SUCCESS {
            return Err(self.fail(key, ErrorKind::UnexpectedStatus(resp.status).into()));
        }

        self.page.set_cart_count(resp.count);
        self.page.prepend_cart_row(&item);
        // a removal made while the request was out owns the buffer now
        self.expire_undo(ticket);

        self.refresh_snippet().await;
        self.refresh_total().await;

        timer::sleep(RELOAD_DELAY).await;
        self.page.reload();
        Ok(true)
    }

    /// Drops the buffered row if `ticket` still owns it.
    pub fn expire_undo(&self, ticket: UndoTicket) -> bool {
        let expired = self.undo.borrow_mut().expire(ticket);
        if expired {
            self.page.hide_undo();
        }
        expired
    }

    /// Waits out the undo window, then expires `ticket`.
    pub async fn run_undo_expiry(&self, ticket: UndoTicket) -> bool {
        timer::sleep(UNDO_WINDOW).await;
        self.expire_undo(ticket)
    }

    async fn refresh_snippet(&self) {
        match self.api.load_cart_snippet().await {
            Ok(snippet) => self.page.set_cart_snippet(&snippet.html),
            Err(e) => log::warn!("cart preview refresh failed: {e}"),
        }
    }

    async fn refresh_total(&self) {
        match self.api.cart_total().await {
            Ok(total) => self.page.set_cart_total(&format_amount(total.total)),
            Err(e) => log::warn!("cart total refresh failed: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::page::{MemoryPage, PageModel};
    use crate::model::dtos::{
        AddToCartResponse, CartSnippetResponse, CartTotalResponse, RemoveFavoriteResponse,
        RemoveFromCartResponse, ToggleFavoriteResponse,
    };
    use crate::model::structs::CartRow;
    use std::collections::{HashSet, VecDeque};
    use std::time::Duration;

    /// Scripted storefront: keeps just enough server state to answer like the
    /// real one, and records every exchange.
    #[derive(Default)]
    struct FakeShop {
        favorites: RefCell<HashSet<CourseId>>,
        cart: RefCell<Vec<(CartItemId, CourseId, f64)>>,
        prices: RefCell<Vec<(CourseId, f64)>>,
        failures: RefCell<VecDeque<ErrorKind>>,
        calls: RefCell<Vec<String>>,
        delay: Cell<Option<Duration>>,
    }

    impl FakeShop {
        fn with_cart(items: &[(u64, u64, f64)]) -> Self {
            let shop = FakeShop::default();
            for (id, course, price) in items {
                shop.cart.borrow_mut().push((CartItemId(*id), CourseId(*course), *price));
                shop.prices.borrow_mut().push((CourseId(*course), *price));
            }
            shop
        }

        fn fail_next(&self, kind: ErrorKind) {
            self.failures.borrow_mut().push_back(kind);
        }

        async fn exchange(&self, call: String) -> Result<()> {
            self.calls.borrow_mut().push(call);
            if let Some(delay) = self.delay.get() {
                timer::sleep(delay).await;
            }
            match self.failures.borrow_mut().pop_front() {
                Some(kind) => Err(kind.into()),
                None => Ok(()),
            }
        }

        fn total(&self) -> f64 {
            self.cart.borrow().iter().map(|(_, _, p)| p).sum()
        }

        fn count_calls(&self, prefix: &str) -> usize {
            self.calls.borrow().iter().filter(|c| c.starts_with(prefix)).count()
        }
    }

    impl ShopApi for FakeShop {
        async fn toggle_favorite(&self, course: CourseId) -> Result<ToggleFavoriteResponse> {
            self.exchange(format!("toggle {course}")).await?;
            let mut favorites = self.favorites.borrow_mut();
            let status = if favorites.remove(&course) {
                "removed"
            } else {
                favorites.insert(course);
                "added"
            };
            Ok(ToggleFavoriteResponse {
                status: status.to_string(),
                count: None,
            })
        }

        async fn remove_favorite(&self, course: CourseId) -> Result<RemoveFavoriteResponse> {
            self.exchange(format!("unfavorite {course}")).await?;
            let status = if self.favorites.borrow_mut().remove(&course) {
                "success"
            } else {
                "not_found"
            };
            Ok(RemoveFavoriteResponse {
                status: status.to_string(),
            })
        }

        async fn add_to_cart(&self, course: CourseId) -> Result<AddToCartResponse> {
            self.exchange(format!("add {course}")).await?;
            let mut cart = self.cart.borrow_mut();
            let added = !cart.iter().any(|(_, c, _)| *c == course);
            if added {
                let next = cart.iter().map(|(id, _, _)| id.0).max().unwrap_or(0) + 1;
                let price = self
                    .prices
                    .borrow()
                    .iter()
                    .find(|(c, _)| *c == course)
                    .map(|(_, p)| *p)
                    .unwrap_or(10.0);
                cart.push((CartItemId(next), course, price));
            }
            Ok(AddToCartResponse {
                status: "success".to_string(),
                count: cart.len() as i64,
                added,
            })
        }

        async fn remove_from_cart(&self, item: CartItemId) -> Result<RemoveFromCartResponse> {
            self.exchange(format!("remove {item}")).await?;
            self.cart.borrow_mut().retain(|(id, _, _)| *id != item);
            Ok(RemoveFromCartResponse {
                status: "success".to_string(),
                count: self.cart.borrow().len() as i64,
                total: self.total(),
            })
        }

        async fn load_cart_snippet(&self) -> Result<CartSnippetResponse> {
            self.calls.borrow_mut().push("snippet".to_string());
            Ok(CartSnippetResponse {
                html: format!("<ul>{} items</ul>", self.cart.borrow().len()),
            })
        }

        async fn cart_total(&self) -> Result<CartTotalResponse> {
            self.calls.borrow_mut().push("total".to_string());
            Ok(CartTotalResponse { total: self.total() })
        }
    }

    fn row(id: u64, course: u64, name: &str, price: f64) -> CartRow {
        CartRow {
            id: CartItemId(id),
            course_id: CourseId(course),
            name: name.to_string(),
            price,
            markup: format!(
                "<div class=\"cart-item\" data-id=\"{id}\" data-course-id=\"{course}\" data-price=\"{price}\"><p>{name}</p></div>"
            ),
        }
    }

    fn cart_page(rows: Vec<CartRow>) -> MemoryPage {
        MemoryPage::new(PageModel {
            cart_count: Some(rows.len() as i64),
            cart_rows: rows,
            ..PageModel::default()
        })
    }

    #[tokio::test]
    async fn toggling_favorite_twice_restores_icon_and_count() {
        let page = MemoryPage::new(PageModel {
            wishlist_count: Some(3),
            ..PageModel::default()
        });
        let controller = ShopController::new(FakeShop::default(), page);

        let first = controller.toggle_favorite(CourseId(7)).await.unwrap();
        assert_eq!(first, FavoriteStatus::Added);
        controller.page().with(|m| {
            assert_eq!(m.wishlist_count, Some(4));
            assert_eq!(m.favorite_icons[&CourseId(7)], FavoriteIcon::Solid);
        });

        let second = controller.toggle_favorite(CourseId(7)).await.unwrap();
        assert_eq!(second, FavoriteStatus::Removed);
        controller.page().with(|m| {
            assert_eq!(m.wishlist_count, Some(3));
            assert_eq!(m.favorite_icons[&CourseId(7)], FavoriteIcon::Regular);
            assert_eq!(m.toasts, vec![FAVORITE_ADDED_TOAST, FAVORITE_REMOVED_TOAST]);
        });
        assert_eq!(controller.wishlist_count(), Some(3));
    }

    #[tokio::test]
    async fn missing_badge_is_never_invented() {
        let shop = FakeShop::default();
        shop.favorites.borrow_mut().insert(CourseId(4));
        let controller = ShopController::new(shop, MemoryPage::default());

        assert_eq!(controller.toggle_favorite(CourseId(4)).await.unwrap(), FavoriteStatus::Removed);
        assert_eq!(controller.toggle_favorite(CourseId(4)).await.unwrap(), FavoriteStatus::Added);
        assert_eq!(controller.wishlist_count(), None);
        controller.page().with(|m| {
            assert_eq!(m.wishlist_count, None);
            assert_eq!(m.favorite_icons[&CourseId(4)], FavoriteIcon::Solid);
        });
    }

    #[tokio::test]
    async fn failed_toggle_leaves_counter_and_shows_failure_toast() {
        let shop = FakeShop::default();
        shop.fail_next(ErrorKind::HttpStatus(403));
        let page = MemoryPage::new(PageModel {
            wishlist_count: Some(1),
            ..PageModel::default()
        });
        let controller = ShopController::new(shop, page);

        let err = controller.toggle_favorite(CourseId(2)).await.unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::HttpStatus(403)));
        controller.page().with(|m| {
            assert_eq!(m.wishlist_count, Some(1));
            assert!(m.favorite_icons.is_empty());
            assert_eq!(m.toasts, vec![FAILURE_TOAST]);
        });
    }

    #[tokio::test]
    async fn emptying_wishlist_shows_empty_panel_once() {
        for order in [[1u64, 2], [2, 1]] {
            let shop = FakeShop::default();
            shop.favorites.borrow_mut().extend([CourseId(1), CourseId(2)]);
            let page = MemoryPage::new(PageModel {
                wishlist_count: Some(2),
                // desktop and mobile layouts list each favorite
                favorite_rows: vec![CourseId(1), CourseId(2), CourseId(1), CourseId(2)],
                ..PageModel::default()
            });
            let controller = ShopController::new(shop, page);

            controller.remove_favorite(CourseId(order[0])).await.unwrap();
            controller.page().with(|m| {
                assert_eq!(m.wishlist_empty_panels, 0);
                assert_eq!(m.toasts, vec![FAVORITE_DROPPED_TOAST, FAVORITE_REMOVED_TOAST]);
            });
            controller.remove_favorite(CourseId(order[1])).await.unwrap();

            controller.page().with(|m| {
                assert!(m.favorite_rows.is_empty());
                assert_eq!(m.wishlist_empty_panels, 1);
                assert_eq!(m.wishlist_count, Some(0));
            });

            // a stale second click answers not_found and changes nothing
            assert!(controller.remove_favorite(CourseId(order[1])).await.is_err());
            controller.page().with(|m| {
                assert_eq!(m.wishlist_empty_panels, 1);
                assert_eq!(m.wishlist_count, Some(0));
            });
        }
    }

    #[tokio::test]
    async fn adding_course_already_in_cart_keeps_server_count() {
        let shop = FakeShop::with_cart(&[(1, 10, 20.0)]);
        let controller = ShopController::new(shop, cart_page(vec![row(1, 10, "Rust", 20.0)]));

        let outcome = controller.add_to_cart(CourseId(10)).await.unwrap();
        assert_eq!(outcome, CartAdd { added: false, count: 1 });
        controller.page().with(|m| {
            assert_eq!(m.cart_count, Some(1));
            assert_eq!(m.cart_labels[&CourseId(10)], CartButtonLabel::AlreadyInCart);
            assert_eq!(m.cart_message.as_deref(), Some(CART_ALREADY_MESSAGE));
            assert_eq!(m.cart_snippet.as_deref(), Some("<ul>1 items</ul>"));
        });

        let outcome = controller.add_to_cart(CourseId(11)).await.unwrap();
        assert_eq!(outcome, CartAdd { added: true, count: 2 });
        controller.page().with(|m| {
            assert_eq!(m.cart_count, Some(2));
            assert_eq!(m.cart_labels[&CourseId(11)], CartButtonLabel::Added);
            assert_eq!(m.toasts.last().map(String::as_str), Some(CART_ADDED_TOAST));
        });
    }

    #[tokio::test]
    async fn remove_scenario_updates_badge_total_and_undo_panel() {
        let shop = FakeShop::with_cart(&[(5, 50, 30.0), (6, 60, 49.99)]);
        let page = cart_page(vec![row(5, 50, "Python Basics", 30.0), row(6, 60, "Go", 49.99)]);
        let controller = ShopController::new(shop, page);
        assert_eq!(controller.page().cart_count(), Some(2));

        let ticket = controller.remove_from_cart(CartItemId(5)).await.unwrap();
        assert!(ticket.is_some());

        controller.page().with(|m| {
            assert_eq!(m.cart_count, Some(1));
            assert_eq!(m.cart_total.as_deref(), Some("49.99"));
            assert!(m.cart_rows.iter().all(|r| r.id != CartItemId(5)));
            assert_eq!(m.undo.as_deref(), Some("\"Python Basics\" removed."));
            assert_eq!(m.cart_empty_panels, 0);
            assert_eq!(m.remove_toasts, vec![CART_REMOVED_NOTICE]);
        });
        let pending = controller.pending_undo().unwrap();
        assert_eq!(pending.cart_id, CartItemId(5));
        assert_eq!(pending.course_id, CourseId(50));
    }

    #[tokio::test(start_paused = true)]
    async fn undo_within_window_restores_row_and_count() {
        let shop = FakeShop::with_cart(&[(5, 50, 30.0), (6, 60, 49.99)]);
        let original = row(5, 50, "Python Basics", 30.0);
        let page = cart_page(vec![original.clone(), row(6, 60, "Go", 49.99)]);
        let controller = ShopController::new(shop, page);

        let ticket = controller.remove_from_cart(CartItemId(5)).await.unwrap().unwrap();

        let (expired, undone) = futures::join!(controller.run_undo_expiry(ticket), async {
            timer::sleep(Duration::from_secs(6)).await;
            controller.undo_last_removal().await
        });

        assert!(undone.unwrap());
        assert!(!expired);
        assert!(controller.pending_undo().is_none());
        controller.page().with(|m| {
            assert_eq!(m.cart_count, Some(2));
            assert_eq!(m.cart_rows.first(), Some(&original));
            assert_eq!(m.undo, None);
            assert_eq!(m.cart_total.as_deref(), Some("79.99"));
            assert_eq!(m.reloads, 1);
        });
    }

    #[tokio::test(start_paused = true)]
    async fn undo_after_window_is_noop() {
        let shop = FakeShop::with_cart(&[(5, 50, 30.0)]);
        let controller = ShopController::new(shop, cart_page(vec![row(5, 50, "Python Basics", 30.0)]));

        let ticket = controller.remove_from_cart(CartItemId(5)).await.unwrap().unwrap();
        controller.page().with(|m| {
            assert_eq!(m.cart_empty_panels, 1);
            assert_eq!(m.cart_total.as_deref(), Some("0.00"));
        });

        assert!(controller.run_undo_expiry(ticket).await);
        controller.page().with(|m| assert_eq!(m.undo, None));

        assert!(!controller.undo_last_removal().await.unwrap());
        assert_eq!(controller.api().count_calls("add"), 0);
        controller.page().with(|m| {
            assert_eq!(m.cart_count, Some(0));
            assert!(m.cart_rows.is_empty());
            assert_eq!(m.reloads, 0);
        });
    }

    #[tokio::test]
    async fn earlier_expiry_does_not_drop_later_removal() {
        let shop = FakeShop::with_cart(&[(1, 10, 5.0), (2, 20, 6.0)]);
        let page = cart_page(vec![row(1, 10, "A", 5.0), row(2, 20, "B", 6.0)]);
        let controller = ShopController::new(shop, page);

        let first = controller.remove_from_cart(CartItemId(1)).await.unwrap().unwrap();
        let _second = controller.remove_from_cart(CartItemId(2)).await.unwrap().unwrap();

        assert!(!controller.expire_undo(first));
        assert_eq!(controller.pending_undo().map(|r| r.cart_id), Some(CartItemId(2)));
        controller.page().with(|m| assert_eq!(m.undo.as_deref(), Some("\"B\" removed.")));
    }

    #[tokio::test(start_paused = true)]
    async fn undo_does_not_drop_removal_made_while_pending() {
        let shop = FakeShop::with_cart(&[(1, 10, 5.0), (2, 20, 6.0)]);
        let page = cart_page(vec![row(1, 10, "A", 5.0), row(2, 20, "B", 6.0)]);
        let controller = ShopController::new(shop, page);
        controller.remove_from_cart(CartItemId(1)).await.unwrap();

        controller.api().delay.set(Some(Duration::from_millis(100)));
        let (undone, second) = futures::join!(controller.undo_last_removal(), async {
            timer::sleep(Duration::from_millis(10)).await;
            controller.api().delay.set(None);
            controller.remove_from_cart(CartItemId(2)).await
        });

        assert!(undone.unwrap());
        assert!(second.unwrap().is_some());
        assert_eq!(controller.pending_undo().map(|r| r.cart_id), Some(CartItemId(2)));
        controller.page().with(|m| {
            assert_eq!(m.undo.as_deref(), Some("\"B\" removed."));
            assert_eq!(m.cart_rows.first().map(|r| r.id), Some(CartItemId(1)));
        });
    }

    #[tokio::test]
    async fn failed_undo_keeps_buffer() {
        let shop = FakeShop::with_cart(&[(5, 50, 30.0)]);
        let controller = ShopController::new(shop, cart_page(vec![row(5, 50, "Python Basics", 30.0)]));
        controller.remove_from_cart(CartItemId(5)).await.unwrap();

        controller.api().fail_next(ErrorKind::HttpStatus(500));
        assert!(controller.undo_last_removal().await.is_err());
        assert!(controller.pending_undo().is_some());
        controller.page().with(|m| {
            assert_eq!(m.toasts.last().map(String::as_str), Some(FAILURE_TOAST));
            assert!(m.undo.is_some());
        });
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_click_while_pending_is_rejected() {
        let shop = FakeShop::default();
        shop.delay.set(Some(Duration::from_millis(200)));
        let controller = ShopController::new(shop, cart_page(Vec::new()));

        let (first, second) = futures::join!(
            controller.add_to_cart(CourseId(3)),
            controller.add_to_cart(CourseId(3))
        );

        assert_eq!(first.unwrap(), CartAdd { added: true, count: 1 });
        assert!(second.unwrap_err().is_in_flight());
        assert_eq!(controller.api().count_calls("add"), 1);
        controller.page().with(|m| assert!(!m.toasts.contains(&FAILURE_TOAST.to_string())));

        // released once the first exchange finished
        let again = controller.add_to_cart(CourseId(3)).await.unwrap();
        assert_eq!(again, CartAdd { added: false, count: 1 });
    }
}
