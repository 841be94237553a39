#![allow(async_fn_in_trait)] // 仅在 crate 内部的单线程执行器上使用

use crate::config::ShopConfig;
use crate::error::Result;
use crate::model::dtos::{
    AddToCartResponse, CartSnippetResponse, CartTotalResponse, RemoveFavoriteResponse,
    RemoveFromCartResponse, ToggleFavoriteResponse,
};
use crate::model::structs::{CartItemId, CourseId};

pub const TOGGLE_FAVORITE_PATH: &str = "/favorite/toggle";
pub const REMOVE_FAVORITE_PATH: &str = "/favorites/remove";
pub const ADD_TO_CART_PATH: &str = "/cart/add";
pub const REMOVE_FROM_CART_PATH: &str = "/cart/remove";
pub const CART_SNIPPET_PATH: &str = "/cart/load_snippet/";
pub const CART_TOTAL_PATH: &str = "/cart/total/";

/// Marks a request as XHR; the storefront only answers JSON when it is set.
pub const REQUESTED_WITH_HEADER: &str = "X-Requested-With";
pub const REQUESTED_WITH_VALUE: &str = "XMLHttpRequest";

/// `/favorite/toggle/7/` style path for an id-scoped endpoint.
pub fn id_path(base: &str, id: impl std::fmt::Display) -> String {
    format!("{base}/{id}/")
}

/// Common trait for HTTP client functionality
pub trait HttpClient {
    /// Create a new HTTP client instance
    async fn new(config: ShopConfig) -> Result<Self>
    where
        Self: Sized;
}

/// Every exchange the storefront pages make
pub trait ShopApi {
    /// Add or remove a course from the wishlist
    async fn toggle_favorite(&self, course: CourseId) -> Result<ToggleFavoriteResponse>;

    /// Remove a course from the wishlist page
    async fn remove_favorite(&self, course: CourseId) -> Result<RemoveFavoriteResponse>;

    /// Put a course in the cart
    async fn add_to_cart(&self, course: CourseId) -> Result<AddToCartResponse>;

    /// Drop a cart row
    async fn remove_from_cart(&self, item: CartItemId) -> Result<RemoveFromCartResponse>;

    /// Fetch the hover-cart preview markup
    async fn load_cart_snippet(&self) -> Result<CartSnippetResponse>;

    /// Fetch the current cart total
    async fn cart_total(&self) -> Result<CartTotalResponse>;
}
