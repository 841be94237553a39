//! WASM HTTP client implementation using gloo_net
//!
//! Requests go through the browser's fetch API against the page's own origin,
//! so the session cookie travels with them and the CSRF token is read from
//! `document.cookie` once at construction.

use crate::config::ShopConfig;
use crate::csrf::{CsrfToken, CSRF_HEADER};
use crate::error::{ErrorKind, Result};
use crate::interface::{
    id_path, HttpClient, ShopApi, ADD_TO_CART_PATH, CART_SNIPPET_PATH, CART_TOTAL_PATH,
    REMOVE_FAVORITE_PATH, REMOVE_FROM_CART_PATH, REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE,
    TOGGLE_FAVORITE_PATH,
};
use crate::model::dtos::{
    AddToCartResponse, CartSnippetResponse, CartTotalResponse, RemoveFavoriteResponse,
    RemoveFromCartResponse, ToggleFavoriteResponse,
};
use crate::model::structs::{CartItemId, CourseId};
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use web_sys::{HtmlDocument, RequestCredentials};

/// HTTP client for WASM environments using gloo_net
#[derive(Debug, Clone)]
pub struct WasmClient {
    config: ShopConfig,
    csrf: Option<CsrfToken>,
}

impl HttpClient for WasmClient {
    async fn new(config: ShopConfig) -> Result<Self> {
        let cookies = document_cookies().unwrap_or_default();
        let csrf = match CsrfToken::from_cookies(&cookies, &config.csrf_cookie) {
            Ok(token) => Some(token),
            Err(e) => {
                // Anonymous visitors have no token yet; the server rejects their POSTs.
                log::debug!("{e}");
                None
            }
        };
        Ok(Self { config, csrf })
    }
}

/// `document.cookie`, if there is a document.
pub fn document_cookies() -> Option<String> {
    web_sys::window()?
        .document()?
        .dyn_into::<HtmlDocument>()
        .ok()?
        .cookie()
        .ok()
}

impl WasmClient {
    /// Build a request with common headers and settings
    fn build_request(&self, method: &str, path: &str) -> RequestBuilder {
        let url = self.config.endpoint(path);
        let builder = match method {
            "POST" => Request::post(&url),
            _ => Request::get(&url),
        };

        let builder = builder
            .credentials(RequestCredentials::SameOrigin)
            .header("Accept", "application/json")
            .header(REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE);

        match (method, self.csrf.as_ref()) {
            ("POST", Some(token)) => builder.header(CSRF_HEADER, token.as_str()),
            _ => builder,
        }
    }

    /// Handle JSON response with error checking
    async fn handle_json_response<T: DeserializeOwned>(resp: Response) -> Result<T> {
        if !resp.ok() {
            log::debug!("{} answered {}", resp.url(), resp.status());
            return Err(ErrorKind::HttpStatus(resp.status()).into());
        }

        let text = resp.text().await?;
        serde_json::from_str::<T>(&text).map_err(Into::into)
    }

    async fn post<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        log::debug!("POST {path}");
        let resp = self.build_request("POST", path).send().await?;
        Self::handle_json_response(resp).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        log::debug!("GET {path}");
        let resp = self.build_request("GET", path).send().await?;
        Self::handle_json_response(resp).await
    }
}

impl ShopApi for WasmClient {
    async fn toggle_favorite(&self, course: CourseId) -> Result<ToggleFavoriteResponse> {
        self.post(&id_path(TOGGLE_FAVORITE_PATH, course)).await
    }

    async fn remove_favorite(&self, course: CourseId) -> Result<RemoveFavoriteResponse> {
        self.post(&id_path(REMOVE_FAVORITE_PATH, course)).await
    }

    async fn add_to_cart(&self, course: CourseId) -> Result<AddToCartResponse> {
        self.post(&id_path(ADD_TO_CART_PATH, course)).await
    }

    async fn remove_from_cart(&self, item: CartItemId) -> Result<RemoveFromCartResponse> {
        self.post(&id_path(REMOVE_FROM_CART_PATH, item)).await
    }

    async fn load_cart_snippet(&self) -> Result<CartSnippetResponse> {
        self.get(CART_SNIPPET_PATH).await
    }

    async fn cart_total(&self) -> Result<CartTotalResponse> {
        self.get(CART_TOTAL_PATH).await
    }
}
