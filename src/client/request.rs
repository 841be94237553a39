//! No-WASM HTTP client implementation using reqwest
//!
//! Talks to the storefront the way the browser page does: same endpoints,
//! same `X-CSRFToken` / `X-Requested-With` headers, with the session cookies
//! supplied through configuration instead of the browser jar.

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
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, COOKIE},
    Client, Response,
};
use serde::de::DeserializeOwned;

/// HTTP client for no-WASM environments using reqwest
#[derive(Debug, Clone)]
pub struct NoWasmClient {
    client: Client,
    config: ShopConfig,
    csrf: Option<CsrfToken>,
}

impl HttpClient for NoWasmClient {
    async fn new(config: ShopConfig) -> Result<Self> {
        let headers = default_headers(&config)?;
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        let csrf = match config.cookie.as_deref() {
            Some(cookies) => match CsrfToken::from_cookies(cookies, &config.csrf_cookie) {
                Ok(token) => Some(token),
                Err(e) => {
                    log::warn!("{e}; mutating requests will be refused");
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            client,
            config,
            csrf,
        })
    }
}

fn default_headers(config: &ShopConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let requested_with = HeaderName::from_bytes(REQUESTED_WITH_HEADER.as_bytes())
        .map_err(|e| ErrorKind::ParseError(e.to_string()))?;
    headers.insert(requested_with, HeaderValue::from_static(REQUESTED_WITH_VALUE));
    if let Some(cookie) = config.cookie.as_deref() {
        headers.insert(
            COOKIE,
            HeaderValue::from_str(cookie).map_err(|e| ErrorKind::ParseError(e.to_string()))?,
        );
    }
    Ok(headers)
}

impl NoWasmClient {
    pub fn csrf_token(&self) -> Option<&CsrfToken> {
        self.csrf.as_ref()
    }

    async fn post<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let token = self
            .csrf
            .as_ref()
            .ok_or_else(|| ErrorKind::MissingCsrfToken(self.config.csrf_cookie.clone()))?;
        let url = self.config.endpoint(path);
        log::debug!("POST {url}");

        let resp = self
            .client
            .post(&url)
            .header(CSRF_HEADER, token.as_str())
            .send()
            .await?;

        Self::handle_json_response(resp).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.config.endpoint(path);
        log::debug!("GET {url}");

        let resp = self.client.get(&url).send().await?;
        Self::handle_json_response(resp).await
    }

    /// Non-2xx answers are errors; anything else must decode as `T`.
    async fn handle_json_response<T: DeserializeOwned>(resp: Response) -> Result<T> {
        let status = resp.status();
        if !status.is_success() {
            log::debug!("{} answered {}", resp.url(), status);
            return Err(ErrorKind::HttpStatus(status.as_u16()).into());
        }

        let text = resp.text().await?;
        serde_json::from_str::<T>(&text).map_err(Into::into)
    }
}

impl ShopApi for NoWasmClient {
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
