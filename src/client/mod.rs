//! Client module - storefront HTTP exchanges for both WASM and no-WASM environments
//!
//! Both implementations satisfy [`crate::interface::ShopApi`], so the
//! controller never knows which one it is driving.

#[cfg(feature = "no-wasm")]
pub mod request;
#[cfg(feature = "no-wasm")]
pub use request::NoWasmClient;

#[cfg(feature = "wasm")]
pub mod gloo;
#[cfg(feature = "wasm")]
pub use gloo::WasmClient;
