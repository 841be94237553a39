#[cfg(not(any(feature = "wasm", feature = "no-wasm")))]
compile_error!("enable either the `wasm` or the `no-wasm` feature");

pub mod app;
pub mod client;
pub mod config;
pub mod csrf;
pub mod effects;
pub mod error;
pub mod filter;
pub mod interface;
pub mod model;

