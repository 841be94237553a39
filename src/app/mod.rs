//! Application module - cart/wishlist behaviour and page wiring
//!
//! The controller and its state are platform independent; the DOM render
//! layer and event wiring only exist in WASM builds.

pub mod controller;
pub mod page;
pub mod state;
pub mod timer;

#[cfg(feature = "wasm")]
pub mod dom;
#[cfg(feature = "wasm")]
pub mod events;

pub use controller::{CartAdd, ShopController};
pub use page::{MemoryPage, Page, PageModel};
pub use state::{ActionKey, UndoTicket};
