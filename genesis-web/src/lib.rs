#![forbid(unsafe_code)]
//! Browser front for the Genesis discovery engine.
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod bridge;
pub mod dom;
pub mod notice;
pub mod storage;
pub mod view;

pub use bridge::GenesisGame;
pub use storage::{WebGameStorage, WebStorageError};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
