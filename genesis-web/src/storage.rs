//! Web-specific save slot backed by `window.localStorage`.
//!
//! The slot is stored under its bare name (`godCreatorSave` by default) so
//! saves written by earlier builds of the page keep loading.

use genesis_game::GameStorage;

use crate::dom;

/// Web-specific game storage using localStorage
#[derive(Debug, Clone, Copy, Default)]
pub struct WebGameStorage;

#[derive(Debug, thiserror::Error)]
pub enum WebStorageError {
    #[error("localStorage unavailable: {0}")]
    Unavailable(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl WebGameStorage {
    fn handle() -> Result<web_sys::Storage, WebStorageError> {
        dom::local_storage()
            .map_err(|err| WebStorageError::Unavailable(dom::js_error_message(&err)))
    }
}

impl GameStorage for WebGameStorage {
    type Error = WebStorageError;

    fn save_game(&self, save_name: &str, blob: &str) -> Result<(), Self::Error> {
        Self::handle()?
            .set_item(save_name, blob)
            .map_err(|err| WebStorageError::Storage(dom::js_error_message(&err)))
    }

    fn load_game(&self, save_name: &str) -> Result<Option<String>, Self::Error> {
        Self::handle()?
            .get_item(save_name)
            .map_err(|err| WebStorageError::Storage(dom::js_error_message(&err)))
    }

    fn delete_save(&self, save_name: &str) -> Result<(), Self::Error> {
        Self::handle()?
            .remove_item(save_name)
            .map_err(|err| WebStorageError::Storage(dom::js_error_message(&err)))
    }
}
