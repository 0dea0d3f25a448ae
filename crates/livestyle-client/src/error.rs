//! Errors raised while mounting the agent into a page.

use wasm_bindgen::JsValue;

/// The page could not host the agent.
#[derive(Debug, thiserror::Error)]
pub enum MountError {
    #[error("no window (not running in a browser page)")]
    NoWindow,

    #[error("window has no document")]
    NoDocument,

    #[error("document has no <head>")]
    NoHead,

    /// A DOM call threw.
    #[error("DOM error: {0}")]
    Dom(String),

    #[error(transparent)]
    Config(#[from] livestyle_core::ConfigError),
}

impl MountError {
    pub(crate) fn dom(err: JsValue) -> Self {
        MountError::Dom(format!("{err:?}"))
    }
}

impl From<MountError> for JsValue {
    fn from(err: MountError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
