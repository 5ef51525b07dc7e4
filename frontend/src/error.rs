use log::debug;
use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum LandingError {
    #[error("unknown section: {0}")]
    UnknownSection(String),

    #[error("invalid landing config: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    #[error("missing browser object: {0}")]
    MissingDom(&'static str),

    #[error("browser call failed: {0}")]
    Js(String),
}

impl From<JsValue> for LandingError {
    fn from(value: JsValue) -> Self {
        LandingError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

pub type Result<T> = std::result::Result<T, LandingError>;

/// For browser calls whose failure leaves the page usable: the error is
/// logged at debug level instead of propagated.
pub trait LogFailure {
    fn log_failure(self, what: &str);
}

impl<T> LogFailure for std::result::Result<T, JsValue> {
    fn log_failure(self, what: &str) {
        if let Err(err) = self {
            debug!("{} failed: {:?}", what, err);
        }
    }
}
