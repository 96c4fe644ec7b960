#![forbid(unsafe_code)]

pub mod error;
pub mod locale;
pub mod model;

pub use error::Error;
pub use locale::{DEFAULT_LOCALE, Locale, LocaleError, LocaleSetting};
