//! Exception list configuration
//!
//! Lists are TOML documents:
//!
//! ```toml
//! [metadata]
//! code = "en"
//! name = "English"
//!
//! [exceptions]
//! separator = "."
//! suppress_after = ["Mr.", "Mrs.", "Ph.D."]
//! ```

mod loader;
mod types;

pub use loader::{get_exception_config, list_available_languages};
pub use types::{ExceptionConfig, ExceptionListConfig, MetadataConfig};
