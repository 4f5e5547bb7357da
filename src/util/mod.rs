//! Utility functions for common operations.
//!
//! - **Image-URL validation**: the syntactic gate every extracted image
//!   candidate must pass
//! - **Feed-URL validation**: security-focused validation applied at the
//!   proxy boundary to prevent SSRF attacks

mod url_validator;

pub use url_validator::{is_valid_image_url, validate_feed_url, UrlValidationError};
