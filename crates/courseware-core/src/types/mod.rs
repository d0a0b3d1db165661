//! Validated value types.
//!
//! These types enforce their invariants at construction time, so a client
//! can never be configured with a base URL it would leak tokens through.

mod api_url;

pub use api_url::ApiUrl;
