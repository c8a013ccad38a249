//! Campaign identity and attribution URLs
//!
//! Shared by QR generation and reporting.

pub mod identity;
pub mod url_builder;

pub use identity::{TOKEN_LEN, campaign_token, token_for};
pub use url_builder::{
    AttributionParam, MEDIUM_VALUE, SOURCE_VALUE, apply_params, attribution_params,
    build_attribution_url,
};
