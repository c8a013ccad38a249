pub mod campaigns;
pub mod platform;
mod structs;

pub use campaigns::{Campaign, CampaignFile, ConversionEventDef, default_conversion_events};
pub use platform::{PlatformConfig, ServiceAccountKey, property_resource, service_account_email};
pub use structs::*;
