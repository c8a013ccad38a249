//! Service layer
//!
//! Business logic shared by the CLI commands. Remote access goes through the
//! `AdminApi` / `ReportingApi` traits so the services can run against fakes.

pub mod gtm_helper;
pub mod report_service;
pub mod setup_service;

pub use gtm_helper::{GTM_HELPER_FILE, build_gtm_helper, save_gtm_helper};
pub use report_service::{ReportOutcome, ReportService};
pub use setup_service::{
    CANONICAL_DIMENSIONS, DimensionDef, SETUP_REPORT_FILE, SetupReport, SetupService,
    SetupSummary, SyncOutcome,
};
