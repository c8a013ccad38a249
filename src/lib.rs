//! Printlinker - offline print campaign measurement
//!
//! Generates trackable QR codes for flyers and posters, configures a
//! Google Analytics 4 property for them and builds cost-per-acquisition
//! reports from the GA4 Data API.
//!
//! # Architecture
//! - `attribution`: campaign token and UTM-tagged landing URLs
//! - `qr`: QR code rendering and batch generation
//! - `platform`: GA4 Admin/Data REST clients and service account auth
//! - `analytics`: per-campaign metric aggregation
//! - `services`: property setup sync and report generation
//! - `interfaces`: command-line interface
//! - `config`: settings file, campaign list and platform config
//! - `system`: logging

pub mod analytics;
pub mod attribution;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod platform;
pub mod qr;
pub mod services;
pub mod system;
pub mod utils;
