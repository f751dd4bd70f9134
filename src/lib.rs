pub mod air_quality;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod error;
pub mod geocode;
pub mod panels;
pub mod projection;
pub mod rng;
pub mod service;
pub mod session;
pub mod weather;
pub mod web;

pub use config::{Config, Variant};
pub use error::{Error, Result};
pub use service::ClimateService;
pub use session::Session;

/// Sent with every outbound request; Nominatim's usage policy requires
/// an identifying agent string.
pub const USER_AGENT: &str = "genmap-climate/0.1";
