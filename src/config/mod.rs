//! Configuration
//!
//! Optional YAML file tuning the guidance session: tick period, suit slot,
//! simulator toggle, and observability outputs. Command-line flags override
//! file values.

pub mod loader;
pub mod schema;

pub use loader::{ConfigLoader, parse_tick_interval};
pub use schema::{ConfigFile, DEFAULT_TICK_INTERVAL, IngressConfig};
