// crates/tdf-config/src/lib.rs
// ============================================================================
// Module: TDF Harness Config
// Description: Configuration model for the TDF harness.
// Purpose: Load and validate harness settings from TOML.
// Dependencies: tdf-core, tdf-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Harness configuration lives in one TOML file. Loading enforces size,
//! encoding, and path limits before deserializing, then validates every
//! section. Invalid configuration fails closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::CONFIG_ENV_VAR;
pub use config::CaptureConfig;
pub use config::ConfigError;
pub use config::DEFAULT_CONFIG_NAME;
pub use config::DeviceConfig;
pub use config::ExecutionConfig;
pub use config::HarnessConfig;
pub use config::LoggingConfig;
pub use config::MAX_CONFIG_FILE_SIZE;
pub use config::StoreConfig;
pub use config::StoreType;
pub use config::TestsConfig;
