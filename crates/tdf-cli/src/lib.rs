// crates/tdf-cli/src/lib.rs
// ============================================================================
// Module: TDF Harness CLI Library
// Description: Collaborator assembly shared by the CLI binary and its tests.
// Purpose: Turn a validated configuration into a runnable harness.
// Dependencies: tdf-core, tdf-config, tdf-broker, tdf-providers, tdf-store-sqlite
// ============================================================================

//! ## Overview
//! The `tdf-harness` binary is a thin clap front end. Everything it runs is
//! assembled here so integration tests can drive the same wiring.

pub mod clock;
pub mod harness;

pub use clock::SystemClock;
pub use harness::Harness;
pub use harness::HarnessError;
pub use harness::Selection;
