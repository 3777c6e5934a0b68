//! # Tracing Setup
//!
//! Structured logging for binaries built on the store actors. Every store logs with an
//! `entity_type` field (`InventoryItem`, `Rental`, ...), so module paths are left out of the
//! output.
//!
//! Verbosity is controlled with `RUST_LOG`:
//!
//! - `RUST_LOG=info` - creates, actions and lifecycle transitions
//! - `RUST_LOG=debug` - adds every request with its payload
//! - `RUST_LOG=rental_service=debug,store_actor=info` - per-crate levels
//!
//! A typical reservation at `info` level:
//!
//! ```text
//! INFO reserve: Claimed item item_7f3a...
//! INFO Created entity_type="Rental" id=rental_0c1d... size=1
//! ```

/// Installs a global `fmt` subscriber filtered by `RUST_LOG`.
///
/// Panics if a global subscriber is already installed; call it once, from `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}

/// Like [`setup_tracing`] but tolerates an existing subscriber and writes through the test
/// harness, so it can be called from every test.
pub fn setup_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
