//! # Rental Service Library
//!
//! The lifecycle of equipment rentals: reservation, pickup, return, expiry and late-return
//! pendencies, on top of in-memory store actors.
//!
//! - [`model`] - records and typed ids
//! - [`inventory_actor`], [`rental_actor`], [`pendency_actor`], [`product_actor`] - the
//!   stores
//! - [`clients`] - typed wrappers that talk to the stores
//! - [`manager`] - [`RentalManager`](manager::RentalManager), the lifecycle rules
//! - [`lifecycle`] - [`RentalSystem`](lifecycle::RentalSystem), startup, recovery and
//!   shutdown
//! - [`config`], [`clock`], [`snapshot`] - policy, time and persistence

pub mod clients;
pub mod clock;
pub mod config;
pub mod inventory_actor;
pub mod lifecycle;
pub mod manager;
pub mod model;
pub mod pendency_actor;
pub mod product_actor;
pub mod rental_actor;
pub mod snapshot;
