//! # System Lifecycle & Orchestration
//!
//! [`RentalSystem`] creates the store actors, wires their dependencies, hands their clients
//! to a [`RentalManager`](crate::manager::RentalManager), and runs the expiry sweeper.
//!
//! ## Dependency Injection via Context
//!
//! Actors are created without dependencies and receive them in `run(context)`. Only the
//! rental actor has one, the pendency ledger, which it consults before a delete:
//!
//! ```rust,ignore
//! let (pendency_actor, pendency_client) = pendency_actor::new(32);
//! let (rental_actor, rental_client) = rental_actor::new(32);
//!
//! tokio::spawn(pendency_actor.run(()));
//! tokio::spawn(rental_actor.run(pendency_client.clone()));
//! ```
//!
//! ## Graceful Shutdown
//!
//! 1. **Signal** - a `watch` channel flips to `true`; expiry timers and the sweeper exit
//! 2. **Drop all clients** - closes the sending side of every store channel
//! 3. **Actors drain** - each `run` loop ends when its channel is closed and empty
//! 4. **Await completion** - every actor task is joined
//!
//! The dependency graph is acyclic (rental -> pendency), so the pendency actor stops once
//! the rental actor has dropped its context.
//!
//! ## Recovery
//!
//! [`RentalSystem::restore`] starts from a [`Snapshot`](crate::snapshot::Snapshot) and
//! repairs what a stopped process leaves behind: expired holds are cancelled, late returns
//! charged, orphaned reservations released, and timers re-armed.

pub mod rental_system;

pub use rental_system::*;
