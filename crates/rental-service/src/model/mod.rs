//! # Domain Model
//!
//! Plain data records owned by the store actors, their creation/update payloads, and the
//! typed identifiers that tie them together. The lifecycle rules that only depend on a single
//! record (pickup code normalization, lateness assessment) live next to the record.

mod ids;
mod inventory;
mod pendency;
mod product;
mod rental;

pub use ids::*;
pub use inventory::*;
pub use pendency::*;
pub use product::*;
pub use rental::*;
