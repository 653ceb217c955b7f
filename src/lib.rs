//! Wedding RSVP collection and guest-list management.
//!
//! The core of the crate is the guest-record reconciliation engine:
//! keeping a roster of per-guest entries synchronized with head counts
//! during form entry, merging two storage generations (flat legacy
//! records and family records with embedded guest arrays) into one
//! uniform view, removing single embedded guests while keeping the
//! aggregate counts consistent, and reducing the merged view into
//! summary statistics.

pub mod admin;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
