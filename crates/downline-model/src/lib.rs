//! Downline Model - member records and the binary organization tree.
//!
//! Implements the core data model for a binary-placement referral
//! organization: each member sponsors at most two direct downline
//! members, labeled "left" and "right". The tree is arena-backed and
//! all team metrics are derived from it rather than stored.

pub mod error;
pub mod member;
pub mod roster;
pub mod sample;
pub mod tree;

pub use error::*;
pub use member::*;
pub use roster::*;
pub use sample::sample_tree;
pub use tree::*;
