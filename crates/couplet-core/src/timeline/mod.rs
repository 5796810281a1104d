//! Dual-track timeline placement.
//!
//! This module provides:
//! - The timezone-aware date-matching predicate ("does this event occur on
//!   this calendar date?")
//! - Partitioning of a combined event set into user/partner tracks for
//!   side-by-side rendering

mod matching;
mod tracks;

pub use matching::{occurs_on, resolve_zone};
pub use tracks::{split_tracks, TimelineTracks};
