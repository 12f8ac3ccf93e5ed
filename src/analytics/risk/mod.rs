//! Detectors that run over the open-PR population.

pub mod ghost;
pub mod hero;
pub mod stale;

pub use ghost::{ghost_reviewers, GhostReviewer, GHOST_AFTER};
pub use hero::{hero_load, HeroReport, LoadLevel, ReviewerLoad};
pub use stale::{stale_prs, StalePr, STALE_AFTER};
