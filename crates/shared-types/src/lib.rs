//! # Shared Types Crate
//!
//! This crate contains the domain entities every Agora crate speaks: the
//! persisted [`Post`], its sender and kind, the agent [`MaturityTier`] and the
//! [`TimeSource`] port used for deterministic timestamps.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: the feed schema is defined here and nowhere else.
//! - **Storage-assigned ordering**: `(created_at, id)` is only ever produced by
//!   a feed store; callers submit a [`NewPost`] draft without either field.

pub mod entities;
pub mod errors;
pub mod time;

pub use entities::*;
pub use errors::*;
pub use time::{ManualTimeSource, SystemTimeSource, TimeSource, Timestamp, HOUR_MS};
