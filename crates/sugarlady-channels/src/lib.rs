//! # sugarlady-channels
//!
//! Chat-platform adapters for Sugarlady.

pub mod line;
