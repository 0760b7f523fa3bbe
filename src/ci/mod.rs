//! CI status lookups.
//!
//! A reqwest-backed interpreter for [`CiEffect`](crate::effects::CiEffect)
//! against a Travis-style API, plus the badge/build links derived from a build.

mod client;

pub use client::{CiError, TravisClient, build_badge};
