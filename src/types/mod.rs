//! Core identifier types shared by every module.

pub mod ids;

pub use ids::{InvalidRepoId, PrNumber, RepoId, Sha};
