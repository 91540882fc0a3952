//! Vanilla policy-gradient (REINFORCE) training built on the
//! [burn](https://burn.dev) deep learning framework.
//!
//! The crate trains a parametric policy to maximize cumulative reward by
//! gradient ascent on `Σ_t log π(a_t | o_t) · advantage_t`, with optional
//! reward-to-go discounting, a learned baseline and advantage normalization.
//!
//! The moving parts:
//! - [`env::Environment`]: the reset/step interface the rollout code drives
//! - [`policy`]: categorical and diagonal-Gaussian policy heads
//! - [`algo::pg`]: trajectory collection, return/advantage estimation and the
//!   parameter-update protocol
//! - [`gym`]: small self-contained demo environments
//! - [`checkpoint`] / [`metrics`]: best-model persistence and per-iteration
//!   tabular logging

pub mod algo;
pub mod checkpoint;
pub mod env;
pub mod error;
pub mod gym;
pub mod metrics;
pub mod nn;
pub mod policy;
pub mod traits;
