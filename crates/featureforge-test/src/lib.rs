//! Shared test fixtures for FeatureForge crates.
//!
//! This crate provides ready-made feature models for testing.
//! It depends only on `featureforge-core`, so every other crate can use it
//! as a dev-dependency.
//!
//! - [`car`] - The car product line used across the test suites
//! - [`groups`] - Small models exercising one group kind each
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! featureforge-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```
//! use featureforge_test::car::car_model;
//! use featureforge_core::HasFeatureTree;
//!
//! let car = car_model();
//! assert_eq!(car.model.feature_names()[0], "Car");
//! ```

pub mod car;
pub mod groups;

pub use car::{car_model, CarModel};
pub use groups::{alternative_model, cardinality_model, fresh_model, or_model, single_child_chain, GroupModel};
