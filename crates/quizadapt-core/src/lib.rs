//! quizadapt-core — Adaptive difficulty controller, scoring, and analytics.
//!
//! This crate defines the data model, the bootstrap difficulty classifier,
//! the bounded per-user history, and the engine that binds them to a
//! persistence collaborator.

pub mod classifier;
pub mod controller;
pub mod engine;
pub mod error;
pub mod features;
pub mod history;
pub mod model;
pub mod scoring;
pub mod statistics;
pub mod teach_back;
pub mod traits;
