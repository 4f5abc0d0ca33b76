#![forbid(unsafe_code)]

//! Core parsing and name-resolution pipeline for liftmap.
//!
//! This crate provides:
//! - Domain types (catalog entries, parsed lines, workouts)
//! - Exercise catalog with JSON persistence
//! - Name normalization and fuzzy matching
//! - Ordered-rule line parser and workout assembler
//! - Repeat/step structure and the remote-service payload

pub mod types;
pub mod error;
pub mod normalize;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod matcher;
pub mod parser;
pub mod assembler;
pub mod steps;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::Catalog;
pub use config::Config;
pub use normalize::normalize;
pub use matcher::{Matcher, SearchHit};
pub use parser::{LineParser, ParserDefaults};
pub use assembler::WorkoutAssembler;
pub use steps::{to_step_structure, StepStructure};
pub use export::WorkoutPayload;
