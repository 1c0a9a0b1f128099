//! gudangsoal-core — Question model, grading engine, and attempt state.
//!
//! This crate defines the question data model, the validator that decides
//! whether a record is gradeable, the pure grading engine, and the attempt
//! state machine that the rest of gudangsoal builds on.

pub mod attempt;
pub mod error;
pub mod grading;
pub mod model;
pub mod parser;
pub mod report;
pub mod traits;
pub mod validator;
pub mod view;
