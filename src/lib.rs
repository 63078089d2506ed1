//! Property listing filter and undervaluation detector.
//!
//! Loads a listing export, normalises its columns, applies user filter
//! criteria and flags listings whose price per square foot falls well below
//! the trend fitted against size.

pub mod analysis;
pub mod cli;
pub mod data;
pub mod error;
pub mod report;
pub mod state;
