// src/lib.rs

//! ARCA: automated root-cause analysis for failed CI runs.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
