//! Utility functions shared by the pipeline stages
//!
//! This module provides logging and progress helpers.

pub mod logging;
