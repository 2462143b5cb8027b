//! # Prompt Template Modules
//!
//! This module organizes all prompt templates used throughout the `geomind` library.
//! It is divided into sub-modules based on the context or purpose of the prompts.

pub mod tasks;
pub mod vision;
