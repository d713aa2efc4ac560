//! CLI infrastructure for the Quarto training toolkit
//!
//! This module provides the command-line interface for training, playing and
//! evaluating Quarto agents.

pub mod commands;
pub mod output;
