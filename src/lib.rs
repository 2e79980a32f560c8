//! Taskkeeper Server Library
//!
//! This module exports the core components for testing and integration.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod service;
pub mod store;
pub mod types;
