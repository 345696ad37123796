//! MaxKB Adapter
//!
//! Uniform knowledge base operations over a MaxKB deployment:
//! - Listing, lookup and similarity search across both upstream API generations
//! - Question answering on the dataset (v1) API
//! - Tool-style JSON surface with error objects instead of failures

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
