//! services/api/src/lib.rs
//!
//! The quiz service: adapters for the core ports, configuration and the REST surface.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
