//! # Excel Lab Core
//!
//! Shared, I/O-free logic for Excel Lab: keyword page retrieval, the page
//! collection, prompt assembly, task controls, and the closed set of lab
//! response shapes.
//!
//! This crate contains no tokio, HTTP client, PDF, or filesystem
//! dependencies. Everything here is a pure function of its inputs.

pub mod controls;
pub mod error;
pub mod pages;
pub mod prompt;
pub mod response;
pub mod retrieve;
