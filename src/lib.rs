//! # Excel Lab
//!
//! An AI-assisted Excel & data analysis training course: four modules of
//! theory grounded in a reference PDF, each paired with an interactive lab
//! that sends the learner's problem to a hosted model together with the
//! most relevant pages of that PDF.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌─────────────┐   ┌──────────────┐
//! │ Reference   │──▶│  Retriever  │──▶│ Prompt       │──▶ Gemini
//! │ PDF pages   │   │ (overlap)   │   │ assembly     │
//! └─────────────┘   └─────────────┘   └──────────────┘
//!                                            │
//!                      ┌─────────────────────┤
//!                      ▼                     ▼
//!                 ┌──────────┐          ┌──────────┐
//!                 │   CLI    │          │   HTTP   │
//!                 │  (lab)   │          │  (axum)  │
//!                 └──────────┘          └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! lab catalog                               # course outline
//! lab theory formulas 1                     # theory view with PDF excerpts
//! lab retrieve "xlookup blank" --explain    # inspect the retriever
//! lab lab formulas 3 --context "#N/A from VLOOKUP"
//! lab serve                                 # start HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`extract`] | PDF page extraction and cleanup |
//! | [`catalog`] | Course modules, theory, and lab definitions |
//! | [`llm`] | Generation client abstraction (Gemini) |
//! | [`lab`] | Lab submissions |
//! | [`search`] | Page inspection and retrieval commands |
//! | [`server`] | HTTP server |
//!
//! The retriever, prompt template, task controls, and response shapes live
//! in the `excel-lab-core` crate, which has no I/O.

pub mod catalog;
pub mod config;
pub mod extract;
pub mod lab;
pub mod llm;
pub mod search;
pub mod server;
