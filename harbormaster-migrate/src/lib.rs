//! Harbormaster Migration Library
//!
//! Everything the `harbormaster-migrate` binary does apart from process exit codes
//! lives here, so it can be tested without a store.

pub mod catalog;
pub mod cli;
pub mod console;
pub mod options;
