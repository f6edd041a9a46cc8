//! Command-line interface for the stampost log enrichment toolkit.
//!
//! The `stampost` binary wires [`cli`] argument parsing to the handlers in
//! [`commands`], rendering every result through [`output`] as either
//! human-readable text or machine-readable JSON.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
