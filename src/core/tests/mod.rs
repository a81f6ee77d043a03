//! Core module tests
//!
//! Contains test suites for core functionality:
//! - Conflict lookup and auditing tests
//! - Shortcut text and manifest parser tests
//! - Key and identity validation tests
//! - Type tests (Shortcut, ActionId)
//! - Assignment engine and undo history tests
//! - Tree projection and filter tests

#[cfg(test)]
mod engine_tests;
#[cfg(test)]
mod parser_tests;
#[cfg(test)]
mod validator_tests;
