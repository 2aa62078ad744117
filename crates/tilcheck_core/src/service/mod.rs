//! Use-case services orchestrating scan, parse and report.
//!
//! # Responsibility
//! - Compose the scanner, index parser and reporter into one run.
//! - Translate layer errors into one fatal `CheckError`.

pub mod check_service;
