//! Spreadsheet orchestration: ports, the operation builder, the access gate
//! and transport error classification.

pub mod access;
pub mod builder;
pub mod errors;
pub mod ports;
