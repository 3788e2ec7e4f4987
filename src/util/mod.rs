// src/util/mod.rs
// Stateless formatting helpers shared by the text and JSON reports
// RELEVANT FILES: src/util/size_format.rs, src/util/flag_format.rs, src/report.rs

pub mod flag_format;
pub mod size_format;

pub use flag_format::{format_flags, FlagDomain};
pub use size_format::format_size;
