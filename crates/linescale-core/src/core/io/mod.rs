//! Reading line lists and writing scaled line lists.
//!
//! The scaler itself never touches files; these adapters turn delimited text
//! into [`LineRecord`](crate::core::models::line::LineRecord)s, rejecting
//! incomplete rows up front, and write results back with all original
//! columns preserved.

pub mod csv_lines;
pub mod table;
pub mod traits;
