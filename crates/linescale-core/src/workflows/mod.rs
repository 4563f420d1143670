//! # Workflows Module
//!
//! High-level entry points that take a complete line list through scaling.
//!
//! - **Scaling Workflow** ([`scale`]) - Splits mixed-molecule tables, scales each
//!   molecule with a shared partition function cache and reassembles the result
//!   in input order.

pub mod scale;
