//! Command implementations.

pub mod check;
pub mod run;
pub mod scan;
