//! Report formatting

pub mod console;
