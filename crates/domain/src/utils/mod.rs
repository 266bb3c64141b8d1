//! Pure helper functions with no I/O.

pub mod text;
