//! The collection of implemented algorithms.

pub mod line_search;
pub mod powell;

pub use powell::Powell;
