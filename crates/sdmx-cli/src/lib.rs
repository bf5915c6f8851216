//! Shared pieces of the `sdmx` binary.

pub mod logging;
pub mod render;
