pub mod config;
pub mod process;
pub mod resize;
pub mod stats;
