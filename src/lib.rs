pub mod colorfile;
pub mod config;
pub mod error;
pub mod pattern;
pub mod regions;
pub mod sweep;
pub mod thresholds;
pub mod toolchain;
