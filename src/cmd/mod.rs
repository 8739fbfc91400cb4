pub mod plan;
pub mod sweep;
