pub mod common;
pub mod meter;
pub mod modules;
pub mod schemas;

pub use chrono;
