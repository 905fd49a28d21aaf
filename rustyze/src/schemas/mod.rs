pub mod common;
pub mod vehicle;
