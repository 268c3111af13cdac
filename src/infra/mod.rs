pub mod config;
pub mod legacy;
