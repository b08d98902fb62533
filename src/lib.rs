pub mod config;
pub mod converter;
