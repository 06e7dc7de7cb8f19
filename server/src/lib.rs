pub mod browser;
pub mod catalog;
pub mod config;
pub mod http;
pub mod quote;
pub mod render;
pub mod services;
pub mod utils;
