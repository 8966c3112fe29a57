pub mod analysis;
pub mod cli;
pub mod config;
pub mod errors;
pub mod forecast;
pub mod generator;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod recommend;
pub mod reporting;
pub mod utils;
