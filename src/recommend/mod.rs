pub mod prompt;
pub mod parse;
pub mod adapter;

pub use adapter::RecommendationAdapter;
pub use parse::{estimated_savings, parse_recommendation, parse_savings_percent};
