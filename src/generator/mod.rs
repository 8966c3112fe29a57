pub mod synthetic;

pub use synthetic::{generate, resolve_seed, GeneratedData};
