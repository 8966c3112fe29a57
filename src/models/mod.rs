pub mod metric;
pub mod forecast;
pub mod recommendation;
pub mod report;

pub use metric::*;
pub use forecast::*;
pub use recommendation::*;
pub use report::*;
