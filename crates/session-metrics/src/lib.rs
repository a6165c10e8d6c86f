pub mod metrics;
pub mod observer;

pub use metrics::*;
