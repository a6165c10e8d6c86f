pub mod adapters;
pub mod context;
pub mod control;
pub mod error;
pub mod experiment;
pub mod machine;
pub mod states;

pub use adapters::*;
pub use context::*;
pub use control::*;
pub use error::*;
pub use experiment::*;
pub use machine::*;
pub use states::*;
