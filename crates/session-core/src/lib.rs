pub mod active_hours;
pub mod condition;
pub mod error;
pub mod history;
pub mod params;
pub mod timer;

pub use active_hours::*;
pub use condition::*;
pub use error::*;
pub use history::*;
pub use params::*;
pub use timer::*;
