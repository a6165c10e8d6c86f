pub mod clock;
pub mod control;
pub mod demo;
pub mod stimulus;
pub mod subject;

pub use clock::*;
pub use control::*;
pub use demo::*;
pub use stimulus::*;
pub use subject::*;
