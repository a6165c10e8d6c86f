pub mod antibias;
pub mod error;
pub mod performance;
pub mod policy;
pub mod pool;
pub mod selector;

pub use antibias::*;
pub use error::*;
pub use performance::*;
pub use policy::*;
pub use pool::*;
pub use selector::*;
