pub mod registry;
pub mod validator;

pub use registry::*;
pub use validator::*;
