pub mod domain;
pub mod query;
pub mod wire;

pub use domain::*;
pub use query::*;
pub use wire::*;
