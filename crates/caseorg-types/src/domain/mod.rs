pub mod case;
pub mod note;
pub mod path;
pub mod record;

pub use case::*;
pub use note::*;
pub use path::*;
pub use record::*;
