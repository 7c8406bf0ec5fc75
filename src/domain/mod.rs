pub mod booking;
pub mod commands;
pub mod conflict;
pub mod errors;
pub mod interval;
pub mod policy;
pub mod validation;
pub mod value_objects;
pub mod visibility;

pub use booking::*;
pub use commands::*;
pub use conflict::*;
pub use errors::*;
pub use interval::*;
pub use policy::*;
pub use validation::*;
pub use value_objects::*;
pub use visibility::*;
