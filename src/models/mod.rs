pub mod api;
pub mod generation;
pub mod tattoo;

pub use api::*;
pub use generation::*;
pub use tattoo::*;
