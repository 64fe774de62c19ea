pub mod models;
pub mod store;
pub mod registrar;
pub mod errors;

pub use models::*;
pub use store::*;
pub use registrar::*;
pub use errors::*;
