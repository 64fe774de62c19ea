//! Registrar - create-if-absent user registration
//!
//! This crate provides a unified API for the registrar workspace.
//!
//! # Example
//!
//! ```ignore
//! use registrar::{InMemoryUserStore, NewUser, UserRegistrar};
//!
//! let registrar = UserRegistrar::new(Arc::new(InMemoryUserStore::new()));
//! let record = registrar.register_user(NewUser::new("u1").with_name("Ann")).await?;
//! ```

// Re-export core types
pub use registrar_core::errors::{ErrorKind, RegistrationError, RegistrationResult, StoreError};
pub use registrar_core::models::{NewUser, UserRecord};
pub use registrar_core::registrar::UserRegistrar;
pub use registrar_core::store::{InMemoryUserStore, UserStore, WriteMode};

// Re-export server types
pub use registrar_server::config::ServerConfig;
pub use registrar_server::dynamo::DynamoUserStore;
pub use registrar_server::{router, AppState as Server};
