pub mod memory;
pub mod models;
pub mod store;

pub use memory::MemoryCredentialStore;
pub use store::{CredentialStore, DuplicateField, PgCredentialStore, StoreError};
