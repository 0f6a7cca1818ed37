//! Escola Core: account model, repository traits, and shared error
//! types used by every other crate in the workspace.

pub mod error;
pub mod memory;
pub mod models;
pub mod repository;

pub use error::{EscolaError, EscolaResult};
pub use memory::InMemoryAccountRepository;
pub use models::account::{Account, AccountId, CreateAccount, Role};
pub use repository::AccountRepository;
