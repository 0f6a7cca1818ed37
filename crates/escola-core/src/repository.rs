//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Lookups that may legitimately
//! miss return `Ok(None)`; `Err` is reserved for storage failures and
//! constraint violations.

use crate::error::EscolaResult;
use crate::models::account::{Account, AccountId, CreateAccount, Role};

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

pub trait AccountRepository: Send + Sync {
    fn find_by_id(
        &self,
        id: AccountId,
    ) -> impl Future<Output = EscolaResult<Option<Account>>> + Send;

    /// Look up by login credential: email (case-insensitive) or
    /// national id (exact).
    fn find_by_credential(
        &self,
        identifier: &str,
    ) -> impl Future<Output = EscolaResult<Option<Account>>> + Send;

    /// Store a freshly computed credential hash and commit it.
    fn persist_new_hash(
        &self,
        id: AccountId,
        password_hash: String,
    ) -> impl Future<Output = EscolaResult<()>> + Send;

    fn create(&self, input: CreateAccount) -> impl Future<Output = EscolaResult<Account>> + Send;

    /// Soft-delete (`false`) or reactivate (`true`) an account.
    fn set_active(
        &self,
        id: AccountId,
        active: bool,
    ) -> impl Future<Output = EscolaResult<Account>> + Send;

    fn set_role(
        &self,
        id: AccountId,
        role: Role,
    ) -> impl Future<Output = EscolaResult<Account>> + Send;
}
