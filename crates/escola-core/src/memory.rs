//! In-process implementation of [`AccountRepository`].
//!
//! Backs tests and local tooling. Clones share the same underlying
//! store, so a handle kept by a test observes writes made through a
//! service that owns another handle.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{EscolaError, EscolaResult};
use crate::models::account::{Account, AccountId, CreateAccount, Role};
use crate::repository::AccountRepository;

#[derive(Debug, Default)]
struct Store {
    next_id: AccountId,
    accounts: HashMap<AccountId, Account>,
}

impl Store {
    fn get_mut(&mut self, id: AccountId) -> EscolaResult<&mut Account> {
        self.accounts
            .get_mut(&id)
            .ok_or_else(|| EscolaError::account_not_found(id))
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.accounts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn matches_email(account: &Account, identifier: &str) -> bool {
    account.email.eq_ignore_ascii_case(identifier)
}

fn matches_national_id(account: &Account, identifier: &str) -> bool {
    account.national_id.as_deref() == Some(identifier)
}

fn matches_credential(account: &Account, identifier: &str) -> bool {
    matches_email(account, identifier) || matches_national_id(account, identifier)
}

impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_id(&self, id: AccountId) -> EscolaResult<Option<Account>> {
        Ok(self.store.read().await.accounts.get(&id).cloned())
    }

    async fn find_by_credential(&self, identifier: &str) -> EscolaResult<Option<Account>> {
        let identifier = identifier.trim();
        let store = self.store.read().await;
        // Email wins over national id.
        let found = store
            .accounts
            .values()
            .find(|a| matches_email(a, identifier))
            .or_else(|| {
                store
                    .accounts
                    .values()
                    .find(|a| matches_national_id(a, identifier))
            });
        Ok(found.cloned())
    }

    async fn persist_new_hash(&self, id: AccountId, password_hash: String) -> EscolaResult<()> {
        let mut store = self.store.write().await;
        let account = store.get_mut(id)?;
        account.password_hash = password_hash;
        account.updated_at = Some(Utc::now());
        Ok(())
    }

    async fn create(&self, input: CreateAccount) -> EscolaResult<Account> {
        let mut store = self.store.write().await;

        // Both identifiers share one login namespace, so each is checked
        // against every existing email and national id.
        let taken = store.accounts.values().any(|a| {
            matches_credential(a, &input.email)
                || input
                    .national_id
                    .as_deref()
                    .is_some_and(|nid| matches_credential(a, nid))
        });
        if taken {
            return Err(EscolaError::AlreadyExists {
                entity: "account".into(),
            });
        }

        store.next_id += 1;
        let account = Account {
            id: store.next_id,
            email: input.email,
            national_id: input.national_id,
            full_name: input.full_name,
            password_hash: input.password_hash,
            role: input.role,
            active: true,
            created_at: Utc::now(),
            updated_at: None,
        };
        store.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn set_active(&self, id: AccountId, active: bool) -> EscolaResult<Account> {
        let mut store = self.store.write().await;
        let account = store.get_mut(id)?;
        account.active = active;
        account.updated_at = Some(Utc::now());
        Ok(account.clone())
    }

    async fn set_role(&self, id: AccountId, role: Role) -> EscolaResult<Account> {
        let mut store = self.store.write().await;
        let account = store.get_mut(id)?;
        account.role = role;
        account.updated_at = Some(Utc::now());
        Ok(account.clone())
    }
}
