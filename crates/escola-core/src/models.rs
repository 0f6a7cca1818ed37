//! Domain models for Escola.
//!
//! Only the account record is modelled here; the school entities
//! (classes, subjects, news, ...) live with the persistence layer.

pub mod account;
