//! SQLite-backed local storage for MilleBit Pay
//!
//! Persists the app's key-value schema (cards, credentials, access code,
//! first-run marker, biometric flag, payment history) in a single `kv`
//! table, byte-compatible with the mobile app's existing entries. Values
//! are stored in plaintext by design; there is no encryption layer here.
//!
//! All multi-step writers go through [`KvStore::update`], which runs the
//! read-modify-write cycle inside one SQLite transaction while holding the
//! connection lock, so concurrent savers cannot lose each other's writes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod card_store;
pub mod credential_store;
pub mod database;
pub mod error;
pub mod kv;
pub mod settings;
pub mod transaction_store;

pub use card_store::CardStore;
pub use credential_store::{CredentialStore, StoredCredentials, ACCESS_CODE_LEN};
pub use database::{default_database_path, Database, SCHEMA_VERSION};
pub use error::{Error, Result};
pub use kv::{keys, KvStore};
pub use settings::SettingsStore;
pub use transaction_store::{PaymentMethod, PaymentRecord, TransactionStore};
