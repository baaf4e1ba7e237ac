//! Token persistence and validity.
//!
//! # Design
//! `TokenData` is the single record the client ever persists. Storage goes
//! through the [`TokenStore`] trait so hosts can back it with whatever
//! key-value mechanism they have (app preferences, a config file); the
//! bundled [`MemoryTokenStore`] covers tests and short-lived processes.
//! The store also holds the `switch_account_required` flag, which this
//! client persists but never interprets.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Safety margin subtracted from / added to expiry comparisons so a token
/// about to lapse mid-request is already treated as expired.
pub const TOKEN_VALIDITY_MARGIN_SECS: i64 = 10;

/// The cached OAuth access token and its absolute expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenData {
    pub token: String,
    pub expire_epoch_seconds: i64,
}

impl TokenData {
    /// True iff the token is still usable at `now_epoch` (seconds), with
    /// the 10-second safety margin applied.
    pub fn is_valid_at(&self, now_epoch: i64) -> bool {
        self.expire_epoch_seconds > now_epoch + TOKEN_VALIDITY_MARGIN_SECS
    }
}

/// Narrow persistence seam for the token record and the account-switch flag.
///
/// Implementations decide durability and concurrent-access guarantees;
/// the client performs no locking around reads and writes. `clear_token_data`
/// must be idempotent.
pub trait TokenStore: Send + Sync {
    fn token_data(&self) -> Option<TokenData>;
    fn store_token_data(&self, data: &TokenData);
    fn clear_token_data(&self);
    fn switch_account_required(&self) -> bool;
    fn set_switch_account_required(&self, required: bool);
}

#[derive(Default)]
struct MemoryInner {
    token: Option<TokenData>,
    switch_account_required: bool,
}

/// In-process `TokenStore` with no durability.
#[derive(Default)]
pub struct MemoryTokenStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn token_data(&self) -> Option<TokenData> {
        self.inner.lock().unwrap().token.clone()
    }

    fn store_token_data(&self, data: &TokenData) {
        self.inner.lock().unwrap().token = Some(data.clone());
    }

    fn clear_token_data(&self) {
        self.inner.lock().unwrap().token = None;
    }

    fn switch_account_required(&self) -> bool {
        self.inner.lock().unwrap().switch_account_required
    }

    fn set_switch_account_required(&self, required: bool) {
        self.inner.lock().unwrap().switch_account_required = required;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(expire: i64) -> TokenData {
        TokenData {
            token: "T".to_string(),
            expire_epoch_seconds: expire,
        }
    }

    #[test]
    fn validity_boundary() {
        let now = 1_700_000_000;
        assert!(!token(now + 10).is_valid_at(now), "e == now+10 must be invalid");
        assert!(token(now + 11).is_valid_at(now), "e == now+11 must be valid");
    }

    #[test]
    fn expired_token_is_invalid() {
        let now = 1_700_000_000;
        assert!(!token(now - 1).is_valid_at(now));
    }

    #[test]
    fn token_data_roundtrips_through_json() {
        let data = token(42);
        let json = serde_json::to_string(&data).unwrap();
        let back: TokenData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn memory_store_stores_and_clears() {
        let store = MemoryTokenStore::new();
        assert!(store.token_data().is_none());

        store.store_token_data(&token(99));
        assert_eq!(store.token_data(), Some(token(99)));

        store.clear_token_data();
        assert!(store.token_data().is_none());
    }

    #[test]
    fn clearing_twice_is_idempotent() {
        let store = MemoryTokenStore::new();
        store.clear_token_data();
        store.clear_token_data();
        assert!(store.token_data().is_none());
    }

    #[test]
    fn switch_account_flag_defaults_false_and_persists() {
        let store = MemoryTokenStore::new();
        assert!(!store.switch_account_required());
        store.set_switch_account_required(true);
        assert!(store.switch_account_required());
        store.set_switch_account_required(false);
        assert!(!store.switch_account_required());
    }
}
