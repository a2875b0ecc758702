use std::collections::HashMap;
use std::sync::OnceLock;

use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString, rand_core::OsRng,
};
use argon2::{Algorithm, Argon2, Params, Version};

use super::errors::UserError;
use super::types::User;

const DUMMY_PASSWORD: &str = "unknown-account-placeholder";

struct Account {
    user: User,
    /// PHC string, `$argon2id$...`
    password_hash: String,
}

/// In-memory account table keyed by account name
///
/// Passwords are kept as Argon2id PHC strings. Lookups of unknown accounts
/// still run one verification against a placeholder hash.
pub struct UserStore {
    accounts: HashMap<String, Account>,
    params: Params,
    dummy_hash: OnceLock<Option<String>>,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore {
    /// Store hashing with the Argon2id defaults (19 MiB, 2 iterations, 1 lane)
    pub fn new() -> Self {
        Self::with_params(Params::default())
    }

    pub fn with_params(params: Params) -> Self {
        Self {
            accounts: HashMap::new(),
            params,
            dummy_hash: OnceLock::new(),
        }
    }

    /// Store seeded with `user`/`user` and `admin`/`admin`
    pub fn with_demo_accounts() -> Self {
        let mut store = Self::new();
        for (account, is_admin) in [("user", false), ("admin", true)] {
            if let Err(e) = store.add_user(account, account, is_admin) {
                tracing::error!(account, "Failed to seed demo account: {e}");
            }
        }
        store
    }

    fn hasher(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    fn hash(&self, password: &str) -> Result<String, UserError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .hasher()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| UserError::Hashing(e.to_string()))?;
        Ok(hash.to_string())
    }

    fn password_matches(&self, password: &str, password_hash: &str) -> bool {
        match PasswordHash::new(password_hash) {
            Ok(parsed) => self
                .hasher()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::error!("Unreadable password hash: {e}");
                false
            }
        }
    }

    pub fn add_user(
        &mut self,
        account: &str,
        password: &str,
        is_admin: bool,
    ) -> Result<User, UserError> {
        if account.is_empty() {
            return Err(UserError::InvalidData("Account cannot be empty".to_string()));
        }
        if account.contains(':') {
            return Err(UserError::InvalidData(
                "Account cannot contain ':'".to_string(),
            ));
        }
        if self.accounts.contains_key(account) {
            return Err(UserError::AlreadyExists(account.to_string()));
        }

        let password_hash = self.hash(password)?;
        let id = uuid::Uuid::new_v4().to_string();
        let user = User::new(id, account.to_string(), account.to_string(), is_admin);

        tracing::debug!(account, is_admin, "Adding account");
        self.accounts.insert(
            account.to_string(),
            Account {
                user: user.clone(),
                password_hash,
            },
        );
        Ok(user)
    }

    pub fn get_user(&self, id: &str) -> Option<User> {
        self.accounts
            .values()
            .find(|a| a.user.id == id)
            .map(|a| a.user.clone())
    }

    pub fn get_user_by_account(&self, account: &str) -> Result<User, UserError> {
        self.accounts
            .get(account)
            .map(|a| a.user.clone())
            .ok_or(UserError::NotFound)
    }

    /// Returns the user when the account exists and the password matches
    pub fn verify_credentials(&self, account: &str, password: &str) -> Option<User> {
        let Some(stored) = self.accounts.get(account) else {
            let dummy = self
                .dummy_hash
                .get_or_init(|| self.hash(DUMMY_PASSWORD).ok());
            if let Some(dummy) = dummy {
                std::hint::black_box(self.password_matches(password, dummy));
            }
            return None;
        };

        self.password_matches(password, &stored.password_hash)
            .then(|| stored.user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fast_store() -> UserStore {
        UserStore::with_params(Params::new(Params::MIN_M_COST, 1, 1, None).unwrap())
    }

    #[test]
    fn test_demo_accounts() {
        let store = UserStore::with_demo_accounts();

        let user = store.verify_credentials("user", "user").expect("user login");
        assert!(!user.is_admin);
        assert_eq!(user.account, "user");

        let admin = store.verify_credentials("admin", "admin").expect("admin login");
        assert!(admin.is_admin);
        assert_ne!(user.id, admin.id);
    }

    #[test]
    fn test_wrong_password_rejected() {
        let mut store = fast_store();
        store.add_user("admin", "admin", true).expect("insert");
        assert!(store.verify_credentials("admin", "user").is_none());
        assert!(store.verify_credentials("admin", "").is_none());
    }

    #[test]
    fn test_unknown_account_checks_placeholder_hash() {
        let store = fast_store();
        assert!(store.dummy_hash.get().is_none());

        assert!(store.verify_credentials("root", "root").is_none());
        let dummy = store.dummy_hash.get().expect("initialized").as_deref();
        assert!(dummy.is_some_and(|h| h.starts_with("$argon2id$")));
        // the placeholder password itself never logs anyone in
        assert!(store.verify_credentials("root", DUMMY_PASSWORD).is_none());
    }

    #[test]
    fn test_passwords_stored_as_salted_phc_strings() {
        let mut store = fast_store();
        store.add_user("a", "same", false).expect("insert");
        store.add_user("b", "same", false).expect("insert");

        let a = &store.accounts["a"].password_hash;
        let b = &store.accounts["b"].password_hash;
        assert!(a.starts_with("$argon2id$v=19$"));
        assert!(!a.contains("same"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_corrupt_hash_never_verifies() {
        let mut store = fast_store();
        store.add_user("eve", "pw", false).expect("insert");
        store
            .accounts
            .get_mut("eve")
            .expect("account")
            .password_hash = "not a phc string".to_string();

        assert!(store.verify_credentials("eve", "pw").is_none());
    }

    #[test]
    fn test_duplicate_account() {
        let mut store = fast_store();
        store.add_user("alice", "pw", false).expect("first insert");

        let result = store.add_user("alice", "other", true);
        assert!(matches!(result, Err(UserError::AlreadyExists(a)) if a == "alice"));
    }

    #[test]
    fn test_invalid_account_names() {
        let mut store = fast_store();
        assert!(matches!(
            store.add_user("", "pw", false),
            Err(UserError::InvalidData(_))
        ));
        assert!(matches!(
            store.add_user("a:b", "pw", false),
            Err(UserError::InvalidData(_))
        ));
    }

    #[test]
    fn test_get_user_by_id_and_account() {
        let mut store = fast_store();
        let alice = store.add_user("alice", "pw", false).expect("insert");

        assert_eq!(store.get_user(&alice.id), Some(alice.clone()));
        assert!(store.get_user("missing").is_none());
        assert_eq!(store.get_user_by_account("alice").expect("found"), alice);
        assert!(matches!(
            store.get_user_by_account("bob"),
            Err(UserError::NotFound)
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_only_exact_password_verifies(password in "[ -~]{0,24}", other in "[ -~]{0,24}") {
            let mut store = fast_store();
            store.add_user("carol", &password, false).expect("insert");

            prop_assert!(store.verify_credentials("carol", &password).is_some());
            if other != password {
                prop_assert!(store.verify_credentials("carol", &other).is_none());
            }
        }
    }
}
