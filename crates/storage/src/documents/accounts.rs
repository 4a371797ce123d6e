//! Account collection with its unique email index.

use mappin_core::traits::{IdentityDirectory, RenameOutcome};
use mappin_core::types::{AccountRecord, Location, Uid};
use mappin_core::{MappinError, MappinResult};

use super::DocumentStore;

impl IdentityDirectory for DocumentStore {
    fn exists(&self, uid: &Uid) -> MappinResult<bool> {
        self.read("exists", |t| Ok(t.accounts.contains_key(uid)))
    }

    fn account(&self, uid: &Uid) -> MappinResult<Option<AccountRecord>> {
        self.read("account", |t| Ok(t.accounts.get(uid).cloned()))
    }

    fn account_by_email(&self, email: &str) -> MappinResult<Option<AccountRecord>> {
        self.read("account_by_email", |t| {
            Ok(t.emails.get(email).and_then(|uid| t.accounts.get(uid)).cloned())
        })
    }

    fn insert_account(&self, account: AccountRecord) -> MappinResult<()> {
        self.write("insert_account", |t| {
            if t.emails.contains_key(&account.email) {
                return Err(MappinError::conflict("Email already in use."));
            }
            if t.accounts.contains_key(&account.uid) {
                return Err(MappinError::conflict(format!(
                    "account {} already exists",
                    account.uid
                )));
            }
            t.emails.insert(account.email.clone(), account.uid.clone());
            t.accounts.insert(account.uid.clone(), account);
            Ok(())
        })
    }

    fn mark_validated(&self, uid: &Uid) -> MappinResult<bool> {
        self.write("mark_validated", |t| {
            Ok(t.accounts.get_mut(uid).map(|a| a.validated = true).is_some())
        })
    }

    fn touch_last_access(&self, uid: &Uid, at: i64) -> MappinResult<bool> {
        self.write("touch_last_access", |t| {
            Ok(t.accounts.get_mut(uid).map(|a| a.last_access = at).is_some())
        })
    }

    fn update_username(
        &self,
        uid: &Uid,
        username: &str,
        expected_changed: i64,
        at: i64,
    ) -> MappinResult<RenameOutcome> {
        self.write("update_username", |t| {
            let Some(a) = t.accounts.get_mut(uid) else {
                return Ok(RenameOutcome::Missing);
            };
            if a.last_changed_name != expected_changed {
                return Ok(RenameOutcome::Stale);
            }
            a.username = username.to_string();
            a.last_changed_name = at;
            Ok(RenameOutcome::Renamed)
        })
    }

    fn update_location(&self, uid: &Uid, location: Location) -> MappinResult<bool> {
        self.write("update_location", |t| {
            Ok(t.accounts.get_mut(uid).map(|a| a.location = Some(location)).is_some())
        })
    }

    fn update_image(&self, uid: &Uid, url: &str) -> MappinResult<bool> {
        self.write("update_image", |t| {
            Ok(t
                .accounts
                .get_mut(uid)
                .map(|a| a.image = Some(url.to_string()))
                .is_some())
        })
    }
}
