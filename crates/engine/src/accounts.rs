//! Account lifecycle: signup, email validation, login, logout, username
//! changes and the profile (location and image).

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use mappin_core::traits::{BlobStore, CredentialHasher, IdentityDirectory, Mailer, RenameOutcome};
use mappin_core::validation::{check_username, Credentials, NewAccount, Validate};
use mappin_core::{
    AccountRecord, Location, MappinError, MappinResult, ServiceConfig, TokenKind, Uid,
};
use mappin_security::{SessionManager, TokenPair, ValidationCodes};

const INVALID_LOGIN: &str = "Invalid login data";
const NOT_VALIDATED: &str =
    "Account is not validated. Please check your email to confirm your account";
const CONFIRM_SUBJECT: &str = "Confirm your account";

/// Account operations over the identity directory.
pub struct AccountService {
    directory: Arc<dyn IdentityDirectory>,
    hasher: Arc<dyn CredentialHasher>,
    mailer: Arc<dyn Mailer>,
    blobs: Arc<dyn BlobStore>,
    codes: Arc<ValidationCodes>,
    sessions: Arc<SessionManager>,
    validation_url: String,
    cooldown_secs: i64,
}

impl AccountService {
    /// Wire the service to its collaborators.
    pub fn new(
        directory: Arc<dyn IdentityDirectory>,
        hasher: Arc<dyn CredentialHasher>,
        mailer: Arc<dyn Mailer>,
        blobs: Arc<dyn BlobStore>,
        codes: Arc<ValidationCodes>,
        sessions: Arc<SessionManager>,
        config: &ServiceConfig,
    ) -> Self {
        Self {
            directory,
            hasher,
            mailer,
            blobs,
            codes,
            sessions,
            validation_url: config.codes.validation_url.clone(),
            cooldown_secs: config.accounts.username_change_cooldown_secs,
        }
    }

    /// Create an unvalidated account and mail it a validation link.
    pub fn signup(&self, input: &NewAccount) -> MappinResult<Uid> {
        input.validate()?;
        if self.directory.account_by_email(&input.email)?.is_some() {
            return Err(MappinError::conflict("Email already used by another user."));
        }

        let now = Utc::now().timestamp();
        let uid = Uid::generate();
        self.directory.insert_account(AccountRecord {
            uid: uid.clone(),
            username: input.username.clone(),
            email: input.email.clone(),
            password_digest: self.hasher.hash(&input.password)?,
            image: None,
            location: None,
            created_at: now,
            last_access: now,
            last_changed_name: 0,
            validated: false,
        })?;
        tracing::info!(uid = %uid, "account created");

        self.send_code(&input.email, &uid)?;
        Ok(uid)
    }

    /// Check credentials and open a session.
    ///
    /// Unknown email and wrong password fail identically. A correct login on
    /// an unvalidated account re-sends the validation link and fails.
    pub fn login(&self, input: &Credentials) -> MappinResult<TokenPair> {
        input
            .validate()
            .map_err(|_| MappinError::validation(INVALID_LOGIN))?;

        let account = match self.directory.account_by_email(&input.email)? {
            Some(account) if self.hasher.verify(&input.password, &account.password_digest) => {
                account
            }
            _ => {
                tracing::info!("rejected login");
                return Err(MappinError::validation(INVALID_LOGIN));
            }
        };

        if !account.validated {
            self.send_code(&account.email, &account.uid)?;
            return Err(MappinError::validation(NOT_VALIDATED));
        }

        self.directory
            .touch_last_access(&account.uid, Utc::now().timestamp())?;
        let pair = self.sessions.issue(&account.uid)?;
        tracing::info!(uid = %account.uid, "logged in");
        Ok(pair)
    }

    /// Redeem a validation code and confirm its account.
    pub fn validate(&self, code: &str) -> MappinResult<Uid> {
        let uid = self.codes.redeem(code)?;
        if !self.directory.mark_validated(&uid)? {
            return Err(MappinError::not_found("account", uid.as_str()));
        }
        tracing::info!(uid = %uid, "account validated");
        Ok(uid)
    }

    /// End the session behind an access token.
    pub fn logout(&self, access_token: &str) -> MappinResult<Uid> {
        let details = self.sessions.validate_access(access_token)?;
        if self.sessions.revoke(&details.access_id)? == 0 {
            return Err(MappinError::expired(TokenKind::Access));
        }
        tracing::info!(uid = %details.uid, "logged out");
        Ok(details.uid)
    }

    /// Rename an account, at most once per cooldown window.
    ///
    /// The write is conditional on the change time read here, so of two
    /// concurrent renames at most one lands.
    pub fn update_username(&self, uid: &Uid, username: &str) -> MappinResult<()> {
        check_username(username)?;
        let account = self
            .directory
            .account(uid)?
            .ok_or_else(|| MappinError::not_found("account", uid.as_str()))?;

        let now = Utc::now().timestamp();
        if now - account.last_changed_name < self.cooldown_secs {
            return Err(self.cooldown_conflict());
        }
        match self
            .directory
            .update_username(uid, username, account.last_changed_name, now)?
        {
            RenameOutcome::Renamed => {
                tracing::info!(uid = %uid, "username changed");
                Ok(())
            }
            RenameOutcome::Stale => {
                tracing::debug!(uid = %uid, "lost rename race");
                Err(self.cooldown_conflict())
            }
            RenameOutcome::Missing => Err(MappinError::not_found("account", uid.as_str())),
        }
    }

    /// Remember where the user last was.
    pub fn update_location(&self, uid: &Uid, location: Location) -> MappinResult<()> {
        location.validate()?;
        if !self.directory.update_location(uid, location)? {
            return Err(MappinError::not_found("account", uid.as_str()));
        }
        tracing::debug!(uid = %uid, "location updated");
        Ok(())
    }

    /// Upload a base64 profile image and link it to the account.
    pub fn set_image(&self, uid: &Uid, encoded: &str) -> MappinResult<String> {
        if encoded.is_empty() {
            return Err(MappinError::validation("can't read image"));
        }
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|_| MappinError::validation("image must be base64"))?;
        if !self.directory.exists(uid)? {
            return Err(MappinError::not_found("account", uid.as_str()));
        }
        let url = self.blobs.store(&bytes)?;
        if !self.directory.update_image(uid, &url)? {
            return Err(MappinError::not_found("account", uid.as_str()));
        }
        tracing::info!(uid = %uid, url = %url, "profile image stored");
        Ok(url)
    }

    fn cooldown_conflict(&self) -> MappinError {
        let days = (self.cooldown_secs / 86_400).max(1);
        MappinError::conflict(format!("Can only change username once every {} days", days))
    }

    fn send_code(&self, email: &str, uid: &Uid) -> MappinResult<()> {
        let code = self.codes.issue(uid)?;
        let body = format!("Use this code: {}{}", self.validation_url, code);
        let mail_id = self.mailer.send(email, CONFIRM_SUBJECT, &body)?;
        tracing::debug!(uid = %uid, mail_id = %mail_id, "validation link sent");
        Ok(())
    }
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService")
            .field("validation_url", &self.validation_url)
            .field("cooldown_secs", &self.cooldown_secs)
            .finish()
    }
}
