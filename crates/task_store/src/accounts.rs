//! Account collection and the stored login session.

use auth::{AuthError, PasswordHash, SessionRecord, validate_new_password};
use entities::{Activity, ActivityKind, User};
use serde::{Deserialize, Serialize};

use crate::{
    AggregateStore, EntityRepository, KeyValueStore, Session, TaskStoreResult,
    keys::{CURRENT_SESSION_KEY, USERS_KEY},
    mutation::required,
};

/// A registered account: the profile plus its salted credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    #[serde(flatten)]
    pub user: User,
    /// Encoded [`PasswordHash`].
    pub credential: String,
}

impl UserAccount {
    pub fn new(user: User, password: &str) -> Result<Self, AuthError> {
        Ok(Self {
            user,
            credential: PasswordHash::new(password)?.to_string(),
        })
    }

    /// Checks a password against the stored credential.
    pub fn verify(&self, password: &str) -> Result<bool, AuthError> {
        let hash: PasswordHash = self.credential.parse()?;
        Ok(hash.verify(password))
    }
}

/// Fields of the signup form.
#[derive(Debug, Clone, Default)]
pub struct SignupInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: String,
    pub role: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupInput {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let password = password.into();
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            confirm_password: password.clone(),
            password,
            ..Self::default()
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    pub fn with_confirmation(mut self, confirm: impl Into<String>) -> Self {
        self.confirm_password = confirm.into();
        self
    }
}

/// Editable profile fields.
#[derive(Debug, Clone, Default)]
pub struct ProfileInput {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub role: String,
    pub job_title: String,
    pub bio: String,
}

impl ProfileInput {
    /// Starts from the current profile.
    pub fn from_user(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            company: user.company.clone(),
            role: user.role.clone(),
            job_title: user.job_title.clone(),
            bio: user.bio.clone(),
        }
    }
}

impl<S: KeyValueStore> EntityRepository<S> {
    /// Registered accounts in signup order.
    pub fn load_accounts(&self) -> Vec<UserAccount> {
        self.load_value(USERS_KEY).unwrap_or_default()
    }

    pub fn persist_accounts(&self, accounts: &[UserAccount]) -> TaskStoreResult<()> {
        self.persist_value(USERS_KEY, accounts)
    }

    pub fn load_session_record(&self) -> Option<SessionRecord> {
        self.load_value(CURRENT_SESSION_KEY)
    }

    pub fn persist_session_record(&self, record: &SessionRecord) -> TaskStoreResult<()> {
        self.persist_value(CURRENT_SESSION_KEY, record)
    }

    pub fn remove_session_record(&self) -> TaskStoreResult<()> {
        self.kv().remove(CURRENT_SESSION_KEY)
    }
}

impl<S: KeyValueStore> AggregateStore<S> {
    /// Registers an account and signs it in without "remember me".
    pub fn sign_up(&mut self, input: SignupInput) -> TaskStoreResult<Session> {
        let first_name = input.first_name.trim();
        let last_name = input.last_name.trim();
        let email = input.email.trim();
        for (value, field) in [
            (first_name, "first name"),
            (last_name, "last name"),
            (email, "email"),
            (input.password.as_str(), "password"),
        ] {
            if value.is_empty() {
                return Err(AuthError::MissingField(field).into());
            }
        }
        validate_new_password(&input.password, &input.confirm_password)?;

        let repo = self.repository();
        let mut accounts = repo.load_accounts();
        if accounts.iter().any(|a| a.user.email == email) {
            return Err(AuthError::EmailTaken(email.to_string()).into());
        }

        let now = self.now();
        let user = User::new(first_name, last_name, email, now)
            .with_company(input.company.trim())
            .with_role(input.role.trim());
        accounts.push(UserAccount::new(user.clone(), &input.password)?);
        repo.persist_accounts(&accounts)?;
        repo.persist_session_record(&SessionRecord::new(email, now, false))?;

        tracing::info!(email, "Account created");
        Ok(Session::new(user))
    }

    /// Verifies credentials and stores a new login session.
    pub fn log_in(&mut self, email: &str, password: &str, remember: bool) -> TaskStoreResult<Session> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AuthError::MissingField("email").into());
        }
        if password.is_empty() {
            return Err(AuthError::MissingField("password").into());
        }

        let repo = self.repository();
        let account = repo
            .load_accounts()
            .into_iter()
            .find(|a| a.user.email == email)
            .ok_or(AuthError::InvalidCredentials)?;
        if !account.verify(password)? {
            tracing::debug!(email, "Rejected login");
            return Err(AuthError::InvalidCredentials.into());
        }

        repo.persist_session_record(&SessionRecord::new(email, self.now(), remember))?;
        tracing::info!(email, remember, "Signed in");
        Ok(Session::new(account.user))
    }

    /// Restores the stored session if it is still valid.
    pub fn resume(&self) -> TaskStoreResult<Session> {
        let repo = self.repository();
        let record = repo
            .load_session_record()
            .filter(|r| r.is_valid_at(self.now()))
            .ok_or(AuthError::NotSignedIn)?;
        let account = repo
            .load_accounts()
            .into_iter()
            .find(|a| a.user.email == record.email)
            .ok_or(AuthError::NotSignedIn)?;
        Ok(Session::new(account.user))
    }

    pub fn log_out(&mut self) -> TaskStoreResult<()> {
        self.repository().remove_session_record()?;
        tracing::info!("Signed out");
        Ok(())
    }

    /// Replaces the credential after checking the current password.
    pub fn change_password(
        &mut self,
        session: &Session,
        current: &str,
        new: &str,
        confirm: &str,
    ) -> TaskStoreResult<()> {
        for (value, field) in [
            (current, "current password"),
            (new, "new password"),
            (confirm, "confirmation"),
        ] {
            if value.is_empty() {
                return Err(AuthError::MissingField(field).into());
            }
        }
        validate_new_password(new, confirm)?;

        let repo = self.repository();
        let mut accounts = repo.load_accounts();
        let account = accounts
            .iter_mut()
            .find(|a| a.user.email == session.email())
            .ok_or(AuthError::IncorrectPassword)?;
        if !account.verify(current)? {
            return Err(AuthError::IncorrectPassword.into());
        }
        account.credential = PasswordHash::new(new)?.to_string();
        repo.persist_accounts(&accounts)?;

        tracing::info!(email = session.email(), "Password changed");
        Ok(())
    }

    /// Saves profile fields to the account and the session.
    pub fn save_profile(
        &mut self,
        session: &mut Session,
        input: ProfileInput,
    ) -> TaskStoreResult<Activity> {
        let first_name = required(&input.first_name, "First name")?;
        let last_name = required(&input.last_name, "Last name")?;

        let user = session.user_mut();
        user.first_name = first_name;
        user.last_name = last_name;
        user.company = input.company.trim().to_string();
        user.role = input.role.trim().to_string();
        user.job_title = input.job_title.trim().to_string();
        user.bio = input.bio.trim().to_string();
        let user = user.clone();

        let repo = self.repository();
        let mut accounts = repo.load_accounts();
        if let Some(account) = accounts.iter_mut().find(|a| a.user.email == user.email) {
            account.user = user.clone();
            repo.persist_accounts(&accounts)?;
        }

        let activity = Activity::new(ActivityKind::Updated, "Updated profile settings", self.now());
        self.record(&user.email, &activity, None)?;
        Ok(activity)
    }
}
