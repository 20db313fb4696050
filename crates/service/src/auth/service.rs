use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn, Span};

use super::domain::{LoginInput, PublicUser, RegisterInput, UserRecord, DEFAULT_ROLE};
use super::errors::AuthError;
use super::domain::UserCollection;
use super::repository::UserRepository;
use crate::errors::ServiceError;

const LOGIN_FIELDS_REQUIRED: &str = "Se requieren usuario y contraseña";
const REGISTER_FIELDS_REQUIRED: &str = "Se requieren usuario, contraseña y email";

/// Auth business service independent of web framework
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    // Serializes load-append-save within this process.
    write_lock: Mutex<()>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo, write_lock: Mutex::new(()) }
    }

    /// Check plaintext credentials against the stored users.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::UserService, repository::mock::InMemoryUserRepository};
    /// use service::auth::domain::{LoginInput, RegisterInput};
    /// use std::sync::Arc;
    /// let svc = UserService::new(Arc::new(InMemoryUserRepository::default()));
    /// let _ = tokio_test::block_on(svc.register(RegisterInput {
    ///     username: Some("ana".into()), password: Some("x".into()), email: Some("a@a.com".into()),
    ///     ..Default::default()
    /// }));
    /// let user = tokio_test::block_on(svc.login(LoginInput {
    ///     username: Some("ANA".into()), password: Some("x".into()),
    /// })).unwrap();
    /// assert_eq!(user.id, 1);
    /// ```
    #[instrument(skip(self, input), fields(username = tracing::field::Empty))]
    pub async fn login(&self, input: LoginInput) -> Result<PublicUser, AuthError> {
        let username = required(input.username.as_deref())
            .ok_or_else(|| AuthError::Validation(LOGIN_FIELDS_REQUIRED.into()))?;
        let password = input
            .password
            .ok_or_else(|| AuthError::Validation(LOGIN_FIELDS_REQUIRED.into()))?;
        Span::current().record("username", username);

        let users = self.snapshot().await?;
        match users.find_by_credentials(username, &password) {
            Some(user) => {
                debug!(user_id = user.id, "login succeeded");
                Ok(PublicUser::from(user))
            }
            None => {
                warn!("login rejected: invalid credentials");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Append a new user and rewrite the store.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::UserService, repository::mock::InMemoryUserRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let svc = UserService::new(Arc::new(InMemoryUserRepository::default()));
    /// let user = tokio_test::block_on(svc.register(RegisterInput {
    ///     username: Some("ana".into()), password: Some("x".into()), email: Some("a@a.com".into()),
    ///     ..Default::default()
    /// })).unwrap();
    /// assert_eq!(user.id, 1);
    /// assert_eq!(user.display_name.as_deref(), Some("ana"));
    /// assert_eq!(user.role.as_deref(), Some("usuario"));
    /// ```
    #[instrument(skip(self, input), fields(username = tracing::field::Empty))]
    pub async fn register(&self, input: RegisterInput) -> Result<PublicUser, AuthError> {
        let missing = || AuthError::Validation(REGISTER_FIELDS_REQUIRED.into());
        let username = required(input.username.as_deref()).ok_or_else(missing)?.to_string();
        let email = required(input.email.as_deref()).ok_or_else(missing)?.to_string();
        let password = input.password.ok_or_else(missing)?;
        Span::current().record("username", username.as_str());

        let display_name = required(input.display_name.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| username.clone());
        let role = required(input.role.as_deref()).unwrap_or(DEFAULT_ROLE).to_string();

        let _guard = self.write_lock.lock().await;
        // Strict load: a document that does not parse must never be rewritten.
        let mut users = self.repo.load().await?;
        if users.exists(&username) {
            debug!("username already taken");
            return Err(AuthError::UsernameTaken);
        }
        if users.email_exists(&email) {
            debug!(%email, "email already registered");
            return Err(AuthError::EmailTaken);
        }

        let record = UserRecord {
            id: users.next_id(),
            username,
            password,
            email,
            display_name: Some(display_name),
            role: Some(role),
            created_date: Some(today()),
            extra: Default::default(),
        };
        let public = PublicUser::from(&record);
        users.push(record);
        self.repo.save(&users).await?;
        info!(user_id = public.id, email = %public.email, store = %self.repo.location(), "user_registered");
        Ok(public)
    }

    /// All users, passwords stripped, in stored order.
    pub async fn list(&self) -> Result<Vec<PublicUser>, AuthError> {
        Ok(self.snapshot().await?.public_users())
    }

    pub async fn count(&self) -> Result<usize, AuthError> {
        Ok(self.snapshot().await?.len())
    }

    /// Read-path load: a malformed document reads as empty.
    async fn snapshot(&self) -> Result<UserCollection, AuthError> {
        match self.repo.load().await {
            Ok(users) => Ok(users),
            Err(ServiceError::Malformed { path, reason }) => {
                warn!(%path, %reason, "users file malformed; treating as empty");
                Ok(UserCollection::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Trimmed value, or `None` when absent or blank.
fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
