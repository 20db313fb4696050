use async_trait::async_trait;

use super::domain::UserCollection;
use crate::errors::ServiceError;

/// Repository abstraction over the persisted user collection.
///
/// Every call works on the whole document: `load` returns a fresh snapshot
/// and `save` replaces what was stored.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn load(&self) -> Result<UserCollection, ServiceError>;
    async fn save(&self, users: &UserCollection) -> Result<(), ServiceError>;
    /// Human-readable location used in logs.
    fn location(&self) -> String;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::Mutex;

    #[derive(Default)]
    pub struct InMemoryUserRepository {
        users: Mutex<UserCollection>,
        failing: AtomicBool,
    }

    impl InMemoryUserRepository {
        pub fn with_users(users: UserCollection) -> Self {
            Self { users: Mutex::new(users), failing: AtomicBool::new(false) }
        }

        /// Make every subsequent load/save fail, as an unreadable disk would.
        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        fn check(&self) -> Result<(), ServiceError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(ServiceError::Unavailable("in-memory store set to fail".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl UserRepository for InMemoryUserRepository {
        async fn load(&self) -> Result<UserCollection, ServiceError> {
            self.check()?;
            Ok(self.users.lock().await.clone())
        }

        async fn save(&self, users: &UserCollection) -> Result<(), ServiceError> {
            self.check()?;
            *self.users.lock().await = users.clone();
            Ok(())
        }

        fn location(&self) -> String {
            "memory".into()
        }
    }
}
