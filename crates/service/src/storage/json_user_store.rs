use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{fs, io::AsyncWriteExt};
use tracing::debug;

use crate::auth::domain::UserCollection;
use crate::auth::repository::UserRepository;
use crate::errors::ServiceError;

/// JSON file-backed user store.
///
/// The file holds `{"users": [...]}`. It is read in full on every `load`
/// and rewritten in full on every `save`; nothing is cached in memory.
#[derive(Debug, Clone)]
pub struct JsonUserStore {
    file_path: PathBuf,
}

impl JsonUserStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { file_path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

#[async_trait]
impl UserRepository for JsonUserStore {
    /// A missing file reads as an empty collection. Content that does not
    /// parse is reported as `ServiceError::Malformed` and left untouched.
    async fn load(&self) -> Result<UserCollection, ServiceError> {
        let bytes = match fs::read(&self.file_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.file_path.display(), "users file missing; empty collection");
                return Ok(UserCollection::default());
            }
            Err(e) => return Err(ServiceError::io(&self.file_path, e)),
        };
        serde_json::from_slice(&bytes).map_err(|e| ServiceError::Malformed {
            path: self.file_path.display().to_string(),
            reason: e.to_string(),
        })
    }

    async fn save(&self, users: &UserCollection) -> Result<(), ServiceError> {
        if let Some(parent) = self.file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| ServiceError::io(parent, e))?;
        }
        let data = serde_json::to_vec_pretty(users)?;

        let io_err = |e| ServiceError::io(&self.file_path, e);
        let mut file = fs::File::create(&self.file_path).await.map_err(io_err)?;
        file.write_all(&data).await.map_err(io_err)?;
        file.flush().await.map_err(io_err)?;
        file.sync_all().await.map_err(io_err)?;
        Ok(())
    }

    fn location(&self) -> String {
        self.file_path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::domain::UserRecord;

    fn tmp_path() -> PathBuf {
        std::env::temp_dir().join(format!("users_{}.json", uuid::Uuid::new_v4()))
    }

    fn record(id: u64, name: &str) -> UserRecord {
        UserRecord {
            id,
            username: name.into(),
            password: "secret".into(),
            email: format!("{name}@example.com"),
            display_name: Some(name.into()),
            role: Some("usuario".into()),
            created_date: Some("2024-05-01".into()),
            extra: Default::default(),
        }
    }

    #[tokio::test]
    async fn missing_file_loads_empty() -> anyhow::Result<()> {
        let store = JsonUserStore::new(tmp_path());
        assert!(store.load().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn malformed_file_is_reported() -> anyhow::Result<()> {
        let path = tmp_path();
        tokio::fs::write(&path, b"{not json").await?;
        let store = JsonUserStore::new(&path);
        assert!(matches!(store.load().await, Err(ServiceError::Malformed { .. })));
        assert_eq!(tokio::fs::read(&path).await?, b"{not json");

        // a record of the wrong shape makes the whole document malformed
        tokio::fs::write(&path, br#"{"users":[{"id":"1","usuario":"ana","contrase\u00f1a":"x"}]}"#).await?;
        assert!(matches!(store.load().await, Err(ServiceError::Malformed { .. })));
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn save_then_load_persists() -> anyhow::Result<()> {
        let path = tmp_path();
        let store = JsonUserStore::new(&path);
        let users = UserCollection::new(vec![record(1, "ana"), record(2, "bob")]);
        store.save(&users).await?;

        let reloaded = JsonUserStore::new(&path).load().await?;
        assert_eq!(reloaded, users);

        let raw: serde_json::Value = serde_json::from_slice(&tokio::fs::read(&path).await?)?;
        assert_eq!(raw["users"][1]["usuario"], "bob");
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn extra_keys_and_nulls_survive_rewrite() -> anyhow::Result<()> {
        let path = tmp_path();
        tokio::fs::write(
            &path,
            r#"{"users":[{"id":1,"usuario":"ana","contraseña":"x","email":"a@a.com","nombre":null,"telefono":"555"}]}"#,
        )
        .await?;
        let store = JsonUserStore::new(&path);
        let mut users = store.load().await?;
        users.push(record(2, "bob"));
        store.save(&users).await?;

        let raw: serde_json::Value = serde_json::from_slice(&tokio::fs::read(&path).await?)?;
        assert_eq!(raw["users"][0]["telefono"], "555");
        assert!(raw["users"][0]["nombre"].is_null());
        assert_eq!(raw["users"][1]["usuario"], "bob");
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn save_overwrites_and_creates_parent() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join(format!("users_dir_{}", uuid::Uuid::new_v4()));
        let path = dir.join("data").join("users.json");
        let store = JsonUserStore::new(&path);
        store.save(&UserCollection::new(vec![record(1, "ana"), record(2, "bob")])).await?;
        store.save(&UserCollection::new(vec![record(1, "carl")])).await?;

        let users = store.load().await?;
        assert_eq!(users.len(), 1);
        assert_eq!(users.users[0].username, "carl");
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn directory_path_is_an_error() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join(format!("users_dir_{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await?;
        let store = JsonUserStore::new(&dir);
        assert!(matches!(store.load().await, Err(ServiceError::Io { .. })));
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
