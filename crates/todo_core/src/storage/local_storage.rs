use crate::error::AppError;
use crate::storage::KeyValueStorage;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::warn;

const STORE_FILE_NAME: &str = "local_storage.json";
const STORE_ENV_VAR: &str = "TODOAPP_STORE_PATH";

fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("todoapp").join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("todoapp")
            .join(STORE_FILE_NAME))
    }
}

/// Key-value storage kept as one JSON object on disk.
///
/// Every `set` rewrites the whole file; keys it does not own are carried over.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self::new(store_path()?))
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, AppError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|err| AppError::io(format!("{}: {}", self.path.display(), err)))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|err| {
            AppError::invalid_data(format!("invalid JSON in {}: {}", self.path.display(), err))
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, permissions)?;
        }

        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        let mut entries = self.read_entries().unwrap_or_else(|err| {
            warn!(path = %self.path.display(), error = %err, "discarding unreadable storage file");
            BTreeMap::new()
        });
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::FileStorage;
    use crate::storage::KeyValueStorage;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("todoapp-{nanos}-{file_name}"))
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let storage = FileStorage::new(temp_path("missing.json"));
        assert_eq!(storage.get("todos").unwrap(), None);
    }

    #[test]
    fn set_then_get_returns_value() {
        let path = temp_path("set-get.json");
        let mut storage = FileStorage::new(&path);

        storage.set("todos", "[]").unwrap();
        let value = storage.get("todos").unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(value.as_deref(), Some("[]"));
    }

    #[test]
    fn set_preserves_other_keys() {
        let path = temp_path("other-keys.json");
        fs::write(&path, r#"{"color": "blue"}"#).unwrap();
        let mut storage = FileStorage::new(&path);

        storage.set("todos", "[]").unwrap();
        let color = storage.get("color").unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(color.as_deref(), Some("blue"));
    }

    #[test]
    fn corrupt_file_is_reported_on_get() {
        let path = temp_path("corrupt.json");
        fs::write(&path, "{ not json").unwrap();
        let storage = FileStorage::new(&path);

        let err = storage.get("todos").unwrap_err();
        fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_data");
    }

    #[test]
    fn corrupt_file_is_replaced_on_set() {
        let path = temp_path("corrupt-set.json");
        fs::write(&path, "{ not json").unwrap();
        let mut storage = FileStorage::new(&path);

        storage.set("todos", "[]").unwrap();
        let value = storage.get("todos").unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(value.as_deref(), Some("[]"));
    }

    #[test]
    fn set_creates_parent_directories() {
        let dir = temp_path("nested-dir");
        let path = dir.join("inner").join("storage.json");
        let mut storage = FileStorage::new(&path);

        storage.set("todos", "[]").unwrap();
        let exists = path.exists();
        fs::remove_dir_all(&dir).ok();

        assert!(exists);
    }

    #[cfg(unix)]
    #[test]
    fn written_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let path = temp_path("private.json");
        let mut storage = FileStorage::new(&path);
        storage.set("todos", "[]").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        fs::remove_file(&path).ok();

        assert_eq!(mode & 0o777, 0o600);
    }
}
