use eyre::Result;
use serde_json::Value;

/// Storage backend for a single JSON document
pub trait Persistence: Send + Sync {
    fn load_value(&self) -> Result<Option<Value>>;
    fn store_value(&self, value: Value) -> Result<()>;
}

pub mod util {
    use std::{fs, path::PathBuf, sync::Arc};

    use eyre::{Context, Result};
    use parking_lot::RwLock;
    use serde_json::Value;

    use crate::core::persistence::Persistence;

    /// Keeps the document as a JSON string, so that values go through the
    /// same (de)serialization as they would with a file.
    #[derive(Clone, Default)]
    pub struct InMemoryPersistence {
        data: Arc<RwLock<Option<String>>>,
    }

    impl InMemoryPersistence {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl Persistence for InMemoryPersistence {
        fn load_value(&self) -> Result<Option<Value>> {
            match self.data.read().as_ref() {
                Some(json_string) => Ok(Some(
                    serde_json::from_str(json_string).context("Failed to deserialize")?,
                )),
                None => Ok(None),
            }
        }

        fn store_value(&self, value: Value) -> Result<()> {
            let json_string = serde_json::to_string_pretty(&value)?;
            *self.data.write() = Some(json_string);
            Ok(())
        }
    }

    pub struct JsonFilePersistence {
        path: PathBuf,
    }

    impl JsonFilePersistence {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            JsonFilePersistence { path: path.into() }
        }
    }

    impl Persistence for JsonFilePersistence {
        fn load_value(&self) -> Result<Option<Value>> {
            if !self.path.exists() {
                return Ok(None);
            }

            tracing::info!("Loading {:#?}", self.path);
            let json_string = fs::read_to_string(&self.path)?;
            Ok(Some(
                serde_json::from_str(&json_string).context("Failed to deserialize")?,
            ))
        }

        fn store_value(&self, value: Value) -> Result<()> {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).context("Failed to create parent directory")?;
            }

            tracing::info!("Storing {:#?}", self.path);
            let json_string = serde_json::to_string_pretty(&value).context("Failed to serialize")?;

            // Write next to the target and rename, so a crash never leaves half a document
            let tmp_path = self.path.with_extension("json.tmp");
            fs::write(&tmp_path, &json_string).context("Failed to write json file")?;
            fs::rename(&tmp_path, &self.path).context("Failed to replace json file")
        }
    }
}

#[cfg(test)]
mod test {
    use std::env::temp_dir;

    use serde_json::json;

    use super::{
        util::{InMemoryPersistence, JsonFilePersistence},
        Persistence,
    };

    #[test]
    fn test_in_memory_persistence() {
        let persistence = InMemoryPersistence::new();
        assert!(persistence.load_value().unwrap().is_none());

        persistence.store_value(json!({"a": 1})).unwrap();
        assert_eq!(persistence.load_value().unwrap(), Some(json!({"a": 1})));

        // Clones share the same document
        let other = persistence.clone();
        other.store_value(json!({"a": 2})).unwrap();
        assert_eq!(persistence.load_value().unwrap(), Some(json!({"a": 2})));
    }

    #[test]
    fn test_json_file_persistence() {
        let path = temp_dir()
            .join(format!("airdrop-core-persistence-{}", std::process::id()))
            .join("ledger.json");
        let persistence = JsonFilePersistence::new(&path);

        assert!(persistence.load_value().unwrap().is_none());

        persistence.store_value(json!(["x", "y"])).unwrap();
        assert_eq!(persistence.load_value().unwrap(), Some(json!(["x", "y"])));

        let _ = std::fs::remove_file(&path);
    }
}
