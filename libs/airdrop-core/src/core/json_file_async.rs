use std::path::{Path, PathBuf};

use eyre::{Context, OptionExt};
use serde::{Deserialize, Serialize};
use tokio::{
    fs::{self, File},
    io::{AsyncReadExt, AsyncWriteExt, BufReader},
};

/// Read bytes from file - asynchronous version
pub async fn read_file_async(path: impl AsRef<Path>) -> eyre::Result<Vec<u8>> {
    let path = path.as_ref();
    let file = File::open(path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer).await?;
    Ok(buffer)
}

/// Read from json file - asynchronous version
pub async fn read_from_json_file_async<T: for<'a> Deserialize<'a>>(
    path: impl AsRef<Path>,
) -> eyre::Result<T> {
    let path = path.as_ref();
    let data = read_file_async(path).await?;
    let value: T = serde_json::from_slice(&data)
        .with_context(|| format!("Failed to deserialize {}", path.display()))?;
    Ok(value)
}

/// Write to json file - asynchronous version
///
/// Parent directories are created when missing. Content goes to a sibling
/// `.tmp` file first, which then replaces the target, so readers never see
/// a partially written document.
pub async fn write_json_to_file_async<T: Serialize>(
    path: impl AsRef<Path>,
    data: &T,
) -> eyre::Result<()> {
    let path = path.as_ref();
    let data = serde_json::to_string_pretty(data)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .context("Failed to create parent directory")?;
    }

    let tmp_path = tmp_path_for(path)?;
    let mut file = File::create(&tmp_path)
        .await
        .with_context(|| format!("Failed to create {}", tmp_path.display()))?;
    file.write_all(data.as_bytes()).await?;
    file.sync_all().await?;
    drop(file);

    fs::rename(&tmp_path, path)
        .await
        .with_context(|| format!("Failed to replace {}", path.display()))
}

fn tmp_path_for(path: &Path) -> eyre::Result<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_eyre("Path has no file name")?
        .to_string_lossy();
    Ok(path.with_file_name(format!("{}.tmp", file_name)))
}

#[cfg(test)]
mod test {
    use std::{collections::HashMap, env::temp_dir};

    use serde::{Deserialize, Serialize};

    use super::{read_from_json_file_async, write_json_to_file_async};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        value: u64,
    }

    #[tokio::test]
    async fn test_json_file_async_write_then_read() {
        let path = temp_dir()
            .join(format!("airdrop-core-{}", std::process::id()))
            .join("sample.json");

        let sample = Sample {
            name: "alpha".into(),
            value: 42,
        };

        write_json_to_file_async(&path, &sample).await.unwrap();
        let loaded: Sample = read_from_json_file_async(&path).await.unwrap();
        assert_eq!(loaded, sample);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_json_file_async_replaces_whole_file() {
        let dir = temp_dir().join(format!("airdrop-core-replace-{}", std::process::id()));
        let path = dir.join("tree.json");

        let long = Sample {
            name: "a much longer name than the next one".into(),
            value: 1,
        };
        let short = Sample {
            name: "b".into(),
            value: 2,
        };

        write_json_to_file_async(&path, &long).await.unwrap();
        write_json_to_file_async(&path, &short).await.unwrap();

        let loaded: Sample = read_from_json_file_async(&path).await.unwrap();
        assert_eq!(loaded, short);
        assert!(!dir.join("tree.json.tmp").exists());

        // Failed serialization leaves the previous document in place
        let bad: HashMap<(u8, u8), u8> = HashMap::from([((1, 2), 3)]);
        assert!(write_json_to_file_async(&path, &bad).await.is_err());

        let loaded: Sample = read_from_json_file_async(&path).await.unwrap();
        assert_eq!(loaded, short);
        assert!(!dir.join("tree.json.tmp").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_json_file_async_missing_file() {
        let path = temp_dir().join("airdrop-core-definitely-missing.json");
        let result: eyre::Result<Sample> = read_from_json_file_async(&path).await;
        assert!(result.is_err());
    }
}
