//! Client descriptor loading.
//!
//! Each client the harness knows about lives under `clients/<name>/` with a
//! `labu.json` descriptor alongside its build context (normally the same
//! directory, holding the Dockerfile too).

use crate::{ConfigError, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// A client the Controller was seeded with at start, read-only thereafter.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ClientDefinition {
    pub name: String,
    pub build_dir: PathBuf,
    pub metadata: Value,
}

/// Descriptor file contents; everything beyond `name` is opaque metadata the
/// core never interprets.
#[derive(Debug, Clone, serde::Deserialize)]
struct Descriptor {
    #[serde(default)]
    name: Option<String>,
    #[serde(flatten)]
    metadata: Value,
}

/// Scan `clients_root/<name>/labu.json` for every subdirectory and build the
/// [`ClientDefinition`] set the Controller starts with.
pub fn load_client_definitions(clients_root: &Path) -> Result<Vec<ClientDefinition>> {
    let mut out = Vec::new();
    let entries = std::fs::read_dir(clients_root).map_err(|source| ConfigError::ReadError {
        path: clients_root.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| ConfigError::ReadError {
            path: clients_root.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let descriptor_path = path.join("labu.json");
        if !descriptor_path.exists() {
            tracing::debug!(path = ?path, "skipping client directory without a descriptor");
            continue;
        }
        out.push(load_one(&path, &descriptor_path)?);
    }

    out.sort_by(|a, b| a.name.cmp(&b.name));
    tracing::debug!(count = out.len(), "loaded client descriptors");
    Ok(out)
}

fn load_one(build_dir: &Path, descriptor_path: &Path) -> Result<ClientDefinition> {
    let raw = std::fs::read_to_string(descriptor_path).map_err(|source| ConfigError::ReadError {
        path: descriptor_path.to_path_buf(),
        source,
    })?;
    let descriptor: Descriptor =
        serde_json::from_str(&raw).map_err(|source| ConfigError::JsonParseError {
            path: descriptor_path.to_path_buf(),
            source,
        })?;

    let name = descriptor.name.unwrap_or_else(|| {
        build_dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    });

    Ok(ClientDefinition {
        name,
        build_dir: build_dir.to_path_buf(),
        metadata: descriptor.metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_descriptors_sorted_by_name() {
        let dir = tempfile::tempdir().unwrap();
        for (name, meta) in [("zeth", "{}"), ("ageth", r#"{"role":"execution"}"#)] {
            let client_dir = dir.path().join(name);
            fs::create_dir_all(&client_dir).unwrap();
            fs::write(
                client_dir.join("labu.json"),
                format!(r#"{{"name":"{name}","meta":{meta}}}"#),
            )
            .unwrap();
        }

        let clients = load_client_definitions(dir.path()).unwrap();
        assert_eq!(clients.len(), 2);
        assert_eq!(clients[0].name, "ageth");
        assert_eq!(clients[1].name, "zeth");
    }

    #[test]
    fn skips_directories_without_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("not-a-client")).unwrap();
        let clients = load_client_definitions(dir.path()).unwrap();
        assert!(clients.is_empty());
    }
}
