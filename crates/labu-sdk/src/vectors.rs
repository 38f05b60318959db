//! Vector auto-mount: decorates a [`LaunchSpec`] with files and environment
//! derived from `LABU_VECTOR_DIR`, never overwriting anything the caller
//! already set.

use std::path::Path;

use crate::client::LaunchSpec;

pub fn decorate(spec: &mut LaunchSpec, vector_dir: &str) {
    let dir = Path::new(vector_dir);

    apply_named(spec, dir, "accounts.json", "LABU_ACCOUNTS_PATH");
    apply_named(spec, dir, "genesis_state.json", "LABU_GENESIS_STATE_PATH");

    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name == "accounts.json" || name == "genesis_state.json" {
            continue;
        }
        if spec.files.contains_key(name) {
            continue;
        }
        let Ok(bytes) = std::fs::read(&path) else {
            continue;
        };
        spec.files.insert(name.to_string(), bytes);
        if name == "config.json" {
            spec.environment
                .entry("LABU_CONFIG_PATH".to_string())
                .or_insert_with(|| "/labu-files/config.json".to_string());
        }
    }
}

fn apply_named(spec: &mut LaunchSpec, dir: &Path, filename: &str, env_var: &str) {
    if spec.files.contains_key(filename) {
        return;
    }
    let path = dir.join(filename);
    let Ok(bytes) = std::fs::read(&path) else {
        return;
    };
    spec.files.insert(filename.to_string(), bytes);
    spec.environment
        .entry(env_var.to_string())
        .or_insert_with(|| format!("/labu-files/{filename}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn mounts_accounts_json_and_sets_env() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("accounts.json"), b"{}").unwrap();

        let mut spec = LaunchSpec {
            client: "geth".into(),
            ..Default::default()
        };
        decorate(&mut spec, dir.path().to_str().unwrap());

        assert!(spec.files.contains_key("accounts.json"));
        assert_eq!(
            spec.environment.get("LABU_ACCOUNTS_PATH"),
            Some(&"/labu-files/accounts.json".to_string())
        );
    }

    #[test]
    fn caller_supplied_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("accounts.json"), b"{\"from\":\"vectors\"}").unwrap();

        let mut spec = LaunchSpec {
            client: "geth".into(),
            files: HashMap::from([("accounts.json".to_string(), b"{\"from\":\"caller\"}".to_vec())]),
            ..Default::default()
        };
        decorate(&mut spec, dir.path().to_str().unwrap());

        assert_eq!(
            spec.files.get("accounts.json"),
            Some(&b"{\"from\":\"caller\"}".to_vec())
        );
    }

    #[test]
    fn caller_supplied_env_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("accounts.json"), b"{}").unwrap();

        let mut spec = LaunchSpec {
            client: "geth".into(),
            environment: HashMap::from([(
                "LABU_ACCOUNTS_PATH".to_string(),
                "/custom/path.json".to_string(),
            )]),
            ..Default::default()
        };
        decorate(&mut spec, dir.path().to_str().unwrap());

        assert_eq!(
            spec.environment.get("LABU_ACCOUNTS_PATH"),
            Some(&"/custom/path.json".to_string())
        );
    }

    #[test]
    fn other_json_files_are_mounted_by_basename() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), b"{}").unwrap();

        let mut spec = LaunchSpec {
            client: "geth".into(),
            ..Default::default()
        };
        decorate(&mut spec, dir.path().to_str().unwrap());

        assert!(spec.files.contains_key("config.json"));
        assert_eq!(
            spec.environment.get("LABU_CONFIG_PATH"),
            Some(&"/labu-files/config.json".to_string())
        );
    }
}
