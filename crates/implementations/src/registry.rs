use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    errors::RegistryError,
    model::{Implementation, LabelledEndpoint, Role},
};

/// Implementations keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    implementations: BTreeMap<String, Implementation>,
}

impl Registry {
    /// Builds a registry, rejecting implementations declared twice.
    pub fn from_implementations<I>(implementations: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = Implementation>,
    {
        let mut registry = Registry::default();
        for implementation in implementations {
            if registry.implementations.contains_key(&implementation.name) {
                return Err(RegistryError::DuplicateImplementation(implementation.name));
            }
            registry.implementations.insert(implementation.name.clone(), implementation);
        }
        Ok(registry)
    }

    /// Loads every `*.json` manifest found directly under `dir`.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let dir = dir.as_ref();
        let read_dir_err = |source| RegistryError::ReadDir {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(read_dir_err)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<_, _>>()
            .map_err(read_dir_err)?;
        paths.retain(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"));
        paths.sort();

        let mut implementations = Vec::with_capacity(paths.len());
        for path in paths {
            let content = fs::read_to_string(&path).map_err(|source| RegistryError::ReadManifest {
                path: path.clone(),
                source,
            })?;
            let implementation: Implementation = serde_json::from_str(&content)
                .map_err(|source| RegistryError::InvalidManifest { path: path.clone(), source })?;

            debug!("loaded manifest {} for {}", path.display(), implementation.name);
            implementations.push(implementation);
        }

        Self::from_implementations(implementations)
    }

    /// Narrows the registry to endpoints tagged with `tag`.
    pub fn filter(&self, tag: &str) -> Registry {
        Registry {
            implementations: self
                .implementations
                .iter()
                .filter_map(|(name, i)| i.retain_tag(tag).map(|i| (name.clone(), i)))
                .collect(),
        }
    }

    /// Narrows the registry to the named implementations.
    pub fn only(&self, names: &[String]) -> Result<Registry, RegistryError> {
        let mut implementations = BTreeMap::new();
        for name in names {
            let implementation = self
                .implementations
                .get(name)
                .ok_or_else(|| RegistryError::UnknownImplementation(name.clone()))?;
            implementations.insert(name.clone(), implementation.clone());
        }
        Ok(Registry { implementations })
    }

    pub fn get(&self, name: &str) -> Option<&Implementation> {
        self.implementations.get(name)
    }

    pub fn len(&self) -> usize {
        self.implementations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.implementations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Implementation> {
        self.implementations.values()
    }

    /// Lists every endpoint of `role` with a unique label.
    ///
    /// The label is the implementation name, suffixed with a counter when an
    /// implementation exposes more than one endpoint for the role.
    pub fn endpoints(&self, role: Role) -> Vec<LabelledEndpoint<'_>> {
        self.iter()
            .flat_map(|implementation| {
                let endpoints = implementation.endpoints(role);
                endpoints.iter().enumerate().map(move |(i, endpoint)| {
                    let label = if endpoints.len() == 1 {
                        implementation.name.clone()
                    } else {
                        format!("{} #{}", implementation.name, i + 1)
                    };
                    LabelledEndpoint {
                        label,
                        implementation: &implementation.name,
                        endpoint,
                    }
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;

    fn manifest(name: &str, tags: &[&str]) -> String {
        let tags = serde_json::to_string(tags).unwrap();
        format!(
            r#"{{
                "name": "{name}",
                "issuers": [{{"id": "did:example:{name}", "endpoint": "https://{name}.example/issue", "tags": {tags}}}],
                "verifiers": [
                    {{"endpoint": "https://{name}.example/verify", "tags": {tags}}},
                    {{"endpoint": "https://{name}.example/v2/verify", "tags": {tags}}}
                ]
            }}"#
        )
    }

    fn write_manifests(entries: &[(&str, String)]) -> TempDir {
        let dir = TempDir::new("implementations").unwrap();
        for (file, content) in entries {
            fs::write(dir.path().join(file), content).unwrap();
        }
        dir
    }

    #[test]
    fn test_load_dir_reads_json_manifests_only() {
        let dir = write_manifests(&[
            ("b.json", manifest("beta", &["Ed25519Signature2020"])),
            ("a.json", manifest("alpha", &["Ed25519Signature2020"])),
            ("README.md", "not a manifest".to_string()),
        ]);

        let registry = Registry::load_dir(dir.path()).unwrap();
        assert_eq!(registry.len(), 2);
        let names: Vec<&str> = registry.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_load_dir_rejects_duplicates_and_invalid_manifests() {
        let dir = write_manifests(&[
            ("a.json", manifest("alpha", &[])),
            ("b.json", manifest("alpha", &[])),
        ]);
        assert!(matches!(
            Registry::load_dir(dir.path()),
            Err(RegistryError::DuplicateImplementation(name)) if name == "alpha"
        ));

        let dir = write_manifests(&[("a.json", "{\"name\": 1}".to_string())]);
        assert!(matches!(Registry::load_dir(dir.path()), Err(RegistryError::InvalidManifest { .. })));

        assert!(matches!(
            Registry::load_dir("/definitely/not/here"),
            Err(RegistryError::ReadDir { .. })
        ));
    }

    #[test]
    fn test_filter_and_only() {
        let dir = write_manifests(&[
            ("a.json", manifest("alpha", &["Ed25519Signature2020"])),
            ("b.json", manifest("beta", &["eddsa-rdfc-2022"])),
        ]);
        let registry = Registry::load_dir(dir.path()).unwrap();

        let filtered = registry.filter("Ed25519Signature2020");
        assert_eq!(filtered.len(), 1);
        assert!(filtered.get("alpha").is_some());

        let only = registry.only(&["beta".to_string()]).unwrap();
        assert_eq!(only.len(), 1);
        assert!(matches!(
            registry.only(&["gamma".to_string()]),
            Err(RegistryError::UnknownImplementation(name)) if name == "gamma"
        ));
    }

    #[test]
    fn test_endpoint_labels() {
        let dir = write_manifests(&[("a.json", manifest("alpha", &["Ed25519Signature2020"]))]);
        let registry = Registry::load_dir(dir.path()).unwrap();

        let issuers: Vec<String> = registry.endpoints(Role::Issuer).into_iter().map(|e| e.label).collect();
        assert_eq!(issuers, vec!["alpha"]);

        let verifiers = registry.endpoints(Role::Verifier);
        let labels: Vec<&str> = verifiers.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["alpha #1", "alpha #2"]);
        assert!(verifiers.iter().all(|e| e.implementation == "alpha"));
        assert_eq!(verifiers[1].endpoint.endpoint.path(), "/v2/verify");
    }
}
