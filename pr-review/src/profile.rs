//! §4.11/§6 Profile store — YAML-backed CRUD over `<user>/.kit/profiles/`.

use crate::errors::{PrReviewError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// §3 "Profile" — a named block of reviewer guidance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub description: String,
    pub context: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Resolves `<user>/.kit/profiles/`, creating it on demand.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// `<home>/.kit/profiles`, per §6 "Persisted state".
    pub fn from_home(home: &Path) -> Self {
        Self::new(home.join(".kit").join("profiles"))
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return Err(PrReviewError::InvalidInput(format!("invalid profile name: {name}")));
        }
        Ok(self.dir.join(format!("{name}.yaml")))
    }

    fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    pub fn create(&self, name: &str, description: &str, context: &str, tags: Vec<String>) -> Result<Profile> {
        self.ensure_dir()?;
        let path = self.path_for(name)?;
        if path.exists() {
            return Err(PrReviewError::InvalidInput(format!("profile already exists: {name}")));
        }
        let now = Utc::now();
        let profile = Profile {
            name: name.to_string(),
            description: description.to_string(),
            context: context.to_string(),
            tags,
            created_at: now,
            updated_at: now,
        };
        self.write(&path, &profile)?;
        Ok(profile)
    }

    pub fn list(&self) -> Result<Vec<Profile>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut out = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            if entry.path().extension().and_then(|e| e.to_str()) == Some("yaml") {
                out.push(self.read(&entry.path())?);
            }
        }
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    pub fn show(&self, name: &str) -> Result<Profile> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Err(PrReviewError::NotFound(format!("profile not found: {name}")));
        }
        self.read(&path)
    }

    pub fn edit(&self, name: &str, description: Option<&str>, context: Option<&str>, tags: Option<Vec<String>>) -> Result<Profile> {
        let mut profile = self.show(name)?;
        if let Some(d) = description {
            profile.description = d.to_string();
        }
        if let Some(c) = context {
            profile.context = c.to_string();
        }
        if let Some(t) = tags {
            profile.tags = t;
        }
        profile.updated_at = Utc::now();
        self.write(&self.path_for(name)?, &profile)?;
        Ok(profile)
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Err(PrReviewError::NotFound(format!("profile not found: {name}")));
        }
        std::fs::remove_file(path)?;
        Ok(())
    }

    pub fn copy(&self, name: &str, new_name: &str) -> Result<Profile> {
        let mut profile = self.show(name)?;
        profile.name = new_name.to_string();
        let now = Utc::now();
        profile.created_at = now;
        profile.updated_at = now;
        let path = self.path_for(new_name)?;
        if path.exists() {
            return Err(PrReviewError::InvalidInput(format!("profile already exists: {new_name}")));
        }
        self.ensure_dir()?;
        self.write(&path, &profile)?;
        Ok(profile)
    }

    /// Serializes a profile to an arbitrary destination file (§6 `export`).
    pub fn export(&self, name: &str, dest: &Path) -> Result<()> {
        let profile = self.show(name)?;
        self.write(dest, &profile)
    }

    /// Reads a profile YAML file from an arbitrary source and stores it
    /// under `new_name` (§6 `import`).
    pub fn import(&self, src: &Path, new_name: &str) -> Result<Profile> {
        let mut profile = self.read(src)?;
        profile.name = new_name.to_string();
        let path = self.path_for(new_name)?;
        if path.exists() {
            return Err(PrReviewError::InvalidInput(format!("profile already exists: {new_name}")));
        }
        self.ensure_dir()?;
        self.write(&path, &profile)?;
        Ok(profile)
    }

    fn read(&self, path: &Path) -> Result<Profile> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&text)?)
    }

    fn write(&self, path: &Path, profile: &Profile) -> Result<()> {
        let text = serde_yaml::to_string(profile)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn create_then_show_round_trips() {
        let dir = tempdir().unwrap();
        let store = ProfileStore::new(dir.path().to_path_buf());
        store.create("strict", "strict reviewer", "Be pedantic about error handling.", vec!["rust".into()]).unwrap();
        let profile = store.show("strict").unwrap();
        assert_eq!(profile.context, "Be pedantic about error handling.");
    }

    #[test]
    fn export_then_import_preserves_context() {
        let dir = tempdir().unwrap();
        let store = ProfileStore::new(dir.path().join("profiles"));
        store.create("strict", "d", "pedantic context", vec![]).unwrap();
        let export_path = dir.path().join("strict-export.yaml");
        store.export("strict", &export_path).unwrap();

        let imported = store.import(&export_path, "strict-copy").unwrap();
        assert_eq!(imported.context, "pedantic context");
        assert_eq!(imported.name, "strict-copy");
    }

    #[test]
    fn rejects_path_traversal_in_name() {
        let dir = tempdir().unwrap();
        let store = ProfileStore::new(dir.path().to_path_buf());
        assert!(store.create("../evil", "d", "c", vec![]).is_err());
    }

    #[test]
    fn delete_removes_profile() {
        let dir = tempdir().unwrap();
        let store = ProfileStore::new(dir.path().to_path_buf());
        store.create("temp", "d", "c", vec![]).unwrap();
        store.delete("temp").unwrap();
        assert!(matches!(store.show("temp"), Err(PrReviewError::NotFound(_))));
    }
}
