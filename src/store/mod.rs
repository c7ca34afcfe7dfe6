//! JSON document store for user profiles and their financial snapshot.
//!
//! One file per user under the data directory. Writes go to a temp file
//! first and are renamed into place so a crash never leaves a torn document.

mod patch;

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{FinancialSnapshot, FireError};
use crate::presentation::Currency;

pub use patch::{
    AssetsPatch, ExpensesPatch, GoalsPatch, IncomePatch, LiabilitiesPatch, SnapshotPatch,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid user id: {0:?}")]
    InvalidUserId(String),

    #[error("storage I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed document at {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Rejected(#[from] FireError),

    #[error("store lock poisoned")]
    Poisoned,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Set on the first write of the document.
    pub created_at: Option<DateTime<Utc>>,
    pub is_first_login: bool,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            created_at: None,
            is_first_login: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserDocument {
    pub financial_data: FinancialSnapshot,
    pub profile: UserProfile,
    pub currency: Currency,
}

#[derive(Debug)]
pub struct JsonStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            path: root.clone(),
            source,
        })?;
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn load(&self, user_id: &str) -> Result<Option<UserDocument>, StoreError> {
        let path = self.path_for(user_id)?;
        read_document(&path)
    }

    /// Returns the stored document, writing the defaults first if the user
    /// has none yet.
    pub fn load_or_create(&self, user_id: &str) -> Result<UserDocument, StoreError> {
        self.modify(user_id, |_| Ok(()))
    }

    pub fn save_financial_data(
        &self,
        user_id: &str,
        snapshot: &FinancialSnapshot,
    ) -> Result<(), StoreError> {
        snapshot.validate()?;
        self.modify(user_id, |doc| {
            doc.financial_data = *snapshot;
            Ok(())
        })?;
        Ok(())
    }

    /// Merges `patch` into the stored snapshot; the merged result must still
    /// validate.
    pub fn update_financial_data(
        &self,
        user_id: &str,
        patch: &SnapshotPatch,
    ) -> Result<FinancialSnapshot, StoreError> {
        let doc = self.modify(user_id, |doc| {
            let merged = patch.apply(&doc.financial_data);
            merged.validate()?;
            doc.financial_data = merged;
            Ok(())
        })?;
        Ok(doc.financial_data)
    }

    /// Overwrites any existing document with a fresh profile.
    pub fn create_user_profile(
        &self,
        user_id: &str,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<UserDocument, StoreError> {
        let path = self.path_for(user_id)?;
        let doc = UserDocument {
            profile: UserProfile {
                name: format!("{first_name} {last_name}").trim().to_string(),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email: email.to_string(),
                created_at: Some(Utc::now()),
                ..UserProfile::default()
            },
            ..UserDocument::default()
        };
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        write_document(&path, &doc)?;
        Ok(doc)
    }

    /// Unreadable documents count as a first login.
    pub fn is_first_login(&self, user_id: &str) -> bool {
        match self.load_or_create(user_id) {
            Ok(doc) => doc.profile.is_first_login,
            Err(e) => {
                log::error!("checking first login for {user_id}: {e}");
                true
            }
        }
    }

    pub fn set_first_login(&self, user_id: &str, is_first_login: bool) -> Result<(), StoreError> {
        self.modify(user_id, |doc| {
            doc.profile.is_first_login = is_first_login;
            Ok(())
        })?;
        Ok(())
    }

    pub fn set_currency(&self, user_id: &str, currency: Currency) -> Result<(), StoreError> {
        self.modify(user_id, |doc| {
            doc.currency = currency;
            Ok(())
        })?;
        Ok(())
    }

    fn modify<F>(&self, user_id: &str, update: F) -> Result<UserDocument, StoreError>
    where
        F: FnOnce(&mut UserDocument) -> Result<(), StoreError>,
    {
        let path = self.path_for(user_id)?;
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;

        let existing = read_document(&path)?;
        let created = existing.is_none();
        let mut doc = existing.unwrap_or_default();
        let before = doc.clone();
        if doc.profile.created_at.is_none() {
            doc.profile.created_at = Some(Utc::now());
        }
        update(&mut doc)?;

        if created || doc != before {
            write_document(&path, &doc)?;
        }
        Ok(doc)
    }

    fn path_for(&self, user_id: &str) -> Result<PathBuf, StoreError> {
        let valid = !user_id.is_empty()
            && user_id.len() <= 128
            && user_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidUserId(user_id.to_string()));
        }
        Ok(self.root.join(format!("{user_id}.json")))
    }
}

fn read_document(path: &Path) -> Result<Option<UserDocument>, StoreError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_reader(BufReader::new(file))
        .map(Some)
        .map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })
}

fn write_document(path: &Path, doc: &UserDocument) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, doc).map_err(|source| StoreError::Json {
        path: temp_path.clone(),
        source,
    })?;
    writer.flush().map_err(io_err)?;
    writer.get_ref().sync_all().map_err(io_err)?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        io_err(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().expect("temp dir");
        let store = JsonStore::open(dir.path().join("users")).expect("open store");
        (dir, store)
    }

    #[test]
    fn load_or_create_writes_defaults_once() {
        let (_dir, store) = temp_store();
        assert!(store.load("alice").expect("load").is_none());

        let doc = store.load_or_create("alice").expect("create");
        assert_eq!(doc.financial_data, FinancialSnapshot::default());
        assert_eq!(doc.financial_data.goals.target_withdrawal_rate, 4.0);
        assert_eq!(doc.currency, Currency::Ngn);
        assert!(doc.profile.is_first_login);

        let stored = store.load("alice").expect("load").expect("document exists");
        assert_eq!(stored, doc);
    }

    #[test]
    fn missing_created_at_is_stamped_once_and_persisted() {
        let (_dir, store) = temp_store();
        fs::write(store.root().join("frank.json"), r#"{ "currency": "USD" }"#)
            .expect("seed document");
        assert_eq!(
            store
                .load("frank")
                .expect("load")
                .expect("exists")
                .profile
                .created_at,
            None
        );

        let first = store.load_or_create("frank").expect("load");
        let stamped = first.profile.created_at.expect("stamped on first load");
        assert_eq!(first.currency, Currency::Usd);

        let second = store.load_or_create("frank").expect("reload");
        assert_eq!(second.profile.created_at, Some(stamped));
        let stored = store.load("frank").expect("load").expect("exists");
        assert_eq!(stored.profile.created_at, Some(stamped));
    }

    #[test]
    fn save_and_patch_financial_data() {
        let (_dir, store) = temp_store();
        let mut snapshot = FinancialSnapshot::default();
        snapshot.income.salary = 5_000.0;
        store.save_financial_data("bob", &snapshot).expect("save");

        let patch: SnapshotPatch =
            serde_json::from_str(r#"{ "expenses": { "housing": 1200 } }"#).expect("parse");
        let merged = store.update_financial_data("bob", &patch).expect("patch");
        assert_eq!(merged.income.salary, 5_000.0);
        assert_eq!(merged.expenses.housing, 1_200.0);

        let stored = store.load("bob").expect("load").expect("exists");
        assert_eq!(stored.financial_data, merged);
    }

    #[test]
    fn invalid_patch_is_rejected_and_not_written() {
        let (_dir, store) = temp_store();
        store.load_or_create("carol").expect("create");
        let patch: SnapshotPatch =
            serde_json::from_str(r#"{ "goals": { "currentAge": 5 } }"#).expect("parse");

        let err = store
            .update_financial_data("carol", &patch)
            .expect_err("age 5 must be rejected");
        assert!(matches!(err, StoreError::Rejected(FireError::Validation(_))));

        let stored = store.load("carol").expect("load").expect("exists");
        assert_eq!(stored.financial_data.goals.current_age, 30);
    }

    #[test]
    fn save_rejects_negative_amounts() {
        let (_dir, store) = temp_store();
        let mut snapshot = FinancialSnapshot::default();
        snapshot.assets.cash = -1.0;
        let err = store.save_financial_data("dave", &snapshot).expect_err("negative cash");
        assert!(matches!(err, StoreError::Rejected(_)));
        assert!(store.load("dave").expect("load").is_none());
    }

    #[test]
    fn profile_creation_and_first_login_flag() {
        let (_dir, store) = temp_store();
        let doc = store
            .create_user_profile("erin", "erin@example.com", "Erin", "")
            .expect("create profile");
        assert_eq!(doc.profile.name, "Erin");
        assert_eq!(doc.profile.email, "erin@example.com");
        assert!(store.is_first_login("erin"));

        store.set_first_login("erin", false).expect("update flag");
        assert!(!store.is_first_login("erin"));
    }

    #[test]
    fn currency_preference_persists() {
        let (_dir, store) = temp_store();
        store.set_currency("frank", Currency::Gbp).expect("set currency");
        let doc = store.load("frank").expect("load").expect("exists");
        assert_eq!(doc.currency, Currency::Gbp);
    }

    #[test]
    fn rejects_path_like_user_ids() {
        let (_dir, store) = temp_store();
        for bad in ["", "../escape", "a/b", "with space"] {
            assert!(matches!(
                store.load(bad),
                Err(StoreError::InvalidUserId(_))
            ));
        }
        assert!(store.is_first_login("../escape"));
    }

    #[test]
    fn malformed_document_is_reported() {
        let (_dir, store) = temp_store();
        fs::write(store.root().join("gina.json"), "{ not json").expect("write garbage");
        assert!(matches!(store.load("gina"), Err(StoreError::Json { .. })));
    }

    #[test]
    fn partial_documents_fill_missing_fields_with_defaults() {
        let (_dir, store) = temp_store();
        fs::write(
            store.root().join("hank.json"),
            r#"{ "financialData": { "income": { "salary": 900 } }, "currency": "USD" }"#,
        )
        .expect("write partial");
        let doc = store.load("hank").expect("load").expect("exists");
        assert_eq!(doc.financial_data.income.salary, 900.0);
        assert_eq!(doc.financial_data.goals.target_retirement_age, 55);
        assert_eq!(doc.currency, Currency::Usd);
    }
}
