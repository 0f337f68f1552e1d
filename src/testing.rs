//! In-memory stand-ins for DynamoDB and S3.

use std::{
    collections::{BTreeMap, HashSet},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use bytes::Bytes;

use crate::{
    config::{AppConfig, JwtConfig, RunMode, S3Config},
    state::AppState,
    storage::StorageClient,
    users::{repo::UserStore, repo_types::User},
};

/// Arms a one-shot failure for the named operation.
#[derive(Default)]
struct Faults(Mutex<HashSet<&'static str>>);

impl Faults {
    fn arm(&self, op: &'static str) {
        self.0.lock().unwrap().insert(op);
    }

    fn check(&self, op: &'static str) -> anyhow::Result<()> {
        if self.0.lock().unwrap().remove(op) {
            anyhow::bail!("injected {op} failure");
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    rows: Mutex<BTreeMap<String, User>>,
    faults: Faults,
}

impl MemoryUserStore {
    pub fn fail_next(&self, op: &'static str) {
        self.faults.arm(op);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn scan_all(&self) -> anyhow::Result<Vec<User>> {
        self.faults.check("scan")?;
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn get(&self, user_id: &str) -> anyhow::Result<Option<User>> {
        self.faults.check("get")?;
        Ok(self.rows.lock().unwrap().get(user_id).cloned())
    }

    async fn put(&self, user: &User) -> anyhow::Result<()> {
        self.faults.check("put")?;
        self.rows
            .lock()
            .unwrap()
            .insert(user.user_id.clone(), user.clone());
        Ok(())
    }

    async fn set_profile_image(&self, user_id: &str, url: &str) -> anyhow::Result<bool> {
        self.faults.check("set_profile_image")?;
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(user_id) {
            Some(user) => {
                user.profile_image = Some(url.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: String,
}

#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<BTreeMap<String, StoredObject>>,
    faults: Faults,
}

impl MemoryStorage {
    pub fn fail_next(&self, op: &'static str) {
        self.faults.arm(op);
    }

    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl StorageClient for MemoryStorage {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()> {
        self.faults.check("put")?;
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> anyhow::Result<()> {
        self.faults.check("delete")?;
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    fn object_url(&self, key: &str) -> String {
        format!("https://fake.local/{key}")
    }
}

pub struct Fakes {
    pub users: Arc<MemoryUserStore>,
    pub storage: Arc<MemoryStorage>,
}

pub fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".into(),
        port: 0,
        run_mode: RunMode::Http,
        aws_region: "us-east-1".into(),
        users_table: "Users".into(),
        dynamodb_endpoint: None,
        s3: S3Config {
            bucket: "fake".into(),
            endpoint: None,
            access_key: None,
            secret_key: None,
            public_base_url: None,
        },
        jwt: JwtConfig {
            secret: "test-secret".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_minutes: 5,
        },
        protect_user_list: true,
        upload_max_bytes: 1024 * 1024,
    }
}

pub fn fake_state_with(config: AppConfig) -> (AppState, Fakes) {
    let users = Arc::new(MemoryUserStore::default());
    let storage = Arc::new(MemoryStorage::default());
    let state = AppState::from_parts(
        Arc::new(config),
        users.clone() as Arc<dyn UserStore>,
        storage.clone() as Arc<dyn StorageClient>,
    );
    (state, Fakes { users, storage })
}

pub fn fake_state() -> (AppState, Fakes) {
    fake_state_with(test_config())
}
