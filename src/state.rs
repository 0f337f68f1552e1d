use std::sync::Arc;

use aws_config::{BehaviorVersion, Region};
use tracing::info;

use crate::auth::jwt::JwtKeys;
use crate::config::AppConfig;
use crate::storage::{Storage, StorageClient};
use crate::users::repo::{DynamoUserStore, UserStore};

/// Everything a handler needs. Clients are built once in [`AppState::init`]
/// and shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub jwt: Arc<JwtKeys>,
    pub users: Arc<dyn UserStore>,
    pub storage: Arc<dyn StorageClient>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.aws_region.clone()))
            .load()
            .await;

        let mut dynamo = aws_sdk_dynamodb::config::Builder::from(&shared);
        if let Some(endpoint) = &config.dynamodb_endpoint {
            dynamo = dynamo.endpoint_url(endpoint);
        }
        let users = Arc::new(DynamoUserStore::new(
            aws_sdk_dynamodb::Client::from_conf(dynamo.build()),
            config.users_table.clone(),
        )) as Arc<dyn UserStore>;

        let storage =
            Arc::new(Storage::new(&shared, &config.s3, &config.aws_region)) as Arc<dyn StorageClient>;

        info!(
            table = %config.users_table,
            bucket = %config.s3.bucket,
            region = %config.aws_region,
            "aws clients ready"
        );

        Ok(Self::from_parts(Arc::new(config), users, storage))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        storage: Arc<dyn StorageClient>,
    ) -> Self {
        let jwt = Arc::new(JwtKeys::from_config(&config.jwt));
        Self {
            config,
            jwt,
            users,
            storage,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        crate::testing::fake_state().0
    }
}
