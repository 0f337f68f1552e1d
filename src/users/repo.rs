use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_dynamodb::{types::AttributeValue, Client};
use tracing::debug;

use super::repo_types::{Item, User, ATTR_PROFILE_IMAGE, ATTR_USER_ID};

/// Access to the `Users` table. Writes are plain overwrites; nothing here
/// checks for an existing `userId` before a put.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn scan_all(&self) -> anyhow::Result<Vec<User>>;
    async fn get(&self, user_id: &str) -> anyhow::Result<Option<User>>;
    async fn put(&self, user: &User) -> anyhow::Result<()>;
    /// Sets `profile_image` on an existing record. Returns `false` when the
    /// record does not exist; no item is created in that case.
    async fn set_profile_image(&self, user_id: &str, url: &str) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct DynamoUserStore {
    client: Client,
    table: String,
}

impl DynamoUserStore {
    pub fn new(client: Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

#[async_trait]
impl UserStore for DynamoUserStore {
    async fn scan_all(&self) -> anyhow::Result<Vec<User>> {
        let mut users = Vec::new();
        let mut start_key: Option<Item> = None;
        loop {
            let page = self
                .client
                .scan()
                .table_name(&self.table)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .context("dynamodb scan")?;

            for item in page.items() {
                users.push(User::from_item(item)?);
            }

            match page.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }
        debug!(table = %self.table, count = users.len(), "scanned users");
        Ok(users)
    }

    async fn get(&self, user_id: &str) -> anyhow::Result<Option<User>> {
        let out = self
            .client
            .get_item()
            .table_name(&self.table)
            .key(ATTR_USER_ID, AttributeValue::S(user_id.to_string()))
            .send()
            .await
            .with_context(|| format!("dynamodb get_item {user_id}"))?;

        out.item().map(User::from_item).transpose()
    }

    async fn put(&self, user: &User) -> anyhow::Result<()> {
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(user.to_item()))
            .send()
            .await
            .with_context(|| format!("dynamodb put_item {}", user.user_id))?;
        Ok(())
    }

    async fn set_profile_image(&self, user_id: &str, url: &str) -> anyhow::Result<bool> {
        let res = self
            .client
            .update_item()
            .table_name(&self.table)
            .key(ATTR_USER_ID, AttributeValue::S(user_id.to_string()))
            .update_expression("SET #img = :img")
            .condition_expression("attribute_exists(#pk)")
            .expression_attribute_names("#img", ATTR_PROFILE_IMAGE)
            .expression_attribute_names("#pk", ATTR_USER_ID)
            .expression_attribute_values(":img", AttributeValue::S(url.to_string()))
            .send()
            .await;

        match res {
            Ok(_) => Ok(true),
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_conditional_check_failed_exception() {
                    Ok(false)
                } else {
                    Err(anyhow::Error::new(service_err))
                        .with_context(|| format!("dynamodb update_item {user_id}"))
                }
            }
        }
    }
}
