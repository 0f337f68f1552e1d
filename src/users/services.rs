use anyhow::Context;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::info;

use super::{dto::NewUser, repo_types::User};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

pub fn now_rfc3339() -> anyhow::Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("format createdAt")
}

/// Writes a fresh record for `new`, replacing whatever was stored under the
/// same `userId` (last write wins).
pub async fn create_user(
    st: &AppState,
    new: NewUser,
    password_hash: Option<String>,
) -> AppResult<User> {
    let user = User {
        user_id: new.user_id,
        name: Some(new.name),
        email: Some(new.email),
        password_hash,
        created_at: Some(now_rfc3339()?),
        profile_image: None,
    };
    st.users
        .put(&user)
        .await
        .map_err(|e| AppError::database("put_item", e))?;
    info!(user_id = %user.user_id, "user stored");
    Ok(user)
}

pub async fn find_user(st: &AppState, user_id: &str) -> AppResult<User> {
    st.users
        .get(user_id)
        .await
        .map_err(|e| AppError::database("get_item", e))?
        .ok_or_else(|| AppError::NotFound {
            entity: "User",
            key: user_id.to_string(),
        })
}

pub async fn list_users(st: &AppState) -> AppResult<Vec<User>> {
    st.users
        .scan_all()
        .await
        .map_err(|e| AppError::database("scan", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(id: &str, name: &str) -> NewUser {
        NewUser {
            user_id: id.into(),
            name: name.into(),
            email: format!("{id}@example.com"),
        }
    }

    #[test]
    fn timestamp_is_rfc3339() {
        let ts = now_rfc3339().unwrap();
        assert!(OffsetDateTime::parse(&ts, &Rfc3339).is_ok());
    }

    #[tokio::test]
    async fn create_then_list_contains_user() {
        let st = AppState::fake();
        create_user(&st, new_user("u1", "Ada"), None).await.unwrap();
        let ids: Vec<String> = list_users(&st).await.unwrap().into_iter().map(|u| u.user_id).collect();
        assert_eq!(ids, vec!["u1".to_string()]);
    }

    #[tokio::test]
    async fn same_user_id_is_last_write_wins() {
        let st = AppState::fake();
        create_user(&st, new_user("dup", "First"), None).await.unwrap();
        create_user(&st, new_user("dup", "Second"), None).await.unwrap();

        let users = list_users(&st).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name.as_deref(), Some("Second"));
    }

    #[tokio::test]
    async fn find_missing_is_not_found() {
        let st = AppState::fake();
        let err = find_user(&st, "ghost").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn store_failure_maps_to_database_error() {
        let (st, fakes) = crate::testing::fake_state();
        fakes.users.fail_next("put");
        let err = create_user(&st, new_user("u1", "Ada"), None).await.unwrap_err();
        assert!(matches!(err, AppError::Database { operation: "put_item", .. }));
    }
}
