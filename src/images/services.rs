use bytes::Bytes;
use tracing::{error, info, warn};

use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

pub struct UploadItem {
    pub body: Bytes,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

/// Extension of the client-supplied file name, lower-cased. Not checked
/// against the bytes.
fn ext_from_file_name(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    let ext = ext.trim();
    if stem.is_empty() || ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

pub fn profile_image_key(user_id: &str, file_name: Option<&str>) -> String {
    match file_name.and_then(ext_from_file_name) {
        Some(ext) => format!("profile_pics/{user_id}.{ext}"),
        None => format!("profile_pics/{user_id}"),
    }
}

/// Stores the image and points the user's `profile_image` at it. Returns
/// the object URL.
///
/// The object and the record are not updated atomically. When the record
/// update fails, or the user does not exist, the object is deleted again
/// on a best-effort basis.
pub async fn upload_profile_image(
    st: &AppState,
    user_id: &str,
    image: UploadItem,
) -> AppResult<String> {
    let key = profile_image_key(user_id, image.file_name.as_deref());
    let content_type = image
        .content_type
        .as_deref()
        .unwrap_or("application/octet-stream");

    st.storage
        .put_object(&key, image.body, content_type)
        .await
        .map_err(|e| AppError::storage("put_object", e))?;
    let url = st.storage.object_url(&key);

    match st.users.set_profile_image(user_id, &url).await {
        Ok(true) => {
            info!(user_id, %key, "profile image updated");
            Ok(url)
        }
        Ok(false) => {
            warn!(user_id, "profile image for unknown user");
            discard_object(st, &key).await;
            Err(AppError::NotFound {
                entity: "User",
                key: user_id.to_string(),
            })
        }
        Err(e) => {
            discard_object(st, &key).await;
            Err(AppError::database("update_item", e))
        }
    }
}

async fn discard_object(st: &AppState, key: &str) {
    if let Err(e) = st.storage.delete_object(key).await {
        error!(error = %e, %key, "orphaned profile image left in storage");
    }
}
