use std::collections::HashMap;

use anyhow::Context;
use aws_sdk_dynamodb::types::AttributeValue;
use serde::{Deserialize, Serialize};

pub type Item = HashMap<String, AttributeValue>;

pub const ATTR_USER_ID: &str = "userId";
pub const ATTR_NAME: &str = "name";
pub const ATTR_EMAIL: &str = "email";
pub const ATTR_PASSWORD: &str = "password";
pub const ATTR_CREATED_AT: &str = "createdAt";
pub const ATTR_PROFILE_IMAGE: &str = "profile_image";

/// User record in the `Users` table. Attributes other than `userId` may be
/// absent on items written by other tools, hence the options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing)]
    pub password_hash: Option<String>, // argon2 PHC string, never sent to clients
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

impl User {
    pub fn to_item(&self) -> Item {
        let mut item = Item::new();
        item.insert(ATTR_USER_ID.into(), AttributeValue::S(self.user_id.clone()));
        let optional = [
            (ATTR_NAME, &self.name),
            (ATTR_EMAIL, &self.email),
            (ATTR_PASSWORD, &self.password_hash),
            (ATTR_CREATED_AT, &self.created_at),
            (ATTR_PROFILE_IMAGE, &self.profile_image),
        ];
        for (attr, value) in optional {
            if let Some(v) = value {
                item.insert(attr.into(), AttributeValue::S(v.clone()));
            }
        }
        item
    }

    pub fn from_item(item: &Item) -> anyhow::Result<Self> {
        let user_id = string_attr(item, ATTR_USER_ID).context("item without userId")?;
        Ok(Self {
            user_id,
            name: string_attr(item, ATTR_NAME),
            email: string_attr(item, ATTR_EMAIL),
            password_hash: string_attr(item, ATTR_PASSWORD),
            created_at: string_attr(item, ATTR_CREATED_AT),
            profile_image: string_attr(item, ATTR_PROFILE_IMAGE),
        })
    }
}

fn string_attr(item: &Item, name: &str) -> Option<String> {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        User {
            user_id: "u-42".into(),
            name: Some("Ada".into()),
            email: Some("ada@example.com".into()),
            password_hash: Some("$argon2id$v=19$...".into()),
            created_at: Some("2024-05-01T10:00:00Z".into()),
            profile_image: None,
        }
    }

    #[test]
    fn item_uses_table_attribute_names() {
        let item = sample().to_item();
        assert_eq!(item.get("userId").unwrap().as_s().unwrap(), "u-42");
        assert_eq!(item.get("password").unwrap().as_s().unwrap(), "$argon2id$v=19$...");
        assert!(item.contains_key("createdAt"));
        assert!(!item.contains_key("profile_image"));
    }

    #[test]
    fn from_item_tolerates_missing_and_foreign_attributes() {
        let mut item = Item::new();
        item.insert("userId".into(), AttributeValue::S("legacy".into()));
        item.insert("age".into(), AttributeValue::N("31".into()));
        item.insert("email".into(), AttributeValue::N("7".into()));
        let user = User::from_item(&item).unwrap();
        assert_eq!(user.user_id, "legacy");
        assert_eq!(user.name, None);
        assert_eq!(user.email, None);
    }

    #[test]
    fn from_item_requires_user_id() {
        let err = User::from_item(&Item::new()).unwrap_err();
        assert!(err.to_string().contains("userId"));
    }

    #[test]
    fn password_hash_never_serialized() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["userId"], "u-42");
        assert_eq!(json["createdAt"], "2024-05-01T10:00:00Z");
        assert!(json.get("password_hash").is_none());
        assert!(json.get("password").is_none());
        assert!(json.get("profile_image").is_none());
    }
}
