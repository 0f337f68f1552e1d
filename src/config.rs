use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Http,
    Lambda,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Config {
    pub bucket: String,
    /// Custom endpoint (MinIO, localstack). Unset means AWS.
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    /// Overrides the base of the URLs written to `profile_image`.
    pub public_base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub run_mode: RunMode,
    pub aws_region: String,
    pub users_table: String,
    pub dynamodb_endpoint: Option<String>,
    pub s3: S3Config,
    pub jwt: JwtConfig,
    pub protect_user_list: bool,
    pub upload_max_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| get(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| get(key).with_context(|| format!("{key} must be set"));

        let run_mode = match get("RUN_MODE").as_deref() {
            Some("lambda") => RunMode::Lambda,
            Some("http") => RunMode::Http,
            _ if get("AWS_LAMBDA_RUNTIME_API").is_some() => RunMode::Lambda,
            _ => RunMode::Http,
        };

        let jwt = JwtConfig {
            secret: required("JWT_SECRET")?,
            issuer: get("JWT_ISSUER").unwrap_or_else(|| "users-api".into()),
            audience: get("JWT_AUDIENCE").unwrap_or_else(|| "users-api-clients".into()),
            ttl_minutes: parse_or(get("JWT_TTL_MINUTES"), 60),
        };

        let s3 = S3Config {
            bucket: required("S3_BUCKET")?,
            endpoint: get("S3_ENDPOINT"),
            access_key: get("S3_ACCESS_KEY"),
            secret_key: get("S3_SECRET_KEY"),
            public_base_url: get("PUBLIC_BASE_URL"),
        };

        Ok(Self {
            host: get("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(get("APP_PORT"), 8080),
            run_mode,
            aws_region: get("AWS_REGION").unwrap_or_else(|| "us-east-1".into()),
            users_table: get("USERS_TABLE").unwrap_or_else(|| "Users".into()),
            dynamodb_endpoint: get("DYNAMODB_ENDPOINT"),
            s3,
            jwt,
            protect_user_list: parse_or(get("PROTECT_USER_LIST"), true),
            upload_max_bytes: parse_or(get("UPLOAD_MAX_BYTES"), 5 * 1024 * 1024),
        })
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse::<T>().ok()).unwrap_or(default)
}
