use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub upload_dir: PathBuf,
    pub log_level: String,
    pub cloudinary: Option<CloudinaryConfig>,
}

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let jwt_secret = env_required("JWT_SECRET")?;

        let host: IpAddr = env_or("LMS_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid LMS_HOST: {e}"))?;

        let port: u16 = env_or("LMS_PORT", "8080")
            .parse()
            .map_err(|e| format!("Invalid LMS_PORT: {e}"))?;

        let max_body_size: usize = env_or("LMS_MAX_BODY_SIZE", "10485760")
            .parse()
            .map_err(|e| format!("Invalid LMS_MAX_BODY_SIZE: {e}"))?;

        let upload_dir = PathBuf::from(env_or("LMS_UPLOAD_DIR", "uploads"));

        let log_level = env_or("LMS_LOG_LEVEL", "info");

        let cloudinary = cloudinary_from_parts(
            std::env::var("CLOUDINARY_CLOUD_NAME").ok(),
            std::env::var("CLOUDINARY_API_KEY").ok(),
            std::env::var("CLOUDINARY_API_SECRET").ok(),
        )?;

        Ok(Config {
            database_url,
            jwt_secret,
            host,
            port,
            max_body_size,
            upload_dir,
            log_level,
            cloudinary,
        })
    }
}

/// All three credentials, or none at all.
fn cloudinary_from_parts(
    cloud_name: Option<String>,
    api_key: Option<String>,
    api_secret: Option<String>,
) -> Result<Option<CloudinaryConfig>, String> {
    match (cloud_name, api_key, api_secret) {
        (Some(cloud_name), Some(api_key), Some(api_secret)) => Ok(Some(CloudinaryConfig {
            cloud_name,
            api_key,
            api_secret,
        })),
        (None, None, None) => Ok(None),
        _ => Err(
            "CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET must be set together"
                .to_string(),
        ),
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn cloudinary_is_optional() {
        assert!(cloudinary_from_parts(None, None, None).unwrap().is_none());
    }

    #[test]
    fn cloudinary_needs_every_credential() {
        let cfg = cloudinary_from_parts(some("demo"), some("key"), some("secret"))
            .unwrap()
            .unwrap();
        assert_eq!(cfg.cloud_name, "demo");

        assert!(cloudinary_from_parts(some("demo"), None, some("secret")).is_err());
    }
}
