//! HTTP-backed user directory.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use crate::config::UsersConfig;
use crate::directory::{DirectoryError, User, UserDirectory};

/// Fetches users from `{base_url}/users/{id}`.
#[derive(Clone)]
pub struct HttpUserDirectory {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpUserDirectory {
    pub fn new(config: &UsersConfig) -> Result<Self, DirectoryError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| DirectoryError::Config(format!("base_url '{}': {e}", config.base_url)))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DirectoryError::Config(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Address of the record for `id`.
    pub fn user_url(&self, id: i64) -> String {
        format!("{}/users/{}", self.base_url.as_str().trim_end_matches('/'), id)
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn fetch_user(&self, id: i64) -> Result<User, DirectoryError> {
        let url = self.user_url(id);
        tracing::debug!(url = %url, "Fetching user");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DirectoryError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(DirectoryError::NotFound(id)),
            status if !status.is_success() => Err(DirectoryError::Status(status.as_u16())),
            _ => response
                .json::<User>()
                .await
                .map_err(|e| DirectoryError::Transport(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory(base_url: &str) -> HttpUserDirectory {
        HttpUserDirectory::new(&UsersConfig {
            base_url: base_url.to_string(),
            timeout_secs: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_user_url() {
        assert_eq!(directory("http://hris.local").user_url(3), "http://hris.local/users/3");
        assert_eq!(directory("http://hris.local/api/").user_url(7), "http://hris.local/api/users/7");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = HttpUserDirectory::new(&UsersConfig {
            base_url: "::nope".into(),
            timeout_secs: 1,
        })
        .err()
        .unwrap();
        assert!(matches!(err, DirectoryError::Config(_)));
    }
}
