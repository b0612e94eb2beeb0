use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;

use haven_backend::{
    ApiError, Backup, EncryptedCredentialBackup, HandlerDetail, Invitation, Profile,
    ProfileUpdate, VaultApi,
};

const USER_AGENT: &str = concat!("haven/", env!("CARGO_PKG_VERSION"));
const SNIPPET_CHARS: usize = 160;

/// JSON-over-HTTP implementation of [`VaultApi`] with bearer authentication.
pub struct HttpVaultApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpVaultApi {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Use a preconfigured [`reqwest::Client`], for example one with a
    /// connect timeout or proxy settings.
    #[must_use]
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { client, base_url }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        let response = request
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|error| ApiError::network_request_from(operation, error))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        debug!("{operation}: server answered HTTP {status}");
        let body = response.text().await.unwrap_or_default();
        Err(status_error(operation, status.as_u16(), &body))
    }

    async fn json_body<T: DeserializeOwned>(
        operation: &'static str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        response
            .json()
            .await
            .map_err(|error| ApiError::network_parse_from(operation, error))
    }
}

fn status_error(operation: &'static str, status: u16, body: &str) -> ApiError {
    match status {
        401 | 403 => ApiError::Unauthorized { operation },
        404 => ApiError::NotFound {
            resource: operation,
        },
        _ => ApiError::HttpStatus {
            operation,
            status,
            body_snippet: response_snippet(body, SNIPPET_CHARS),
        },
    }
}

fn response_snippet(body: &str, max_chars: usize) -> String {
    let snippet: String = body.chars().take(max_chars).collect();
    if snippet.is_empty() {
        String::new()
    } else {
        format!(": {snippet}")
    }
}

#[async_trait]
impl VaultApi for HttpVaultApi {
    async fn list_backups(&self, token: &str) -> Result<Vec<Backup>, ApiError> {
        let request = self.client.get(self.endpoint("v1/backups")).bearer_auth(token);
        let response = self.send("backup listing", request).await?;
        Self::json_body("backup listing", response).await
    }

    async fn delete_backup(&self, token: &str, id: &str) -> Result<(), ApiError> {
        let request = self
            .client
            .delete(self.endpoint(&format!("v1/backups/{id}")))
            .bearer_auth(token);
        self.send("backup deletion", request).await?;
        Ok(())
    }

    async fn create_invitation(&self, token: &str) -> Result<Invitation, ApiError> {
        let request = self
            .client
            .post(self.endpoint("v1/invitations"))
            .bearer_auth(token);
        let response = self.send("invitation creation", request).await?;
        Self::json_body("invitation creation", response).await
    }

    async fn upload_credential_backup(
        &self,
        token: &str,
        backup: &EncryptedCredentialBackup,
    ) -> Result<(), ApiError> {
        let request = self
            .client
            .put(self.endpoint("v1/credentials/backup"))
            .bearer_auth(token)
            .json(backup);
        self.send("credential backup upload", request).await?;
        Ok(())
    }

    async fn fetch_credential_backup(
        &self,
        token: &str,
    ) -> Result<EncryptedCredentialBackup, ApiError> {
        let request = self
            .client
            .get(self.endpoint("v1/credentials/backup"))
            .bearer_auth(token);
        let response = self.send("credential backup", request).await?;
        Self::json_body("credential backup", response).await
    }

    async fn handler_detail(&self, token: &str, id: &str) -> Result<HandlerDetail, ApiError> {
        let request = self
            .client
            .get(self.endpoint(&format!("v1/handlers/{id}")))
            .bearer_auth(token);
        let response = self.send("handler detail", request).await?;
        Self::json_body("handler detail", response).await
    }

    async fn install_handler(&self, token: &str, id: &str) -> Result<(), ApiError> {
        let request = self
            .client
            .post(self.endpoint(&format!("v1/handlers/{id}/install")))
            .bearer_auth(token);
        self.send("handler install", request).await?;
        Ok(())
    }

    async fn uninstall_handler(&self, token: &str, id: &str) -> Result<(), ApiError> {
        let request = self
            .client
            .delete(self.endpoint(&format!("v1/handlers/{id}/install")))
            .bearer_auth(token);
        self.send("handler uninstall", request).await?;
        Ok(())
    }

    async fn fetch_profile(&self, token: &str) -> Result<Profile, ApiError> {
        let request = self.client.get(self.endpoint("v1/profile")).bearer_auth(token);
        let response = self.send("profile fetch", request).await?;
        Self::json_body("profile fetch", response).await
    }

    async fn update_profile(
        &self,
        token: &str,
        update: &ProfileUpdate,
    ) -> Result<Profile, ApiError> {
        let request = self
            .client
            .patch(self.endpoint("v1/profile"))
            .bearer_auth(token)
            .json(update);
        let response = self.send("profile update", request).await?;
        Self::json_body("profile update", response).await
    }
}

#[cfg(test)]
mod tests {
    use super::{HttpVaultApi, response_snippet, status_error};
    use haven_backend::ApiError;

    #[test]
    fn endpoint_joins_base_and_path_with_single_slash() {
        let api = HttpVaultApi::new("https://api.haven.example/");
        assert_eq!(
            api.endpoint("v1/backups"),
            "https://api.haven.example/v1/backups"
        );

        let no_trailing = HttpVaultApi::new("https://api.haven.example");
        assert_eq!(
            no_trailing.endpoint("v1/profile"),
            "https://api.haven.example/v1/profile"
        );
    }

    #[test]
    fn auth_statuses_map_to_unauthorized() {
        for status in [401, 403] {
            assert_eq!(
                status_error("profile fetch", status, ""),
                ApiError::Unauthorized {
                    operation: "profile fetch"
                }
            );
        }
    }

    #[test]
    fn missing_resource_maps_to_not_found() {
        assert_eq!(
            status_error("handler detail", 404, "no such handler"),
            ApiError::NotFound {
                resource: "handler detail"
            }
        );
    }

    #[test]
    fn other_statuses_carry_a_bounded_body_snippet() {
        let long_body = "x".repeat(500);
        let error = status_error("backup listing", 500, &long_body);

        match error {
            ApiError::HttpStatus {
                operation,
                status,
                body_snippet,
            } => {
                assert_eq!(operation, "backup listing");
                assert_eq!(status, 500);
                // ": " prefix plus at most 160 characters of body
                assert_eq!(body_snippet.len(), 162);
            }
            other => panic!("expected HttpStatus, got {other:?}"),
        }
    }

    #[test]
    fn empty_body_yields_empty_snippet() {
        assert_eq!(response_snippet("", 160), "");
        assert_eq!(response_snippet("oops", 160), ": oops");
    }
}
