use std::sync::mpsc;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::debug;

use crate::auth::{maybe_bearer, AuthManager};
use crate::error::{handle_empty_response, handle_response, ClientError};
use crate::types::{LoadProgress, ModelRecord};

/// Model metadata, upload, and raw-file download.
pub struct ModelApi {
    client: Client,
    base_url: String,
}

impl ModelApi {
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// List the models in a folder, newest first.
    pub async fn list(
        &self,
        auth: &AuthManager,
        folder_id: u64,
    ) -> Result<Vec<ModelRecord>, ClientError> {
        let url = format!("{}/api/folders/{}/models", self.base_url, folder_id);
        let response = maybe_bearer(self.client.get(&url), auth).send().await?;
        handle_response(response).await
    }

    /// Fetch one model's metadata.
    pub async fn get(&self, auth: &AuthManager, model_id: u64) -> Result<ModelRecord, ClientError> {
        let url = format!("{}/api/models/{}", self.base_url, model_id);
        let response = maybe_bearer(self.client.get(&url), auth).send().await?;
        handle_response(response).await
    }

    /// Upload a scan file into a folder as a multipart form.
    pub async fn upload(
        &self,
        auth: &AuthManager,
        folder_id: u64,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Result<ModelRecord, ClientError> {
        let url = format!("{}/api/folders/{}/models", self.base_url, folder_id);

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/octet-stream")
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let form = Form::new().part("file", part);

        let response = maybe_bearer(self.client.post(&url), auth)
            .multipart(form)
            .send()
            .await?;
        handle_response(response).await
    }

    /// Delete a model and its stored file.
    pub async fn delete(&self, auth: &AuthManager, model_id: u64) -> Result<(), ClientError> {
        let url = format!("{}/api/models/{}", self.base_url, model_id);
        let response = maybe_bearer(self.client.delete(&url), auth).send().await?;
        handle_empty_response(response).await
    }

    /// Download a model's raw file, reporting byte progress as chunks
    /// arrive. Progress is advisory; a dropped receiver never fails the
    /// download.
    pub async fn download(
        &self,
        auth: &AuthManager,
        model_id: u64,
        progress: mpsc::Sender<LoadProgress>,
    ) -> Result<Vec<u8>, ClientError> {
        let url = format!("{}/api/models/{}/file", self.base_url, model_id);
        let response = maybe_bearer(self.client.get(&url), auth).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(format!("model {}", model_id)));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::ServerError {
                status: status.as_u16(),
                message: text,
            });
        }

        let total = response.content_length();
        let mut bytes: Vec<u8> = Vec::new();
        let mut response = response;
        while let Some(chunk) = response.chunk().await? {
            bytes.extend_from_slice(&chunk);
            let _ = progress.send(LoadProgress {
                bytes_loaded: bytes.len() as u64,
                total,
            });
        }

        debug!(model_id, size = bytes.len(), "model file downloaded");
        Ok(bytes)
    }
}
