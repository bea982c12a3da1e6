use reqwest::Client;

use crate::auth::{maybe_bearer, AuthManager};
use crate::error::{handle_empty_response, handle_response, ClientError};
use crate::types::{Folder, FolderRequest};

/// Folder CRUD against the scan backend.
pub struct FolderApi {
    client: Client,
    base_url: String,
}

impl FolderApi {
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// List all folders, newest first, with per-folder file counts.
    pub async fn list(&self, auth: &AuthManager) -> Result<Vec<Folder>, ClientError> {
        let url = format!("{}/api/folders", self.base_url);
        let response = maybe_bearer(self.client.get(&url), auth).send().await?;
        handle_response(response).await
    }

    /// Fetch one folder including its models.
    pub async fn get(&self, auth: &AuthManager, folder_id: u64) -> Result<Folder, ClientError> {
        let url = format!("{}/api/folders/{}", self.base_url, folder_id);
        let response = maybe_bearer(self.client.get(&url), auth).send().await?;
        handle_response(response).await
    }

    /// Create a folder with the given name.
    pub async fn create(&self, auth: &AuthManager, name: String) -> Result<Folder, ClientError> {
        let url = format!("{}/api/folders", self.base_url);
        let response = maybe_bearer(self.client.post(&url), auth)
            .json(&FolderRequest { name })
            .send()
            .await?;
        handle_response(response).await
    }

    /// Rename a folder.
    pub async fn rename(
        &self,
        auth: &AuthManager,
        folder_id: u64,
        name: String,
    ) -> Result<(), ClientError> {
        let url = format!("{}/api/folders/{}", self.base_url, folder_id);
        let response = maybe_bearer(self.client.put(&url), auth)
            .json(&FolderRequest { name })
            .send()
            .await?;
        handle_empty_response(response).await
    }

    /// Delete a folder and everything in it.
    pub async fn delete(&self, auth: &AuthManager, folder_id: u64) -> Result<(), ClientError> {
        let url = format!("{}/api/folders/{}", self.base_url, folder_id);
        let response = maybe_bearer(self.client.delete(&url), auth).send().await?;
        handle_empty_response(response).await
    }
}
