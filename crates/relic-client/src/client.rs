use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::auth::AuthManager;
use crate::error::ClientError;
use crate::folders::FolderApi;
use crate::models::ModelApi;
use crate::types::*;

/// A non-blocking handle to an in-flight async request.
/// Call `try_recv()` each frame to check for results without blocking the host loop.
pub struct PendingRequest<T> {
    receiver: mpsc::Receiver<Result<T, ClientError>>,
}

impl<T> PendingRequest<T> {
    /// Non-blocking check for the result. Returns `None` if still pending.
    pub fn try_recv(&self) -> Option<Result<T, ClientError>> {
        self.receiver.try_recv().ok()
    }

    /// Blocking wait for the result.
    pub fn wait(self) -> Result<T, ClientError> {
        self.receiver
            .recv()
            .map_err(|_| ClientError::Network("Channel closed".into()))?
    }
}

/// An in-flight model file download with advisory byte progress.
pub struct ModelDownload {
    progress: mpsc::Receiver<LoadProgress>,
    result: PendingRequest<Vec<u8>>,
}

impl ModelDownload {
    /// Latest progress report, draining any queued intermediate ones.
    pub fn try_progress(&self) -> Option<LoadProgress> {
        let mut latest = None;
        while let Ok(progress) = self.progress.try_recv() {
            latest = Some(progress);
        }
        latest
    }

    /// Non-blocking check for the downloaded bytes.
    pub fn try_recv(&self) -> Option<Result<Vec<u8>, ClientError>> {
        self.result.try_recv()
    }

    /// Blocking wait for the downloaded bytes.
    pub fn wait(self) -> Result<Vec<u8>, ClientError> {
        self.result.wait()
    }
}

/// Facade for all scan-backend interactions.
/// Owns a background tokio runtime and dispatches async work via channels.
pub struct ApiClient {
    runtime: tokio::runtime::Runtime,
    auth: Arc<AuthManager>,
    folders: Arc<FolderApi>,
    models: Arc<ModelApi>,
}

impl ApiClient {
    /// Create a client for the backend at `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = base_url.into();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .map_err(|e| ClientError::Network(format!("Failed to create runtime: {}", e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ClientError::Network(format!("Failed to create HTTP client: {}", e)))?;

        let auth = Arc::new(AuthManager::new(client.clone(), base_url.clone()));
        let folders = Arc::new(FolderApi::new(client.clone(), base_url.clone()));
        let models = Arc::new(ModelApi::new(client, base_url));

        Ok(Self {
            runtime,
            auth,
            folders,
            models,
        })
    }

    /// Log in with username and password.
    pub fn login(&self, username: String, password: String) -> PendingRequest<AuthResponse> {
        let (tx, rx) = mpsc::channel();
        let auth = Arc::clone(&self.auth);

        self.runtime.spawn(async move {
            let result = auth.login(LoginRequest { username, password }).await;
            let _ = tx.send(result);
        });

        PendingRequest { receiver: rx }
    }

    /// Log out, clearing stored credentials.
    pub fn logout(&self) -> PendingRequest<()> {
        let (tx, rx) = mpsc::channel();
        let auth = Arc::clone(&self.auth);

        self.runtime.spawn(async move {
            let result = auth.logout().await;
            let _ = tx.send(result);
        });

        PendingRequest { receiver: rx }
    }

    /// List all folders with file counts.
    pub fn list_folders(&self) -> PendingRequest<Vec<Folder>> {
        let (tx, rx) = mpsc::channel();
        let auth = Arc::clone(&self.auth);
        let api = Arc::clone(&self.folders);

        self.runtime.spawn(async move {
            let result = api.list(&auth).await;
            let _ = tx.send(result);
        });

        PendingRequest { receiver: rx }
    }

    /// Fetch one folder including its models.
    pub fn fetch_folder(&self, folder_id: u64) -> PendingRequest<Folder> {
        let (tx, rx) = mpsc::channel();
        let auth = Arc::clone(&self.auth);
        let api = Arc::clone(&self.folders);

        self.runtime.spawn(async move {
            let result = api.get(&auth, folder_id).await;
            let _ = tx.send(result);
        });

        PendingRequest { receiver: rx }
    }

    /// Create a new folder.
    pub fn create_folder(&self, name: String) -> PendingRequest<Folder> {
        let (tx, rx) = mpsc::channel();
        let auth = Arc::clone(&self.auth);
        let api = Arc::clone(&self.folders);

        self.runtime.spawn(async move {
            let result = api.create(&auth, name).await;
            let _ = tx.send(result);
        });

        PendingRequest { receiver: rx }
    }

    /// Rename a folder.
    pub fn rename_folder(&self, folder_id: u64, name: String) -> PendingRequest<()> {
        let (tx, rx) = mpsc::channel();
        let auth = Arc::clone(&self.auth);
        let api = Arc::clone(&self.folders);

        self.runtime.spawn(async move {
            let result = api.rename(&auth, folder_id, name).await;
            let _ = tx.send(result);
        });

        PendingRequest { receiver: rx }
    }

    /// Delete a folder and its contents.
    pub fn delete_folder(&self, folder_id: u64) -> PendingRequest<()> {
        let (tx, rx) = mpsc::channel();
        let auth = Arc::clone(&self.auth);
        let api = Arc::clone(&self.folders);

        self.runtime.spawn(async move {
            let result = api.delete(&auth, folder_id).await;
            let _ = tx.send(result);
        });

        PendingRequest { receiver: rx }
    }

    /// List a folder's models.
    pub fn list_models(&self, folder_id: u64) -> PendingRequest<Vec<ModelRecord>> {
        let (tx, rx) = mpsc::channel();
        let auth = Arc::clone(&self.auth);
        let api = Arc::clone(&self.models);

        self.runtime.spawn(async move {
            let result = api.list(&auth, folder_id).await;
            let _ = tx.send(result);
        });

        PendingRequest { receiver: rx }
    }

    /// Fetch one model's metadata.
    pub fn fetch_model(&self, model_id: u64) -> PendingRequest<ModelRecord> {
        let (tx, rx) = mpsc::channel();
        let auth = Arc::clone(&self.auth);
        let api = Arc::clone(&self.models);

        self.runtime.spawn(async move {
            let result = api.get(&auth, model_id).await;
            let _ = tx.send(result);
        });

        PendingRequest { receiver: rx }
    }

    /// Upload a scan file into a folder.
    pub fn upload_model(
        &self,
        folder_id: u64,
        file_name: String,
        bytes: Vec<u8>,
    ) -> PendingRequest<ModelRecord> {
        let (tx, rx) = mpsc::channel();
        let auth = Arc::clone(&self.auth);
        let api = Arc::clone(&self.models);

        self.runtime.spawn(async move {
            let result = api.upload(&auth, folder_id, file_name, bytes).await;
            let _ = tx.send(result);
        });

        PendingRequest { receiver: rx }
    }

    /// Delete a model.
    pub fn delete_model(&self, model_id: u64) -> PendingRequest<()> {
        let (tx, rx) = mpsc::channel();
        let auth = Arc::clone(&self.auth);
        let api = Arc::clone(&self.models);

        self.runtime.spawn(async move {
            let result = api.delete(&auth, model_id).await;
            let _ = tx.send(result);
        });

        PendingRequest { receiver: rx }
    }

    /// Download a model's raw file with byte progress.
    pub fn download_model(&self, model_id: u64) -> ModelDownload {
        let (progress_tx, progress_rx) = mpsc::channel();
        let (tx, rx) = mpsc::channel();
        let auth = Arc::clone(&self.auth);
        let api = Arc::clone(&self.models);

        self.runtime.spawn(async move {
            let result = api.download(&auth, model_id, progress_tx).await;
            let _ = tx.send(result);
        });

        ModelDownload {
            progress: progress_rx,
            result: PendingRequest { receiver: rx },
        }
    }

    /// Whether the client holds a login token.
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    pub fn user_name(&self) -> Option<String> {
        self.auth.user_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_request_try_recv_none_then_result() {
        let (tx, rx) = mpsc::channel();
        let pending: PendingRequest<String> = PendingRequest { receiver: rx };

        assert!(pending.try_recv().is_none());

        tx.send(Ok("hello".to_string())).unwrap();

        let result = pending.try_recv();
        assert!(result.is_some());
        assert_eq!(result.unwrap().unwrap(), "hello");
    }

    #[test]
    fn pending_request_wait() {
        let (tx, rx) = mpsc::channel();
        let pending: PendingRequest<u32> = PendingRequest { receiver: rx };

        tx.send(Ok(42)).unwrap();
        assert_eq!(pending.wait().unwrap(), 42);
    }

    #[test]
    fn pending_request_error() {
        let (tx, rx) = mpsc::channel();
        let pending: PendingRequest<String> = PendingRequest { receiver: rx };

        tx.send(Err(ClientError::Offline)).unwrap();

        let result = pending.try_recv();
        assert!(result.is_some());
        assert!(result.unwrap().is_err());
    }

    #[test]
    fn download_progress_drains_to_latest() {
        let (progress_tx, progress_rx) = mpsc::channel();
        let (_result_tx, result_rx) = mpsc::channel::<Result<Vec<u8>, ClientError>>();
        let download = ModelDownload {
            progress: progress_rx,
            result: PendingRequest { receiver: result_rx },
        };

        assert!(download.try_progress().is_none());

        for loaded in [100u64, 200, 300] {
            progress_tx
                .send(LoadProgress { bytes_loaded: loaded, total: Some(400) })
                .unwrap();
        }

        let latest = download.try_progress().unwrap();
        assert_eq!(latest.bytes_loaded, 300);
        assert!(download.try_progress().is_none());
    }
}
