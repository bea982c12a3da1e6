//! REST client for the scan backend
//!
//! Wraps the folder, model, and auth endpoints behind a background tokio
//! runtime. Every call returns a [`PendingRequest`] handle the host polls
//! once per frame with `try_recv()`, so network I/O never blocks the
//! viewer loop.

pub mod auth;
pub mod client;
pub mod error;
pub mod folders;
pub mod models;
pub mod types;

pub use auth::AuthManager;
pub use client::{ApiClient, ModelDownload, PendingRequest};
pub use error::ClientError;
pub use folders::FolderApi;
pub use models::ModelApi;
pub use types::{AuthResponse, Folder, LoadProgress, LoginRequest, ModelRecord, UserInfo};
