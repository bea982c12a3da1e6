use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use relic_asset::MeshFormat;

/// A folder of uploaded scans, as returned by `/api/folders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Number of models in the folder; only present on list responses.
    #[serde(default)]
    pub file_count: Option<u64>,
    /// Models in the folder; only present on single-folder responses.
    #[serde(default)]
    pub models: Vec<ModelRecord>,
}

impl Folder {
    /// Parsed creation date, if the server sent one.
    pub fn created_at(&self) -> Option<NaiveDate> {
        let raw = self.created_at.as_deref()?;
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").ok().map(|dt| dt.date()))
    }
}

/// An uploaded scan file's metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRecord {
    pub id: u64,
    #[serde(default)]
    pub folder_id: Option<u64>,
    pub name: String,
    /// Lowercased file extension recorded at upload time.
    pub file_type: String,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
}

impl ModelRecord {
    /// The declared mesh format for this record.
    ///
    /// Format always comes from the stored `file_type` tag, never from
    /// sniffing the file name or URL.
    pub fn format(&self) -> Result<MeshFormat, relic_asset::AssetError> {
        self.file_type.parse()
    }

    /// Parsed upload timestamp, if the server sent one.
    pub fn uploaded_at(&self) -> Option<NaiveDateTime> {
        let raw = self.uploaded_at.as_deref()?;
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
            .ok()
            .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").ok())
    }
}

/// Body for folder create and rename requests.
#[derive(Debug, Clone, Serialize)]
pub struct FolderRequest {
    pub name: String,
}

/// Login credentials for `/api/auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub session_token: Option<String>,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Advisory byte progress for an in-flight model download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    pub bytes_loaded: u64,
    /// Total size if the server sent a content length.
    pub total: Option<u64>,
}

impl LoadProgress {
    /// Fraction complete in `[0, 1]`, when the total is known.
    pub fn fraction(&self) -> Option<f32> {
        let total = self.total?;
        if total == 0 {
            return None;
        }
        Some((self.bytes_loaded as f64 / total as f64) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_list_entry_deserializes() {
        let json = r#"{"id": 3, "name": "Amphorae", "created_at": "2025-11-02", "file_count": 7}"#;
        let folder: Folder = serde_json::from_str(json).unwrap();
        assert_eq!(folder.id, 3);
        assert_eq!(folder.file_count, Some(7));
        assert!(folder.models.is_empty());
        assert_eq!(
            folder.created_at(),
            NaiveDate::from_ymd_opt(2025, 11, 2)
        );
    }

    #[test]
    fn folder_detail_includes_models() {
        let json = r#"{
            "id": 3,
            "name": "Amphorae",
            "created_at": "2025-11-02",
            "models": [
                {"id": 10, "name": "neck.ply", "file_type": "ply", "file_size": 2048,
                 "uploaded_at": "2025-11-03 14:05:00"}
            ]
        }"#;
        let folder: Folder = serde_json::from_str(json).unwrap();
        assert_eq!(folder.models.len(), 1);
        assert_eq!(folder.models[0].format().unwrap(), MeshFormat::Ply);
        assert!(folder.models[0].uploaded_at().is_some());
    }

    #[test]
    fn unknown_file_type_is_an_error() {
        let record = ModelRecord {
            id: 1,
            folder_id: None,
            name: "scan.xyz".into(),
            file_type: "xyz".into(),
            file_size: None,
            uploaded_at: None,
        };
        assert!(record.format().is_err());
    }

    #[test]
    fn progress_fraction() {
        let progress = LoadProgress { bytes_loaded: 50, total: Some(200) };
        assert_eq!(progress.fraction(), Some(0.25));
        let unknown = LoadProgress { bytes_loaded: 50, total: None };
        assert_eq!(unknown.fraction(), None);
    }
}
