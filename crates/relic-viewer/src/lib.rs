//! Interactive inspection core for scanned artifacts
//!
//! Decomposes a loaded [`relic_asset::MeshAsset`] into pickable faces,
//! animates an explode offset over them, resolves per-face colors, and
//! frames the model with a fitted perspective camera. Host-agnostic:
//! drive it with `tick(dt)` and pointer positions in NDC.

pub mod animate;
pub mod camera;
pub mod config;
pub mod face;
pub mod picking;
pub mod vertex;
pub mod viewer;

pub use camera::Camera;
pub use config::ViewerConfig;
pub use face::{Face, FaceSet};
pub use picking::{PickController, Ray};
pub use vertex::FaceVertex;
pub use viewer::{DisplayMode, Viewer, ViewerEvent};
