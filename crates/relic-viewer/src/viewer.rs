//! Viewer session: owns the loaded asset, its face decomposition, the
//! camera, and the transient interaction state, and is driven
//! cooperatively by the host (`tick`, pointer handlers, `commit_load`).

use std::collections::HashMap;

use glam::Vec2;
use tracing::{debug, info, warn};

use relic_asset::{placeholder_artifact, AssetError, MeshAsset};
use relic_core::{Color, ColorParseError};

use crate::animate::{tick_colors, tick_explode};
use crate::camera::Camera;
use crate::config::ViewerConfig;
use crate::face::FaceSet;
use crate::picking::PickController;

/// How the model is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Individual pickable faces (capped decomposition).
    #[default]
    Faces,
    /// The full original mesh, no per-face interaction.
    Triangles,
}

/// Events produced by the session for the host to react to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerEvent {
    /// The pointer was pressed while hovering this face.
    FaceSelected(u32),
    /// The camera was refit to the current model.
    CameraReset,
}

/// One interactive inspection session.
///
/// A session outlives the models shown in it: each load replaces the
/// asset, faces, and interaction state wholesale, and the generation
/// token discards results of loads that were superseded before they
/// finished.
pub struct Viewer {
    config: ViewerConfig,
    camera: Camera,
    asset: Option<MeshAsset>,
    faces: FaceSet,
    pick: PickController,
    assignments: HashMap<u32, Color>,
    selected: Option<u32>,
    explode_amount: f32,
    display_mode: DisplayMode,
    generation: u64,
    events: Vec<ViewerEvent>,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Self {
        let camera = Camera::new(config.fov_degrees, config.aspect_ratio);
        Self {
            config,
            camera,
            asset: None,
            faces: FaceSet::default(),
            pick: PickController::default(),
            assignments: HashMap::new(),
            selected: None,
            explode_amount: 0.0,
            display_mode: DisplayMode::default(),
            generation: 0,
            events: Vec::new(),
        }
    }

    /// Start a new load, invalidating every load started before it.
    ///
    /// Returns the generation token to pass back to [`Viewer::commit_load`].
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        debug!(generation = self.generation, "load started");
        self.generation
    }

    /// Install a finished load, unless a newer one has started since.
    ///
    /// A failed load is substituted by the placeholder artifact so the
    /// session always has something to show. Returns whether the result
    /// was installed.
    pub fn commit_load(
        &mut self,
        generation: u64,
        result: Result<MeshAsset, AssetError>,
    ) -> bool {
        if generation != self.generation {
            debug!(
                generation,
                current = self.generation,
                "discarding stale load result"
            );
            return false;
        }

        let asset = match result {
            Ok(asset) => asset,
            Err(error) => {
                warn!(%error, "load failed, showing placeholder");
                placeholder_artifact()
            }
        };

        self.faces = FaceSet::decompose(&asset, self.config.face_cap);
        if self.faces.truncated {
            warn!(
                cap = self.config.face_cap,
                total = asset.triangle_count(),
                "face decomposition truncated at cap"
            );
        }
        self.camera.fit(&asset.bounds, self.config.fit_margin);
        self.assignments.clear();
        self.selected = None;
        self.pick.clear();

        info!(
            name = %asset.name,
            sub_meshes = asset.sub_meshes.len(),
            faces = self.faces.len(),
            "model installed"
        );
        self.asset = Some(asset);
        true
    }

    /// Update hover state from a pointer position in NDC.
    ///
    /// Picking only applies to the face presentation; in triangulated
    /// mode this is a no-op.
    pub fn pointer_move(&mut self, ndc: Vec2) {
        if self.display_mode != DisplayMode::Faces {
            return;
        }
        self.pick.pointer_move(ndc, &self.camera, &self.faces);
    }

    /// Pointer press: emits [`ViewerEvent::FaceSelected`] for the hovered
    /// face, if any. Selection itself is host-owned and fed back through
    /// [`Viewer::set_selected`].
    pub fn pointer_down(&mut self) {
        if self.display_mode != DisplayMode::Faces {
            return;
        }
        if let Some(index) = self.pick.pointer_down() {
            self.events.push(ViewerEvent::FaceSelected(index));
        }
    }

    pub fn set_selected(&mut self, selected: Option<u32>) {
        self.selected = selected;
    }

    pub fn selected(&self) -> Option<u32> {
        self.selected
    }

    pub fn hovered(&self) -> Option<u32> {
        self.pick.hovered()
    }

    /// Whether the pointer is over a pickable face (cursor affordance).
    pub fn pointer_over_face(&self) -> bool {
        self.pick.pointer_over_face()
    }

    pub fn set_explode_amount(&mut self, amount: f32) {
        self.explode_amount = amount.max(0.0);
    }

    pub fn explode_amount(&self) -> f32 {
        self.explode_amount
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        if mode != DisplayMode::Faces {
            self.pick.clear();
        }
        self.display_mode = mode;
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    /// Whether the original (non-decomposed) mesh should be drawn this
    /// frame: always in triangulated mode, and in faces mode only while
    /// the model is fully assembled.
    pub fn base_mesh_visible(&self) -> bool {
        self.display_mode == DisplayMode::Triangles || self.explode_amount == 0.0
    }

    /// Assign an explicit color to one face, overriding highlights.
    pub fn set_face_color(&mut self, index: u32, color: Color) {
        self.assignments.insert(index, color);
    }

    /// Assign a face color from a hex string (`#6E56CF`, `6e56cf`, `#abc`).
    pub fn set_face_color_hex(&mut self, index: u32, hex: &str) -> Result<(), ColorParseError> {
        let color = Color::from_hex_str(hex)?;
        self.assignments.insert(index, color);
        Ok(())
    }

    pub fn clear_face_color(&mut self, index: u32) {
        self.assignments.remove(&index);
    }

    pub fn clear_face_colors(&mut self) {
        self.assignments.clear();
    }

    /// Refit the camera to the current model.
    pub fn reset_camera(&mut self) {
        if let Some(asset) = &self.asset {
            self.camera.fit(&asset.bounds, self.config.fit_margin);
        }
        self.events.push(ViewerEvent::CameraReset);
    }

    /// Advance the explode animation and refresh face colors.
    pub fn tick(&mut self, dt: f32) {
        tick_explode(&mut self.faces, self.explode_amount, self.config.explode_damping, dt);
        tick_colors(
            &mut self.faces,
            &self.assignments,
            self.selected,
            self.pick.hovered(),
            &self.config,
        );
    }

    /// Take all events produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<ViewerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn faces(&self) -> &FaceSet {
        &self.faces
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.camera.aspect_ratio = aspect_ratio;
    }

    pub fn asset(&self) -> Option<&MeshAsset> {
        self.asset.as_ref()
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relic_asset::{MeshFormat, MeshPrimitive, SubMesh};

    const DT: f32 = 1.0 / 60.0;

    fn triangle_asset() -> MeshAsset {
        let sub = SubMesh::new(
            "tri",
            MeshPrimitive {
                positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
                ..Default::default()
            },
        );
        let mut asset = MeshAsset::new("tri", vec![sub]);
        asset.normalize();
        asset
    }

    #[test]
    fn stale_load_is_discarded() {
        let mut viewer = Viewer::new(ViewerConfig::default());
        let old = viewer.begin_load();
        let new = viewer.begin_load();

        assert!(!viewer.commit_load(old, Ok(triangle_asset())));
        assert!(viewer.asset().is_none());

        assert!(viewer.commit_load(new, Ok(triangle_asset())));
        assert_eq!(viewer.faces().len(), 1);
    }

    #[test]
    fn failed_load_installs_placeholder() {
        let mut viewer = Viewer::new(ViewerConfig::default());
        let token = viewer.begin_load();
        let error = AssetError::Parse {
            format: MeshFormat::Obj,
            reason: "no faces".into(),
        };

        assert!(viewer.commit_load(token, Err(error)));
        let asset = viewer.asset().unwrap();
        assert_eq!(asset.name, "placeholder");
        assert!(!viewer.faces().is_empty());
    }

    #[test]
    fn commit_replaces_interaction_state() {
        let mut viewer = Viewer::new(ViewerConfig::default());
        let token = viewer.begin_load();
        viewer.commit_load(token, Ok(triangle_asset()));
        viewer.set_selected(Some(0));
        viewer.set_face_color(0, Color::from_hex(0x112233));

        let token = viewer.begin_load();
        viewer.commit_load(token, Ok(triangle_asset()));
        assert_eq!(viewer.selected(), None);

        viewer.tick(DT);
        let default = viewer.config().default_color;
        assert_eq!(viewer.faces().faces[0].color, default);
    }

    #[test]
    fn tick_applies_color_precedence() {
        let mut viewer = Viewer::new(ViewerConfig::default());
        let token = viewer.begin_load();
        viewer.commit_load(token, Ok(triangle_asset()));

        viewer.set_selected(Some(0));
        viewer.tick(DT);
        let selected = viewer.config().selected_color;
        assert_eq!(viewer.faces().faces[0].color, selected);

        viewer
            .set_face_color_hex(0, "#abc")
            .unwrap();
        viewer.tick(DT);
        assert_eq!(
            viewer.faces().faces[0].color,
            Color::from_hex_str("#abc").unwrap()
        );
    }

    #[test]
    fn base_mesh_visibility_follows_mode_and_explode() {
        let mut viewer = Viewer::new(ViewerConfig::default());
        assert!(viewer.base_mesh_visible());

        viewer.set_explode_amount(1.5);
        assert!(!viewer.base_mesh_visible());

        viewer.set_display_mode(DisplayMode::Triangles);
        assert!(viewer.base_mesh_visible());

        viewer.set_display_mode(DisplayMode::Faces);
        viewer.set_explode_amount(0.0);
        assert!(viewer.base_mesh_visible());
    }

    #[test]
    fn picking_disabled_in_triangle_mode() {
        let mut viewer = Viewer::new(ViewerConfig::default());
        let token = viewer.begin_load();
        viewer.commit_load(token, Ok(triangle_asset()));
        viewer.set_display_mode(DisplayMode::Triangles);

        // The model fills the view after the fit, so this would hover in
        // faces mode.
        viewer.pointer_move(Vec2::ZERO);
        assert_eq!(viewer.hovered(), None);
        viewer.pointer_down();
        assert!(viewer.drain_events().is_empty());
    }

    #[test]
    fn pointer_down_emits_selection_event() {
        let mut viewer = Viewer::new(ViewerConfig::default());
        let token = viewer.begin_load();
        viewer.commit_load(token, Ok(triangle_asset()));
        viewer.tick(DT);

        // Project the face centroid to NDC and point there.
        let face = &viewer.faces().faces[0];
        let [a, b, c] = viewer.faces().world_triangle(face);
        let world = (a + b + c) / 3.0;
        let clip = viewer.camera().view_projection() * world.extend(1.0);
        let ndc = Vec2::new(clip.x / clip.w, clip.y / clip.w);

        viewer.pointer_move(ndc);
        assert_eq!(viewer.hovered(), Some(0));
        viewer.pointer_down();
        assert_eq!(viewer.drain_events(), vec![ViewerEvent::FaceSelected(0)]);
    }

    #[test]
    fn reset_camera_emits_event() {
        let mut viewer = Viewer::new(ViewerConfig::default());
        viewer.reset_camera();
        assert_eq!(viewer.drain_events(), vec![ViewerEvent::CameraReset]);
        assert!(viewer.drain_events().is_empty());
    }
}
