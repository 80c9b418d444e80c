use crate::{
    animation::pose::CubePose,
    foundation::core::{Canvas, FrameRGBA, Rgba8},
    foundation::error::{CubistError, CubistResult},
    scene::geometry::RotationAxis,
    sections::faces::CubeFace,
    sections::registry::SectionRegistry,
    snapshot::store::SessionStore,
};

/// Textures for the six cube faces. A `None` slot renders as the
/// placeholder material; a missing snapshot is a designed-for absence,
/// never an error.
#[derive(Clone, Debug, Default)]
pub struct FaceTextures {
    slots: [Option<FrameRGBA>; 6],
}

impl FaceTextures {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn set(&mut self, face: CubeFace, frame: FrameRGBA) {
        self.slots[face.idx()] = Some(frame);
    }

    pub fn get(&self, face: CubeFace) -> Option<&FrameRGBA> {
        self.slots[face.idx()].as_ref()
    }

    pub fn textured_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Build face textures from the cached snapshots via the registry's
    /// face map. Sections without a decodable snapshot fall back to the
    /// placeholder slot.
    pub fn from_store(registry: &SectionRegistry, store: &SessionStore) -> Self {
        let mut textures = Self::empty();
        for desc in registry.sections() {
            let face = registry.face_for_section(desc.id);
            let Some(record) = store.snapshot(desc.id) else {
                continue;
            };
            match record.decode() {
                Ok(frame) => textures.set(face, frame),
                Err(e) => {
                    tracing::warn!(
                        section = desc.id.as_str(),
                        error = %e,
                        "snapshot decode failed, face falls back to placeholder"
                    );
                }
            }
        }
        textures
    }
}

/// Everything a backend needs to mount one transition scene.
#[derive(Clone, Debug)]
pub struct CubeSceneDesc {
    pub canvas: Canvas,
    pub axis: RotationAxis,
    pub background: Rgba8,
    pub placeholder: Rgba8,
    pub perspective_distance: f64,
    pub textures: FaceTextures,
}

/// Rendering seam for the transition cube.
///
/// A scene's resources are exclusively owned by the currently active
/// transition; the coordinator calls `dispose` exactly once when a
/// transition ends or is superseded.
pub trait CubeBackend {
    /// Prepare scene resources for one transition.
    fn mount(&mut self, desc: CubeSceneDesc) -> CubistResult<()>;

    /// Render the mounted scene at one pose.
    fn render(&mut self, pose: &CubePose) -> CubistResult<FrameRGBA>;

    /// Hit-test a screen position against the most recently rendered
    /// pose. Used to route a mid-flight click back to a face.
    fn face_at(&self, x: f64, y: f64) -> Option<CubeFace>;

    fn is_mounted(&self) -> bool;

    /// Release all scene resources.
    fn dispose(&mut self);
}

#[derive(Clone, Copy, Debug)]
pub enum BackendKind {
    Cpu,
}

pub fn create_backend(kind: BackendKind) -> CubistResult<Box<dyn CubeBackend>> {
    match kind {
        BackendKind::Cpu => Ok(Box::new(crate::scene::cpu::CpuBackend::new())),
        #[allow(unreachable_patterns)]
        _ => Err(CubistError::render("requested backend is not available")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::FrameRGBA;

    #[test]
    fn textures_track_set_slots() {
        let mut t = FaceTextures::empty();
        assert_eq!(t.textured_count(), 0);
        t.set(
            CubeFace::Front,
            FrameRGBA::filled(2, 2, Rgba8::opaque(1, 2, 3)),
        );
        assert_eq!(t.textured_count(), 1);
        assert!(t.get(CubeFace::Front).is_some());
        assert!(t.get(CubeFace::Back).is_none());
    }

    #[test]
    fn from_store_maps_snapshots_to_faces() {
        let registry = SectionRegistry::standard();
        let mut store = SessionStore::new();
        store
            .put_snapshot(
                crate::sections::registry::SectionId::Home,
                &FrameRGBA::filled(4, 4, Rgba8::opaque(7, 7, 7)),
            )
            .unwrap();

        let textures = FaceTextures::from_store(&registry, &store);
        // home maps to the front face in the standard assignment
        assert!(textures.get(CubeFace::Front).is_some());
        assert_eq!(textures.textured_count(), 1);
    }
}
