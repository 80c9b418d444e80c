//! Cubist is a section navigation and 3D cube transition engine.
//!
//! It owns the stateful core of a sectioned single-page application: which
//! section is active, whether a transition is in flight, and the animated
//! cube rotation that visually carries the user between sections, with
//! each cube face textured by a cached raster snapshot of one section.
//!
//! # Pipeline overview
//!
//! 1. **Warm up**: every section's content is rasterized off-screen once
//!    and stored in the session-scoped [`SessionStore`] (reduced scale,
//!    opaque background fill).
//! 2. **Request**: [`Engine::navigate_to_section`] validates the request,
//!    optimistically flips the active section and starts a transition.
//! 3. **Animate**: [`Engine::tick`] samples the cube pose (eased rotation,
//!    scale bounce, wobble) and renders a frame through the [`CubeBackend`]
//!    seam. A mid-flight click on a visible face redirects the rotation.
//! 4. **Resolve**: the finishing tick disposes the scene, unlocks
//!    scrolling and resolves the [`TransitionHandle`] with a tagged
//!    [`TransitionOutcome`] (`Completed` vs `Superseded`).
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: no wall-clock reads inside the engine;
//!   time enters only as explicit timestamps from a [`Clock`].
//! - **No IO in the engine**: section rasterization is front-loaded in the
//!   snapshot warm-up pass; only the CLI touches the filesystem.
//! - **Graceful degradation**: a missing snapshot renders as a placeholder
//!   face; capture failures never block startup or navigation.
#![forbid(unsafe_code)]

mod animation;
mod config;
mod engine;
mod foundation;
mod navigation;
mod scene;
mod sections;
mod snapshot;
mod transition;

pub use animation::ease::Ease;
pub use animation::pose::{CubePose, ROTATION_DEG, TRANSITION_DURATION, sample_pose};
pub use config::EngineConfig;
pub use engine::Engine;
pub use foundation::clock::{Clock, ManualClock, SystemClock};
pub use foundation::core::{Canvas, DurationMs, FrameRGBA, Rgba8, TimestampMs};
pub use foundation::error::{CubistError, CubistResult};
pub use navigation::store::NavigationStore;
pub use scene::backend::{
    BackendKind, CubeBackend, CubeSceneDesc, FaceTextures, create_backend,
};
pub use scene::cpu::CpuBackend;
pub use scene::geometry::{ProjectedQuad, RotationAxis, project_cube};
pub use sections::faces::{CubeFace, CubeFaceMap};
pub use sections::registry::{AdjacentSections, SectionDescriptor, SectionId, SectionRegistry};
pub use snapshot::capture::{
    DECODE_POLL_INTERVAL, DECODE_TIMEOUT, SNAPSHOT_SCALE, SnapshotCache, WarmUpReport,
};
pub use snapshot::source::{CardSource, SectionSource};
pub use snapshot::store::{SessionStore, SnapshotRecord};
pub use transition::coordinator::{
    Direction, NoopScrollLock, ScrollLock, TickOutcome, TransitionCoordinator, TransitionRequest,
};
pub use transition::handle::{TransitionHandle, TransitionOutcome};
