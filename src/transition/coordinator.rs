use crate::{
    animation::pose::sample_pose,
    foundation::core::{Canvas, DurationMs, FrameRGBA, Rgba8, TimestampMs},
    foundation::error::CubistResult,
    scene::backend::{CubeBackend, CubeSceneDesc, FaceTextures},
    scene::geometry::RotationAxis,
    sections::faces::CubeFace,
    sections::registry::SectionId,
    transition::handle::{TransitionHandle, TransitionOutcome},
};

/// Rotation direction of a transition, derived from registry order:
/// forward when the target's index is greater than the origin's.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn from_indices(from: usize, to: usize) -> Self {
        if to > from {
            Self::Forward
        } else {
            Self::Backward
        }
    }

    pub fn signum(self) -> f64 {
        match self {
            Self::Forward => 1.0,
            Self::Backward => -1.0,
        }
    }
}

/// One navigation action handed to the coordinator. Ephemeral; consumed by
/// a single transition run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionRequest {
    pub from: SectionId,
    pub to: SectionId,
    pub axis: RotationAxis,
    pub direction: Direction,
}

/// Result of advancing the coordinator by one tick.
#[derive(Clone, Debug)]
pub enum TickOutcome {
    /// No transition is active.
    Idle,
    /// The transition produced one animation frame.
    Frame(FrameRGBA),
    /// The transition finished this tick and resources were released.
    Finished { reached: SectionId },
}

/// Host capability to suppress page scrolling while the cube overlay is
/// up, so scroll input cannot fight the animation.
pub trait ScrollLock {
    fn lock(&mut self);
    fn unlock(&mut self);
}

/// Default no-op lock for hosts without a scrollable surface.
pub struct NoopScrollLock;

impl ScrollLock for NoopScrollLock {
    fn lock(&mut self) {}
    fn unlock(&mut self) {}
}

struct ActiveTransition {
    request: TransitionRequest,
    started_at: TimestampMs,
    handle: TransitionHandle,
}

/// Owns the single in-flight cube transition: mounts the scene, advances
/// the animation each tick, lets a face click redirect mid-flight, and
/// resolves the completion handle.
///
/// State machine: `Inactive -> Active -> Inactive`. At most one transition
/// is ever active; starting over an active one resolves the stale handle
/// first, so no handle is ever left pending.
pub struct TransitionCoordinator {
    backend: Box<dyn CubeBackend>,
    scroll: Box<dyn ScrollLock>,
    duration: DurationMs,
    canvas: Canvas,
    background: Rgba8,
    placeholder: Rgba8,
    perspective_distance: f64,
    active: Option<ActiveTransition>,
    scroll_locked: bool,
}

impl TransitionCoordinator {
    pub fn new(
        config: &crate::config::EngineConfig,
        backend: Box<dyn CubeBackend>,
        scroll: Box<dyn ScrollLock>,
    ) -> Self {
        Self {
            backend,
            scroll,
            duration: config.transition_duration,
            canvas: config.canvas,
            background: config.background,
            placeholder: config.placeholder,
            perspective_distance: config.perspective_distance,
            active: None,
            scroll_locked: false,
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.active.is_some()
    }

    /// Target of the in-flight transition, if any.
    pub fn current_target(&self) -> Option<SectionId> {
        self.active.as_ref().map(|a| a.request.to)
    }

    /// Hit-test a screen position against the last rendered pose.
    pub fn face_at(&self, x: f64, y: f64) -> Option<CubeFace> {
        self.backend.face_at(x, y)
    }

    /// Begin a transition. Any still-active transition is released first
    /// (`Superseded`) and its scene disposed, so the caller awaiting it
    /// observes normal completion rather than a leak.
    ///
    /// Precondition: `request.from != request.to`; the navigation store
    /// guards this upstream.
    #[tracing::instrument(skip(self, textures), fields(from = request.from.as_str(), to = request.to.as_str()))]
    pub fn start(
        &mut self,
        request: TransitionRequest,
        textures: FaceTextures,
        now: TimestampMs,
    ) -> CubistResult<TransitionHandle> {
        debug_assert_ne!(request.from, request.to, "transition with from == to");

        if let Some(prev) = self.active.take() {
            prev.handle.resolve(TransitionOutcome::Superseded {
                new_target: request.to,
            });
            self.backend.dispose();
        }

        let desc = CubeSceneDesc {
            canvas: self.canvas,
            axis: request.axis,
            background: self.background,
            placeholder: self.placeholder,
            perspective_distance: self.perspective_distance,
            textures,
        };
        if let Err(e) = self.backend.mount(desc) {
            if self.scroll_locked {
                self.scroll.unlock();
                self.scroll_locked = false;
            }
            return Err(e);
        }
        if !self.scroll_locked {
            self.scroll.lock();
            self.scroll_locked = true;
        }

        let handle = TransitionHandle::pending();
        self.active = Some(ActiveTransition {
            request,
            started_at: now,
            handle: handle.clone(),
        });
        Ok(handle)
    }

    /// Steer the in-flight transition to a new target without waiting for
    /// it to finish. The mounted scene already carries all six face
    /// textures, so only the rotation target changes; the stale handle
    /// resolves `Superseded` and a fresh handle is returned.
    ///
    /// Returns `None` when no transition is active or the target is
    /// unchanged.
    #[tracing::instrument(skip(self), fields(to = new_target.as_str()))]
    pub fn redirect(
        &mut self,
        new_target: SectionId,
        direction: Direction,
        now: TimestampMs,
    ) -> Option<TransitionHandle> {
        let active = self.active.as_mut()?;
        if active.request.to == new_target {
            return None;
        }

        let stale = std::mem::replace(&mut active.handle, TransitionHandle::pending());
        stale.resolve(TransitionOutcome::Superseded { new_target });

        active.request.to = new_target;
        active.request.direction = direction;
        active.started_at = now;
        Some(active.handle.clone())
    }

    /// Advance the animation. Produces a frame while active, and on
    /// elapsed >= duration disposes the scene, unlocks scrolling and
    /// resolves the handle `Completed`.
    pub fn tick(&mut self, now: TimestampMs) -> CubistResult<TickOutcome> {
        let (finished, progress, sign) = match self.active.as_ref() {
            None => return Ok(TickOutcome::Idle),
            Some(a) => {
                let elapsed = now.since(a.started_at);
                (
                    elapsed >= self.duration,
                    elapsed.progress_within(self.duration),
                    a.request.direction.signum(),
                )
            }
        };

        if finished {
            if let Some(active) = self.active.take() {
                self.backend.dispose();
                if self.scroll_locked {
                    self.scroll.unlock();
                    self.scroll_locked = false;
                }
                let reached = active.request.to;
                active
                    .handle
                    .resolve(TransitionOutcome::Completed { reached });
                tracing::debug!(reached = reached.as_str(), "transition finished");
                return Ok(TickOutcome::Finished { reached });
            }
            return Ok(TickOutcome::Idle);
        }

        let pose = sample_pose(progress, sign);
        let frame = self.backend.render(&pose)?;
        Ok(TickOutcome::Frame(frame))
    }
}
