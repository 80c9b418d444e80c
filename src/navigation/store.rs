use crate::{
    foundation::core::TimestampMs,
    foundation::error::CubistResult,
    scene::backend::FaceTextures,
    scene::geometry::RotationAxis,
    sections::faces::CubeFace,
    sections::registry::{AdjacentSections, SectionId, SectionRegistry},
    snapshot::store::SessionStore,
    transition::coordinator::{Direction, TickOutcome, TransitionCoordinator, TransitionRequest},
    transition::handle::TransitionHandle,
};

/// Single source of truth for the active section and the transition lock.
///
/// States: `Idle` (no `from`) and `Transitioning` (`from` holds the
/// section the cube is rotating away from; `active` already holds the
/// target, set optimistically so dependent UI updates immediately).
pub struct NavigationStore {
    active: SectionId,
    from: Option<SectionId>,
}

impl NavigationStore {
    pub fn new(initial: SectionId) -> Self {
        Self {
            active: initial,
            from: None,
        }
    }

    pub fn active_section(&self) -> SectionId {
        self.active
    }

    /// True for the entire span between a request being accepted and the
    /// coordinator resolving it. No second request is accepted while set.
    pub fn is_transitioning(&self) -> bool {
        self.from.is_some()
    }

    pub fn adjacent_sections(&self, registry: &SectionRegistry) -> CubistResult<AdjacentSections> {
        registry.adjacent(self.active)
    }

    /// Validate and start a navigation. Returns `None` (a deliberate
    /// no-op, not an error) when the target is already active or a
    /// transition is in flight; rapid clicks beyond the first are dropped
    /// without queueing.
    #[tracing::instrument(
        skip(self, registry, coordinator, session, target),
        fields(section = target.as_str())
    )]
    pub fn request_navigate(
        &mut self,
        target: SectionId,
        registry: &SectionRegistry,
        coordinator: &mut TransitionCoordinator,
        session: &mut SessionStore,
        now: TimestampMs,
    ) -> CubistResult<Option<TransitionHandle>> {
        if self.from.is_some() || target == self.active {
            tracing::debug!(active = self.active.as_str(), "navigation request dropped");
            return Ok(None);
        }

        let from = self.active;
        let direction =
            Direction::from_indices(registry.index_of(from)?, registry.index_of(target)?);

        self.active = target;
        self.from = Some(from);
        session.set_pending_target(target);

        let textures = FaceTextures::from_store(registry, session);
        let request = TransitionRequest {
            from,
            to: target,
            axis: RotationAxis::Vertical,
            direction,
        };
        match coordinator.start(request, textures, now) {
            Ok(handle) => Ok(Some(handle)),
            Err(e) => {
                // Scene never mounted; release the lock so navigation
                // is not wedged.
                self.active = from;
                self.from = None;
                session.clear_pending_target();
                Err(e)
            }
        }
    }

    /// Route a mid-flight cube face click. Maps the face to its section
    /// and steers the in-flight transition there; clicking the face of
    /// the current target is ignored. Outside a transition this is a
    /// no-op (the normal request path handles clicks then).
    pub fn handle_face_click(
        &mut self,
        face: CubeFace,
        registry: &SectionRegistry,
        coordinator: &mut TransitionCoordinator,
        session: &mut SessionStore,
        now: TimestampMs,
    ) -> CubistResult<Option<TransitionHandle>> {
        let Some(from) = self.from else {
            return Ok(None);
        };

        let target = registry.section_for_face(face);
        let direction =
            Direction::from_indices(registry.index_of(from)?, registry.index_of(target)?);

        match coordinator.redirect(target, direction, now) {
            Some(handle) => {
                self.active = target;
                session.set_pending_target(target);
                Ok(Some(handle))
            }
            None => Ok(None),
        }
    }

    /// Drive the coordinator one tick; on completion the transition lock
    /// clears and the pending-target marker is removed.
    pub fn tick(
        &mut self,
        coordinator: &mut TransitionCoordinator,
        session: &mut SessionStore,
        now: TimestampMs,
    ) -> CubistResult<TickOutcome> {
        let outcome = coordinator.tick(now)?;
        if let TickOutcome::Finished { .. } = outcome {
            self.from = None;
            session.clear_pending_target();
        }
        Ok(outcome)
    }

    /// Best-effort recovery after a reload that interrupted a transition:
    /// re-issue the navigation recorded in the pending-target marker.
    pub fn resume_pending(
        &mut self,
        registry: &SectionRegistry,
        coordinator: &mut TransitionCoordinator,
        session: &mut SessionStore,
        now: TimestampMs,
    ) -> CubistResult<Option<TransitionHandle>> {
        let Some(target) = session.pending_target() else {
            return Ok(None);
        };
        if self.from.is_some() {
            return Ok(None);
        }
        if target == self.active {
            session.clear_pending_target();
            return Ok(None);
        }
        self.request_navigate(target, registry, coordinator, session, now)
    }

    /// Set the active section without animating. Used by the
    /// reduced-motion bypass and non-animated jumps; only valid while
    /// idle.
    pub(crate) fn force_active(&mut self, target: SectionId) {
        if self.from.is_none() {
            self.active = target;
        }
    }
}
