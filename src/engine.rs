use std::collections::BTreeMap;

use crate::{
    config::EngineConfig,
    foundation::clock::Clock,
    foundation::core::TimestampMs,
    foundation::error::{CubistError, CubistResult},
    navigation::store::NavigationStore,
    scene::backend::CubeBackend,
    sections::faces::CubeFace,
    sections::registry::{AdjacentSections, SectionId, SectionRegistry},
    snapshot::capture::{SnapshotCache, WarmUpReport},
    snapshot::source::SectionSource,
    snapshot::store::SessionStore,
    transition::coordinator::{ScrollLock, TickOutcome, TransitionCoordinator},
    transition::handle::{TransitionHandle, TransitionOutcome},
};

/// Composition root of the navigation engine.
///
/// Explicitly constructed and explicitly owned: registry, session store,
/// snapshot cache, coordinator and navigation state all live here, and
/// nothing in the crate holds global mutable state. The host event loop
/// feeds input through the facade methods and drives [`Engine::tick`].
pub struct Engine {
    config: EngineConfig,
    registry: SectionRegistry,
    session: SessionStore,
    cache: SnapshotCache,
    coordinator: TransitionCoordinator,
    nav: NavigationStore,
    reduced_motion: bool,
}

impl Engine {
    /// Engine over the standard six-section registry.
    pub fn new(
        config: EngineConfig,
        backend: Box<dyn CubeBackend>,
        scroll: Box<dyn ScrollLock>,
    ) -> CubistResult<Self> {
        Self::with_registry(config, SectionRegistry::standard(), backend, scroll)
    }

    pub fn with_registry(
        config: EngineConfig,
        registry: SectionRegistry,
        backend: Box<dyn CubeBackend>,
        scroll: Box<dyn ScrollLock>,
    ) -> CubistResult<Self> {
        config.validate()?;
        let initial = registry
            .sections()
            .first()
            .map(|d| d.id)
            .ok_or_else(|| CubistError::validation("registry must not be empty"))?;

        let cache = SnapshotCache::new(
            config.snapshot_scale,
            config.decode_timeout,
            config.decode_poll_interval,
            config.background,
        );
        let coordinator = TransitionCoordinator::new(&config, backend, scroll);

        Ok(Self {
            config,
            registry,
            session: SessionStore::new(),
            cache,
            coordinator,
            nav: NavigationStore::new(initial),
            reduced_motion: false,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Capture all section snapshots ahead of time. Runs during the
    /// splash-screen hold, before the interactive app is shown.
    pub fn warm_up(
        &mut self,
        sources: &BTreeMap<SectionId, Box<dyn SectionSource>>,
        clock: &dyn Clock,
    ) -> WarmUpReport {
        self.cache
            .warm_up(&self.registry, sources, clock, &mut self.session)
    }

    pub fn snapshots_ready(&self) -> bool {
        self.session.snapshots_ready()
    }

    pub fn active_section(&self) -> SectionId {
        self.nav.active_section()
    }

    pub fn is_transitioning(&self) -> bool {
        self.nav.is_transitioning()
    }

    pub fn adjacent_sections(&self) -> CubistResult<AdjacentSections> {
        self.nav.adjacent_sections(&self.registry)
    }

    /// Degraded mode for hosts honoring a reduced-motion preference or a
    /// failed renderer: navigation lands instantly, no cube is mounted.
    pub fn set_reduced_motion(&mut self, on: bool) {
        self.reduced_motion = on;
    }

    /// Navigate to a section. Returns a completion handle, or `None` when
    /// the request is dropped (same section, or a transition in flight).
    pub fn navigate_to_section(
        &mut self,
        target: SectionId,
        now: TimestampMs,
    ) -> CubistResult<Option<TransitionHandle>> {
        if self.reduced_motion {
            if self.nav.is_transitioning() || target == self.nav.active_section() {
                return Ok(None);
            }
            self.nav.force_active(target);
            return Ok(Some(TransitionHandle::resolved(
                TransitionOutcome::Completed { reached: target },
            )));
        }
        self.nav.request_navigate(
            target,
            &self.registry,
            &mut self.coordinator,
            &mut self.session,
            now,
        )
    }

    pub fn navigate_to_home(&mut self, now: TimestampMs) -> CubistResult<Option<TransitionHandle>> {
        self.navigate_to_section(SectionId::Home, now)
    }

    /// Route a mid-flight click on a cube face.
    pub fn handle_face_click(
        &mut self,
        face: CubeFace,
        now: TimestampMs,
    ) -> CubistResult<Option<TransitionHandle>> {
        self.nav.handle_face_click(
            face,
            &self.registry,
            &mut self.coordinator,
            &mut self.session,
            now,
        )
    }

    /// Hit-test a screen position against the rendered cube, if a
    /// transition is showing one.
    pub fn face_at(&self, x: f64, y: f64) -> Option<CubeFace> {
        self.coordinator.face_at(x, y)
    }

    /// Advance the engine one tick.
    pub fn tick(&mut self, now: TimestampMs) -> CubistResult<TickOutcome> {
        self.nav.tick(&mut self.coordinator, &mut self.session, now)
    }

    /// Re-issue a navigation interrupted by a reload, if the session
    /// carries a pending-target marker.
    pub fn resume_pending(&mut self, now: TimestampMs) -> CubistResult<Option<TransitionHandle>> {
        self.nav.resume_pending(
            &self.registry,
            &mut self.coordinator,
            &mut self.session,
            now,
        )
    }

    /// Set the active section without animating. Only valid while idle.
    pub fn jump_to(&mut self, target: SectionId) -> CubistResult<()> {
        if self.nav.is_transitioning() {
            return Err(CubistError::validation(
                "cannot jump while a transition is in flight",
            ));
        }
        self.registry.index_of(target)?;
        self.nav.force_active(target);
        Ok(())
    }
}
