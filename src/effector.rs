//! The effector component.
//!
//! Each tick the effector resolves its plane, target point and local time,
//! then pushes them into every linked surface's override block under its
//! channel's parameter names. One scratch [`OverrideBlock`] is reused for
//! all surfaces so a tick does not allocate once warmed up.

use std::rc::Rc;

use glam::{Vec3, Vec4};

use crate::channel::{Channel, LOCAL_TIME_NAME};
use crate::effect::{self, EffectFrame};
use crate::error::EffectorError;
use crate::gizmo::{GizmoPainter, GridMeshCache, HostSession, MeshStore};
use crate::options::{EffectorOptions, GizmoOptions, Options};
use crate::properties::{OverrideBlock, SharedTarget};
use crate::time::{PlaybackClock, TimeControl, TimeMode};
use crate::transform::{SharedTransform, Transform, TransformRef};

/// Drives one effect channel on a set of linked surfaces.
pub struct Effector {
    channel: Channel,
    offset: f32,
    transform: Transform,
    target: Option<TransformRef>,
    renderers: Vec<SharedTarget>,
    time_mode: TimeMode,
    /// Scratch block, created on the first tick that has surfaces.
    sheet: Option<OverrideBlock>,
    vector_name: String,
    point_name: String,
    gizmo: GizmoOptions,
    grid: GridMeshCache,
}

impl Effector {
    /// Effector on `channel` with zero offset, identity transform, no target
    /// and no linked surfaces.
    #[must_use]
    pub fn with_channel(channel: Channel) -> Self {
        Self {
            channel,
            offset: 0.0,
            transform: Transform::IDENTITY,
            target: None,
            renderers: Vec::new(),
            time_mode: TimeMode::Internal,
            sheet: None,
            vector_name: channel.effect_vector_name(),
            point_name: channel.effect_point_name(),
            gizmo: GizmoOptions::default(),
            grid: GridMeshCache::new(),
        }
    }

    /// Effector configured from `options`. Fails only on an out-of-range
    /// channel.
    pub fn new(options: &EffectorOptions) -> Result<Self, EffectorError> {
        let mut effector = Self::with_channel(options.channel()?);
        effector.offset = options.offset;
        Ok(effector)
    }

    /// Effector configured from a full options set, gizmo appearance
    /// included.
    pub fn from_options(options: &Options) -> Result<Self, EffectorError> {
        let mut effector = Self::new(&options.effector)?;
        effector.gizmo = options.gizmo.clone();
        Ok(effector)
    }

    // -- Configuration ---------------------------------------------------

    /// Channel this effector writes.
    #[must_use]
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Plane offset along the forward axis.
    #[must_use]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Set the plane offset.
    pub fn set_offset(&mut self, offset: f32) {
        self.offset = offset;
    }

    /// The effector's own world transform.
    #[must_use]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Replace the effector's world transform (host scene sync).
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    /// Track `target` without keeping it alive.
    pub fn set_target(&mut self, target: &SharedTransform) {
        self.target = Some(Rc::downgrade(target));
    }

    /// Stop tracking any target.
    pub fn clear_target(&mut self) {
        self.target = None;
    }

    /// Add a surface to the linked set.
    pub fn link_renderer(&mut self, renderer: SharedTarget) {
        self.renderers.push(renderer);
    }

    /// Empty the linked set.
    pub fn unlink_all(&mut self) {
        self.renderers.clear();
    }

    /// Number of linked surfaces.
    #[must_use]
    pub fn linked_renderer_count(&self) -> usize {
        self.renderers.len()
    }

    /// Gizmo appearance.
    #[must_use]
    pub fn gizmo_options(&self) -> &GizmoOptions {
        &self.gizmo
    }

    /// Replace the gizmo appearance. Grid shape changes only apply to a mesh
    /// created after the next [`destroy`](Self::destroy).
    pub fn set_gizmo_options(&mut self, gizmo: GizmoOptions) {
        self.gizmo = gizmo;
    }

    // -- Per-frame values ------------------------------------------------

    /// Current target transform, if set, still alive and not mutably
    /// borrowed by the host.
    fn target_transform(&self) -> Option<Transform> {
        let target = self.target.as_ref()?.upgrade()?;
        let Ok(transform) = target.try_borrow() else {
            log::warn!(
                "channel {} ignored a target that is already borrowed",
                self.channel
            );
            return None;
        };
        Some(*transform)
    }

    /// Plane descriptor for the current transform and offset.
    #[must_use]
    pub fn effect_vector(&self) -> Vec4 {
        effect::effect_vector(&self.transform, self.offset)
    }

    /// Target position, or zero when there is no live target.
    #[must_use]
    pub fn effect_point(&self) -> Vec4 {
        effect::effect_point(self.target_transform().as_ref())
    }

    /// Current time source.
    #[must_use]
    pub fn time_mode(&self) -> TimeMode {
        self.time_mode
    }

    /// Local time against the host clock.
    #[must_use]
    pub fn local_time(&self, clock: &dyn PlaybackClock) -> f32 {
        self.time_mode.resolve(clock)
    }

    /// Everything the next tick would write.
    #[must_use]
    pub fn frame(&self, clock: &dyn PlaybackClock) -> EffectFrame {
        EffectFrame {
            vector: self.effect_vector(),
            point: self.effect_point(),
            time: self.local_time(clock),
        }
    }

    /// Push this frame's parameters to every linked surface. Returns the
    /// number of surfaces written.
    ///
    /// A surface that is already borrowed elsewhere is skipped for this
    /// frame.
    pub fn tick(&mut self, clock: &dyn PlaybackClock) -> usize {
        if self.renderers.is_empty() {
            return 0;
        }

        let frame = self.frame(clock);
        let sheet = self.sheet.get_or_insert_with(OverrideBlock::new);
        let mut written = 0;

        for renderer in &self.renderers {
            let Ok(mut surface) = renderer.try_borrow_mut() else {
                log::warn!(
                    "channel {} skipped a surface that is already borrowed",
                    self.channel
                );
                continue;
            };
            surface.read_overrides(sheet);
            sheet.set_vector(&self.vector_name, frame.vector);
            sheet.set_vector(&self.point_name, frame.point);
            sheet.set_float(LOCAL_TIME_NAME, frame.time);
            surface.write_overrides(sheet);
            written += 1;
        }

        log::trace!(
            "channel {}: vector={} point={} time={} -> {written} surfaces",
            self.channel,
            frame.vector,
            frame.point,
            frame.time
        );
        written
    }

    // -- Editor gizmo ----------------------------------------------------

    /// Whether the gizmo grid mesh is currently held.
    #[must_use]
    pub fn has_grid_mesh(&self) -> bool {
        self.grid.handle().is_some()
    }

    /// Draw the slab: a grid at the plane offset, another one unit further
    /// along local +Z, a thin box joining them, and a marker on the target.
    ///
    /// Pure visualization; does not touch any per-frame value.
    pub fn draw_gizmos(
        &mut self,
        painter: &mut dyn GizmoPainter,
        store: &mut dyn MeshStore,
    ) {
        let mesh = self.grid.get_or_create(
            store,
            self.gizmo.grid_columns,
            self.gizmo.grid_extent,
        );

        if let Some(target) = self.target_transform() {
            painter.draw_wire_sphere(
                target.translation,
                self.gizmo.target_radius,
                self.gizmo.target_color(),
            );
        }

        let matrix = self.transform.local_to_world();
        let p1 = Vec3::Z * self.offset;
        let p2 = Vec3::Z * (self.offset + 1.0);

        let plane_color = self.gizmo.plane_color();
        painter.draw_wire_mesh(mesh, matrix, p1, plane_color);
        painter.draw_wire_mesh(mesh, matrix, p2, plane_color);

        let thickness = self.gizmo.slab_thickness;
        painter.draw_wire_cube(
            matrix,
            (p1 + p2) / 2.0,
            Vec3::new(thickness, thickness, 1.0),
            self.gizmo.slab_color(),
        );
    }

    /// Release the gizmo mesh. Safe to call any number of times; only the
    /// first call after a draw frees anything. Returns whether a mesh was
    /// released.
    pub fn destroy(
        &mut self,
        store: &mut dyn MeshStore,
        session: HostSession,
    ) -> bool {
        self.grid.release(store, session)
    }
}

impl TimeControl for Effector {
    fn on_control_time_start(&mut self) {
        log::debug!("channel {}: timeline took control of time", self.channel);
    }

    fn on_control_time_stop(&mut self) {
        log::debug!("channel {}: timeline released time", self.channel);
        self.time_mode = TimeMode::Internal;
    }

    fn set_time(&mut self, time: f64) {
        self.time_mode = TimeMode::External(time as f32);
    }
}

impl Drop for Effector {
    fn drop(&mut self) {
        if let Some(id) = self.grid.handle() {
            log::warn!(
                "effector on channel {} dropped without destroy(); gizmo mesh \
                 {id:?} was not released",
                self.channel
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::f32::consts::FRAC_PI_2;

    use glam::Quat;

    use super::*;
    use crate::gizmo::tests::CountingStore;
    use crate::gizmo::{GizmoCommand, GizmoRecorder};
    use crate::properties::{OverrideTarget, SurfaceOverrides};
    use crate::time::tests::FixedClock;
    use crate::time::StoppedClock;

    fn surface() -> Rc<RefCell<SurfaceOverrides>> {
        SurfaceOverrides::new().into_shared()
    }

    fn link(effector: &mut Effector, surface: &Rc<RefCell<SurfaceOverrides>>) {
        let shared: SharedTarget = surface.clone();
        effector.link_renderer(shared);
    }

    fn channel(n: u8) -> Channel {
        Channel::new(n).unwrap()
    }

    #[test]
    fn channel_two_scenario() {
        let mut effector = Effector::with_channel(channel(2));
        effector.set_offset(1.0);
        let s = surface();
        link(&mut effector, &s);

        assert_eq!(effector.tick(&StoppedClock), 1);

        let surface = s.borrow();
        let block = surface.block();
        assert_eq!(
            block.vector("_EffectVector2"),
            Some(Vec4::new(0.0, 0.0, 1.0, 1.0))
        );
        assert_eq!(block.vector("_EffectPoint2"), Some(Vec4::ZERO));
        assert_eq!(block.float("_LocalTime"), Some(0.0));

        let mut names: Vec<&str> = block.names().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["_EffectPoint2", "_EffectVector2", "_LocalTime"]);
    }

    #[test]
    fn empty_renderer_set_writes_nothing() {
        let mut effector = Effector::with_channel(Channel::FIRST);
        assert_eq!(effector.tick(&StoppedClock), 0);
        assert!(effector.sheet.is_none());
    }

    #[test]
    fn every_linked_surface_is_written() {
        let mut effector = Effector::with_channel(channel(4));
        let surfaces: Vec<_> = (0..3).map(|_| surface()).collect();
        for s in &surfaces {
            link(&mut effector, s);
        }
        assert_eq!(effector.tick(&StoppedClock), 3);
        assert_eq!(effector.tick(&StoppedClock), 3);
        for s in &surfaces {
            assert_eq!(s.borrow().write_count(), 2);
            assert!(s.borrow().block().vector("_EffectVector4").is_some());
        }

        assert_eq!(effector.linked_renderer_count(), 3);
        effector.unlink_all();
        assert_eq!(effector.tick(&StoppedClock), 0);
        assert_eq!(surfaces[0].borrow().write_count(), 2);
    }

    #[test]
    fn tick_is_idempotent() {
        let mut effector = Effector::with_channel(channel(1));
        effector.set_transform(
            Transform::from_translation(Vec3::new(1.0, 2.0, 3.0))
                .with_rotation(Quat::from_rotation_x(0.4)),
        );
        let s = surface();
        link(&mut effector, &s);

        let _ = effector.tick(&StoppedClock);
        let first = s.borrow().block().clone();
        let _ = effector.tick(&StoppedClock);
        assert_eq!(*s.borrow().block(), first);
    }

    #[test]
    fn existing_overrides_are_preserved() {
        let mut effector = Effector::with_channel(channel(1));
        let s = surface();
        {
            let mut block = OverrideBlock::new();
            block.set_float("_Glow", 0.75);
            s.borrow_mut().write_overrides(&block);
        }
        link(&mut effector, &s);
        let _ = effector.tick(&StoppedClock);
        assert_eq!(s.borrow().block().float("_Glow"), Some(0.75));
        assert_eq!(s.borrow().block().len(), 4);
    }

    #[test]
    fn channels_share_a_surface_without_collision() {
        let s = surface();
        let mut a = Effector::with_channel(channel(1));
        let mut b = Effector::with_channel(channel(3));
        a.set_offset(2.0);
        b.set_transform(
            Transform::IDENTITY.with_rotation(Quat::from_rotation_y(FRAC_PI_2)),
        );
        let target = Transform::from_translation(Vec3::new(4.0, 5.0, 6.0))
            .into_shared();
        b.set_target(&target);
        link(&mut a, &s);
        link(&mut b, &s);

        let _ = a.tick(&StoppedClock);
        let _ = b.tick(&StoppedClock);

        let surface = s.borrow();
        let block = surface.block();
        assert_eq!(block.len(), 5);
        assert_eq!(
            block.vector("_EffectVector1"),
            Some(Vec4::new(0.0, 0.0, 1.0, 2.0))
        );
        assert_eq!(block.vector("_EffectPoint1"), Some(Vec4::ZERO));
        let v3 = block.vector("_EffectVector3").unwrap();
        assert!((v3 - Vec4::new(1.0, 0.0, 0.0, 0.0)).length() < 1e-6);
        assert_eq!(
            block.vector("_EffectPoint3"),
            Some(Vec4::new(4.0, 5.0, 6.0, 0.0))
        );
    }

    #[test]
    fn target_position_and_dangling_target() {
        let mut effector = Effector::with_channel(Channel::FIRST);
        assert_eq!(effector.effect_point(), Vec4::ZERO);

        let target =
            Transform::from_translation(Vec3::new(-1.0, 0.5, 8.0)).into_shared();
        effector.set_target(&target);
        assert_eq!(effector.effect_point(), Vec4::new(-1.0, 0.5, 8.0, 0.0));

        target.borrow_mut().translation = Vec3::new(2.0, 2.0, 2.0);
        assert_eq!(effector.effect_point(), Vec4::new(2.0, 2.0, 2.0, 0.0));

        drop(target);
        assert_eq!(effector.effect_point(), Vec4::ZERO);

        let other = Transform::IDENTITY.into_shared();
        effector.set_target(&other);
        effector.clear_target();
        assert_eq!(effector.effect_point(), Vec4::ZERO);
    }

    #[test]
    fn external_time_overrides_clock_until_stopped() {
        let clock = FixedClock {
            running: true,
            time: 42.0,
        };
        let mut effector = Effector::with_channel(Channel::FIRST);
        let s = surface();
        link(&mut effector, &s);

        assert_eq!(effector.local_time(&clock), 42.0);

        effector.on_control_time_start();
        assert_eq!(effector.time_mode(), TimeMode::Internal);
        effector.set_time(5.0);
        let _ = effector.tick(&clock);
        assert_eq!(s.borrow().block().float("_LocalTime"), Some(5.0));
        assert_eq!(effector.local_time(&StoppedClock), 5.0);

        effector.set_time(1.25);
        let _ = effector.tick(&clock);
        assert_eq!(s.borrow().block().float("_LocalTime"), Some(1.25));

        effector.on_control_time_stop();
        let _ = effector.tick(&clock);
        assert_eq!(s.borrow().block().float("_LocalTime"), Some(42.0));
        let _ = effector.tick(&StoppedClock);
        assert_eq!(s.borrow().block().float("_LocalTime"), Some(0.0));
    }

    #[test]
    fn borrowed_surface_is_skipped() {
        let mut effector = Effector::with_channel(Channel::FIRST);
        let busy = surface();
        let free = surface();
        link(&mut effector, &busy);
        link(&mut effector, &free);

        let guard = busy.borrow_mut();
        assert_eq!(effector.tick(&StoppedClock), 1);
        drop(guard);
        assert_eq!(busy.borrow().write_count(), 0);
        assert_eq!(free.borrow().write_count(), 1);
    }

    #[test]
    fn borrowed_target_reads_as_unset() {
        let mut effector = Effector::with_channel(Channel::FIRST);
        let s = surface();
        link(&mut effector, &s);
        let target =
            Transform::from_translation(Vec3::new(3.0, 0.0, 0.0)).into_shared();
        effector.set_target(&target);

        let guard = target.borrow_mut();
        assert_eq!(effector.tick(&StoppedClock), 1);
        assert_eq!(s.borrow().block().vector("_EffectPoint1"), Some(Vec4::ZERO));

        let mut store = CountingStore::default();
        let mut painter = GizmoRecorder::default();
        effector.draw_gizmos(&mut painter, &mut store);
        assert!(painter
            .commands
            .iter()
            .all(|c| !matches!(c, GizmoCommand::WireSphere { .. })));
        drop(guard);

        let _ = effector.tick(&StoppedClock);
        assert_eq!(
            s.borrow().block().vector("_EffectPoint1"),
            Some(Vec4::new(3.0, 0.0, 0.0, 0.0))
        );
        assert!(effector.destroy(&mut store, HostSession::Inactive));
    }

    #[test]
    fn new_rejects_invalid_channel() {
        let options = EffectorOptions {
            channel: 0,
            offset: 0.0,
        };
        assert!(matches!(
            Effector::new(&options),
            Err(EffectorError::InvalidChannel(0))
        ));

        let options = EffectorOptions {
            channel: 3,
            offset: -0.5,
        };
        let effector = Effector::new(&options).unwrap();
        assert_eq!(effector.channel().index(), 3);
        assert_eq!(effector.offset(), -0.5);
    }

    #[test]
    fn from_options_applies_gizmo_appearance() {
        let mut options = Options::default();
        options.effector.channel = 2;
        options.gizmo.target_radius = 0.25;
        let effector = Effector::from_options(&options).unwrap();
        assert_eq!(effector.channel(), channel(2));
        assert_eq!(effector.gizmo_options().target_radius, 0.25);
    }

    #[test]
    fn gizmo_draws_two_grids_box_and_target() {
        let mut effector = Effector::with_channel(Channel::FIRST);
        effector.set_offset(0.5);
        effector.set_transform(Transform::from_translation(Vec3::X));
        let target = Transform::from_translation(Vec3::Y).into_shared();
        effector.set_target(&target);

        let before = effector.frame(&StoppedClock);
        let mut store = CountingStore::default();
        let mut painter = GizmoRecorder::default();
        effector.draw_gizmos(&mut painter, &mut store);
        assert_eq!(effector.frame(&StoppedClock), before);

        let cmds = &painter.commands;
        assert_eq!(cmds.len(), 4);
        assert!(matches!(
            cmds[0],
            GizmoCommand::WireSphere { center, radius, .. }
                if center == Vec3::Y && radius == 0.1
        ));
        let matrix = effector.transform().local_to_world();
        assert!(matches!(
            cmds[1],
            GizmoCommand::WireMesh { offset, matrix: m, .. }
                if offset == Vec3::new(0.0, 0.0, 0.5) && m == matrix
        ));
        assert!(matches!(
            cmds[2],
            GizmoCommand::WireMesh { offset, .. }
                if offset == Vec3::new(0.0, 0.0, 1.5)
        ));
        assert!(matches!(
            cmds[3],
            GizmoCommand::WireCube { center, size, .. }
                if center == Vec3::new(0.0, 0.0, 1.0)
                    && size == Vec3::new(0.02, 0.02, 1.0)
        ));
    }

    #[test]
    fn gizmo_without_target_skips_sphere() {
        let mut effector = Effector::with_channel(Channel::FIRST);
        let mut store = CountingStore::default();
        let mut painter = GizmoRecorder::default();
        effector.draw_gizmos(&mut painter, &mut store);
        effector.draw_gizmos(&mut painter, &mut store);
        assert_eq!(store.created, 1);
        assert!(painter
            .commands
            .iter()
            .all(|c| !matches!(c, GizmoCommand::WireSphere { .. })));
        assert!(effector.destroy(&mut store, HostSession::Inactive));
    }

    #[test]
    fn destroy_releases_exactly_once() {
        for session in [HostSession::Active, HostSession::Inactive] {
            let mut effector = Effector::with_channel(Channel::FIRST);
            let mut store = CountingStore::default();
            let mut painter = GizmoRecorder::default();
            effector.draw_gizmos(&mut painter, &mut store);
            assert!(effector.has_grid_mesh());

            assert!(effector.destroy(&mut store, session));
            assert!(!effector.destroy(&mut store, session));
            assert!(!effector.has_grid_mesh());
            assert_eq!(store.released.len(), 1);
            assert_eq!(store.released[0].1, session.release_mode());
        }
    }

    #[test]
    fn destroy_without_gizmo_is_noop() {
        let mut effector = Effector::with_channel(Channel::FIRST);
        let mut store = CountingStore::default();
        assert!(!effector.destroy(&mut store, HostSession::Active));
        assert!(!effector.destroy(&mut store, HostSession::Inactive));
        assert!(store.released.is_empty());
    }
}
