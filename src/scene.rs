//! Scene composer - anchor, orbit nodes and rings as one scene graph
//!
//! A scene is built once by [`SceneHandle::create`], ticked once per frame,
//! and released by [`SceneHandle::destroy`]. Only transforms change between
//! frames; node, ring and anchor storage is allocated at construction.

use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};
use tracing::{debug, info, trace};

use crate::clock::TimeSource;
use crate::color::Rgb;
use crate::error::SceneError;
use crate::kinematics::{
    atom_rings, OrbitNode, OrbitTransform, Orientation, Ring, RotationDriver, RotationMode,
    RotationRates, SceneState, Variant, Vec3,
};
use crate::sink::RenderSink;

/// Default item radius around the anchor
pub const DEFAULT_RADIUS: f64 = 4.0;
pub const DEFAULT_REFERENCE_FPS: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneKind {
    /// Nucleus sphere, floating items, three tilted rings
    Atom,
    /// Monitor anchor with items revolving around it
    Orbit,
}

impl SceneKind {
    pub fn variant(self) -> Variant {
        match self {
            SceneKind::Atom => Variant::Float,
            SceneKind::Orbit => Variant::Orbit,
        }
    }

    pub fn default_rates(self) -> RotationRates {
        match self {
            SceneKind::Atom => RotationRates::ATOM,
            SceneKind::Orbit => RotationRates::MONITOR,
        }
    }

    pub fn anchor(self) -> Anchor {
        match self {
            SceneKind::Atom => Anchor::nucleus(),
            SceneKind::Orbit => Anchor::monitor(),
        }
    }

    /// Primitive drawn for each labeled item
    pub fn node_shape(self) -> Shape {
        match self {
            SceneKind::Atom => Shape::Sphere { radius: 0.5 },
            SceneKind::Orbit => Shape::Box { size: [0.8, 0.8, 0.1] },
        }
    }
}

/// Item as written in configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSpec {
    pub label: String,
    pub color: Rgb,
}

/// Scene definition loaded from configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSpec {
    pub id: String,
    pub name: String,
    pub kind: SceneKind,
    #[serde(default = "default_radius")]
    pub radius: f64,
    /// Overrides the kind's default rotation rates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rates: Option<RotationRates>,
    pub items: Vec<ItemSpec>,
}

fn default_radius() -> f64 {
    DEFAULT_RADIUS
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationSettings {
    #[serde(default)]
    pub mode: RotationMode,
    #[serde(default = "default_reference_fps")]
    pub reference_fps: f64,
}

fn default_reference_fps() -> f64 {
    DEFAULT_REFERENCE_FPS
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            mode: RotationMode::PerTick,
            reference_fps: DEFAULT_REFERENCE_FPS,
        }
    }
}

/// Immutable item for the lifetime of a scene
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledItem {
    pub index: usize,
    pub total: usize,
    pub label: String,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Shape {
    Sphere { radius: f64 },
    Box { size: Vec3 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Primitive {
    pub shape: Shape,
    pub offset: Vec3,
    pub color: Rgb,
    pub emissive: bool,
}

/// Central mesh the items are arranged around
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anchor {
    pub primitives: Vec<Primitive>,
}

impl Anchor {
    pub fn nucleus() -> Self {
        Self {
            primitives: vec![Primitive {
                shape: Shape::Sphere { radius: 1.5 },
                offset: [0.0, 0.0, 0.0],
                color: Rgb::new(0x4F, 0x46, 0xE5),
                emissive: true,
            }],
        }
    }

    /// Body, glowing screen, base bar and stand
    pub fn monitor() -> Self {
        let body = Rgb::new(0x1F, 0x29, 0x37);
        let part = |size: Vec3, offset: Vec3, color: Rgb, emissive: bool| Primitive {
            shape: Shape::Box { size },
            offset,
            color,
            emissive,
        };
        Self {
            primitives: vec![
                part([2.5, 1.8, 0.15], [0.0, 0.0, 0.0], body, false),
                part([2.2, 1.5, 0.05], [0.0, 0.0, 0.1], Rgb::new(0x3B, 0x82, 0xF6), true),
                part([2.6, 0.3, 0.2], [0.0, -1.05, 0.0], Rgb::new(0x37, 0x41, 0x51), false),
                part([1.5, 0.1, 1.0], [0.0, -1.25, 0.0], body, false),
            ],
        }
    }
}

/// Transform of one node in a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NodeFrame {
    pub index: usize,
    pub position: OrbitTransform,
    pub spin: f64,
}

/// Snapshot submitted to the renderer once per tick
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    pub tick: u64,
    pub elapsed: f64,
    pub group: Orientation,
    pub anchor: Orientation,
    pub nodes: Vec<NodeFrame>,
}

/// A mounted scene
pub struct Scene {
    id: String,
    name: String,
    kind: SceneKind,
    items: Vec<LabeledItem>,
    anchor: Anchor,
    nodes: Vec<OrbitNode>,
    rings: Vec<Ring>,
    state: SceneState,
    driver: RotationDriver,
    clock: Box<dyn TimeSource>,
    frame: Frame,
}

impl Scene {
    fn build(
        spec: &SceneSpec,
        rotation: RotationSettings,
        clock: Box<dyn TimeSource>,
    ) -> Result<Self, SceneError> {
        let total = spec.items.len();
        if total == 0 {
            return Err(SceneError::EmptyScene);
        }

        let variant = spec.kind.variant();
        let nodes = (0..total)
            .map(|index| OrbitNode::new(index, total, spec.radius, variant))
            .collect::<Result<Vec<_>, _>>()?;

        let items = spec
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| LabeledItem {
                index,
                total,
                label: item.label.clone(),
                color: item.color,
            })
            .collect();

        let rings = match spec.kind {
            SceneKind::Atom => atom_rings(spec.radius)?,
            SceneKind::Orbit => Vec::new(),
        };

        let anchor = spec.kind.anchor();
        let rates = spec.rates.unwrap_or_else(|| spec.kind.default_rates());
        let driver = RotationDriver::new(
            rates,
            rotation.mode,
            rotation.reference_fps,
            !anchor.primitives.is_empty(),
        )?;

        let frame = Frame {
            tick: 0,
            elapsed: clock.elapsed(),
            group: Orientation::IDENTITY,
            anchor: Orientation::IDENTITY,
            nodes: nodes
                .iter()
                .map(|n| NodeFrame {
                    index: n.index(),
                    position: n.transform(),
                    spin: n.spin(),
                })
                .collect(),
        };

        Ok(Self {
            id: spec.id.clone(),
            name: spec.name.clone(),
            kind: spec.kind,
            items,
            anchor,
            nodes,
            rings,
            state: SceneState::default(),
            driver,
            clock,
            frame,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SceneKind {
        self.kind
    }

    pub fn items(&self) -> &[LabeledItem] {
        &self.items
    }

    pub fn anchor(&self) -> &Anchor {
        &self.anchor
    }

    pub fn nodes(&self) -> &[OrbitNode] {
        &self.nodes
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn rotation_mode(&self) -> RotationMode {
        self.driver.mode()
    }

    /// Latest frame (the construction pose before the first tick)
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Advance one frame: read time once, move every node, rotate, record
    pub fn tick(&mut self) -> &Frame {
        let previous = self.clock.elapsed();
        let elapsed = self.clock.tick();
        let dt = elapsed - previous;
        let spin_scale = self.driver.scale(dt);

        for (node, slot) in self.nodes.iter_mut().zip(self.frame.nodes.iter_mut()) {
            slot.position = node.update(elapsed, spin_scale);
            slot.spin = node.spin();
        }
        self.driver.advance(&mut self.state, dt);

        self.frame.tick += 1;
        self.frame.elapsed = elapsed;
        self.frame.group = self.state.group();
        self.frame.anchor = self.state.anchor();
        trace!(scene = %self.id, tick = self.frame.tick, elapsed, "Frame computed");

        &self.frame
    }

    /// Tick and hand the frame to `sink`
    pub fn render(&mut self, sink: &mut dyn RenderSink) -> Result<(), SceneError> {
        self.tick();
        let scene: &Scene = self;
        sink.submit(&scene.frame, scene)?;
        Ok(())
    }
}

/// Owns a mounted scene; destroying it is the only way to unmount
pub struct SceneHandle {
    scene: Scene,
}

impl SceneHandle {
    pub fn create(
        spec: &SceneSpec,
        rotation: RotationSettings,
        clock: Box<dyn TimeSource>,
    ) -> Result<Self, SceneError> {
        let scene = Scene::build(spec, rotation, clock)?;
        info!(
            scene = %scene.id,
            kind = ?scene.kind,
            items = scene.items.len(),
            rings = scene.rings.len(),
            mode = ?rotation.mode,
            "Scene mounted"
        );
        Ok(Self { scene })
    }

    /// Unmount, releasing anchor, nodes and rings together
    pub fn destroy(self) {
        debug!(
            scene = %self.scene.id,
            ticks = self.scene.frame.tick,
            "Scene unmounted"
        );
    }
}

impl Deref for SceneHandle {
    type Target = Scene;

    fn deref(&self) -> &Scene {
        &self.scene
    }
}

impl DerefMut for SceneHandle {
    fn deref_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedStepClock;
    use crate::error::SinkError;
    use crate::kinematics::ORBIT_SPIN_PER_TICK;
    use crate::sink::FrameRecorder;

    fn items(n: usize) -> Vec<ItemSpec> {
        (0..n)
            .map(|i| ItemSpec {
                label: format!("skill{}", i),
                color: Rgb::new(10 * i as u8, 0, 0),
            })
            .collect()
    }

    fn spec(kind: SceneKind, n: usize) -> SceneSpec {
        SceneSpec {
            id: "test".to_string(),
            name: "Test".to_string(),
            kind,
            radius: 4.0,
            rates: None,
            items: items(n),
        }
    }

    fn mount(kind: SceneKind, n: usize) -> SceneHandle {
        let clock = FixedStepClock::new(1.0 / 60.0).unwrap();
        SceneHandle::create(&spec(kind, n), RotationSettings::default(), Box::new(clock)).unwrap()
    }

    #[test]
    fn test_atom_scene_layout() {
        let scene = mount(SceneKind::Atom, 8);
        assert_eq!(scene.nodes().len(), 8);
        assert_eq!(scene.rings().len(), 3);
        assert_eq!(scene.anchor().primitives.len(), 1);
        assert!(scene.nodes().iter().all(|n| n.variant() == Variant::Float));
        assert!(scene.items().iter().all(|i| i.total == 8));
        assert_eq!(scene.items()[3].index, 3);
        assert_eq!(scene.items()[3].label, "skill3");
    }

    #[test]
    fn test_orbit_scene_layout() {
        let scene = mount(SceneKind::Orbit, 12);
        assert_eq!(scene.nodes().len(), 12);
        assert!(scene.rings().is_empty());
        assert_eq!(scene.anchor().primitives.len(), 4);
        assert!(scene.nodes().iter().all(|n| n.variant() == Variant::Orbit));
    }

    #[test]
    fn test_empty_scene_rejected() {
        let clock = FixedStepClock::new(0.1).unwrap();
        let result = SceneHandle::create(&spec(SceneKind::Atom, 0), RotationSettings::default(), Box::new(clock));
        assert_eq!(result.err(), Some(SceneError::EmptyScene));
    }

    #[test]
    fn test_bad_radius_rejected() {
        let mut bad = spec(SceneKind::Atom, 3);
        bad.radius = -2.0;
        let clock = FixedStepClock::new(0.1).unwrap();
        let result = SceneHandle::create(&bad, RotationSettings::default(), Box::new(clock));
        assert_eq!(result.err(), Some(SceneError::InvalidRadius(-2.0)));
    }

    #[test]
    fn test_tick_uses_one_time_snapshot() {
        let mut scene = mount(SceneKind::Orbit, 12);
        for _ in 0..5 {
            scene.tick();
        }
        let frame = scene.frame().clone();
        assert_eq!(frame.tick, 5);
        assert!((frame.elapsed - 5.0 / 60.0).abs() < 1e-12);
        for (node, slot) in scene.nodes().iter().zip(frame.nodes.iter()) {
            assert_eq!(slot.position, node.position_at(frame.elapsed));
        }
    }

    #[test]
    fn test_rotation_follows_ticks() {
        let mut scene = mount(SceneKind::Atom, 8);
        for _ in 0..100 {
            scene.tick();
        }
        assert!((scene.state().group_yaw - 0.3).abs() < 1e-9);
        assert!((scene.frame().anchor.pitch - 1.0).abs() < 1e-9);
        assert_eq!(scene.frame().group, scene.state().group());
    }

    #[test]
    fn test_rates_override() {
        let mut custom = spec(SceneKind::Orbit, 4);
        custom.rates = Some(RotationRates {
            group_yaw: 0.1,
            anchor_pitch: 0.0,
            anchor_yaw: 0.0,
        });
        let clock = FixedStepClock::new(0.1).unwrap();
        let mut scene = SceneHandle::create(&custom, RotationSettings::default(), Box::new(clock)).unwrap();
        scene.tick();
        assert!((scene.state().group_yaw - 0.1).abs() < 1e-12);
        assert_eq!(scene.state().anchor_yaw, 0.0);
    }

    #[test]
    fn test_bad_reference_fps_rejected() {
        for fps in [f64::NAN, -30.0] {
            let rotation = RotationSettings {
                mode: RotationMode::TimeScaled,
                reference_fps: fps,
            };
            let clock = FixedStepClock::new(1.0 / 60.0).unwrap();
            let result = SceneHandle::create(&spec(SceneKind::Atom, 4), rotation, Box::new(clock));
            assert!(
                matches!(result, Err(SceneError::InvalidReferenceFps(_))),
                "fps {} mounted",
                fps
            );
        }
    }

    #[test]
    fn test_non_finite_rates_rejected() {
        let mut custom = spec(SceneKind::Orbit, 4);
        custom.rates = Some(RotationRates {
            group_yaw: 0.0,
            anchor_pitch: 0.0,
            anchor_yaw: f64::INFINITY,
        });
        let clock = FixedStepClock::new(0.1).unwrap();
        let result = SceneHandle::create(&custom, RotationSettings::default(), Box::new(clock));
        assert!(matches!(
            result,
            Err(SceneError::InvalidRotationRate { name: "anchor_yaw", .. })
        ));
    }

    /// Simulate one second of an orbit scene at `fps`
    fn one_second(fps: u32, mode: RotationMode) -> SceneHandle {
        let rotation = RotationSettings {
            mode,
            reference_fps: 60.0,
        };
        let clock = FixedStepClock::new(1.0 / fps as f64).unwrap();
        let mut scene = SceneHandle::create(&spec(SceneKind::Orbit, 6), rotation, Box::new(clock)).unwrap();
        for _ in 0..fps {
            scene.tick();
        }
        scene
    }

    #[test]
    fn test_time_scaled_spin_ignores_frame_rate() {
        let slow = one_second(30, RotationMode::TimeScaled);
        let fast = one_second(120, RotationMode::TimeScaled);
        assert!((slow.state().anchor_yaw - fast.state().anchor_yaw).abs() < 1e-9);
        assert!((slow.state().anchor_yaw - 0.3).abs() < 1e-9);
        for (a, b) in slow.frame().nodes.iter().zip(fast.frame().nodes.iter()) {
            assert!((a.spin - b.spin).abs() < 1e-9, "{} vs {}", a.spin, b.spin);
            assert!((a.spin - ORBIT_SPIN_PER_TICK * 60.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_per_tick_spin_follows_frame_rate() {
        let slow = one_second(30, RotationMode::PerTick);
        let fast = one_second(120, RotationMode::PerTick);
        assert!((slow.frame().nodes[0].spin - 0.6).abs() < 1e-9);
        assert!((fast.frame().nodes[0].spin - 2.4).abs() < 1e-9);
    }

    #[test]
    fn test_render_submits_frames() {
        let mut scene = mount(SceneKind::Atom, 8);
        let mut recorder = FrameRecorder::new(1);
        for _ in 0..3 {
            scene.render(&mut recorder).unwrap();
        }
        let frames = recorder.into_frames();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[2].tick, 3);
        assert_eq!(frames[2].nodes.len(), 8);
    }

    struct RejectingSink;

    impl RenderSink for RejectingSink {
        fn submit(&mut self, _frame: &Frame, _scene: &Scene) -> Result<(), SinkError> {
            Err(SinkError("surface lost".to_string()))
        }
    }

    #[test]
    fn test_sink_failure_surfaces() {
        let mut scene = mount(SceneKind::Atom, 2);
        let err = scene.render(&mut RejectingSink).unwrap_err();
        assert_eq!(err, SceneError::Sink(SinkError("surface lost".to_string())));
        // The frame was still computed
        assert_eq!(scene.frame().tick, 1);
    }

    #[test]
    fn test_destroy_consumes_handle() {
        let mut scene = mount(SceneKind::Orbit, 3);
        scene.tick();
        scene.destroy();
    }
}
