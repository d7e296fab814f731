//! Native GUI viewer using egui
//!
//! Every mounted scene is ticked once per repaint and drawn as a projected
//! wireframe plot, with mouse/keyboard orbit controls.

use eframe::egui;
use std::collections::BTreeMap;
use std::f64::consts::{FRAC_PI_2, TAU};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::clock::WallClock;
use crate::color::Rgb;
use crate::config::Config;
use crate::kinematics::{ring_path, Orientation, RotationMode, Vec3};
use crate::log_error;
use crate::scene::{Anchor, SceneHandle, SceneKind, Shape};
use crate::typing::TypingTicker;

/// Horizontal distance between scenes shown side by side
const SCENE_SPACING: f64 = 12.0;
/// Segments of the wireframe circles drawn for spheres
const SPHERE_SEGMENTS: usize = 32;
const RING_COLOR: egui::Color32 = egui::Color32::from_rgba_premultiplied(0x4D, 0x54, 0x95, 153);

/// Run the native GUI viewer
pub fn run_viewer(config: Config) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Orbit Scene"),
        ..Default::default()
    };

    eframe::run_native(
        "Orbit Scene",
        options,
        Box::new(|cc| Ok(Box::new(ViewerApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {}", e))
}

/// Polyline in some local frame, with its draw color
struct Wire {
    points: Vec<Vec3>,
    color: Rgb,
    emissive: bool,
}

struct MountedScene {
    handle: SceneHandle,
    /// Anchor wireframe in anchor-local space, built once at mount
    anchor_wires: Vec<Wire>,
    /// Node wireframe in node-local space; `None` draws nodes as dots
    node_wires: Option<Vec<Vec<Vec3>>>,
    node_dot_radius: f32,
}

impl MountedScene {
    fn mount(config: &Config, id: &str) -> anyhow::Result<Self> {
        let spec = config.require_scene(id)?;
        let handle = SceneHandle::create(spec, config.rotation, Box::new(WallClock::start()))?;

        let anchor_wires = anchor_wireframe(handle.anchor());
        let (node_wires, node_dot_radius) = match handle.kind().node_shape() {
            Shape::Sphere { radius } => (None, (radius * 12.0) as f32),
            Shape::Box { size } => (Some(box_wireframe(size, [0.0; 3])), 3.0),
        };

        Ok(Self {
            handle,
            anchor_wires,
            node_wires,
            node_dot_radius,
        })
    }
}

struct ViewerApp {
    config: Config,
    scenes: BTreeMap<String, MountedScene>,
    ticker: TypingTicker,
    // Camera state
    camera_distance: f32,
    camera_angle_x: f64, // Pitch (up/down)
    camera_angle_y: f64, // Yaw (left/right)
    camera_target: [f64; 2], // Pan offset
    reset_view: bool,
    // UI state
    show_grid: bool,
    show_rings: bool,
    show_labels: bool,
    auto_rotate: bool,
    line_width: f32,
}

impl ViewerApp {
    fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let ticker = TypingTicker::new(config.typing.texts.clone(), config.typing.timings);
        let mut app = Self {
            config,
            scenes: BTreeMap::new(),
            ticker,
            camera_distance: 1.0,
            camera_angle_x: 0.0,
            camera_angle_y: 0.0,
            camera_target: [0.0, 0.0],
            reset_view: false,
            show_grid: false,
            show_rings: true,
            show_labels: true,
            auto_rotate: true,
            line_width: 2.0,
        };

        // Mount everything configured, like the page does on load
        let ids: Vec<String> = app.config.scenes.iter().map(|s| s.id.clone()).collect();
        for id in ids {
            app.mount_scene(&id);
        }
        app
    }

    fn mount_scene(&mut self, id: &str) {
        if self.scenes.contains_key(id) {
            debug!("Scene {} already mounted, skipping", id);
            return;
        }
        match MountedScene::mount(&self.config, id) {
            Ok(scene) => {
                self.scenes.insert(id.to_string(), scene);
            }
            Err(e) => {
                log_error!(e, scene = %id);
            }
        }
    }

    fn unmount_scene(&mut self, id: &str) {
        match self.scenes.remove(id) {
            Some(scene) => scene.handle.destroy(),
            None => warn!("Scene {} was not mounted", id),
        }
    }

    fn center_view(&mut self) {
        self.camera_angle_x = 0.0;
        self.camera_angle_y = 0.0;
        self.camera_distance = 1.0;
        self.camera_target = [0.0, 0.0];
        self.reset_view = true;
    }

    /// Auto-rotate speed of the camera; mirrors the page's orbit controls
    fn auto_rotate_speed(&self) -> f64 {
        let speed = |kind: SceneKind| match kind {
            SceneKind::Atom => 0.8,
            SceneKind::Orbit => 0.5,
        };
        self.scenes
            .values()
            .map(|s| speed(s.handle.kind()))
            .fold(0.0, f64::max)
    }

    fn project_point(&self, p: Vec3) -> [f64; 2] {
        let (sin_x, cos_x) = self.camera_angle_x.sin_cos();
        let (sin_y, cos_y) = self.camera_angle_y.sin_cos();

        // Rotate around Y axis (yaw)
        let x1 = p[0] * cos_y + p[2] * sin_y;
        let z1 = -p[0] * sin_y + p[2] * cos_y;

        // Rotate around X axis (pitch)
        let y1 = p[1] * cos_x - z1 * sin_x;

        [x1 + self.camera_target[0], y1 + self.camera_target[1]]
    }

    fn project_line(&self, points: impl Iterator<Item = Vec3>) -> egui_plot::PlotPoints {
        egui_plot::PlotPoints::from_iter(points.map(|p| self.project_point(p)))
    }

    fn draw_scene(&self, plot_ui: &mut egui_plot::PlotUi, scene: &MountedScene, offset: f64) {
        let handle = &scene.handle;
        let frame = handle.frame();
        let shift = |p: Vec3| [p[0] + offset, p[1], p[2]];
        let group = frame.group;
        let anchor = frame.anchor;

        // Anchor: anchor rotation inside the group rotation
        for wire in &scene.anchor_wires {
            let line = egui_plot::Line::new(self.project_line(
                wire.points.iter().map(|&p| shift(group.apply(anchor.apply(p)))),
            ))
            .color(to_color32(wire.color))
            .width(if wire.emissive { self.line_width * 1.5 } else { self.line_width });
            plot_ui.line(line);
        }

        if self.show_rings {
            for ring in handle.rings() {
                let line = egui_plot::Line::new(self.project_line(
                    ring.points().iter().map(|&p| shift(group.apply(p))),
                ))
                .color(RING_COLOR)
                .width(self.line_width);
                plot_ui.line(line);
            }
        }

        for (item, node) in handle.items().iter().zip(frame.nodes.iter()) {
            let center = node.position.to_array();
            let color = to_color32(item.color);

            match &scene.node_wires {
                Some(wires) => {
                    let spin = Orientation::yaw(node.spin);
                    for wire in wires {
                        let line = egui_plot::Line::new(self.project_line(wire.iter().map(|&p| {
                            let local = spin.apply(p);
                            shift(group.apply([
                                center[0] + local[0],
                                center[1] + local[1],
                                center[2] + local[2],
                            ]))
                        })))
                        .color(color)
                        .width(self.line_width);
                        plot_ui.line(line);
                    }
                }
                None => {
                    let pos = self.project_point(shift(group.apply(center)));
                    let dot = egui_plot::Points::new(egui_plot::PlotPoints::from_iter([pos]))
                        .shape(egui_plot::MarkerShape::Circle)
                        .filled(true)
                        .radius(scene.node_dot_radius)
                        .color(color)
                        .name(&item.label);
                    plot_ui.points(dot);
                }
            }

            if self.show_labels {
                let pos = self.project_point(shift(group.apply([center[0], center[1] + 0.7, center[2]])));
                let text = egui_plot::Text::new(
                    egui_plot::PlotPoint::new(pos[0], pos[1]),
                    egui::RichText::new(&item.label).color(egui::Color32::WHITE).strong(),
                )
                .anchor(egui::Align2::CENTER_BOTTOM);
                plot_ui.text(text);
            }
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());

        // Continuous animation: one scene tick per repaint
        ctx.request_repaint();

        let dt = ctx.input(|i| i.stable_dt).max(0.0);
        self.ticker.advance(Duration::from_secs_f32(dt));
        for scene in self.scenes.values_mut() {
            scene.handle.tick();
        }

        if self.auto_rotate {
            // Full turn every 60 s at speed 1 and 60 fps
            self.camera_angle_y += TAU / 3600.0 * self.auto_rotate_speed();
        }

        // Left panel - scene selection
        egui::SidePanel::left("scenes_panel").min_width(250.0).show(ctx, |ui| {
            ui.heading("Scenes");
            ui.separator();

            let mut to_mount: Vec<String> = Vec::new();
            let mut to_unmount: Vec<String> = Vec::new();

            egui::ScrollArea::vertical().show(ui, |ui| {
                for spec in &self.config.scenes {
                    let mounted = self.scenes.get(&spec.id);
                    let mut checked = mounted.is_some();

                    if ui.checkbox(&mut checked, &spec.name).changed() {
                        if checked {
                            to_mount.push(spec.id.clone());
                        } else {
                            to_unmount.push(spec.id.clone());
                        }
                    }

                    if let Some(scene) = mounted {
                        let frame = scene.handle.frame();
                        ui.label(format!(
                            "tick {} | t = {:.1}s | group {:.2} | anchor {:.2}",
                            frame.tick, frame.elapsed, frame.group.yaw, frame.anchor.yaw,
                        ));
                    }

                    ui.collapsing(format!("{} items", spec.items.len()), |ui| {
                        for item in &spec.items {
                            ui.horizontal(|ui| {
                                ui.colored_label(to_color32(item.color), "●");
                                ui.label(&item.label);
                            });
                        }
                    });
                    ui.separator();
                }
            });

            for id in to_mount {
                self.mount_scene(&id);
            }
            for id in to_unmount {
                self.unmount_scene(&id);
            }
        });

        // Bottom panel - controls
        egui::TopBottomPanel::bottom("controls_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.checkbox(&mut self.show_grid, "Grid");
                ui.checkbox(&mut self.show_rings, "Rings");
                ui.checkbox(&mut self.show_labels, "Labels");
                ui.checkbox(&mut self.auto_rotate, "Auto-rotate");

                ui.separator();
                ui.label("Rotate:");
                ui.add(egui::DragValue::new(&mut self.camera_angle_x).speed(0.02).prefix("X:"));
                ui.add(egui::DragValue::new(&mut self.camera_angle_y).speed(0.02).prefix("Y:"));
                ui.add(egui::Slider::new(&mut self.line_width, 0.5..=5.0).text("Line"));

                ui.separator();
                if ui.button("Center").clicked() {
                    self.center_view();
                }

                ui.separator();
                let mode = match self.config.rotation.mode {
                    RotationMode::PerTick => "per tick",
                    RotationMode::TimeScaled => "time scaled",
                };
                ui.label(format!("Rotation: {}", mode));
            });
        });

        // Central panel - 3D view
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(
                    egui::RichText::new(format!("{}|", self.ticker.text()))
                        .monospace()
                        .color(egui::Color32::from_rgb(0x60, 0xA5, 0xFA)),
                );
            });
            ui.horizontal(|ui| {
                ui.label(format!("{} scenes | ", self.scenes.len()));
                ui.label("Right-drag: rotate | Middle-drag: pan | Scroll: zoom");
            });

            ctx.input(|i| {
                if i.key_down(egui::Key::ArrowLeft) { self.camera_angle_y -= 0.03; }
                if i.key_down(egui::Key::ArrowRight) { self.camera_angle_y += 0.03; }
                if i.key_down(egui::Key::ArrowUp) { self.camera_angle_x -= 0.03; }
                if i.key_down(egui::Key::ArrowDown) { self.camera_angle_x += 0.03; }
                if i.key_down(egui::Key::Minus) {
                    self.camera_distance *= 1.02;
                }
                if i.key_down(egui::Key::Plus) {
                    self.camera_distance *= 0.98;
                }
                if i.key_pressed(egui::Key::Home) { self.center_view(); }
                if i.raw_scroll_delta.y != 0.0 {
                    self.camera_distance *= 1.0 - i.raw_scroll_delta.y * 0.002;
                }
                if i.pointer.secondary_down() {
                    let delta = i.pointer.delta();
                    self.camera_angle_y += delta.x as f64 * 0.005;
                    self.camera_angle_x += delta.y as f64 * 0.005;
                }
                if i.pointer.middle_down() {
                    let delta = i.pointer.delta();
                    self.camera_target[0] -= delta.x as f64 * 0.02;
                    self.camera_target[1] += delta.y as f64 * 0.02;
                }
            });

            self.camera_angle_x = self.camera_angle_x.clamp(-1.5, 1.5);
            self.camera_angle_y = self.camera_angle_y.rem_euclid(TAU);
            self.camera_distance = self.camera_distance.clamp(0.1, 10.0);

            let count = self.scenes.len().max(1) as f64;
            let view_range = 6.0 * count * self.camera_distance as f64;

            let mut plot = egui_plot::Plot::new("scene_plot")
                .data_aspect(1.0)
                .allow_drag(false)
                .allow_zoom(false)
                .allow_scroll(false)
                .show_axes(self.show_grid)
                .show_grid(self.show_grid)
                .include_x(-view_range)
                .include_x(view_range)
                .include_y(-view_range * 0.6)
                .include_y(view_range * 0.6);
            if self.reset_view {
                plot = plot.reset();
                self.reset_view = false;
            }

            plot.show(ui, |plot_ui| {
                for (k, scene) in self.scenes.values().enumerate() {
                    let offset = (k as f64 - (count - 1.0) / 2.0) * SCENE_SPACING;
                    self.draw_scene(plot_ui, scene, offset);
                }
            });
        });
    }
}

impl Drop for ViewerApp {
    fn drop(&mut self) {
        let ids: Vec<String> = self.scenes.keys().cloned().collect();
        for id in ids {
            self.unmount_scene(&id);
        }
        info!("Viewer closed");
    }
}

/// Wireframe of an anchor: circles for spheres, edges for boxes
fn anchor_wireframe(anchor: &Anchor) -> Vec<Wire> {
    let mut wires = Vec::new();
    for prim in &anchor.primitives {
        let polylines = match prim.shape {
            Shape::Sphere { radius } => sphere_wireframe(radius, prim.offset),
            Shape::Box { size } => box_wireframe(size, prim.offset),
        };
        wires.extend(polylines.into_iter().map(|points| Wire {
            points,
            color: prim.color,
            emissive: prim.emissive,
        }));
    }
    wires
}

/// Three orthogonal great circles
fn sphere_wireframe(radius: f64, offset: Vec3) -> Vec<Vec<Vec3>> {
    let turn = Orientation::yaw(FRAC_PI_2);
    let circles = [
        ring_path(radius, SPHERE_SEGMENTS, 0.0),
        ring_path(radius, SPHERE_SEGMENTS, FRAC_PI_2),
        ring_path(radius, SPHERE_SEGMENTS, FRAC_PI_2)
            .map(|c| c.into_iter().map(|p| turn.apply(p)).collect::<Vec<Vec3>>()),
    ];
    circles
        .into_iter()
        .filter_map(|c| match c {
            Ok(points) => Some(points),
            Err(e) => {
                warn!("Skipping sphere wireframe: {}", e);
                None
            }
        })
        .map(|c| c.into_iter().map(|p| add(p, offset)).collect())
        .collect()
}

/// Front face, back face and the four edges joining them
fn box_wireframe(size: Vec3, offset: Vec3) -> Vec<Vec<Vec3>> {
    let [hx, hy, hz] = [size[0] / 2.0, size[1] / 2.0, size[2] / 2.0];
    let face = |z: f64| -> Vec<Vec3> {
        [[-hx, -hy], [hx, -hy], [hx, hy], [-hx, hy], [-hx, -hy]]
            .iter()
            .map(|&[x, y]| add([x, y, z], offset))
            .collect()
    };
    let mut lines = vec![face(hz), face(-hz)];
    for [x, y] in [[-hx, -hy], [hx, -hy], [hx, hy], [-hx, hy]] {
        lines.push(vec![add([x, y, hz], offset), add([x, y, -hz], offset)]);
    }
    lines
}

fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn to_color32(c: Rgb) -> egui::Color32 {
    egui::Color32::from_rgb(c.r, c.g, c.b)
}
