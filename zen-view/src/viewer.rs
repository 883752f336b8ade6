//! Interactive morphing point-cloud viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the morph engine, the
//! interaction mailbox and any running gesture source, and implements
//! [`eframe::App`] to draw the cloud and the controls around it.

use crate::camera::OrbitCamera;
use eframe::App;
use glam::Vec3;
use rand::rng;
use std::io::BufReader;
use zen_core::{
    config::{BlendMode, MorphConfig, RenderConfig},
    engine::MorphEngine,
    error::EngineError,
    generator,
    gesture::{GestureHandle, LineGestureSource, OscillatingGestureSource, spawn_gesture_source},
    interaction::InteractionState,
    mailbox::InteractionMailbox,
    shape::ShapeKind,
};

const STAR_COUNT: usize = 1500;
/// Scales the radius-2 sphere sampler out to the sky dome.
const STAR_SCALE: f32 = 50.0;
const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(5, 5, 5);

/// Where gesture samples come from at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GestureInput {
    #[default]
    None,
    Simulated,
    Stdin,
}

/// Startup options taken from the command line.
///
/// - `--shape NAME` - initial shape (unknown names fall back to Sphere).
/// - `--color #rrggbb` - initial particle color.
/// - `--count N` - number of particles.
/// - `--simulate` - start the simulated gesture source.
/// - `--stdin` - read `tension expansion` lines from stdin.
/// - `--no-clamp` - let smoothed interaction values leave `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewerOptions {
    pub shape: ShapeKind,
    pub morph: MorphConfig,
    pub render: RenderConfig,
    pub input: GestureInput,
    /// Clamp smoothed interaction values to `[0, 1]`. Fixed for the
    /// lifetime of the viewer's mailbox.
    pub clamp_inputs: bool,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            shape: ShapeKind::Heart,
            morph: MorphConfig::default(),
            render: RenderConfig::default(),
            input: GestureInput::None,
            clamp_inputs: true,
        }
    }
}

impl ViewerOptions {
    /// Parses options from program arguments (without the program name).
    ///
    /// Malformed values are logged and the default is kept.
    pub fn from_args(args: impl IntoIterator<Item = String>) -> Self {
        let mut opts = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--simulate" => opts.input = GestureInput::Simulated,
                "--stdin" => opts.input = GestureInput::Stdin,
                "--no-clamp" => opts.clamp_inputs = false,
                "--shape" => match args.next() {
                    Some(name) => opts.shape = ShapeKind::from_name(&name),
                    None => log::warn!("--shape needs a value"),
                },
                "--color" => match args.next() {
                    Some(hex) if opts.render.set_hex_color(&hex) => {}
                    other => log::warn!("ignoring --color {other:?}, expected #rrggbb"),
                },
                "--count" => match args.next().map(|n| n.parse::<usize>()) {
                    Some(Ok(count)) if count > 0 => opts.morph.particle_count = count,
                    other => log::warn!("ignoring --count {other:?}, expected a positive integer"),
                },
                other => log::warn!("unknown argument `{other}`"),
            }
        }
        opts
    }
}

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The core: [`MorphEngine`] and the [`InteractionMailbox`] it reads from.
/// - An optional running gesture source.
/// - UI configuration (camera, colors, pause).
///
/// The typical per-frame update is:
/// 1. Handle UI interactions / input.
/// 2. If `running` is `true`, read the latest interaction and tick the engine.
/// 3. Draw the starfield and the engine's frame buffer.
pub struct Viewer {
    engine: MorphEngine,
    mailbox: InteractionMailbox,
    gesture: Option<GestureHandle>,

    /// Edited copy of the engine config, pushed to the engine each frame.
    cfg: MorphConfig,
    render: RenderConfig,
    camera: OrbitCamera,
    stars: Vec<Vec3>,

    rng: rand::rngs::ThreadRng,

    running: bool,
    /// Values last set from the manual sliders.
    manual: InteractionState,
    last_dt: f32,
}

impl Viewer {
    /// Creates a viewer from startup options, spawning the requested
    /// gesture source.
    ///
    /// ### Errors
    /// Fails if the configured particle count is zero.
    pub fn new(opts: ViewerOptions) -> Result<Self, EngineError> {
        let mut rng = rng();
        let engine = MorphEngine::new(opts.shape, opts.morph, &mut rng)?;
        let stars = generator::generate(ShapeKind::Sphere, STAR_COUNT, &mut rng)
            .into_iter()
            .map(|p| p * STAR_SCALE)
            .collect();

        let mut viewer = Self {
            mailbox: InteractionMailbox::new(opts.clamp_inputs),
            gesture: None,
            cfg: *engine.config(),
            render: opts.render,
            camera: OrbitCamera::default(),
            stars,
            engine,
            rng,
            running: true,
            manual: InteractionState::IDLE,
            last_dt: 0.0,
        };

        match opts.input {
            GestureInput::None => {}
            GestureInput::Simulated => viewer.connect_simulated(),
            GestureInput::Stdin => viewer.connect(LineGestureSource::new(
                "stdin",
                BufReader::new(std::io::stdin()),
            )),
        }
        Ok(viewer)
    }

    fn connect(&mut self, source: impl zen_core::gesture::GestureSource) {
        self.disconnect();
        self.gesture = Some(spawn_gesture_source(source, &self.mailbox));
    }

    fn connect_simulated(&mut self) {
        self.connect(OscillatingGestureSource::default());
    }

    /// Stops the running gesture source. The last interaction stays in
    /// effect.
    fn disconnect(&mut self) {
        if let Some(handle) = self.gesture.take() {
            handle.disconnect();
        }
    }

    /// A source is connected while its thread is still delivering.
    fn is_connected(&self) -> bool {
        self.mailbox.is_connected()
            && self.gesture.as_ref().is_some_and(|g| !g.is_finished())
    }

    fn select_shape(&mut self, shape: ShapeKind) {
        self.engine.set_shape(shape, &mut self.rng);
    }

    /// Pushes a manual sample as if it came from a gesture source.
    fn push_manual(&mut self, sample: InteractionState) {
        self.manual = sample;
        self.mailbox.sender().push(sample);
    }

    /// Drops the interaction back to idle and re-centres the camera.
    ///
    /// The shape, the cloud and any running gesture source are kept.
    fn reset(&mut self) {
        self.mailbox.reset();
        self.manual = InteractionState::IDLE;
        self.camera = OrbitCamera::default();
    }

    /// Advances the engine by one frame of `dt` seconds.
    fn step_once(&mut self, dt: f32) {
        let interaction = self.mailbox.latest();
        self.engine.set_config(self.cfg);
        self.engine.tick(interaction, dt, &mut self.rng);
        self.last_dt = dt;

        if !self.is_connected() && interaction.tension < 0.1 {
            self.camera.auto_orbit(dt);
        }
    }

    /// Particle color after opacity and blend mode.
    ///
    /// egui blends in premultiplied alpha, so a zero alpha with a
    /// non-zero color adds onto whatever is underneath.
    fn particle_color(&self) -> egui::Color32 {
        let [r, g, b] = self.render.color;
        let opacity = self.render.opacity.clamp(0.0, 1.0);
        match self.render.blend {
            BlendMode::Additive => {
                let scale = |c: u8| (f32::from(c) * opacity).round() as u8;
                egui::Color32::from_rgba_premultiplied(scale(r), scale(g), scale(b), 0)
            }
            BlendMode::Normal => {
                egui::Color32::from_rgba_unmultiplied(r, g, b, (opacity * 255.0).round() as u8)
            }
        }
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel (title, pause, gesture connection).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("ZenParticles 3D");
                ui.label("Interactive Generative Art");
                ui.separator();

                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                if ui.button("Step").clicked() {
                    self.step_once(1.0 / 60.0);
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                ui.separator();
                if self.is_connected() {
                    let name = self.gesture.as_ref().map_or("", |g| g.name());
                    ui.colored_label(egui::Color32::LIGHT_GREEN, format!("● {name} active"));
                    if ui.button("Disconnect").clicked() {
                        self.disconnect();
                    }
                } else if ui.button("Start simulated gestures").clicked() {
                    self.connect_simulated();
                }
            });
        });
    }

    /// Builds the bottom status bar.
    fn ui_status_bar(&self, ctx: &egui::Context) {
        let interaction = self.mailbox.latest();
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt = {:.4} s", self.last_dt));
                ui.label(format!("t = {:.1} s", self.engine.elapsed()));
                ui.separator();
                ui.label(format!("particles = {}", self.engine.particle_count()));
                ui.label(format!("shape = {}", self.engine.shape()));
                ui.separator();
                ui.label(format!(
                    "tension = {:.2}, expansion = {:.2}",
                    interaction.tension, interaction.expansion
                ));
            });
        });
    }

    /// Builds the right-hand configuration panel.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.label("Morph");
                Self::labeled_drag_f32(ui, "morph_rate:", &mut self.cfg.morph_rate, 0.1..=20.0, 0.05);
                Self::labeled_drag_f32(ui, "expansion_gain:", &mut self.cfg.expansion_gain, 0.0..=10.0, 0.05);
                Self::labeled_drag_f32(ui, "fireworks_gain:", &mut self.cfg.fireworks_gain, 0.0..=10.0, 0.05);
                Self::labeled_drag_f32(ui, "fireworks_pulse:", &mut self.cfg.fireworks_pulse, 0.0..=5.0, 0.01);

                ui.separator();
                ui.label("Tension");
                Self::labeled_drag_f32(ui, "jitter_threshold:", &mut self.cfg.jitter_threshold, 0.0..=1.0, 0.005);
                Self::labeled_drag_f32(ui, "jitter_scale:", &mut self.cfg.jitter_scale, 0.0..=1.0, 0.005);
                Self::labeled_drag_f32(ui, "base_spin:", &mut self.cfg.base_spin, 0.0..=2.0, 0.01);
                Self::labeled_drag_f32(ui, "tension_spin_gain:", &mut self.cfg.tension_spin_gain, 0.0..=20.0, 0.1);

                ui.separator();
                ui.label("Idle float");
                Self::labeled_drag_f32(ui, "amplitude:", &mut self.cfg.float_amplitude, 0.0..=0.5, 0.001);
                Self::labeled_drag_f32(ui, "freq x:", &mut self.cfg.float_freq_x, 0.0..=5.0, 0.01);
                Self::labeled_drag_f32(ui, "freq y:", &mut self.cfg.float_freq_y, 0.0..=5.0, 0.01);
                Self::labeled_drag_f32(ui, "phase step:", &mut self.cfg.float_phase_step, 0.0..=1.0, 0.005);

                ui.separator();
                ui.label("Points");
                Self::labeled_drag_f32(ui, "size:", &mut self.render.point_size, 0.01..=0.5, 0.005);
                ui.add(egui::Slider::new(&mut self.render.opacity, 0.0..=1.0).text("opacity"));
                ui.horizontal(|ui| {
                    ui.radio_value(&mut self.render.blend, BlendMode::Additive, "Additive");
                    ui.radio_value(&mut self.render.blend, BlendMode::Normal, "Normal");
                });

                ui.separator();
                ui.label("Manual interaction");
                let mut manual = self.manual;
                let t = ui.add(egui::Slider::new(&mut manual.tension, 0.0..=1.0).text("tension"));
                let e = ui.add(egui::Slider::new(&mut manual.expansion, 0.0..=1.0).text("expansion"));
                if t.changed() || e.changed() {
                    self.push_manual(manual);
                }

                ui.separator();
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg = MorphConfig {
                        particle_count: self.engine.particle_count(),
                        ..MorphConfig::default()
                    };
                    self.render = RenderConfig::default();
                }
            });
    }

    /// Builds the floating shape and color picker.
    fn ui_toolbar(&mut self, ctx: &egui::Context) {
        egui::Area::new("toolbar".into())
            .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -40.0))
            .movable(false)
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(egui::Color32::from_rgba_unmultiplied(0, 0, 0, 96))
                    .inner_margin(6.0)
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            let current = self.engine.shape();
                            for shape in ShapeKind::ALL {
                                if ui.selectable_label(current == shape, shape.name()).clicked() {
                                    self.select_shape(shape);
                                }
                            }
                            ui.separator();
                            ui.label("🎨");
                            ui.color_edit_button_srgb(&mut self.render.color);
                        });
                    });
            });
    }

    /// Draws tension and expansion meters while a source is connected.
    fn ui_meters(&self, ctx: &egui::Context) {
        if !self.is_connected() {
            return;
        }
        let interaction = self.mailbox.latest();
        egui::Area::new("meters".into())
            .anchor(egui::Align2::LEFT_TOP, egui::vec2(10.0, 60.0))
            .movable(false)
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(egui::Color32::from_rgba_unmultiplied(0, 0, 0, 150))
                    .inner_margin(8.0)
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label("Tension");
                            ui.add(egui::ProgressBar::new(interaction.tension).desired_width(90.0));
                        });
                        ui.horizontal(|ui| {
                            ui.label("Expansion");
                            ui.add(egui::ProgressBar::new(interaction.expansion).desired_width(90.0));
                        });
                    });
            });
    }

    /// Builds the central panel where the cloud is drawn and orbited.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(BACKGROUND))
            .show(ctx, |ui| {
                let response = ui.allocate_response(ui.available_size(), egui::Sense::drag());
                let rect = response.rect;
                let painter = ui.painter_at(rect);

                // Orbit with drag.
                if response.dragged() {
                    self.camera.drag(response.drag_delta());
                }

                // Zoom with scroll while hovered.
                if response.hovered() {
                    let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
                    if scroll != 0.0 {
                        self.camera.zoom(scroll);
                    }
                }

                if self.running {
                    let dt = ctx.input(|i| i.stable_dt);
                    self.step_once(dt);
                    ctx.request_repaint();
                }

                let view_proj = self.camera.view_proj(rect.aspect_ratio());

                // Stars.
                let star_color = egui::Color32::from_gray(140);
                for &s in &self.stars {
                    if let Some((p, _)) = self.camera.project(&view_proj, s, rect) {
                        painter.circle_filled(p, 0.6, star_color);
                    }
                }

                // Particles.
                let frame = self.engine.frame();
                let rotation = frame.rotation();
                let color = self.particle_color();
                for &pos in frame.positions() {
                    if let Some((p, depth)) = self.camera.project(&view_proj, rotation * pos, rect) {
                        let r = self.camera.point_radius(self.render.point_size, depth, rect);
                        painter.circle_filled(p, r, color);
                    }
                }
                self.engine.frame_mut().mark_uploaded();
            });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
        self.ui_toolbar(ctx);
        self.ui_meters(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn small_viewer() -> Viewer {
        let mut opts = ViewerOptions::default();
        opts.morph.particle_count = 64;
        Viewer::new(opts).unwrap()
    }

    #[test]
    fn options_default_to_heart_without_gestures() {
        let opts = ViewerOptions::from_args(Vec::new());
        assert_eq!(opts.shape, ShapeKind::Heart);
        assert_eq!(opts.input, GestureInput::None);
        assert_eq!(opts.morph.particle_count, 3000);
        assert!(opts.clamp_inputs);
    }

    #[test]
    fn options_parse_every_flag() {
        let opts = ViewerOptions::from_args(args(&[
            "--shape", "saturn", "--color", "#102030", "--count", "500", "--simulate",
            "--no-clamp",
        ]));
        assert_eq!(opts.shape, ShapeKind::Saturn);
        assert_eq!(opts.render.color, [0x10, 0x20, 0x30]);
        assert_eq!(opts.morph.particle_count, 500);
        assert_eq!(opts.input, GestureInput::Simulated);
        assert!(!opts.clamp_inputs);
    }

    #[test]
    fn options_keep_defaults_on_bad_values() {
        let opts = ViewerOptions::from_args(args(&[
            "--shape", "cube", "--color", "blue", "--count", "0", "--bogus",
        ]));
        assert_eq!(opts.shape, ShapeKind::Sphere);
        assert_eq!(opts.render.color, RenderConfig::default().color);
        assert_eq!(opts.morph.particle_count, 3000);
    }

    #[test]
    fn new_rejects_zero_particles() {
        let mut opts = ViewerOptions::default();
        opts.morph.particle_count = 0;
        assert!(matches!(Viewer::new(opts), Err(EngineError::EmptyBuffer)));
    }

    #[test]
    fn select_shape_retargets_engine() {
        let mut viewer = small_viewer();
        let before = viewer.engine.target().to_vec();
        viewer.select_shape(ShapeKind::Flower);
        assert_eq!(viewer.engine.shape(), ShapeKind::Flower);
        assert_ne!(viewer.engine.target(), before.as_slice());
    }

    #[test]
    fn step_once_ticks_engine_with_edited_config() {
        let mut viewer = small_viewer();
        viewer.cfg.morph_rate = 6.0;
        viewer.step_once(1.0 / 60.0);
        assert_eq!(viewer.engine.config().morph_rate, 6.0);
        assert_eq!(viewer.engine.config().particle_count, 64);
        assert!(viewer.engine.elapsed() > 0.0);
        assert!(viewer.engine.live().iter().any(|p| *p != Vec3::ZERO));
    }

    #[test]
    fn camera_drifts_only_when_idle_and_disconnected() {
        let mut viewer = small_viewer();
        viewer.step_once(1.0);
        assert!(viewer.camera.yaw > 0.0);

        let mut tense = small_viewer();
        for _ in 0..10 {
            tense.push_manual(InteractionState::new(1.0, 0.0));
        }
        tense.step_once(1.0);
        assert_eq!(tense.camera.yaw, 0.0);
    }

    #[test]
    fn manual_sliders_feed_the_mailbox() {
        let mut viewer = small_viewer();
        viewer.push_manual(InteractionState::new(1.0, 1.0));
        let s = viewer.mailbox.latest();
        assert!((s.tension - 0.3).abs() < 1e-6);
        assert!(!viewer.is_connected());
    }

    #[test]
    fn simulated_source_connects_and_disconnects() {
        let mut viewer = small_viewer();
        viewer.connect_simulated();
        assert!(viewer.is_connected());

        viewer.disconnect();
        let deadline = Instant::now() + Duration::from_secs(2);
        while viewer.mailbox.is_connected() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(!viewer.is_connected());

        // The engine keeps ticking on the last value.
        viewer.step_once(1.0 / 60.0);
        assert!(viewer.engine.live().iter().all(|p| p.is_finite()));
    }

    #[test]
    fn reset_restores_idle_interaction_and_camera() {
        let mut viewer = small_viewer();
        viewer.push_manual(InteractionState::new(1.0, 1.0));
        viewer.camera.drag(egui::vec2(40.0, 20.0));
        viewer.camera.zoom(300.0);

        viewer.reset();

        assert_eq!(viewer.mailbox.latest(), InteractionState::IDLE);
        assert_eq!(viewer.manual, InteractionState::IDLE);
        assert_eq!(viewer.camera, OrbitCamera::default());
        assert_eq!(viewer.engine.shape(), ShapeKind::Heart);
    }

    #[test]
    fn clamp_option_fixes_mailbox_behaviour() {
        let loud = InteractionState::new(10.0, 10.0);

        let mut clamped = small_viewer();
        clamped.push_manual(loud);
        assert_eq!(clamped.mailbox.latest(), InteractionState::new(1.0, 1.0));

        let mut opts = ViewerOptions::from_args(args(&["--no-clamp"]));
        opts.morph.particle_count = 64;
        let mut open = Viewer::new(opts).unwrap();
        open.push_manual(loud);
        let s = open.mailbox.latest();
        assert!((s.tension - 3.0).abs() < 1e-5, "{s:?}");
        assert!((s.expansion - 3.0).abs() < 1e-5, "{s:?}");

        // Resetting the editable config leaves the mailbox mode alone.
        open.cfg = MorphConfig::default();
        open.push_manual(loud);
        assert!(open.mailbox.latest().tension > 1.0);
    }

    #[test]
    fn additive_color_has_zero_alpha() {
        let viewer = small_viewer();
        let c = viewer.particle_color();
        assert_eq!(c.a(), 0);
        assert!(c.r() > 0 || c.g() > 0 || c.b() > 0);
    }
}
