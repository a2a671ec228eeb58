//! Interactive palm tree viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the parameter form, the seed
//! and the last generated [`PalmTree`], and implements [`eframe::App`] to
//! render them. [`EguiCanvas`] is the [`Canvas`] that turns segments into
//! egui shapes.

use eframe::App;
use glam::Vec2;
use palm_core::{
    error::ParamError,
    generator::generate,
    input::ParamForm,
    params::Params,
    random::RngSource,
    render::{Canvas, render},
    segment::{LineCap, PalmTree, Segment, StrokeColor},
    stats::TreeStats,
};

const WOOD: egui::Color32 = egui::Color32::from_rgb(244, 164, 96);
const FOLIAGE: egui::Color32 = egui::Color32::from_rgb(0, 100, 0);

/// Distance in pixels between the bottom of the canvas and the trunk base.
const GROUND_MARGIN: f32 = 50.0;

/// Pan/zoom state mapping the generator's y-down world onto the screen.
///
/// The world origin sits at the bottom center of the drawing area, lifted
/// by [`GROUND_MARGIN`].
#[derive(Clone, Copy, Debug)]
struct Camera {
    zoom: f32,
    pan: egui::Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: egui::Vec2::ZERO,
        }
    }
}

impl Camera {
    fn anchor(&self, rect: egui::Rect) -> egui::Pos2 {
        egui::pos2(rect.center().x, rect.bottom() - GROUND_MARGIN) + self.pan
    }

    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let anchor = self.anchor(rect);
        egui::pos2(anchor.x + p.x * self.zoom, anchor.y + p.y * self.zoom)
    }

    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let anchor = self.anchor(rect);
        Vec2::new((p.x - anchor.x) / self.zoom, (p.y - anchor.y) / self.zoom)
    }

    /// Multiplies the zoom by `factor`, keeping the world point under
    /// `pointer` fixed on screen.
    fn zoom_at(&mut self, pointer: egui::Pos2, factor: f32, rect: egui::Rect) {
        let world_before = self.screen_to_world(pointer, rect);
        self.zoom = (self.zoom * factor).clamp(0.1, 10.0);
        let screen_after = self.world_to_screen(world_before, rect);
        self.pan += pointer - screen_after;
    }
}

/// [`Canvas`] collecting egui shapes for one frame.
struct EguiCanvas<'a> {
    camera: &'a Camera,
    rect: egui::Rect,
    shapes: Vec<egui::Shape>,
}

impl<'a> EguiCanvas<'a> {
    fn new(camera: &'a Camera, rect: egui::Rect) -> Self {
        Self {
            camera,
            rect,
            shapes: Vec::new(),
        }
    }
}

impl Canvas for EguiCanvas<'_> {
    fn clear(&mut self) {
        self.shapes.clear();
    }

    fn stroke(&mut self, segment: &Segment) {
        let color = match segment.color {
            StrokeColor::Wood => WOOD,
            StrokeColor::Foliage => FOLIAGE,
        };
        let width = segment.width * self.camera.zoom;
        let a = self.camera.world_to_screen(segment.from, self.rect);
        let b = self.camera.world_to_screen(segment.to, self.rect);

        self.shapes
            .push(egui::Shape::line_segment([a, b], egui::Stroke::new(width, color)));

        // egui strokes have butt ends; round caps are drawn as end discs.
        if segment.cap == LineCap::Round {
            self.shapes.push(egui::Shape::circle_filled(a, width * 0.5, color));
            self.shapes.push(egui::Shape::circle_filled(b, width * 0.5, color));
        }
    }
}

/// Main application state for the interactive viewer.
///
/// The only action that changes the tree is [`Viewer::regenerate`]: it reads
/// the form, builds a complete new tree and only then replaces the old one,
/// so a frame never shows a half-built tree.
///
/// ### Fields
/// - `params` - Last successfully applied parameters.
/// - `form` - Editable text of the parameter fields.
/// - `seed` - Seed of the current tree.
/// - `tree` - Current tree, drawn every frame.
/// - `stats` - Counts of `tree`, shown in the status bar.
/// - `errors` - Fields rejected by the last regeneration.
/// - `camera` - Pan and zoom of the drawing area.
pub struct Viewer {
    params: Params,
    form: ParamForm,
    seed: u64,

    tree: PalmTree,
    stats: TreeStats,
    errors: Vec<ParamError>,

    camera: Camera,
}

impl Viewer {
    /// Creates a viewer showing the tree for `params` and `seed`.
    pub fn new(params: Params, seed: u64) -> Self {
        let mut viewer = Self {
            params,
            form: ParamForm::from_params(&params),
            seed,
            tree: PalmTree::new(),
            stats: TreeStats::default(),
            errors: Vec::new(),
            camera: Camera::default(),
        };
        viewer.regenerate();
        viewer
    }

    /// Re-reads the form and replaces the tree with a freshly generated one.
    ///
    /// Fields that fail to parse keep their previous value; the form is
    /// rewritten afterwards so it shows what was actually used.
    fn regenerate(&mut self) {
        let mut params = self.params;
        self.errors = self.form.apply(&mut params);
        self.params = params;
        self.form = ParamForm::from_params(&params);

        let tree = generate(&self.params, &mut RngSource::seeded(self.seed));
        self.stats = TreeStats::of(&tree);
        self.tree = tree;

        log::info!(
            "seed {}: {} segments ({} leaves)",
            self.seed,
            self.stats.total(),
            self.stats.leaves
        );
    }

    fn new_seed(&mut self) {
        self.seed = rand::random();
        self.regenerate();
    }

    /// Puts the default parameters back into the form; takes effect on the
    /// next regeneration.
    fn reset_form(&mut self) {
        self.form = ParamForm::from_params(&Params::default());
    }

    fn labeled_text(ui: &mut egui::Ui, label: &str, value: &mut String) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::TextEdit::singleline(value).desired_width(70.0));
        });
    }

    /// Builds the top panel (regenerate, seed, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("⟳ Regenerate").clicked() {
                    self.regenerate();
                }

                if ui.button("New seed").clicked() {
                    self.new_seed();
                }

                ui.add(egui::DragValue::new(&mut self.seed).prefix("seed = "));

                ui.separator();
                ui.add(egui::Slider::new(&mut self.camera.zoom, 0.1..=10.0).text("Zoom"));

                if ui.button("Reset view").clicked() {
                    self.camera = Camera::default();
                }
            });
        });
    }

    /// Builds the bottom status bar (segment counts, input errors).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for err in &self.errors {
                    ui.colored_label(egui::Color32::LIGHT_RED, err.to_string());
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("leaves = {}", self.stats.leaves));
                    ui.label(format!("branches = {}", self.stats.branches));
                    ui.label(format!("segments = {}", self.stats.total()));
                    if let Some(level) = self.stats.max_level {
                        ui.label(format!("max level = {level}"));
                    }
                });
            });
        });
    }

    /// Builds the right-hand parameter form.
    fn ui_param_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("param_panel")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.heading("Parameters");

                ui.separator();
                ui.label("Structure");
                Self::labeled_text(ui, "depth:", &mut self.form.max_depth);
                Self::labeled_text(ui, "branches per node:", &mut self.form.branches_per_node);
                Self::labeled_text(
                    ui,
                    "density increase:",
                    &mut self.form.branch_density_increase,
                );
                Self::labeled_text(ui, "probability:", &mut self.form.branch_probability);

                ui.separator();
                ui.label("Geometry");
                Self::labeled_text(ui, "angle:", &mut self.form.base_angle);
                Self::labeled_text(ui, "trunk length:", &mut self.form.trunk_length);
                Self::labeled_text(
                    ui,
                    "length reduction:",
                    &mut self.form.length_reduction_factor,
                );
                Self::labeled_text(
                    ui,
                    "branching point:",
                    &mut self.form.branching_point_threshold,
                );

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Apply").clicked() {
                        self.regenerate();
                    }
                    if ui.button("Reset form").clicked() {
                        self.reset_form();
                    }
                });
            });
    }

    /// Builds the central panel where the tree is drawn.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            if response.dragged() {
                self.camera.pan += response.drag_delta();
            }

            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer = response.hover_pos().unwrap_or(rect.center());
                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.camera.zoom_at(pointer, factor, rect);
            }

            let mut canvas = EguiCanvas::new(&self.camera, rect);
            render(&self.tree, &mut canvas);
            painter.extend(canvas.shapes);
        });
    }
}

impl App for Viewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_param_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
