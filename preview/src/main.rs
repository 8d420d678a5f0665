//! Desktop preview for myrtio-pixel-driver effects
//!
//! Runs the hardware-free `PixelPreview` at the driver tick rate and paints
//! the strip in a window with interactive controls.

use std::time::Instant as StdInstant;

use eframe::egui::{self};
use myrtio_pixel_driver::{PixelColor, PixelFormat, PixelPreview, config::DEFAULT_UPDATE_RATE_HZ};

/// Longest strip the preview simulates
const MAX_LEDS: u16 = 300;

const DEFAULT_LED_COUNT: u16 = 60;

/// Size of each LED rectangle in pixels
const LED_SIZE: f32 = 12.0;

/// Gap between LEDs
const LED_GAP: f32 = 2.0;

/// Ticks computed per repaint at most; a stalled window skips the rest
const MAX_CATCH_UP_TICKS: u32 = 10;

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 600.0])
            .with_title("Pixel Driver Preview"),
        ..Default::default()
    };

    eframe::run_native(
        "myrtio-pixel-preview",
        options,
        Box::new(|_cc| Ok(Box::new(PreviewApp::new()))),
    )
}

struct PreviewApp {
    preview: PixelPreview,
    effects: Vec<String>,
    effect: String,
    /// Tick fraction carried between repaints
    pending_ticks: f64,
    last_frame: StdInstant,
    playing: bool,
    /// Time scale multiplier (1.0 = realtime)
    time_scale: f32,
    color: [u8; 3],
    brightness: u8,
    speed: u8,
    seed: u32,
    rgbw: bool,
    led_size: f32,
    led_count: u16,
}

impl PreviewApp {
    fn new() -> Self {
        let preview = PixelPreview::new(DEFAULT_LED_COUNT, PixelFormat::Rgb, DEFAULT_UPDATE_RATE_HZ);
        let effects = preview.effect_names();
        let mut app = Self {
            preview,
            effects,
            effect: String::from("RAINBOW"),
            pending_ticks: 0.0,
            last_frame: StdInstant::now(),
            playing: true,
            time_scale: 1.0,
            color: [255, 180, 100],
            brightness: 255,
            speed: 5,
            seed: 12345,
            rgbw: false,
            led_size: LED_SIZE,
            led_count: DEFAULT_LED_COUNT,
        };
        app.rebuild();
        app
    }

    /// Recreate the simulation after a strip shape change, keeping the controls
    fn rebuild(&mut self) {
        let format = if self.rgbw {
            PixelFormat::Rgbw
        } else {
            PixelFormat::Rgb
        };
        self.preview = PixelPreview::new(self.led_count, format, DEFAULT_UPDATE_RATE_HZ);
        self.preview.set_effect(&self.effect);
        self.preview.set_random_seed(self.seed);
        self.apply_controls();
    }

    fn apply_controls(&mut self) {
        let [r, g, b] = self.color;
        self.preview.set_color(PixelColor::rgb(r, g, b));
        self.preview.set_brightness(self.brightness);
        self.preview.set_speed(self.speed);
    }

    fn restart(&mut self) {
        self.preview.reset();
        self.preview.set_random_seed(self.seed);
        self.pending_ticks = 0.0;
        self.last_frame = StdInstant::now();
    }

    /// Run as many ticks as the elapsed wall time covers
    fn advance(&mut self) {
        let now = StdInstant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;
        if !self.playing {
            return;
        }

        self.pending_ticks += delta.as_secs_f64()
            * f64::from(self.time_scale)
            * f64::from(DEFAULT_UPDATE_RATE_HZ);
        let mut ran = 0;
        while self.pending_ticks >= 1.0 && ran < MAX_CATCH_UP_TICKS {
            self.preview.tick();
            self.pending_ticks -= 1.0;
            ran += 1;
        }
        if ran == MAX_CATCH_UP_TICKS {
            self.pending_ticks = 0.0;
        }
    }
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.advance();
        ctx.request_repaint();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        if ui.button("⏮ Reset").clicked() {
                            self.restart();
                        }
                        let label = if self.playing { "⏸ Pause" } else { "▶ Play" };
                        if ui.button(label).clicked() {
                            self.playing = !self.playing;
                        }
                    });

                    ui.add_space(4.0);
                    ui.label(format!("Tick: {}", self.preview.tick_count()));

                    ui.add_space(4.0);
                    ui.horizontal(|ui| {
                        ui.label("Time scale:");
                        ui.add(egui::Slider::new(&mut self.time_scale, 0.1..=5.0).logarithmic(true));
                    });
                });

                ui.add_space(16.0);

                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        ui.label("Size:");
                        ui.add(egui::Slider::new(&mut self.led_size, 4.0..=32.0));
                    });

                    ui.add_space(4.0);
                    ui.horizontal(|ui| {
                        ui.label("LEDs:");
                        let old_count = self.led_count;
                        ui.add(egui::Slider::new(&mut self.led_count, 1..=MAX_LEDS));
                        let old_rgbw = self.rgbw;
                        ui.checkbox(&mut self.rgbw, "RGBW");
                        if self.led_count != old_count || self.rgbw != old_rgbw {
                            self.rebuild();
                        }
                    });
                });
            });

            ui.add_space(16.0);

            ui.horizontal(|ui| {
                ui.label("Effect:");
                let mut selected = self.effect.clone();
                egui::ComboBox::from_id_salt("effect_selector")
                    .selected_text(self.effect.as_str())
                    .show_ui(ui, |ui| {
                        for name in &self.effects {
                            ui.selectable_value(&mut selected, name.clone(), name.as_str());
                        }
                    });
                if selected != self.effect {
                    self.preview.set_effect(&selected);
                    self.effect = selected;
                }
            });

            ui.add_space(4.0);
            ui.horizontal(|ui| {
                let mut changed = false;
                ui.label("Color:");
                changed |= ui.color_edit_button_srgb(&mut self.color).changed();
                ui.label("Brightness:");
                changed |= ui
                    .add(egui::DragValue::new(&mut self.brightness).range(0u8..=255u8))
                    .changed();
                ui.label("Speed:");
                changed |= ui.add(egui::Slider::new(&mut self.speed, 1..=10)).changed();
                if changed {
                    self.apply_controls();
                }

                ui.add_space(8.0);
                ui.label("Seed:");
                if ui.add(egui::DragValue::new(&mut self.seed)).changed() {
                    self.preview.set_random_seed(self.seed);
                }
            });

            ui.add_space(16.0);

            let available_width = ui.available_width();
            let led_pitch = self.led_size + LED_GAP;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let leds_per_row = (available_width / led_pitch).floor().max(1.0) as usize;
            let rows = self.preview.led_count().div_ceil(leds_per_row);
            #[allow(clippy::cast_precision_loss)]
            let height = rows as f32 * led_pitch;

            let (response, painter) =
                ui.allocate_painter(egui::vec2(available_width, height), egui::Sense::hover());
            let origin = response.rect.min;

            #[allow(clippy::cast_precision_loss)]
            for (i, rgba) in self.preview.frame_rgba().chunks_exact(4).enumerate() {
                let x = origin.x + (i % leds_per_row) as f32 * led_pitch;
                let y = origin.y + (i / leds_per_row) as f32 * led_pitch;
                let rect = egui::Rect::from_min_size(
                    egui::pos2(x, y),
                    egui::vec2(self.led_size, self.led_size),
                );
                // white channel drawn as an additive tint
                let w = if self.rgbw { rgba[3] } else { 0 };
                let color = egui::Color32::from_rgb(
                    rgba[0].saturating_add(w),
                    rgba[1].saturating_add(w),
                    rgba[2].saturating_add(w),
                );
                painter.rect_filled(rect, 3.0, color);
            }
        });
    }
}
