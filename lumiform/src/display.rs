//! The display process: a read-mostly mirror of every remote entity,
//! rebuilt from inbound messages and composited every frame.
//!
//! The display never computes authoritative state; it applies whatever the
//! owning controllers broadcast and favors visual continuity over strict
//! correctness (unknown ids and stale values are dropped, never errors).

use std::collections::HashMap;

use crate::color::Color;
use crate::form::Form;
use crate::light::Light;
use crate::math::Viewport;
use crate::messages::{ControllerId, Message};
use crate::params::{ParamUpdate, PlayingMode, SharedParams};
use crate::render::{Canvas, Renderable};

/// Lifecycle of a mirrored light inside the display arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LightPhase {
    Active,
    /// Fading toward zero; the entry is retired once it gets there.
    FadingOut,
}

#[derive(Clone, Copy, Debug)]
struct MirroredLight {
    light: Light,
    phase: LightPhase,
}

/// The shared display: entity mirrors plus the frame compositor.
pub struct Display {
    viewport: Viewport,
    params: SharedParams,
    lights: HashMap<ControllerId, MirroredLight>,
    forms: HashMap<ControllerId, Form>,
}

impl Display {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            params: SharedParams::default(),
            lights: HashMap::new(),
            forms: HashMap::new(),
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.resize(width, height);
    }

    pub fn params(&self) -> &SharedParams {
        &self.params
    }

    pub fn apply_param(&mut self, update: ParamUpdate) {
        self.params.apply(update);
    }

    pub fn light(&self, id: ControllerId) -> Option<&Light> {
        self.lights.get(&id).map(|entry| &entry.light)
    }

    pub fn form(&self, id: ControllerId) -> Option<&Form> {
        self.forms.get(&id)
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    pub fn form_count(&self) -> usize {
        self.forms.len()
    }

    /// Applies one inbound entity message.
    pub fn apply(&mut self, message: &Message) {
        match *message {
            Message::AddLight { id, color, x, y } => {
                let mut light = Light::new(color, x, y);
                light.start(self.params.light_fade_time);
                self.lights.insert(
                    id,
                    MirroredLight {
                        light,
                        phase: LightPhase::Active,
                    },
                );
            }
            Message::MoveLight { id, x, y } => {
                if let Some(entry) = self.lights.get_mut(&id) {
                    entry.light.x = x;
                    entry.light.y = y;

                    if !entry.light.active {
                        entry.light.start(self.params.light_fade_time);
                        entry.phase = LightPhase::Active;
                    }
                } else {
                    log::debug!("move-light for unknown controller {id:?}");
                }
            }
            Message::StopLight { id } => {
                if let Some(entry) = self.lights.get_mut(&id) {
                    entry.light.stop(self.params.light_fade_time);
                    entry.phase = LightPhase::FadingOut;
                } else {
                    log::debug!("stop-light for unknown controller {id:?}");
                }
            }
            Message::RemoveLight { id } => {
                self.lights.remove(&id);
            }
            Message::AddForm {
                id,
                shape,
                x,
                y,
                size,
                shutter_incl,
                left_shutter,
                right_shutter,
            } => {
                let mut form = Form::new(shape);
                form.x = x;
                form.y = y;
                form.size = size;
                form.shutter_incl = shutter_incl;
                form.left_shutter = left_shutter;
                form.right_shutter = right_shutter;
                self.forms.insert(id, form);
            }
            Message::MoveForm { id, x, y } => {
                if let Some(form) = self.forms.get_mut(&id) {
                    form.set_position(x, y);
                }
            }
            Message::AdjustForm { id, size, rotation } => {
                if let Some(form) = self.forms.get_mut(&id) {
                    form.set_size_and_rotation(size, rotation);
                }
            }
            Message::ShutterIncl { id, incl } => {
                if let Some(form) = self.forms.get_mut(&id) {
                    form.set_shutter_incl(incl);
                }
            }
            Message::LeftShutter { id, dist } => {
                if let Some(form) = self.forms.get_mut(&id) {
                    form.set_left_shutter(dist);
                }
            }
            Message::RightShutter { id, dist } => {
                if let Some(form) = self.forms.get_mut(&id) {
                    form.set_right_shutter(dist);
                }
            }
            Message::RemoveForm { id } => {
                self.forms.remove(&id);
            }
        }
    }
}

impl Renderable for Display {
    fn update(&mut self, dt: f64) {
        for entry in self.lights.values_mut() {
            entry.light.update(dt);
        }

        self.lights.retain(|_, entry| {
            entry.phase == LightPhase::Active || entry.light.intensity > 0.0
        });
    }

    fn render(&mut self, canvas: &mut dyn Canvas) {
        let viewport = &self.viewport;
        let params = &self.params;

        match params.playing_mode {
            PlayingMode::Off => {}
            PlayingMode::Rehearsal => {
                for entry in self.lights.values() {
                    entry
                        .light
                        .render_scattered(canvas, viewport, params.rehearsal_light_intensity);
                }

                for form in self.forms.values() {
                    form.render_result(
                        canvas,
                        viewport,
                        params.form_ratio,
                        Color::WHITE,
                        params.rehearsal_form_intensity,
                    );
                }
            }
            PlayingMode::Performance => {
                for entry in self.lights.values() {
                    for form in self.forms.values() {
                        entry.light.render_opening(
                            canvas,
                            viewport,
                            form,
                            params.form_ratio,
                            params.direct_intensity,
                            params.stray_intensity,
                            params.screen_distance,
                        );
                    }
                }
            }
        }

        if params.show_frame {
            viewport.render_margins(canvas, Color::BLACK);
            viewport.render_frame(canvas, Color::WHITE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormShape;
    use crate::render::{DrawOp, RecordingCanvas};

    fn add_light(display: &mut Display, id: u32) {
        display.apply(&Message::AddLight {
            id: ControllerId(id),
            color: "#00ff00".parse().unwrap(),
            x: 0.0,
            y: 0.0,
        });
    }

    fn add_form(display: &mut Display, id: u32) {
        display.apply(&Message::AddForm {
            id: ControllerId(id),
            shape: FormShape::Circle,
            x: 0.1,
            y: 0.1,
            size: 1.0,
            shutter_incl: 0.0,
            left_shutter: 0.5,
            right_shutter: 0.5,
        });
    }

    #[test]
    fn move_form_round_trips_exactly() {
        let mut display = Display::new(1000.0, 1000.0);
        add_form(&mut display, 1);

        display.apply(&Message::MoveForm {
            id: ControllerId(1),
            x: 0.73,
            y: -0.21,
        });

        let form = display.form(ControllerId(1)).unwrap();
        assert_eq!((form.x, form.y), (0.73, -0.21));
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut display = Display::new(1000.0, 1000.0);

        display.apply(&Message::MoveLight {
            id: ControllerId(7),
            x: 0.1,
            y: 0.1,
        });
        display.apply(&Message::LeftShutter {
            id: ControllerId(7),
            dist: 1.0,
        });
        display.apply(&Message::RemoveForm { id: ControllerId(7) });

        assert_eq!(display.light_count(), 0);
        assert_eq!(display.form_count(), 0);
    }

    #[test]
    fn stopped_lights_fade_out_and_retire() {
        let mut display = Display::new(1000.0, 1000.0);
        add_light(&mut display, 1);

        // saturate the fade-in, then stop
        display.update(5.0);
        display.apply(&Message::StopLight { id: ControllerId(1) });

        display.update(1.0);
        let light = display.light(ControllerId(1)).unwrap();
        assert!(light.intensity > 0.0 && light.intensity < 1.0);

        display.update(5.0);
        assert!(display.light(ControllerId(1)).is_none());
    }

    #[test]
    fn move_light_reactivates_a_fading_light() {
        let mut display = Display::new(1000.0, 1000.0);
        add_light(&mut display, 1);
        display.update(5.0);
        display.apply(&Message::StopLight { id: ControllerId(1) });
        display.update(1.0);

        display.apply(&Message::MoveLight {
            id: ControllerId(1),
            x: 0.2,
            y: 0.3,
        });

        let light = display.light(ControllerId(1)).unwrap();
        assert!(light.active);

        let before = light.intensity;
        display.update(0.5);
        let light = display.light(ControllerId(1)).unwrap();
        assert!(light.intensity > before);
        assert_eq!((light.x, light.y), (0.2, 0.3));
    }

    #[test]
    fn remove_light_deletes_immediately() {
        let mut display = Display::new(1000.0, 1000.0);
        add_light(&mut display, 1);
        display.update(1.0);

        display.apply(&Message::RemoveLight { id: ControllerId(1) });
        assert_eq!(display.light_count(), 0);
    }

    #[test]
    fn off_mode_renders_nothing() {
        let mut display = Display::new(1000.0, 1000.0);
        add_light(&mut display, 1);
        add_form(&mut display, 2);
        display.update(1.0);

        let mut canvas = RecordingCanvas::new();
        display.render(&mut canvas);
        assert!(canvas.ops().is_empty());
    }

    #[test]
    fn performance_mode_composites_each_light_form_pair() {
        let mut display = Display::new(1000.0, 1000.0);
        display.apply_param(ParamUpdate::PlayingMode(PlayingMode::Performance));
        add_light(&mut display, 1);
        add_form(&mut display, 2);
        add_form(&mut display, 3);
        display.update(1.0);

        let mut canvas = RecordingCanvas::new();
        display.render(&mut canvas);

        // one stray gradient and one clipped core per (light, form) pair
        let gradients = canvas
            .ops()
            .iter()
            .filter(|r| matches!(r.op, DrawOp::FillGradient { .. }))
            .count();
        let clips = canvas
            .ops()
            .iter()
            .filter(|r| matches!(r.op, DrawOp::Clip))
            .count();
        assert_eq!(gradients, 2);
        assert_eq!(clips, 2);
    }

    #[test]
    fn stray_alpha_scales_with_shutter_opening() {
        let mut display = Display::new(1000.0, 1000.0);
        display.apply_param(ParamUpdate::PlayingMode(PlayingMode::Performance));
        add_light(&mut display, 1);
        add_form(&mut display, 2);
        display.update(5.0);

        let mut canvas = RecordingCanvas::new();
        display.render(&mut canvas);

        let alpha = canvas
            .ops()
            .iter()
            .find_map(|r| match r.op {
                DrawOp::Alpha(a) => Some(a),
                _ => None,
            })
            .unwrap();
        let params = SharedParams::default();
        // intensity saturated at 1, shutters 0.5 + 0.5
        let expected = params.stray_intensity * 1.0 * 0.5 * (0.5 + 0.5);
        assert!((alpha - expected).abs() < 1e-12);
    }

    #[test]
    fn show_frame_draws_margins_and_outline() {
        let mut display = Display::new(1200.0, 1000.0);
        display.apply_param(ParamUpdate::ShowFrame(true));

        let mut canvas = RecordingCanvas::new();
        display.render(&mut canvas);

        assert!(canvas
            .ops()
            .iter()
            .any(|r| matches!(r.op, DrawOp::FillRect { .. })));
        assert!(canvas
            .ops()
            .iter()
            .any(|r| matches!(r.op, DrawOp::StrokeRect { .. })));
    }
}
