//! Controller-side state: the single entity a handheld device owns, its
//! touch handling, and the outbound message fan-out.
//!
//! Controllers are the only authoritative writers of their entity; every
//! local mutation is also pushed into the outbox immediately. Sends are
//! fire-and-forget; a vanished display is not a controller failure.

use crossbeam_channel::Sender;

use crate::color::Color;
use crate::form::{Form, FormShape};
use crate::gesture::{FormBaseline, GestureInterpreter, GestureUpdate, TouchId};
use crate::input::{TouchEvent, TouchEventKind};
use crate::light::Light;
use crate::math::{Point, Viewport};
use crate::params::PlayingMode;
use crate::messages::{ControllerId, Message};
use crate::render::{Canvas, Renderable};

fn send(outbox: &Sender<Message>, message: Message) {
    if outbox.send(message).is_err() {
        log::debug!("outbox disconnected, message dropped");
    }
}

/// A controller that owns a single colored light.
pub struct LightController {
    id: ControllerId,
    light: Light,
    fade_time: f64,
    touch: Option<TouchId>,
    viewport: Viewport,
    outbox: Sender<Message>,
}

impl LightController {
    pub fn new(id: ControllerId, color: Color, outbox: Sender<Message>) -> Self {
        let light = Light::new(color, 0.0, 0.0);

        send(
            &outbox,
            Message::AddLight {
                id,
                color,
                x: light.x,
                y: light.y,
            },
        );

        Self {
            id,
            light,
            fade_time: 2.0,
            touch: None,
            viewport: Viewport::new(0.0, 0.0),
            outbox,
        }
    }

    pub fn light(&self) -> &Light {
        &self.light
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.resize(width, height);
    }

    /// Hot-reloaded `lightFadeTime` parameter.
    pub fn set_fade_time(&mut self, fade_time: f64) {
        self.fade_time = fade_time;
    }

    pub fn handle_touch(&mut self, event: TouchEvent) {
        match event.kind {
            TouchEventKind::Start => self.touch_start(event.id, event.coords),
            TouchEventKind::Move => self.touch_move(event.id, event.coords),
            TouchEventKind::End => self.touch_end(event.id, event.coords),
        }
    }

    pub fn touch_start(&mut self, id: TouchId, coords: Point) {
        if self.touch.is_none() {
            self.move_light(coords);
            self.touch = Some(id);
        }
    }

    pub fn touch_move(&mut self, id: TouchId, coords: Point) {
        if self.touch == Some(id) {
            self.move_light(coords);
        }
    }

    pub fn touch_end(&mut self, id: TouchId, _coords: Point) {
        if self.touch == Some(id) {
            self.stop_light();
            self.touch = None;
        }
    }

    fn move_light(&mut self, coords: Point) {
        let coords = coords.clamped();

        // while the light is fading out, position is frozen; a touch on a
        // fully dark light restarts the fade-in
        if self.light.active || self.light.intensity == 0.0 {
            self.light.x = coords.x;
            self.light.y = coords.y;

            if !self.light.active {
                self.light.start(self.fade_time);
            }

            send(
                &self.outbox,
                Message::MoveLight {
                    id: self.id,
                    x: coords.x,
                    y: coords.y,
                },
            );
        }
    }

    fn stop_light(&mut self) {
        self.light.stop(self.fade_time);
        send(&self.outbox, Message::StopLight { id: self.id });
    }
}

impl Renderable for LightController {
    fn update(&mut self, dt: f64) {
        self.light.update(dt);
    }

    fn render(&mut self, canvas: &mut dyn Canvas) {
        self.light
            .render_direct(canvas, &self.viewport, 1.0, 1.0, 0.707);
    }
}

/// A controller that owns a single aperture form.
pub struct FormController {
    id: ControllerId,
    form: Form,
    gesture: GestureInterpreter,
    playing_mode: PlayingMode,
    form_ratio: f64,
    viewport: Viewport,
    outbox: Sender<Message>,
}

impl FormController {
    /// Spawns the form at a random position and announces it.
    pub fn new(id: ControllerId, shape: FormShape, outbox: Sender<Message>) -> Self {
        let coords = Point::random();
        let mut form = Form::new(shape);
        form.x = coords.x;
        form.y = coords.y;
        form.shutter_incl = std::f64::consts::PI / 6.0;

        send(
            &outbox,
            Message::AddForm {
                id,
                shape,
                x: form.x,
                y: form.y,
                size: form.size,
                shutter_incl: form.shutter_incl,
                left_shutter: form.left_shutter,
                right_shutter: form.right_shutter,
            },
        );

        let gesture = GestureInterpreter::new(FormBaseline::from(&form));

        Self {
            id,
            form,
            gesture,
            playing_mode: PlayingMode::Off,
            form_ratio: 0.1,
            viewport: Viewport::new(0.0, 0.0),
            outbox,
        }
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn gesture(&self) -> &GestureInterpreter {
        &self.gesture
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.resize(width, height);
    }

    pub fn set_playing_mode(&mut self, mode: PlayingMode) {
        self.playing_mode = mode;
    }

    pub fn set_form_ratio(&mut self, ratio: f64) {
        self.form_ratio = ratio;
    }

    pub fn handle_touch(&mut self, event: TouchEvent) {
        match event.kind {
            TouchEventKind::Start => self.touch_start(event.id, event.coords),
            TouchEventKind::Move => self.touch_move(event.id, event.coords),
            TouchEventKind::End => self.touch_end(event.id, event.coords),
        }
    }

    pub fn touch_start(&mut self, id: TouchId, coords: Point) {
        if self.playing_mode == PlayingMode::Off {
            return;
        }

        let updates = self.gesture.touch_start(id, coords);
        self.apply_updates(updates);
    }

    pub fn touch_move(&mut self, id: TouchId, coords: Point) {
        let updates = self.gesture.touch_move(id, coords);
        self.apply_updates(updates);
    }

    pub fn touch_end(&mut self, id: TouchId, coords: Point) {
        let updates = self.gesture.touch_end(id, coords);
        self.apply_updates(updates);
    }

    fn apply_updates(&mut self, updates: Vec<GestureUpdate>) {
        for update in updates {
            match update {
                GestureUpdate::Position { x, y } => {
                    self.form.set_position(x, y);
                    send(&self.outbox, Message::MoveForm { id: self.id, x, y });
                }
                GestureUpdate::SizeRotation { size, rotation } => {
                    self.form.set_size_and_rotation(size, rotation);
                    send(
                        &self.outbox,
                        Message::AdjustForm {
                            id: self.id,
                            size,
                            rotation,
                        },
                    );
                }
                GestureUpdate::ShutterIncl(incl) => {
                    self.form.set_shutter_incl(incl);
                    send(&self.outbox, Message::ShutterIncl { id: self.id, incl });
                }
                GestureUpdate::LeftShutter(dist) => {
                    self.form.set_left_shutter(dist);
                    send(&self.outbox, Message::LeftShutter { id: self.id, dist });
                }
                GestureUpdate::RightShutter(dist) => {
                    self.form.set_right_shutter(dist);
                    send(&self.outbox, Message::RightShutter { id: self.id, dist });
                }
            }
        }
    }
}

impl Renderable for FormController {
    fn update(&mut self, _dt: f64) {}

    fn render(&mut self, canvas: &mut dyn Canvas) {
        match self.playing_mode {
            PlayingMode::Off => {}
            PlayingMode::Rehearsal => {
                self.form
                    .render_result(canvas, &self.viewport, self.form_ratio, Color::WHITE, 0.8);
            }
            PlayingMode::Performance => {
                self.form
                    .render_interface(canvas, &self.viewport, 1.0 / 3.0, self.gesture.mode());
            }
        }
    }
}
