//! Headless end-to-end run: two controllers drive a display over an
//! in-process channel and a few frames are composited into the recording
//! canvas.

use anyhow::Result;
use crossbeam_channel::unbounded;
use lumiform::{
    ControllerId, Display, FormController, FormShape, LightController, ParamUpdate, PlayingMode,
    RecordingCanvas, Renderable, TouchSurface,
};
use winit::event::TouchPhase;

fn main() -> Result<()> {
    env_logger::init();

    let (outbox, inbox) = unbounded();

    let mut display = Display::new(1920.0, 1080.0);
    display.apply_param(ParamUpdate::PlayingMode(PlayingMode::Performance));
    display.apply_param(ParamUpdate::ShowFrame(true));

    let mut light = LightController::new(ControllerId(1), "#ff4000".parse()?, outbox.clone());
    light.resize(390.0, 740.0);

    let mut form = FormController::new(ControllerId(2), FormShape::Triangle, outbox);
    form.resize(390.0, 740.0);
    form.set_playing_mode(PlayingMode::Performance);

    let surface = TouchSurface::new(390.0, 740.0);

    // the light player touches down and sweeps across the square
    light.handle_touch(surface.event(10, TouchPhase::Started, 160.0, 360.0));
    // the form player pulls both shutters open with two fingers
    form.handle_touch(surface.event(20, TouchPhase::Started, 80.0, 360.0));
    form.handle_touch(surface.event(21, TouchPhase::Started, 320.0, 360.0));

    let mut canvas = RecordingCanvas::new();
    let dt = 1.0 / 60.0;

    for frame in 0..120 {
        if frame == 30 {
            light.handle_touch(surface.event(10, TouchPhase::Moved, 240.0, 300.0));
            form.handle_touch(surface.event(20, TouchPhase::Moved, 60.0, 360.0));
            form.handle_touch(surface.event(21, TouchPhase::Moved, 340.0, 360.0));
        }

        if frame == 90 {
            form.handle_touch(surface.event(20, TouchPhase::Ended, 60.0, 360.0));
            light.handle_touch(surface.event(10, TouchPhase::Ended, 240.0, 300.0));
        }

        for message in inbox.try_iter() {
            display.apply(&message);
        }

        light.update(dt);
        form.update(dt);
        display.update(dt);

        canvas.clear();
        display.render(&mut canvas);

        if frame % 30 == 0 {
            let intensity = display
                .light(ControllerId(1))
                .map(|l| l.intensity)
                .unwrap_or(0.0);
            log::info!(
                "frame {frame:3}: {} lights, {} forms, intensity {intensity:.2}, {} draw ops",
                display.light_count(),
                display.form_count(),
                canvas.ops().len()
            );
        }
    }

    println!(
        "final frame recorded {} draw ops; form gesture mode is {:?}",
        canvas.ops().len(),
        form.gesture().mode()
    );

    Ok(())
}
