//! The light entity: a colored point source with a linear fade ramp.

use crate::color::Color;
use crate::form::Form;
use crate::math::Viewport;
use crate::render::{BlendMode, Canvas};

/// A colored point light driven by a clamped linear fade.
///
/// `intensity` always stays in [0, 1]; `slope` is the signed fade rate and
/// drops to zero when the ramp saturates at either bound.
#[derive(Clone, Copy, Debug)]
pub struct Light {
    pub color: Color,
    pub x: f64,
    pub y: f64,
    pub intensity: f64,
    pub active: bool,
    pub slope: f64,
}

impl Light {
    pub fn new(color: Color, x: f64, y: f64) -> Self {
        Self {
            color,
            x,
            y,
            intensity: 0.0,
            active: false,
            slope: 0.0,
        }
    }

    /// Advances the fade by `dt` seconds of wall-clock time.
    pub fn update(&mut self, dt: f64) {
        let mut intensity = self.intensity + dt * self.slope;

        if self.active && intensity > 1.0 {
            intensity = 1.0;
            self.slope = 0.0;
        } else if !self.active && intensity < 0.0 {
            intensity = 0.0;
            self.slope = 0.0;
        }

        self.intensity = intensity;
    }

    /// Begins fading in over `fade_time` seconds, resuming from the current
    /// intensity.
    pub fn start(&mut self, fade_time: f64) {
        self.active = true;
        self.slope = 1.0 / fade_time;
    }

    /// Begins fading out over `fade_time` seconds.
    pub fn stop(&mut self, fade_time: f64) {
        self.active = false;
        self.slope = -1.0 / fade_time;
    }

    /// Renders the light's direct glow: a radial gradient from the light
    /// position toward a point `center`-interpolated between it and the
    /// viewport center.
    pub fn render_direct(
        &self,
        canvas: &mut dyn Canvas,
        viewport: &Viewport,
        direct_intensity: f64,
        center: f64,
        radius: f64,
    ) {
        if self.intensity > 0.0 {
            let square_size = viewport.size;
            let x = viewport.x(self.x);
            let y = viewport.y(self.y);

            canvas.set_blend_mode(BlendMode::SourceOver);
            canvas.set_alpha(self.intensity * direct_intensity);

            let x_center = viewport.x_center * center + x * (1.0 - center);
            let y_center = viewport.y_center * center + y * (1.0 - center);
            canvas.set_fill_radial_gradient(
                x,
                y,
                10.0,
                x_center,
                y_center,
                radius * square_size,
                self.color,
            );

            canvas.fill_rect(viewport.x_margin, viewport.y_margin, square_size, square_size);
        }
    }

    /// Renders the rehearsal-mode scattered glow around the light position.
    pub fn render_scattered(
        &self,
        canvas: &mut dyn Canvas,
        viewport: &Viewport,
        scatter_intensity: f64,
    ) {
        let square_size = viewport.size;
        let x = viewport.x(self.x);
        let y = viewport.y(self.y);

        canvas.set_blend_mode(BlendMode::Screen);
        canvas.set_alpha(scatter_intensity * self.intensity);
        canvas.set_fill_radial_gradient(
            x,
            y,
            10.0,
            viewport.x_center,
            viewport.y_center,
            0.707 * square_size,
            self.color,
        );

        canvas.fill_rect(viewport.x_margin, viewport.y_margin, square_size, square_size);
    }

    /// Renders this light as seen through `form`: the stray-light gradient
    /// around the apparent aperture position, then the shutter-clipped
    /// direct beam.
    ///
    /// The apparent position offsets the form away from the light by
    /// `screen_distance` times their separation; the stray gradient blurs
    /// toward a doubled offset. Stray alpha grows with how open the
    /// shutters are even though the sharp core is clipped independently.
    #[allow(clippy::too_many_arguments)]
    pub fn render_opening(
        &self,
        canvas: &mut dyn Canvas,
        viewport: &Viewport,
        form: &Form,
        form_ratio: f64,
        direct_intensity: f64,
        stray_intensity: f64,
        screen_distance: f64,
    ) {
        if self.intensity > 0.0 {
            let square_size = viewport.size;
            let dist_x = self.x - form.x;
            let dist_y = self.y - form.y;
            let norm_offset_x = screen_distance * dist_x;
            let norm_offset_y = screen_distance * dist_y;
            let x_form = viewport.x(form.x - norm_offset_x);
            let y_form = viewport.y(form.y - norm_offset_y);
            let x_blur = viewport.x(form.x - 2.0 * norm_offset_x);
            let y_blur = viewport.y(form.y - 2.0 * norm_offset_y);

            if stray_intensity > 0.0 {
                canvas.set_blend_mode(BlendMode::Screen);
                canvas.set_alpha(
                    stray_intensity
                        * self.intensity
                        * 0.5
                        * (form.left_shutter + form.right_shutter),
                );
                canvas.set_fill_radial_gradient(
                    x_form, y_form, 1.0, x_blur, y_blur, square_size, self.color,
                );
                canvas.fill_rect(
                    viewport.x_margin,
                    viewport.y_margin,
                    square_size,
                    square_size,
                );
            }

            if direct_intensity > 0.0 {
                form.render_occluded(
                    canvas,
                    viewport,
                    x_form,
                    y_form,
                    form_ratio,
                    self.color,
                    direct_intensity * self.intensity,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Color {
        "#ff0000".parse().unwrap()
    }

    #[test]
    fn fade_in_ramps_then_saturates() {
        let mut light = Light::new(red(), 0.0, 0.0);
        light.start(2.0);

        light.update(1.0);
        assert!((light.intensity - 0.5).abs() < 1e-12);

        light.update(1.0);
        assert_eq!(light.intensity, 1.0);
        assert_eq!(light.slope, 0.0);
    }

    #[test]
    fn fade_out_reaches_zero_and_stops() {
        let mut light = Light::new(red(), 0.0, 0.0);
        light.start(1.0);
        light.update(2.0);

        light.stop(0.5);
        light.update(0.25);
        assert!((light.intensity - 0.5).abs() < 1e-12);

        light.update(1.0);
        assert_eq!(light.intensity, 0.0);
        assert_eq!(light.slope, 0.0);
    }

    #[test]
    fn start_mid_fade_out_is_continuous() {
        let mut light = Light::new(red(), 0.0, 0.0);
        light.start(1.0);
        light.update(2.0);
        light.stop(1.0);
        light.update(0.4);

        let before = light.intensity;
        light.start(1.0);
        assert_eq!(light.intensity, before);

        light.update(0.1);
        assert!(light.intensity > before);
    }

    #[test]
    fn intensity_stays_clamped_under_random_interleavings() {
        fastrand::seed(0x1d10_7f2a);

        for _ in 0..200 {
            let mut light = Light::new(red(), 0.0, 0.0);

            for _ in 0..50 {
                match fastrand::u32(..3) {
                    0 => light.start(0.1 + fastrand::f64() * 3.0),
                    1 => light.stop(0.1 + fastrand::f64() * 3.0),
                    _ => light.update(fastrand::f64()),
                }

                assert!(
                    (0.0..=1.0).contains(&light.intensity),
                    "intensity {} escaped [0, 1]",
                    light.intensity
                );
            }
        }
    }
}
