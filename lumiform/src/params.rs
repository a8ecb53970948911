//! Live performance parameters shared across all processes.
//!
//! Parameters arrive as field-wise updates from an external control surface
//! and are hot-applied between frames; numeric values clamp into their
//! ranges instead of being rejected.

use serde::{Deserialize, Serialize};

/// Which rendering path the installation currently runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayingMode {
    #[default]
    Off,
    Rehearsal,
    Performance,
}

/// The shared parameter set with its performance defaults.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SharedParams {
    pub playing_mode: PlayingMode,
    pub rehearsal_light_intensity: f64,
    pub rehearsal_form_intensity: f64,
    pub direct_intensity: f64,
    pub stray_intensity: f64,
    pub form_ratio: f64,
    pub screen_distance: f64,
    pub light_fade_time: f64,
    pub show_frame: bool,
}

impl Default for SharedParams {
    fn default() -> Self {
        Self {
            playing_mode: PlayingMode::Off,
            rehearsal_light_intensity: 0.2,
            rehearsal_form_intensity: 0.1,
            direct_intensity: 0.2,
            stray_intensity: 0.1,
            form_ratio: 0.1,
            screen_distance: 0.2,
            light_fade_time: 2.0,
            show_frame: false,
        }
    }
}

/// A single hot-reloadable parameter change.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "param", content = "value", rename_all = "camelCase")]
pub enum ParamUpdate {
    PlayingMode(PlayingMode),
    RehearsalLightIntensity(f64),
    RehearsalFormIntensity(f64),
    DirectIntensity(f64),
    StrayIntensity(f64),
    FormRatio(f64),
    ScreenDistance(f64),
    LightFadeTime(f64),
    ShowFrame(bool),
}

impl SharedParams {
    /// Applies one update, clamping numeric values into their ranges.
    pub fn apply(&mut self, update: ParamUpdate) {
        match update {
            ParamUpdate::PlayingMode(mode) => self.playing_mode = mode,
            ParamUpdate::RehearsalLightIntensity(v) => {
                self.rehearsal_light_intensity = v.clamp(0.0, 0.5)
            }
            ParamUpdate::RehearsalFormIntensity(v) => {
                self.rehearsal_form_intensity = v.clamp(0.0, 0.5)
            }
            ParamUpdate::DirectIntensity(v) => self.direct_intensity = v.clamp(0.0, 0.5),
            ParamUpdate::StrayIntensity(v) => self.stray_intensity = v.clamp(0.0, 0.25),
            ParamUpdate::FormRatio(v) => self.form_ratio = v.clamp(0.0, 0.5),
            ParamUpdate::ScreenDistance(v) => self.screen_distance = v.clamp(0.0, 0.5),
            ParamUpdate::LightFadeTime(v) => self.light_fade_time = v.clamp(0.0, 5.0),
            ParamUpdate::ShowFrame(v) => self.show_frame = v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_performance_setup() {
        let params = SharedParams::default();
        assert_eq!(params.playing_mode, PlayingMode::Off);
        assert_eq!(params.light_fade_time, 2.0);
        assert_eq!(params.form_ratio, 0.1);
        assert!(!params.show_frame);
    }

    #[test]
    fn numeric_updates_clamp_into_range() {
        let mut params = SharedParams::default();

        params.apply(ParamUpdate::DirectIntensity(2.0));
        assert_eq!(params.direct_intensity, 0.5);

        params.apply(ParamUpdate::StrayIntensity(-1.0));
        assert_eq!(params.stray_intensity, 0.0);

        params.apply(ParamUpdate::LightFadeTime(9.0));
        assert_eq!(params.light_fade_time, 5.0);
    }

    #[test]
    fn updates_deserialize_from_control_surface_json() {
        let update: ParamUpdate =
            serde_json::from_str("{\"param\":\"playingMode\",\"value\":\"performance\"}").unwrap();
        assert_eq!(update, ParamUpdate::PlayingMode(PlayingMode::Performance));

        let update: ParamUpdate =
            serde_json::from_str("{\"param\":\"screenDistance\",\"value\":0.3}").unwrap();
        assert_eq!(update, ParamUpdate::ScreenDistance(0.3));
    }

    #[test]
    fn params_snapshot_round_trips() {
        let mut params = SharedParams::default();
        params.apply(ParamUpdate::PlayingMode(PlayingMode::Rehearsal));
        params.apply(ParamUpdate::FormRatio(0.25));

        let json = serde_json::to_string(&params).unwrap();
        assert!(json.contains("\"playingMode\":\"rehearsal\""));

        let back: SharedParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }
}
