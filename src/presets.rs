//! Built-in presets: named frame-range sets for common tricks.

use crate::config::{PersistedSettings, SessionInput, TrackInput, DEFAULT_NOTE_COLOR};

/// A named set of tracks, one frame string and one color per track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    pub frames: &'static [&'static str],
    pub colors: &'static [&'static str],
}

const SINGLE_COLOR: &[&str] = &["#00ff00"];

static PRESETS: &[Preset] = &[
    Preset {
        name: "kg/gg (2 RC)",
        frames: &["2291-2300, 2678-2683, 2971-2976, 4000-4029"],
        colors: SINGLE_COLOR,
    },
    Preset {
        name: "kg/gg (3 RC)",
        frames: &["2291-2300, 2678-2683, 2971-2976, 3753-3760"],
        colors: SINGLE_COLOR,
    },
    Preset {
        name: "kg/gg (4 RC)",
        frames: &["998-1001, 1651-1654, 2098-2101, 2470-2473, 2747-2750"],
        colors: SINGLE_COLOR,
    },
    Preset {
        name: "kg/gg (4 RC, mill)",
        frames: &["993-996, 1645-1648, 2092-2095, 2464-2467, 2742-2745"],
        colors: SINGLE_COLOR,
    },
    Preset {
        name: "nimbus (mill)",
        frames: &["2845-2849"],
        colors: SINGLE_COLOR,
    },
    Preset {
        name: "testerino",
        frames: &["30-40, 100-120", "50-100", "60-75, 110-140"],
        colors: &["#ff0000", "#00ff00", "#0000ff"],
    },
];

impl Preset {
    pub fn num_tracks(&self) -> usize {
        self.frames.len()
    }

    /// Session input for this preset, with shared fields taken from `settings`.
    pub fn to_input(&self, settings: &PersistedSettings) -> SessionInput {
        let tracks = self
            .frames
            .iter()
            .enumerate()
            .map(|(i, frames)| {
                let color = self.colors.get(i).copied().unwrap_or(DEFAULT_NOTE_COLOR);
                TrackInput::new(*frames).with_color(color)
            })
            .collect();

        let mut input = SessionInput {
            tracks,
            ..SessionInput::default()
        };
        input.apply_settings(settings);
        input
    }
}

/// Get all built-in presets
pub fn all_presets() -> &'static [Preset] {
    PRESETS
}

/// Get a preset by name
pub fn find_preset(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|preset| preset.name == name)
}

/// List all preset names
pub fn preset_names() -> Vec<&'static str> {
    PRESETS.iter().map(|preset| preset.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_session_config;

    #[test]
    fn test_every_preset_builds() {
        for preset in all_presets() {
            let input = preset.to_input(&PersistedSettings::default());
            let config = build_session_config(&input);
            assert!(config.is_ok(), "preset '{}' should parse", preset.name);
            assert_eq!(config.unwrap().num_tracks, preset.num_tracks());
        }
    }

    #[test]
    fn test_find_preset() {
        let preset = find_preset("testerino").unwrap();
        assert_eq!(preset.num_tracks(), 3);
        assert!(find_preset("no such preset").is_none());
        assert_eq!(preset_names().len(), all_presets().len());
    }

    #[test]
    fn test_missing_colors_default() {
        let preset = Preset {
            name: "two tracks, one color",
            frames: &["1-2", "3-4"],
            colors: &["#ff0000"],
        };
        let input = preset.to_input(&PersistedSettings::default());
        assert_eq!(input.tracks[0].color, "#ff0000");
        assert_eq!(input.tracks[1].color, DEFAULT_NOTE_COLOR);
    }

    #[test]
    fn test_to_input_applies_settings() {
        let settings = PersistedSettings {
            offset: 0.5,
            scroll_speed: 250.0,
            gutter: true,
            ..PersistedSettings::default()
        };
        let input = find_preset("nimbus (mill)").unwrap().to_input(&settings);
        assert_eq!(input.offset_frames, 30.0);
        assert_eq!(input.scroll_speed, 250.0);
        assert!(input.gutter);
    }
}
