//! Option map derived from a settings record

use serde_json::Value;

use super::CommandConfiguration;
use crate::command;
use crate::config::{CameraFacing, DeviceSettings, GamepadMode, KeyboardMode, MouseMode, VideoSource};

fn flag(config: &mut CommandConfiguration, option: &str, enabled: bool) {
    if enabled {
        config.set(option, true);
    }
}

impl CommandConfiguration {
    /// Options the settings record would put on the command line.
    ///
    /// Only fields that differ from their defaults are included. Mode
    /// suppression is not applied, so a camera source combined with a display
    /// id still reaches the conflict rules.
    pub fn from_settings(settings: &DeviceSettings) -> Self {
        let defaults = DeviceSettings::default();
        let mut config = CommandConfiguration::new();

        flag(&mut config, "otg", settings.otg_mode);
        if let Some(endpoint) = settings.wireless_serial() {
            config.set("tcpip", endpoint);
        }

        // Video
        flag(&mut config, "no-video", settings.no_video);
        if settings.bitrate > 0 && settings.bitrate != defaults.bitrate {
            config.set("video-bit-rate", settings.bitrate);
        }
        if settings.max_size > 0 {
            config.set("max-size", settings.max_size);
        }
        if settings.max_fps > 0 {
            config.set("max-fps", settings.max_fps);
        }
        if !settings.video_codec.is_empty() && settings.video_codec != defaults.video_codec {
            config.set("video-codec", settings.video_codec.as_str());
        }
        if !settings.video_encoder.is_empty() {
            config.set("video-encoder", settings.video_encoder.as_str());
        }
        if settings.video_buffer > 0 {
            config.set("video-buffer", settings.video_buffer);
        }
        flag(&mut config, "no-playback", settings.no_playback);

        if settings.video_source == VideoSource::Camera {
            config.set("video-source", settings.video_source.as_str());
            if settings.camera_facing != CameraFacing::default() && settings.camera_id.is_empty() {
                config.set("camera-facing", settings.camera_facing.as_str());
            }
            if !settings.camera_size.is_empty() {
                config.set("camera-size", settings.camera_size.as_str());
            }
            if !settings.camera_id.is_empty() {
                config.set("camera-id", settings.camera_id.as_str());
            }
        }

        // Audio
        if settings.no_audio || !settings.audio_forwarding {
            config.set("no-audio", true);
        } else {
            if settings.audio_bitrate > 0 && settings.audio_bitrate != defaults.audio_bitrate {
                config.set("audio-bit-rate", settings.audio_bitrate);
            }
            if !settings.audio_codec.is_empty() && settings.audio_codec != defaults.audio_codec {
                config.set("audio-codec", settings.audio_codec.as_str());
            }
            if settings.microphone_forwarding {
                config.set("audio-source", "mic");
            }
        }

        // Display
        if settings.display_id > 0 {
            config.set("display-id", settings.display_id);
        }
        if settings.rotation > 0 {
            config.set("orientation", settings.rotation);
        }
        if !settings.crop.is_empty() {
            config.set("crop", settings.crop.as_str());
        }
        if settings.lock_video_orientation >= 0 {
            config.set("lock-video-orientation", settings.lock_video_orientation);
        }
        if settings.display_buffer > 0 {
            config.set("display-buffer", settings.display_buffer);
        }

        // Window
        if settings.window_x != 0 {
            config.set("window-x", settings.window_x);
        }
        if settings.window_y != 0 {
            config.set("window-y", settings.window_y);
        }
        if settings.window_width > 0 {
            config.set("window-width", settings.window_width);
        }
        if settings.window_height > 0 {
            config.set("window-height", settings.window_height);
        }
        flag(&mut config, "always-on-top", settings.always_on_top);
        flag(&mut config, "window-borderless", settings.window_borderless);
        flag(&mut config, "fullscreen", settings.fullscreen);
        if !settings.window_title.is_empty() {
            config.set("window-title", settings.window_title.as_str());
        }

        // Behavior
        flag(&mut config, "no-control", settings.no_control);
        flag(&mut config, "turn-screen-off", settings.turn_screen_off);
        flag(&mut config, "stay-awake", settings.stay_awake);
        flag(&mut config, "show-touches", settings.show_touches);
        flag(&mut config, "power-off-on-close", settings.power_off_on_close);
        flag(&mut config, "no-power-on", settings.no_power_on);

        // Recording
        if settings.recording_enabled && !settings.record_file.is_empty() {
            config.set("record", settings.record_file.as_str());
            if command::needs_record_format(settings) {
                config.set("record-format", settings.record_format.as_str());
            }
        }

        // Input
        if settings.keyboard_mode != KeyboardMode::Default {
            config.set("keyboard", settings.keyboard_mode.as_str());
        }
        if settings.mouse_mode != MouseMode::Default {
            config.set("mouse", settings.mouse_mode.as_str());
        }
        if settings.gamepad_mode != GamepadMode::Disabled {
            config.set("gamepad", settings.gamepad_mode.as_str());
        }

        if !settings.v4l2_sink.is_empty() {
            config.set("v4l2-sink", settings.v4l2_sink.as_str());
            if settings.v4l2_buffer > 0 {
                config.set("v4l2-buffer", settings.v4l2_buffer);
            }
        }

        if settings.virtual_display {
            config.set("new-display", true);
            if !settings.start_app.is_empty() {
                config.set("start-app", settings.start_app.as_str());
            }
        }

        // Network
        flag(&mut config, "no-cleanup", settings.no_cleanup);
        flag(&mut config, "force-adb-forward", settings.force_adb_forward);
        if settings.time_limit > 0 {
            config.set("time-limit", settings.time_limit);
        }

        config
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn get(&self, option: &str) -> Option<&Value> {
        self.options.get(option)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CameraFacing, RecordFormat};
    use crate::validation::{self, ErrorCode};
    use serde_json::json;

    #[test]
    fn test_defaults_produce_no_options() {
        assert!(CommandConfiguration::from_settings(&DeviceSettings::default()).is_empty());
    }

    #[test]
    fn test_changed_fields_map_to_option_names() {
        let mut settings = DeviceSettings::default();
        settings.bitrate = 4_000_000;
        settings.max_fps = 60;
        settings.turn_screen_off = true;
        settings.keyboard_mode = KeyboardMode::Uhid;

        let config = CommandConfiguration::from_settings(&settings);
        assert_eq!(config.get("video-bit-rate"), Some(&json!(4_000_000)));
        assert_eq!(config.get("max-fps"), Some(&json!(60)));
        assert_eq!(config.get("turn-screen-off"), Some(&json!(true)));
        assert_eq!(config.get("keyboard"), Some(&json!("uhid")));
        assert_eq!(config.options.len(), 4);
    }

    #[test]
    fn test_audio_disabled_maps_to_no_audio() {
        let mut settings = DeviceSettings::default();
        settings.audio_forwarding = false;
        settings.audio_codec = "aac".to_string();

        let config = CommandConfiguration::from_settings(&settings);
        assert_eq!(config.get("no-audio"), Some(&json!(true)));
        assert!(config.get("audio-codec").is_none());
    }

    #[test]
    fn test_wireless_address_maps_to_tcpip() {
        let mut settings = DeviceSettings::default();
        settings.ip_address = "10.0.0.7".to_string();
        settings.port = 5556;

        let config = CommandConfiguration::from_settings(&settings);
        assert_eq!(config.get("tcpip"), Some(&json!("10.0.0.7:5556")));
    }

    #[test]
    fn test_stored_settings_validate_clean() {
        let mut settings = DeviceSettings::default();
        settings.max_size = 1920;
        settings.crop = "1080:1920:0:0".to_string();
        settings.always_on_top = true;
        settings.window_title = "Phone".to_string();
        settings.recording_enabled = true;
        settings.record_file = "/tmp/session.mkv".to_string();
        settings.record_format = RecordFormat::Mkv;

        let report = validation::validate(&CommandConfiguration::from_settings(&settings), None);
        assert!(report.is_valid, "{:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_camera_with_display_id_is_flagged() {
        let mut settings = DeviceSettings::default();
        settings.video_source = VideoSource::Camera;
        settings.camera_facing = CameraFacing::Back;
        settings.display_id = 2;

        let report = validation::validate(&CommandConfiguration::from_settings(&settings), None);
        assert!(!report.is_valid);
        assert!(report.has_code(ErrorCode::OptionConflict));
    }

    #[test]
    fn test_camera_id_record_validates_clean() {
        let mut settings = DeviceSettings::default();
        settings.video_source = VideoSource::Camera;
        settings.camera_facing = CameraFacing::Back;
        settings.camera_id = "2".to_string();

        let config = CommandConfiguration::from_settings(&settings);
        assert!(config.get("camera-facing").is_none());
        assert!(validation::validate(&config, None).is_valid);

        // Default facing is omitted like every other default
        settings.camera_id.clear();
        settings.camera_facing = CameraFacing::Front;
        assert!(CommandConfiguration::from_settings(&settings).get("camera-facing").is_none());
    }

    #[test]
    fn test_zero_bitrates_are_omitted() {
        let mut settings = DeviceSettings::default();
        settings.bitrate = 0;
        settings.audio_bitrate = 0;

        let config = CommandConfiguration::from_settings(&settings);
        assert!(config.is_empty());
        assert!(validation::validate(&config, None).is_valid);
    }
}
