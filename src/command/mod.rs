//! Argument compiler
//!
//! Turns a device id and a normalized [`DeviceSettings`] record into the
//! ordered argument vector handed to the process spawner. The output reads as
//! a diff against the defaults: a field is only rendered when it differs from
//! its default and the current mode allows it.
//!
//! Emission order is fixed and section by section: video, video source,
//! audio, display, window, behavior, recording, input, V4L2, playback,
//! virtual display, network.

pub mod display;

use tracing::debug;

use crate::config::{CameraFacing, DeviceSettings, GamepadMode, KeyboardMode, MouseMode, VideoSource};
use crate::constants::{defaults, tool};

pub use display::format;

/// Argument vector under construction
struct Args(Vec<String>);

impl Args {
    fn flag(&mut self, flag: &str) {
        self.0.push(flag.to_string());
    }

    /// `flag value` as two arguments
    fn pair(&mut self, flag: &str, value: impl ToString) {
        self.0.push(flag.to_string());
        self.0.push(value.to_string());
    }

    /// `flag=value` as a single argument
    fn assign(&mut self, flag: &str, value: impl std::fmt::Display) {
        self.0.push(format!("{flag}={value}"));
    }
}

/// Lowercased extension of the last path component, if any
fn file_extension(path: &str) -> Option<String> {
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Whether the recording container has to be forced because the output
/// path's extension does not already select it
pub fn needs_record_format(settings: &DeviceSettings) -> bool {
    file_extension(&settings.record_file).as_deref() != Some(settings.record_format.as_str())
}

/// Device control is unavailable with a camera source or when disabled
pub fn control_available(settings: &DeviceSettings) -> bool {
    !settings.no_control && settings.video_source != VideoSource::Camera
}

/// Compile `settings` into the argument vector for `device_id`.
///
/// The vector always starts with the device selector and id. OTG mode yields
/// exactly those plus the OTG flag.
pub fn compile(device_id: &str, settings: &DeviceSettings) -> Vec<String> {
    let mut args = Args(Vec::with_capacity(16));
    args.pair(tool::SERIAL_FLAG, device_id);

    if settings.otg_mode {
        args.flag(tool::OTG_FLAG);
        debug!(device = %device_id, "Compiled OTG argument vector");
        return args.0;
    }

    let camera = settings.video_source == VideoSource::Camera;
    let control = control_available(settings);

    // Video
    if settings.no_video {
        args.flag("--no-video");
    } else {
        if settings.bitrate > 0 && settings.bitrate != defaults::VIDEO_BIT_RATE {
            args.pair("-b", settings.bitrate);
        }
        if settings.max_size > 0 {
            args.pair("--max-size", settings.max_size);
        }
        if settings.max_fps > 0 {
            args.pair("--max-fps", settings.max_fps);
        }
        if !settings.video_codec.is_empty() && settings.video_codec != defaults::VIDEO_CODEC {
            args.pair("--video-codec", &settings.video_codec);
        }
        if !settings.video_encoder.is_empty() {
            args.pair("--video-encoder", &settings.video_encoder);
        }
        if settings.video_buffer > 0 {
            args.pair("--video-buffer", settings.video_buffer);
        }
    }

    // Video source
    if camera {
        args.assign("--video-source", VideoSource::Camera);
        // The tool rejects a facing together with an explicit camera id
        if settings.camera_facing != CameraFacing::default() && settings.camera_id.is_empty() {
            args.assign("--camera-facing", settings.camera_facing);
        }
        if !settings.camera_size.is_empty() {
            args.assign("--camera-size", &settings.camera_size);
        }
        if !settings.camera_id.is_empty() {
            args.assign("--camera-id", &settings.camera_id);
        }
    }

    // Audio
    if settings.no_audio || !settings.audio_forwarding {
        args.flag("--no-audio");
    } else {
        if settings.audio_bitrate > 0 && settings.audio_bitrate != defaults::AUDIO_BIT_RATE {
            args.pair("--audio-bit-rate", settings.audio_bitrate);
        }
        if !settings.audio_codec.is_empty() && settings.audio_codec != defaults::AUDIO_CODEC {
            args.pair("--audio-codec", &settings.audio_codec);
        }
        if settings.microphone_forwarding {
            args.assign("--audio-source", "mic");
        }
    }

    // Display. Camera and virtual display both own display addressing.
    if settings.display_id > 0 && !camera && !settings.virtual_display {
        args.pair("--display-id", settings.display_id);
    }
    if settings.rotation > 0 && !camera {
        args.pair("--orientation", settings.rotation);
    }
    if !settings.crop.is_empty() && !camera && !settings.virtual_display {
        args.pair("--crop", &settings.crop);
    }
    if settings.lock_video_orientation >= 0 {
        args.pair("--lock-video-orientation", settings.lock_video_orientation);
    }
    if settings.display_buffer > 0 {
        args.pair("--display-buffer", settings.display_buffer);
    }

    // Window
    if settings.window_x != 0 {
        args.pair("--window-x", settings.window_x);
    }
    if settings.window_y != 0 {
        args.pair("--window-y", settings.window_y);
    }
    if settings.window_width > 0 {
        args.pair("--window-width", settings.window_width);
    }
    if settings.window_height > 0 {
        args.pair("--window-height", settings.window_height);
    }
    if settings.always_on_top {
        args.flag("--always-on-top");
    }
    if settings.window_borderless {
        args.flag("--window-borderless");
    }
    if settings.fullscreen {
        args.flag("--fullscreen");
    }
    if !settings.window_title.is_empty() {
        args.pair("--window-title", &settings.window_title);
    }

    // Behavior. Only --no-power-on works without control.
    if settings.no_control {
        args.flag("--no-control");
    }
    if control {
        if settings.turn_screen_off {
            args.flag("--turn-screen-off");
        }
        if settings.stay_awake {
            args.flag("--stay-awake");
        }
        if settings.show_touches {
            args.flag("--show-touches");
        }
        if settings.power_off_on_close {
            args.flag("--power-off-on-close");
        }
    }
    if settings.no_power_on {
        args.flag("--no-power-on");
    }

    // Recording
    if settings.recording_enabled && !settings.record_file.is_empty() {
        args.pair("--record", &settings.record_file);
        if needs_record_format(settings) {
            args.pair("--record-format", settings.record_format);
        }
    }

    // Input
    if settings.keyboard_mode != KeyboardMode::Default {
        args.assign("--keyboard", settings.keyboard_mode);
    }
    if settings.mouse_mode != MouseMode::Default {
        args.assign("--mouse", settings.mouse_mode);
    }
    if settings.gamepad_mode != GamepadMode::Disabled {
        args.assign("--gamepad", settings.gamepad_mode);
    }

    // V4L2
    if !settings.v4l2_sink.is_empty() {
        args.assign("--v4l2-sink", &settings.v4l2_sink);
        if settings.v4l2_buffer > 0 {
            args.pair("--v4l2-buffer", settings.v4l2_buffer);
        }
    }

    if settings.no_playback {
        args.flag("--no-playback");
    }

    // Virtual display: resolution and DPI only ride along with the parent flag
    if settings.virtual_display {
        let mut new_display = String::from("--new-display");
        if !settings.virtual_display_resolution.is_empty() {
            new_display.push('=');
            new_display.push_str(&settings.virtual_display_resolution);
            if settings.virtual_display_dpi > 0 {
                new_display.push('/');
                new_display.push_str(&settings.virtual_display_dpi.to_string());
            }
        }
        args.flag(&new_display);
        if control && !settings.start_app.is_empty() {
            args.assign("--start-app", &settings.start_app);
        }
    }

    // Network
    if settings.no_cleanup {
        args.flag("--no-cleanup");
    }
    if settings.force_adb_forward {
        args.flag("--force-adb-forward");
    }
    if settings.time_limit > 0 {
        args.pair("--time-limit", settings.time_limit);
    }

    debug!(device = %device_id, args = args.0.len(), "Compiled argument vector");
    args.0
}
