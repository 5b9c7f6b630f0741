// Presentation state. `ViewState` is the full set of things the front-end
// shows (mode controls, enrollment field, action button, status line,
// status icon and the scanning indicator). The controller mutates it and
// hands snapshots to a `Surface`, which decides how to draw them.

use crate::mode::Mode;

/// Headline shown while the backend is capturing.
pub const INITIALIZING: &str = "Initializing Sensor...";
pub const ACCESS_GRANTED: &str = "Access Granted";
pub const ENROLLMENT_COMPLETE: &str = "Enrollment Complete";
pub const ACCESS_DENIED: &str = "Access Denied";
pub const SYSTEM_ERROR: &str = "System Error";

/// Notice shown when enrollment is attempted without a user ID.
pub const MISSING_USER_ID: &str = "Please enter a User ID";
/// Fallback for denials that carry no message.
pub const OPERATION_FAILED: &str = "Operation failed";

/// Status icon next to the headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIcon {
    Neutral,
    Success,
    Failure,
}

/// Colour role of a status icon. Surfaces map these onto their palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Muted,
    Success,
    Error,
}

impl StatusIcon {
    pub fn tone(self) -> Tone {
        match self {
            StatusIcon::Neutral => Tone::Muted,
            StatusIcon::Success => Tone::Success,
            StatusIcon::Failure => Tone::Error,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            StatusIcon::Neutral => "○",
            StatusIcon::Success => "✔",
            StatusIcon::Failure => "✖",
        }
    }
}

/// Scanning indicator (the pulse ring around the sensor icon).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pulse {
    Scanning,
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Mode control currently marked active. Exactly one is active at a time.
    pub active: Mode,
    pub enroll_input_visible: bool,
    pub action_label: &'static str,
    pub status_text: String,
    pub status_subtext: String,
    pub icon: StatusIcon,
    pub pulse: Pulse,
}

impl ViewState {
    /// Resting view for `mode`, before any action has run.
    pub fn for_mode(mode: Mode) -> Self {
        ViewState {
            active: mode,
            enroll_input_visible: mode.wants_user_id(),
            action_label: mode.action_label(),
            status_text: mode.headline().to_string(),
            status_subtext: mode.subtext().to_string(),
            icon: StatusIcon::Neutral,
            pulse: Pulse::Hidden,
        }
    }

    pub fn is_active(&self, mode: Mode) -> bool {
        self.active == mode
    }

    pub(crate) fn set_status(&mut self, text: &str) {
        self.status_text = text.to_string();
    }
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::for_mode(Mode::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// Non-blocking user-facing message (a toast, not a modal dialog).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Whatever draws the front-end. Calls arrive in order from a single
/// action at a time, but implementations must be shareable with the
/// redirect timer task.
pub trait Surface: Send + Sync {
    /// Redraw from a full snapshot of the view.
    fn render(&self, view: &ViewState);

    fn notify(&self, notice: &Notice);

    /// Leave the current screen for `route` (e.g. `/dashboard`).
    fn navigate(&self, route: &str);
}
