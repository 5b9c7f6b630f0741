// Interaction mode: which of the two flows (face verification or face
// enrollment) the front-end is currently driving. Everything that differs
// between the two flows (labels, headlines, endpoint) hangs off `Mode`.

use std::fmt;

/// Endpoint used to verify a face against the enrolled identities.
pub const VERIFY_ENDPOINT: &str = "/api/verify-auto";
/// Endpoint used to enroll a face under a user ID.
pub const REGISTER_ENDPOINT: &str = "/api/register-auto";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Mode {
    #[default]
    Verify,
    Register,
}

impl Mode {
    /// Label shown on the primary action button.
    pub fn action_label(self) -> &'static str {
        match self {
            Mode::Verify => "Authenticate",
            Mode::Register => "Capture Bio-ID",
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            Mode::Verify => "Identity Verification",
            Mode::Register => "New Agent Enrollment",
        }
    }

    pub fn subtext(self) -> &'static str {
        match self {
            Mode::Verify => "Ready to scan",
            Mode::Register => "Enter ID and scan face",
        }
    }

    pub fn endpoint(self) -> &'static str {
        match self {
            Mode::Verify => VERIFY_ENDPOINT,
            Mode::Register => REGISTER_ENDPOINT,
        }
    }

    /// Only enrollment asks for a user ID.
    pub fn wants_user_id(self) -> bool {
        self == Mode::Register
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Verify => f.write_str("verify"),
            Mode::Register => f.write_str("register"),
        }
    }
}
