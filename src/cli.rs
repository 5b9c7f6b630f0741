// Command line surface of the `bioid` binary.

use clap::{ArgAction, Parser, Subcommand};

use crate::mode::Mode;

#[derive(Parser, Debug)]
#[command(name = "bioid", version, about = "Face authentication front-end")]
pub struct Cli {
    /// Base URL of the biometric backend
    #[arg(
        long,
        env = "BIOID_API_URL",
        default_value = "http://localhost:5000",
        global = true
    )]
    pub api_url: String,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Menu driven mode switching and scanning (default)
    Interactive {
        /// Mode to start in
        #[arg(long, value_enum, default_value_t = Mode::Verify)]
        mode: Mode,
    },
    /// Verify the face in front of the sensor
    Verify,
    /// Enroll the face in front of the sensor under a user ID
    Register {
        /// ID to enroll; enrollment is refused when missing
        user_id: Option<String>,
    },
    /// Check that the backend sensor stack is ready
    Status,
    /// Show recent activity of the verified user
    Activity,
    /// End the backend session and forget the saved cookie
    Logout,
}

impl Cli {
    pub fn action(&self) -> &Command {
        self.command.as_ref().unwrap_or(&Command::Interactive { mode: Mode::Verify })
    }
}
