// Entrypoint for the CLI application.
// - Keeps `main` small: parse flags, build the API client and controller,
//   then hand over to the UI layer.

use anyhow::Context;
use bioid_cli::api::ApiClient;
use bioid_cli::cli::{Cli, Command};
use bioid_cli::controller::ModeController;
use bioid_cli::mode::Mode;
use bioid_cli::session::SessionStore;
use bioid_cli::{telemetry, ui};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    telemetry::init(cli.verbose)?;

    let api = ApiClient::new(&cli.api_url).context("Failed to set up backend client")?;
    let session = SessionStore::in_home();
    if let Some(cookie) = session.load()? {
        api.restore_session(&cookie);
    }

    let ok = match cli.action() {
        Command::Interactive { mode } => {
            let ctl = ModeController::new(api, Arc::new(ui::TerminalSurface::new()));
            if *mode != Mode::default() {
                ctl.switch_mode(*mode);
            }
            ui::main_menu(&ctl, &session).await?;
            true
        }
        Command::Verify => {
            let ctl = ModeController::new(api, Arc::new(ui::TerminalSurface::new()));
            ui::run_action(&ctl, &session).await?.is_success()
        }
        Command::Register { user_id } => {
            let ctl = ModeController::new(api, Arc::new(ui::TerminalSurface::new()));
            ctl.switch_mode(Mode::Register);
            ctl.enter_user_id(user_id.clone().unwrap_or_default());
            ui::run_action(&ctl, &session).await?.is_success()
        }
        Command::Status => ui::show_status(&api).await?,
        Command::Activity => ui::show_activity(&api).await?,
        Command::Logout => ui::logout(&api, &session).await?,
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
