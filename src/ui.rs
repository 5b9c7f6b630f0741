// UI layer: a terminal rendition of the front-end. `TerminalSurface` draws
// the controller's view (spinner while scanning, coloured status line,
// one-line notices) and the functions below drive the interactive menu
// and the one-shot commands.

use anyhow::Result;
use crossterm::style::Stylize;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::controller::{ActionOutcome, ModeController, DASHBOARD_ROUTE};
use crate::mode::Mode;
use crate::session::SessionStore;
use crate::view::{Notice, NoticeLevel, Pulse, StatusIcon, Surface, Tone, ViewState};

pub type Controller = ModeController<ApiClient, TerminalSurface>;

#[derive(Default)]
pub struct TerminalSurface {
    spinner: Mutex<Option<ProgressBar>>,
    /// Last view printed, so unchanged redraws stay quiet.
    shown: Mutex<Option<ViewState>>,
    route: Mutex<Option<String>>,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route requested by the last navigation, if it has not been followed yet.
    pub fn take_route(&self) -> Option<String> {
        lock(&self.route).take()
    }

    fn print_view(view: &ViewState) {
        let tab = |mode: Mode| {
            let label = match mode {
                Mode::Verify => " Verify ",
                Mode::Register => " Register ",
            };
            if view.is_active(mode) {
                label.reverse().bold().to_string()
            } else {
                label.dim().to_string()
            }
        };
        println!();
        println!("{} {}", tab(Mode::Verify), tab(Mode::Register));
        println!("{} {}", icon(view.icon), view.status_text.as_str().bold());
        println!("  {}", view.status_subtext.as_str().dim());
        if view.enroll_input_visible {
            println!("  {}", "User ID required".dim());
        }
        println!("  [{}]", view.action_label);
    }
}

impl Surface for TerminalSurface {
    fn render(&self, view: &ViewState) {
        let mut spinner = lock(&self.spinner);
        match view.pulse {
            Pulse::Scanning => {
                let bar = spinner.get_or_insert_with(new_spinner);
                bar.set_message(view.status_text.clone());
                return;
            }
            Pulse::Hidden => {
                if let Some(bar) = spinner.take() {
                    bar.finish_and_clear();
                }
            }
        }
        drop(spinner);

        let mut shown = lock(&self.shown);
        if shown.as_ref() != Some(view) {
            Self::print_view(view);
            *shown = Some(view.clone());
        }
    }

    fn notify(&self, notice: &Notice) {
        let line = match notice.level {
            NoticeLevel::Warning => format!("{} {}", "!".yellow().bold(), notice.message),
            NoticeLevel::Error => format!("{} {}", "✖".red().bold(), notice.message.as_str().red()),
        };
        // Print above a running spinner instead of through it.
        match lock(&self.spinner).as_ref() {
            Some(bar) => bar.suspend(|| println!("{line}")),
            None => println!("{line}"),
        }
    }

    fn navigate(&self, route: &str) {
        println!("{} {}", "→".cyan(), route);
        *lock(&self.route) = Some(route.to_string());
    }
}

fn icon(icon: StatusIcon) -> String {
    let glyph = icon.glyph();
    match icon.tone() {
        Tone::Muted => glyph.dark_grey().to_string(),
        Tone::Success => glyph.green().to_string(),
        Tone::Error => glyph.red().to_string(),
    }
}

fn new_spinner() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Main interactive menu. Runs until the user chooses "Exit".
///
/// Note: `Select::interact()` is keyboard-driven: arrow keys and Enter.
pub async fn main_menu(ctl: &Controller, session: &SessionStore) -> Result<()> {
    loop {
        let mode = ctl.mode();
        let items = ["Verify mode", "Register mode", mode.action_label(), "Exit"];
        let selection = Select::new().items(&items).default(2).interact()?;
        match selection {
            0 => ctl.switch_mode(Mode::Verify),
            1 => ctl.switch_mode(Mode::Register),
            2 => {
                if mode.wants_user_id() {
                    let user_id: String = Input::new()
                        .with_prompt("User ID")
                        .with_initial_text(ctl.user_id())
                        .allow_empty(true)
                        .interact_text()?;
                    ctl.enter_user_id(user_id);
                }
                run_action(ctl, session).await?;
            }
            _ => break,
        }
    }
    Ok(())
}

/// Run the current mode's action. A granted verification saves the
/// session, waits for the redirect and then shows the dashboard feed.
pub async fn run_action(ctl: &Controller, session: &SessionStore) -> Result<ActionOutcome> {
    let outcome = ctl.execute_action().await;
    if let ActionOutcome::Granted { user_id } = &outcome {
        if let Some(user_id) = user_id {
            println!("Welcome {}!", user_id.as_str().bold());
        }
        match ctl.backend().session_cookie() {
            Some(cookie) => {
                if let Err(e) = session.save(&cookie) {
                    warn!(error = %format!("{e:#}"), "could not keep the session for later runs");
                }
            }
            None => debug!("backend did not set a session cookie"),
        }
        ctl.settle().await;
        if ctl.surface().take_route().as_deref() == Some(DASHBOARD_ROUTE) {
            show_activity(ctl.backend()).await?;
        }
    }
    Ok(outcome)
}

/// Print the signed-in user's recent activity.
pub async fn show_activity(api: &ApiClient) -> Result<bool> {
    let feed = match api.activity().await {
        Ok(feed) => feed,
        Err(e) => {
            println!("{} {}", "✖".red(), e);
            return Ok(false);
        }
    };
    if !feed.is_success() {
        let message = feed.message.as_deref().unwrap_or("Unauthorized");
        println!("{} {} (verify first)", "✖".red(), message);
        return Ok(false);
    }

    println!();
    println!("{}", "Recent activity".bold());
    if feed.logs.is_empty() {
        println!("  {}", "nothing yet".dim());
    }
    for entry in &feed.logs {
        println!(
            "  {}  {:<8} {}",
            entry.date.as_str().dim(),
            entry.action,
            entry.details
        );
    }
    Ok(true)
}

/// Print whether the backend's biometric sensor stack is up.
pub async fn show_status(api: &ApiClient) -> Result<bool> {
    match api.system_status().await {
        Ok(status) => {
            let message = status.message.clone().unwrap_or_default();
            if status.is_ready() {
                println!("{} {} {}", "✔".green(), "ready".green().bold(), message);
            } else {
                println!("{} {} {}", "✖".red(), status.status.as_str().red().bold(), message);
            }
            Ok(status.is_ready())
        }
        Err(e) => {
            println!("{} backend unreachable at {}: {}", "✖".red(), api.base_url(), e);
            Ok(false)
        }
    }
}

/// End the backend session (when there is one) and forget the saved cookie.
/// The local cookie is removed even when the backend cannot be reached.
pub async fn logout(api: &ApiClient, session: &SessionStore) -> Result<bool> {
    let mut ended = true;
    if api.session_cookie().is_some() {
        if let Err(e) = api.logout().await {
            warn!(error = %e, "backend session not ended");
            println!("{} could not end the session at {}: {}", "!".yellow(), api.base_url(), e);
            ended = false;
        }
    }
    session.clear()?;
    println!("Session cleared.");
    Ok(ended)
}
