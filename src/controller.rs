// Mode controller: owns the interaction mode and the enrollment field,
// keeps the view in step with them, and runs the verify/enroll action
// against the backend. All state lives on the controller instance.

use std::error::Error as _;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::api::{ActionRequest, AuthBackend};
use crate::mode::Mode;
use crate::view::{
    Notice, Pulse, StatusIcon, Surface, ViewState, ACCESS_DENIED, ACCESS_GRANTED,
    ENROLLMENT_COMPLETE, INITIALIZING, MISSING_USER_ID, OPERATION_FAILED, SYSTEM_ERROR,
};

/// Where a verified user is sent.
pub const DASHBOARD_ROUTE: &str = "/dashboard";
/// Pause between "Access Granted" and leaving for the dashboard, so the
/// user gets to see the verdict.
pub const REDIRECT_DELAY: Duration = Duration::from_millis(1000);

/// How one `execute_action` call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Another action was still waiting on the backend; nothing was done.
    Busy,
    /// Enrollment without a user ID; no request was sent.
    ValidationFailed,
    /// Verification succeeded; a redirect to the dashboard is pending.
    Granted { user_id: Option<String> },
    Enrolled,
    Denied { message: String },
    /// The request never produced a usable answer.
    SystemError,
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Granted { .. } | ActionOutcome::Enrolled)
    }
}

struct Fields {
    mode: Mode,
    user_id: String,
    view: ViewState,
}

/// Releases the in-flight flag on every exit path of an action.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct ModeController<B, S> {
    backend: B,
    surface: Arc<S>,
    fields: Mutex<Fields>,
    in_flight: AtomicBool,
    redirect: Mutex<Option<JoinHandle<()>>>,
}

impl<B, S> ModeController<B, S>
where
    B: AuthBackend,
    S: Surface + 'static,
{
    /// Build a controller in Verify mode and draw the initial view.
    pub fn new(backend: B, surface: Arc<S>) -> Self {
        let controller = ModeController {
            backend,
            surface,
            fields: Mutex::new(Fields {
                mode: Mode::default(),
                user_id: String::new(),
                view: ViewState::default(),
            }),
            in_flight: AtomicBool::new(false),
            redirect: Mutex::new(None),
        };
        controller.switch_mode(Mode::default());
        controller
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn surface(&self) -> &Arc<S> {
        &self.surface
    }

    pub fn mode(&self) -> Mode {
        self.fields().mode
    }

    /// Snapshot of what is currently shown.
    pub fn view(&self) -> ViewState {
        self.fields().view.clone()
    }

    pub fn user_id(&self) -> String {
        self.fields().user_id.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Switch mode and redraw the mode-dependent parts of the view. The
    /// status icon and scanning indicator are left as they are.
    pub fn switch_mode(&self, mode: Mode) {
        let snapshot = {
            let mut fields = self.fields();
            fields.mode = mode;
            let icon = fields.view.icon;
            let pulse = fields.view.pulse;
            fields.view = ViewState {
                icon,
                pulse,
                ..ViewState::for_mode(mode)
            };
            fields.view.clone()
        };
        info!(%mode, "mode switched");
        self.surface.render(&snapshot);
    }

    /// Contents of the enrollment ID field.
    pub fn enter_user_id(&self, user_id: impl Into<String>) {
        self.fields().user_id = user_id.into();
    }

    /// Run the action for the current mode: enroll the entered user ID, or
    /// verify whoever is in front of the sensor.
    ///
    /// At most one action runs at a time. A call made while another is
    /// waiting on the backend returns [`ActionOutcome::Busy`] without
    /// touching the view.
    pub async fn execute_action(&self) -> ActionOutcome {
        let Some(_guard) = self.begin() else {
            warn!("action already in flight, ignoring");
            return ActionOutcome::Busy;
        };

        let (mode, user_id) = {
            let fields = self.fields();
            (fields.mode, fields.user_id.clone())
        };

        self.update(|view| {
            view.icon = StatusIcon::Neutral;
            view.pulse = Pulse::Scanning;
            view.set_status(INITIALIZING);
        });

        let request = match mode {
            Mode::Register if user_id.is_empty() => {
                self.surface.notify(&Notice::warning(MISSING_USER_ID));
                self.update(|view| view.pulse = Pulse::Hidden);
                return ActionOutcome::ValidationFailed;
            }
            Mode::Register => ActionRequest::register(user_id),
            Mode::Verify => ActionRequest::verify(),
        };

        let endpoint = mode.endpoint();
        info!(%mode, endpoint, "submitting biometric action");

        let result = match self.backend.submit(endpoint, &request).await {
            Ok(result) => result,
            Err(err) => {
                // No notice here, unlike a denial.
                error!(error = %err, cause = ?err.source(), "biometric action failed");
                self.update(|view| {
                    view.set_status(SYSTEM_ERROR);
                    view.pulse = Pulse::Hidden;
                });
                return ActionOutcome::SystemError;
            }
        };

        if result.is_success() {
            self.update(|view| {
                view.pulse = Pulse::Hidden;
                view.icon = StatusIcon::Success;
                view.set_status(match mode {
                    Mode::Verify => ACCESS_GRANTED,
                    Mode::Register => ENROLLMENT_COMPLETE,
                });
            });
            match mode {
                Mode::Verify => {
                    let user_id = result.user_id_text();
                    info!(user_id = ?user_id, "access granted");
                    self.schedule_redirect();
                    ActionOutcome::Granted { user_id }
                }
                Mode::Register => {
                    info!("enrollment complete");
                    ActionOutcome::Enrolled
                }
            }
        } else {
            let message = result
                .message_text()
                .unwrap_or_else(|| OPERATION_FAILED.to_string());
            warn!(status = ?result.status, %message, "access denied");
            self.update(|view| {
                view.pulse = Pulse::Hidden;
                view.icon = StatusIcon::Failure;
                view.set_status(ACCESS_DENIED);
            });
            self.surface.notify(&Notice::error(message.clone()));
            ActionOutcome::Denied { message }
        }
    }

    /// Wait for a pending dashboard redirect to fire, if there is one.
    pub async fn settle(&self) {
        let pending = self.redirect_slot().take();
        if let Some(handle) = pending {
            if let Err(err) = handle.await {
                if !err.is_cancelled() {
                    error!(error = %err, "redirect task failed");
                }
            }
        }
    }

    fn schedule_redirect(&self) {
        let surface = Arc::clone(&self.surface);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(REDIRECT_DELAY).await;
            info!(route = DASHBOARD_ROUTE, "redirecting");
            surface.navigate(DASHBOARD_ROUTE);
        });
        if let Some(previous) = self.redirect_slot().replace(handle) {
            previous.abort();
        }
    }

    fn begin(&self) -> Option<InFlight<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(&self.in_flight))
    }

    fn update(&self, change: impl FnOnce(&mut ViewState)) {
        let snapshot = {
            let mut fields = self.fields();
            change(&mut fields.view);
            fields.view.clone()
        };
        self.surface.render(&snapshot);
    }

    fn fields(&self) -> MutexGuard<'_, Fields> {
        self.fields.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn redirect_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.redirect.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
