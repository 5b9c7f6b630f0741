use bioid_cli::api::ApiClient;
use bioid_cli::controller::ModeController;
use bioid_cli::view::{Notice, Surface, ViewState};
use std::sync::{Arc, Mutex};
use wiremock::MockServer;

/// Surface that remembers everything it was asked to show.
#[derive(Default)]
pub struct RecordingSurface {
    renders: Mutex<Vec<ViewState>>,
    notices: Mutex<Vec<Notice>>,
    routes: Mutex<Vec<String>>,
}

impl RecordingSurface {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }

    #[allow(unused)]
    pub fn last_view(&self) -> ViewState {
        self.renders.lock().unwrap().last().cloned().unwrap()
    }
}

impl Surface for RecordingSurface {
    fn render(&self, view: &ViewState) {
        self.renders.lock().unwrap().push(view.clone());
    }

    fn notify(&self, notice: &Notice) {
        self.notices.lock().unwrap().push(notice.clone());
    }

    fn navigate(&self, route: &str) {
        self.routes.lock().unwrap().push(route.to_string());
    }
}

pub type TestController = ModeController<ApiClient, RecordingSurface>;

pub fn controller_for(base_url: &str) -> (TestController, Arc<RecordingSurface>) {
    let api = ApiClient::new(base_url).unwrap();
    let surface = Arc::new(RecordingSurface::default());
    (ModeController::new(api, surface.clone()), surface)
}

#[allow(unused)]
pub async fn controller_with_server() -> (MockServer, TestController, Arc<RecordingSurface>) {
    let server = MockServer::start().await;
    let (ctl, surface) = controller_for(&server.uri());
    (server, ctl, surface)
}

/// Base URL of a local port with nothing listening on it.
#[allow(unused)]
pub fn dead_backend() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
