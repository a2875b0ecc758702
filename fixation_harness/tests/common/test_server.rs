use std::sync::Once;

use axum::Router;
use basic_session_axum::{AuthState, SessionConfig, SessionFixationPolicy, app_router};
use fixation_harness::{HttpDriver, RouterDriver};
use tokio::task::JoinHandle;

/// Initialize tracing for tests, honouring `RUST_LOG`
pub fn init_test_tracing() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        if let Err(e) = dotenvy::from_filename(".env_test") {
            println!("Warning: Could not load .env_test file: {e}");
        }
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// A freshly built application with its own session and user stores
pub struct TestApp {
    pub router: Router,
    pub cookie_name: String,
}

impl TestApp {
    pub fn new(policy: SessionFixationPolicy) -> Self {
        init_test_tracing();

        let config = SessionConfig::from_env().with_fixation_policy(policy);
        let state = AuthState::with_demo_accounts(config);
        let cookie_name = state.cookie_name().to_string();
        Self {
            router: app_router(state),
            cookie_name,
        }
    }

    pub fn driver(&self) -> RouterDriver {
        RouterDriver::new(self.router.clone()).with_cookie_name(self.cookie_name.clone())
    }
}

/// The application served over a loopback socket on an ephemeral port
pub struct TestServer {
    server_handle: JoinHandle<()>,
    pub base_url: String,
    pub cookie_name: String,
}

impl TestServer {
    pub async fn start(app: TestApp) -> Result<Self, Box<dyn std::error::Error>> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let router = app.router;
        let server_handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                eprintln!("Test server stopped: {e}");
            }
        });

        Ok(Self {
            server_handle,
            base_url: format!("http://{addr}"),
            cookie_name: app.cookie_name,
        })
    }

    pub fn driver(&self) -> HttpDriver {
        HttpDriver::new(self.base_url.clone())
            .expect("HTTP client builds")
            .with_cookie_name(self.cookie_name.clone())
    }

    pub fn shutdown(self) {
        self.server_handle.abort();
    }
}
