use std::path::PathBuf;
use std::sync::atomic::AtomicU64;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::bb8::Pool;
use lettre::{AsyncSmtpTransport, Tokio1Executor};

use crate::init::config::AuthConfig;

use super::server_state::ServerState;

#[derive(Default)]
pub struct ServerStateBuilder {
    app_name_version: Option<String>,
    server_start_time: Option<tokio::time::Instant>,
    pool: Option<Pool<AsyncPgConnection>>,
    email_client: Option<AsyncSmtpTransport<Tokio1Executor>>,
    auth: Option<AuthConfig>,
    uploads_dir: Option<PathBuf>,
    public_base_url: Option<String>,
}

impl ServerStateBuilder {
    pub fn app_name_version(mut self, app_name_version: String) -> Self {
        self.app_name_version = Some(app_name_version);
        self
    }

    pub fn server_start_time(mut self, server_start_time: tokio::time::Instant) -> Self {
        self.server_start_time = Some(server_start_time);
        self
    }

    pub fn pool(mut self, pool: Pool<AsyncPgConnection>) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn email_client(mut self, email_client: AsyncSmtpTransport<Tokio1Executor>) -> Self {
        self.email_client = Some(email_client);
        self
    }

    pub fn auth(mut self, auth: AuthConfig) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn uploads_dir(mut self, uploads_dir: PathBuf) -> Self {
        self.uploads_dir = Some(uploads_dir);
        self
    }

    pub fn public_base_url(mut self, public_base_url: String) -> Self {
        self.public_base_url = Some(public_base_url);
        self
    }

    pub fn build(self) -> anyhow::Result<ServerState> {
        Ok(ServerState {
            app_name_version: self
                .app_name_version
                .ok_or_else(|| anyhow::anyhow!("app_name_version is required"))?,
            server_start_time: self
                .server_start_time
                .ok_or_else(|| anyhow::anyhow!("server_start_time is required"))?,
            pool: self
                .pool
                .ok_or_else(|| anyhow::anyhow!("pool is required"))?,
            responses_handled: AtomicU64::new(0u64),
            email_client: self
                .email_client
                .ok_or_else(|| anyhow::anyhow!("email_client is required"))?,
            auth: self
                .auth
                .ok_or_else(|| anyhow::anyhow!("auth config is required"))?,
            uploads_dir: self
                .uploads_dir
                .ok_or_else(|| anyhow::anyhow!("uploads_dir is required"))?,
            public_base_url: self
                .public_base_url
                .ok_or_else(|| anyhow::anyhow!("public_base_url is required"))?,
        })
    }
}
