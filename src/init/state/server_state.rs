use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicU64;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use lettre::{AsyncSmtpTransport, Tokio1Executor};

use crate::init::config::AuthConfig;

use super::builder::ServerStateBuilder;

/// Shared across every handler behind an `Arc`. Holds no per-user state;
/// identity travels in the request itself (session cookie or bearer token).
pub struct ServerState {
    pub(crate) app_name_version: String,
    pub(crate) server_start_time: tokio::time::Instant,
    pub(crate) pool: Pool<AsyncPgConnection>,
    pub(crate) responses_handled: AtomicU64,
    pub(crate) email_client: AsyncSmtpTransport<Tokio1Executor>,
    pub(crate) auth: AuthConfig,
    pub(crate) uploads_dir: PathBuf,
    pub(crate) public_base_url: String,
}

impl ServerState {
    pub fn builder() -> ServerStateBuilder {
        ServerStateBuilder::default()
    }

    pub fn get_app_name_version(&self) -> String {
        self.app_name_version.clone()
    }

    pub fn get_uptime(&self) -> tokio::time::Duration {
        self.server_start_time.elapsed()
    }

    pub async fn get_conn(&self) -> anyhow::Result<PooledConnection<'_, AsyncPgConnection>> {
        Ok(self.pool.get().await?)
    }

    pub fn get_email_client(&self) -> &AsyncSmtpTransport<Tokio1Executor> {
        &self.email_client
    }

    pub fn get_auth_config(&self) -> &AuthConfig {
        &self.auth
    }

    pub fn get_uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    pub fn get_public_base_url(&self) -> &str {
        &self.public_base_url
    }

    pub fn get_responses_handled(&self) -> u64 {
        std::sync::atomic::AtomicU64::load(
            &self.responses_handled,
            std::sync::atomic::Ordering::SeqCst,
        )
    }

    pub fn add_responses_handled(&self) {
        self.responses_handled
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}
