use std::sync::Arc;

use diesel::prelude::QueryableByName;
use diesel_async::RunQueryDsl;
use diesel_async::pooled_connection::bb8::Pool;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use lettre::{AsyncSmtpTransport, Tokio1Executor};
use tracing::info;

use crate::routers::main_router::build_router;

use super::config::{AuthConfig, DbConfig, EmailConfig, UploadsConfig};
use super::state::ServerState;

pub async fn server_init_proc(start: tokio::time::Instant) -> anyhow::Result<()> {
    let num_cores: u32 = num_cpus::get_physical() as u32;

    dotenvy::dotenv().ok();

    let db_config = DbConfig::from_env()?.to_url();

    let pool_config =
        AsyncDieselConnectionManager::<diesel_async::AsyncPgConnection>::new(db_config);

    let pool = Pool::builder()
        .min_idle(Some(num_cores))
        .max_size(num_cores * 10u32)
        .build(pool_config)
        .await?;

    let email_config = EmailConfig::from_env()?;
    let email_client = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&email_config.get_url())?
        .credentials(email_config.to_creds())
        .build();

    let auth_config = AuthConfig::from_env()?;

    let uploads_config = UploadsConfig::from_env()?;
    tokio::fs::create_dir_all(&uploads_config.uploads_dir).await?;

    let state = Arc::new(
        ServerState::builder()
            .app_name_version(format!(
                "{} v{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .server_start_time(start)
            .pool(pool)
            .email_client(email_client)
            .auth(auth_config)
            .uploads_dir(uploads_config.uploads_dir)
            .public_base_url(email_config.get_public_base_url())
            .build()?,
    );

    // run our app with hyper, listening globally on port 3000
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;

    let mut conn = state.get_conn().await?;

    #[derive(QueryableByName)]
    struct PgVersion {
        #[diesel(sql_type = diesel::sql_types::Text)]
        version: String,
    }

    let pg_version: PgVersion = diesel::sql_query("SELECT version()")
        .get_result(&mut conn)
        .await?;

    info!("PostgreSQL version: {}", pg_version.version);

    drop(conn);
    info!("Backend server starting...");
    axum::serve(
        listener,
        build_router(state).into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;
    Ok(())
}
