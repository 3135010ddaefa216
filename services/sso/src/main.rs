//! SSO HTTP service entry point.
//!
//! # Purpose
//! Wires configuration, storage, the credential service, and HTTP routers, then
//! starts the public API server and (optionally) the internal server.
//!
//! # Notes
//! The `build_state` helper keeps wiring testable and minimizes main setup logic.
use anyhow::Context;
use sso::app::{AppState, build_internal_router, build_router};
use sso::auth::AuthService;
use sso::auth::password::PasswordHasher;
use sso::config::{self, SsoConfig};
use sso::observability;
use sso::store::{IdentityStore, memory::InMemoryStore, postgres::PostgresStore};
use std::future::Future;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = SsoConfig::from_env_or_yaml().context("load sso config")?;
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: SsoConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics_handle = observability::init_observability("sso");
    let state = build_state(&config).await?;
    tracing::info!(
        env = ?config.env,
        backend = state.store.backend_name(),
        durable = state.store.is_durable(),
        token_ttl_secs = config.token_ttl.as_secs(),
        "sso state ready"
    );
    let internal_listener = if config.internal.enabled {
        let internal_addr = config.internal.bind_addr;
        let listener = tokio::net::TcpListener::bind(internal_addr)
            .await
            .with_context(|| format!("bind {internal_addr}"))?;
        Some(listener)
    } else {
        None
    };
    let addr = config.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;

    let metrics_task = tokio::spawn(observability::serve_metrics(
        metrics_handle,
        config.metrics_bind,
    ));
    let mut internal_task = internal_listener.map(|internal_listener| {
        let internal_app = build_internal_router(state.clone());
        tokio::spawn(async move {
            if let Ok(internal_addr) = internal_listener.local_addr() {
                tracing::info!(%internal_addr, "internal api listening");
            }
            axum::serve(internal_listener, internal_app.into_make_service()).await
        })
    });
    let internal_stopped = async {
        match internal_task.as_mut() {
            Some(task) => task.await,
            None => std::future::pending().await,
        }
    };

    let app = build_router(state.clone());
    tracing::info!(%addr, "sso listening");
    tokio::pin!(shutdown);
    let outcome = tokio::select! {
        result = axum::serve(listener, app.into_make_service()) => {
            result.context("public api server")
        }
        joined = internal_stopped => {
            match joined {
                Ok(Ok(())) => Err(anyhow::anyhow!("internal api server stopped")),
                Ok(Err(err)) => Err(anyhow::Error::new(err).context("internal api server")),
                Err(err) => Err(anyhow::Error::new(err).context("internal api task")),
            }
        }
        _ = &mut shutdown => {
            tracing::info!("shutdown requested");
            Ok(())
        }
    };

    metrics_task.abort();
    if let Some(task) = &internal_task {
        task.abort();
    }
    let _ = metrics_task.await;
    if let Some(task) = internal_task {
        let _ = task.await;
    }
    outcome
}

async fn build_state(config: &SsoConfig) -> anyhow::Result<AppState> {
    let store: Arc<dyn IdentityStore> = match config.storage {
        config::StorageBackend::Memory => {
            Arc::new(InMemoryStore::with_apps(config.apps.iter().cloned()))
        }
        config::StorageBackend::Postgres => {
            let pg = config
                .postgres
                .as_ref()
                .context("postgres configuration missing")?;
            if !config.apps.is_empty() {
                tracing::warn!("configured apps are ignored by the postgres backend");
            }
            Arc::new(
                PostgresStore::connect(pg)
                    .await
                    .context("connect postgres store")?,
            )
        }
    };

    let hasher = PasswordHasher::new(config.password_hash_cost)
        .with_context(|| format!("password hash cost {}", config.password_hash_cost))?;
    let auth = AuthService::new(store.clone(), store.clone(), hasher, config.token_ttl);

    Ok(AppState {
        auth: Arc::new(auth),
        store,
        request_timeout: config.request_timeout,
    })
}
