/*
 * Responsibility
 * - Config読み込み → 依存生成 (storage backend の選択) → Router 組み立て
 * - tracing / panic hook の初期化
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::{Config, StorageBackend};
use crate::middleware::http::{self, HttpLimits};
use crate::repos::postgres::{self, PgConversationRepo, PgMessageRepo, PgUserRepo};
use crate::services::auth::{PasswordHasher, TokenCodec};
use crate::services::{ConsoleNotifier, ConversationService, MessageService, UserService};
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG があればそれを優先
    // ex: RUST_LOG=info,chatheon=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development では即落として気付けるようにする
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(config = ?config, "starting API in {:?} mode on {}", config.app_env, config.addr);

    let state = build_state(&config).await?;
    let app = build_router(state, HttpLimits::from_config(&config));

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

pub async fn build_state(config: &Config) -> Result<AppState> {
    let auth = Arc::new(TokenCodec::new(&config.token_config())?);
    let hasher = PasswordHasher::new(config.bcrypt_cost);

    let state = match &config.storage {
        StorageBackend::Memory => {
            tracing::info!("using in-memory storage");
            AppState::in_memory(auth, hasher)
        }
        StorageBackend::Postgres {
            database_url,
            max_connections,
        } => {
            let pool = postgres::connect(database_url, *max_connections)
                .await
                .context("failed to connect to postgres")?;
            tracing::info!("using postgres storage");

            let users = UserService::new(
                Arc::new(PgUserRepo::new(pool.clone())),
                auth.clone(),
                hasher,
            );
            let conversations =
                ConversationService::new(Arc::new(PgConversationRepo::new(pool.clone())));
            let messages = MessageService::new(
                Arc::new(PgMessageRepo::new(pool)),
                Arc::new(ConsoleNotifier),
            );

            AppState::new(
                auth,
                Arc::new(users),
                Arc::new(conversations),
                Arc::new(messages),
            )
        }
    };

    Ok(state)
}

pub fn build_router(state: AppState, limits: HttpLimits) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    http::apply(router, limits)
}
