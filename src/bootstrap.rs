//! Process wiring: pick the store, register modules, drive their lifecycle around the server.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use bookshelf_db::DatabaseModule;
use bookshelf_kernel::{
    settings::{Settings, StoreBackend},
    InitCtx, ModuleRegistry,
};
use sqlx::PgPool;

use crate::modules::{
    self,
    books::{InMemoryBookStore, PostgresBookStore, SharedStore},
};

/// A fully registered application, ready to be started.
pub struct Application {
    pub settings: Settings,
    pub registry: ModuleRegistry,
    pool: Option<PgPool>,
}

impl Application {
    /// Router serving every registered module, without binding a socket
    pub fn router(&self) -> Router {
        bookshelf_http::build_router(&self.registry, &self.settings)
    }

    /// Initialize modules, ensure the schema when a database is in use, then start modules
    pub async fn start(&self) -> anyhow::Result<()> {
        let ctx = InitCtx {
            settings: &self.settings,
        };
        self.registry.init_all(&ctx).await?;

        if let Some(pool) = &self.pool {
            bookshelf_db::ensure_schema(pool, &self.registry.collect_schema())
                .await
                .context("failed to ensure database schema")?;
        }

        self.registry.start_all(&ctx).await
    }

    pub async fn stop(&self) -> anyhow::Result<()> {
        self.registry.stop_all().await
    }
}

/// Construct the configured store and register every module around it
pub async fn build(settings: Settings) -> anyhow::Result<Application> {
    let mut registry = ModuleRegistry::new();

    let (store, pool): (SharedStore, Option<PgPool>) = match settings.store.backend {
        StoreBackend::Memory => {
            let store: SharedStore = if settings.store.seed_samples {
                Arc::new(InMemoryBookStore::seeded())
            } else {
                Arc::new(InMemoryBookStore::new())
            };
            (store, None)
        }
        StoreBackend::Postgres => {
            let pool = bookshelf_db::connect(&settings.database).await?;
            registry.register_core(Arc::new(DatabaseModule::new(pool.clone())));
            let store: SharedStore = Arc::new(PostgresBookStore::new(pool.clone()));
            (store, Some(pool))
        }
    };

    tracing::info!(
        backend = store.backend(),
        seeded = settings.store.seed_samples,
        "book store ready"
    );

    modules::register_all(&mut registry, store);
    tracing::info!(
        core = registry.core_module_count(),
        custom = registry.custom_module_count(),
        "modules registered"
    );

    Ok(Application {
        settings,
        registry,
        pool,
    })
}

/// Build, start, serve until shutdown, then stop every module
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(env = ?settings.environment, "bookshelf bootstrap starting");

    let app = build(settings).await?;
    app.start().await?;

    tracing::info!("bookshelf bootstrap complete");
    let served = bookshelf_http::start_server(&app.registry, &app.settings).await;

    app.stop().await?;
    served
}
