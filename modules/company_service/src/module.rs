//! Module declaration and lifecycle: connect, migrate, wire services, route

use crate::config::{Config, DatabaseConfig};
use crate::domain::{RepositoryManager, ServiceManager};
use crate::infra::storage::repositories::{
    SeaOrmCompanyRepository, SeaOrmEmployeeRepository, SeaOrmUserRepository,
};
use anyhow::{Context, Result};
use parking_lot::RwLock;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;

/// Company service module
pub struct CompanyServiceModule {
    config: RwLock<Config>,
    services: RwLock<Option<Arc<ServiceManager>>>,
}

impl Default for CompanyServiceModule {
    fn default() -> Self {
        Self {
            config: RwLock::new(Config::default()),
            services: RwLock::new(None),
        }
    }
}

/// Open a SeaORM connection pool for the configured URL
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .sqlx_logging(false);

    // an in-memory SQLite database lives and dies with its connection
    if config.url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }

    Database::connect(options)
        .await
        .with_context(|| format!("failed to connect to database '{}'", config.url))
}

impl CompanyServiceModule {
    /// Connect, run migrations when configured and build the services
    pub async fn init(&self, config: Config) -> Result<()> {
        let db = connect(&config.database).await?;
        if config.database.migrate_on_start {
            self.migrate(&db).await?;
        }
        self.init_with_connection(config, db);
        Ok(())
    }

    /// Apply pending migrations, including the role seed
    pub async fn migrate(&self, db: &DatabaseConnection) -> Result<()> {
        use crate::infra::storage::migrations::Migrator;
        use sea_orm_migration::MigratorTrait;

        Migrator::up(db, None)
            .await
            .context("database migration failed")?;
        tracing::info!("Company service migrations completed");
        Ok(())
    }

    /// Build repositories and services over an already migrated connection
    pub fn init_with_connection(&self, config: Config, db: DatabaseConnection) {
        let conn = Arc::new(db);

        let repos = RepositoryManager::new(
            Arc::new(SeaOrmCompanyRepository::new(conn.clone())),
            Arc::new(SeaOrmEmployeeRepository::new(conn.clone())),
            Arc::new(SeaOrmUserRepository::new(conn)),
        );

        let services = Arc::new(ServiceManager::new(repos, &config));
        *self.services.write() = Some(services);
        *self.config.write() = config;

        tracing::info!("Company service initialized");
    }

    pub fn services(&self) -> Result<Arc<ServiceManager>> {
        self.services
            .read()
            .as_ref()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))
    }

    /// REST application with the full middleware stack
    pub fn router(&self) -> Result<axum::Router> {
        let services = self.services()?;
        tracing::info!("Registering company service REST routes");
        Ok(crate::api::rest::routes::build_router(
            services,
            &self.config.read(),
        ))
    }
}
