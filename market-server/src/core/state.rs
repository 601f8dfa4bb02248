use std::fmt;
use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::notify::{LogNotifier, OrderNotifier};

/// Server state - shared handles to every long-lived service
///
/// `ServerState` is cloned into each request handler; every field is either
/// `Clone`-cheap or wrapped in an `Arc`.
///
/// | Field | Type | Meaning |
/// |-------|------|---------|
/// | config | Config | Immutable configuration |
/// | db | Surreal<Db> | Embedded database |
/// | jwt_service | Arc<JwtService> | JWT validation |
/// | notifier | Arc<dyn OrderNotifier> | Post-commit order notifications |
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT validation service
    pub jwt_service: Arc<JwtService>,
    /// Post-commit notification sink
    pub notifier: Arc<dyn OrderNotifier>,
}

impl fmt::Debug for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .field("db", &self.db)
            .field("jwt_service", &self.jwt_service)
            .finish_non_exhaustive()
    }
}

impl ServerState {
    /// Construct state from already-built parts
    ///
    /// Tests use this with an in-memory database; production boot goes
    /// through [`ServerState::initialize`].
    pub fn new(
        config: Config,
        db: Surreal<Db>,
        jwt_service: Arc<JwtService>,
        notifier: Arc<dyn OrderNotifier>,
    ) -> Self {
        Self {
            config,
            db,
            jwt_service,
            notifier,
        }
    }

    /// Open the database, apply the schema and build all services
    ///
    /// Failures here are unrecoverable, the process cannot serve without
    /// its storage and JWT configuration.
    pub async fn initialize(config: &Config) -> Self {
        let db_service = DbService::new(config.database_dir().join("mango.db"))
            .await
            .expect("Failed to initialize database");

        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));

        tracing::info!(
            work_dir = %config.work_dir,
            environment = %config.environment,
            "Server state initialized"
        );

        Self {
            config: config.clone(),
            db: db_service.db,
            jwt_service,
            notifier: Arc::new(LogNotifier),
        }
    }

    /// Get a database handle
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// Get the JWT validation service
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
