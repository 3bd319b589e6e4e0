use crate::{Config, Session};

use quarry_core::{
    schema::{app::FieldKind, ModelRegistry},
    Executor, Result, TypeHandler, TypeHandlerRegistry,
};
use quarry_sql::Dialect;
use std::sync::Arc;

/// Shared state behind every session: the dialect, the model registry and
/// the type handlers.
#[derive(Debug, Clone)]
pub struct SessionFactory {
    config: Config,
    dialect: Arc<Dialect>,
    models: Arc<ModelRegistry>,
    handlers: Arc<TypeHandlerRegistry>,
}

impl SessionFactory {
    /// Builds a factory for the dialect named in `config`.
    pub fn new(config: Config) -> Result<SessionFactory> {
        let dialect = Dialect::from_name(&config.dialect)?;
        Ok(SessionFactory::with_dialect(config, dialect))
    }

    /// Builds a factory around a customized dialect.
    pub fn with_dialect(config: Config, dialect: Dialect) -> SessionFactory {
        tracing::debug!(dialect = dialect.name, failsafe = config.failsafe, "session factory");

        SessionFactory {
            config,
            dialect: Arc::new(dialect),
            models: Arc::new(ModelRegistry::new()),
            handlers: Arc::new(TypeHandlerRegistry::new()),
        }
    }

    /// Replaces the handler for a field kind. Sessions opened earlier keep the
    /// handlers they were opened with.
    pub fn register_handler(&mut self, kind: FieldKind, handler: Arc<dyn TypeHandler>) {
        Arc::make_mut(&mut self.handlers).register(kind, handler);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    pub fn models(&self) -> &Arc<ModelRegistry> {
        &self.models
    }

    /// Opens a session that owns `executor` for its lifetime.
    pub fn session(&self, executor: impl Executor + 'static) -> Session {
        Session::new(
            self.config.clone(),
            self.dialect.clone(),
            self.models.clone(),
            self.handlers.clone(),
            Box::new(executor),
        )
    }
}
