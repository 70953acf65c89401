use anyhow::Context;
use std::sync::Arc;

use crate::module::{InitCtx, Module, SchemaStatement};

/// Core modules in initialization order. Shutdown walks this list backwards.
const CORE_MODULE_ORDER: &[&str] = &["db"];

/// Owns every module of the process and drives their lifecycle.
///
/// Core modules provide infrastructure (database pool) and are initialized first and
/// stopped last. Custom modules provide the resources served over HTTP.
pub struct ModuleRegistry {
    core_modules: Vec<Arc<dyn Module>>,
    custom_modules: Vec<Arc<dyn Module>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self {
            core_modules: Vec::new(),
            custom_modules: Vec::new(),
        }
    }

    pub fn register_core(&mut self, module: Arc<dyn Module>) {
        self.core_modules.push(module);
    }

    pub fn register_custom(&mut self, module: Arc<dyn Module>) {
        self.custom_modules.push(module);
    }

    /// All registered modules, core first
    pub fn modules(&self) -> Vec<&Arc<dyn Module>> {
        self.core_modules
            .iter()
            .chain(self.custom_modules.iter())
            .collect()
    }

    pub fn core_module_count(&self) -> usize {
        self.core_modules.len()
    }

    pub fn custom_module_count(&self) -> usize {
        self.custom_modules.len()
    }

    fn ordered_core(&self) -> impl DoubleEndedIterator<Item = &Arc<dyn Module>> {
        CORE_MODULE_ORDER.iter().filter_map(|&name| {
            self.core_modules
                .iter()
                .find(|module| module.name() == name)
        })
    }

    /// Initialize core modules, then custom modules
    pub async fn init_all(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!("initializing core modules in order: {:?}", CORE_MODULE_ORDER);
        for module in self.ordered_core() {
            tracing::info!(module = module.name(), "initializing core module");
            module
                .init(ctx)
                .await
                .with_context(|| format!("failed to initialize core module '{}'", module.name()))?;
        }

        tracing::info!("initializing {} custom modules", self.custom_modules.len());
        for module in &self.custom_modules {
            tracing::info!(module = module.name(), "initializing custom module");
            module.init(ctx).await.with_context(|| {
                format!("failed to initialize custom module '{}'", module.name())
            })?;
        }

        Ok(())
    }

    /// Start core modules, then custom modules
    pub async fn start_all(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        for module in self.ordered_core() {
            tracing::info!(module = module.name(), "starting core module");
            module
                .start(ctx)
                .await
                .with_context(|| format!("failed to start core module '{}'", module.name()))?;
        }

        for module in &self.custom_modules {
            tracing::info!(module = module.name(), "starting custom module");
            module
                .start(ctx)
                .await
                .with_context(|| format!("failed to start custom module '{}'", module.name()))?;
        }

        Ok(())
    }

    /// Stop custom modules in reverse registration order, then core modules in reverse core order
    pub async fn stop_all(&self) -> anyhow::Result<()> {
        tracing::info!("stopping {} custom modules", self.custom_modules.len());
        for module in self.custom_modules.iter().rev() {
            tracing::info!(module = module.name(), "stopping custom module");
            module
                .stop()
                .await
                .with_context(|| format!("failed to stop custom module '{}'", module.name()))?;
        }

        tracing::info!("stopping core modules in reverse order");
        for module in self.ordered_core().rev() {
            tracing::info!(module = module.name(), "stopping core module");
            module
                .stop()
                .await
                .with_context(|| format!("failed to stop core module '{}'", module.name()))?;
        }

        Ok(())
    }

    /// Collect schema statements from all modules, sorted by module name then statement id
    pub fn collect_schema(&self) -> Vec<(String, SchemaStatement)> {
        let mut statements: Vec<(String, SchemaStatement)> = self
            .modules()
            .into_iter()
            .flat_map(|module| {
                let name = module.name().to_string();
                module
                    .schema()
                    .into_iter()
                    .map(move |statement| (name.clone(), statement))
            })
            .collect();

        statements.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.id.cmp(b.1.id)));
        statements
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use std::sync::Mutex;

    struct RecordingModule {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingModule {
        fn record(&self, event: &str) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}", event, self.name));
        }
    }

    #[async_trait::async_trait]
    impl Module for RecordingModule {
        fn name(&self) -> &'static str {
            self.name
        }

        fn schema(&self) -> Vec<SchemaStatement> {
            vec![
                SchemaStatement {
                    id: "002_index",
                    ddl: "CREATE INDEX IF NOT EXISTS t_idx ON t (id);",
                },
                SchemaStatement {
                    id: "001_table",
                    ddl: "CREATE TABLE IF NOT EXISTS t (id INT);",
                },
            ]
        }

        async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
            self.record("init");
            Ok(())
        }

        async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
            self.record("start");
            Ok(())
        }

        async fn stop(&self) -> anyhow::Result<()> {
            self.record("stop");
            Ok(())
        }
    }

    fn module(name: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Arc<dyn Module> {
        Arc::new(RecordingModule {
            name,
            log: Arc::clone(log),
        })
    }

    #[test]
    fn empty_registry_has_no_modules_or_schema() {
        let registry = ModuleRegistry::new();
        assert!(registry.modules().is_empty());
        assert!(registry.collect_schema().is_empty());
    }

    #[test]
    fn schema_is_sorted_by_module_then_id() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ModuleRegistry::new();
        registry.register_custom(module("books", &log));
        registry.register_core(module("db", &log));

        let ids: Vec<(String, &str)> = registry
            .collect_schema()
            .into_iter()
            .map(|(module, statement)| (module, statement.id))
            .collect();

        assert_eq!(
            ids,
            vec![
                ("books".to_string(), "001_table"),
                ("books".to_string(), "002_index"),
                ("db".to_string(), "001_table"),
                ("db".to_string(), "002_index"),
            ]
        );
    }

    #[test]
    fn counts_track_core_and_custom_separately() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ModuleRegistry::new();
        registry.register_core(module("db", &log));
        registry.register_custom(module("books", &log));

        let names: Vec<&str> = registry.modules().iter().map(|module| module.name()).collect();
        assert_eq!(names, vec!["db", "books"]);
        assert_eq!(registry.core_module_count(), 1);
        assert_eq!(registry.custom_module_count(), 1);
    }

    #[tokio::test]
    async fn lifecycle_runs_core_first_and_stops_in_reverse() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ModuleRegistry::new();
        registry.register_custom(module("books", &log));
        registry.register_custom(module("authors", &log));
        registry.register_core(module("db", &log));

        let settings = Settings::default();
        let ctx = InitCtx {
            settings: &settings,
        };

        registry.init_all(&ctx).await.unwrap();
        registry.start_all(&ctx).await.unwrap();
        registry.stop_all().await.unwrap();

        let events = log.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                "init:db",
                "init:books",
                "init:authors",
                "start:db",
                "start:books",
                "start:authors",
                "stop:authors",
                "stop:books",
                "stop:db",
            ]
        );
    }
}
