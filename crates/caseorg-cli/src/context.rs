use crate::types::OutputFormat;
use anyhow::{Context, Result};
use caseorg_client::HttpBackend;
use caseorg_core::{Config, RendererSettings, ResultsRenderer, SelectionListConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

/// Per-invocation state shared by every handler: resolved configuration,
/// the backend and the runtime that drives it.
pub struct ExecutionContext {
    data_dir: PathBuf,
    config: Config,
    backend: Arc<HttpBackend>,
    runtime: Runtime,
    pub format: OutputFormat,
}

/// Command-line values that take precedence over `config.toml`
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub server: Option<String>,
    pub admin: bool,
}

impl Overrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(server) = &self.server {
            config.server.base_url = server.trim_end_matches('/').to_string();
        }
        if self.admin {
            config.viewer.elevated = true;
        }
    }
}

impl ExecutionContext {
    pub fn new(data_dir: PathBuf, overrides: &Overrides, format: OutputFormat) -> Result<Self> {
        let config_path = Config::path_in(&data_dir);
        let mut config = Config::load_from(&config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?;
        overrides.apply(&mut config);

        let backend = HttpBackend::new(
            config.server.base_url.clone(),
            Duration::from_secs(config.server.timeout_secs),
        )
        .context("Failed to set up the HTTP client")?;
        let backend = Arc::new(backend);
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("Failed to start async runtime")?;

        Ok(Self {
            data_dir,
            config,
            backend,
            runtime,
            format,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn backend(&self) -> Arc<HttpBackend> {
        Arc::clone(&self.backend)
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Run a future to completion on the context's runtime
    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    pub fn renderer(&self) -> ResultsRenderer {
        ResultsRenderer::new(RendererSettings::from_config(&self.config))
    }

    pub fn picker_config(&self) -> SelectionListConfig {
        SelectionListConfig::from(&self.config.picker)
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}
