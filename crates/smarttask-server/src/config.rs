use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use smarttask_generator::config::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use smarttask_generator::GeneratorConfig;

#[derive(Debug, Args)]
pub struct ServerConfig {
    /// Address to bind the HTTP server to
    #[arg(long, env = "SMARTTASK_BIND", default_value = "0.0.0.0")]
    pub bind: String,

    /// Port to listen on
    #[arg(long, env = "SMARTTASK_PORT", default_value = "3720")]
    pub port: u16,

    /// JSON file the task list is mirrored to
    #[arg(long, env = "SMARTTASK_DATA")]
    pub data_file: Option<PathBuf>,
}

impl ServerConfig {
    pub fn addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .bind
            .parse()
            .with_context(|| format!("invalid bind address {:?}", self.bind))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn data_file(&self) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(smarttask_store::default_data_path)
    }
}

#[derive(Args)]
pub struct GenerationArgs {
    /// API key for the subtask generation provider
    #[arg(long, env = "GOOGLE_GENERATIVE_AI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model used for subtask generation
    #[arg(long, env = "SMARTTASK_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of the generation provider
    #[arg(long, env = "SMARTTASK_PROVIDER_URL", default_value = DEFAULT_BASE_URL)]
    pub provider_url: String,

    /// Timeout for one generation call (seconds)
    #[arg(
        long,
        env = "SMARTTASK_GENERATION_TIMEOUT",
        default_value = "30",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,
}

impl GenerationArgs {
    pub fn to_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            base_url: self.provider_url.clone(),
            timeout: Duration::from_secs(self.timeout),
        }
    }
}
