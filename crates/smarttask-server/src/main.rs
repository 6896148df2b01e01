use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use smarttask_core::SubtaskRequest;
use smarttask_generator::SubtaskGenerator;
use smarttask_server::config::{GenerationArgs, ServerConfig};
use smarttask_store::TaskStore;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "smarttask", about = "Personal task manager with AI subtask suggestions")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    server: ServerConfig,

    #[command(flatten)]
    generation: GenerationArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest subtasks for a task and print them
    Suggest {
        /// Task title
        #[arg(long)]
        title: String,

        /// Optional task description
        #[arg(long)]
        description: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let generator = SubtaskGenerator::from_config(&cli.generation.to_config());

    match cli.command {
        Some(Commands::Suggest { title, description }) => {
            let req = SubtaskRequest::new(&title, description.as_deref())?;
            match generator.generate(&req).await {
                Ok(resp) => {
                    for (i, subtask) in resp.into_subtasks().into_iter().enumerate() {
                        println!("{}. {subtask}", i + 1);
                    }
                }
                Err(e) => bail!("{e}"),
            }
        }
        None => {
            let addr = cli.server.addr()?;
            let data_file = cli.server.data_file();
            let store = TaskStore::open(&data_file).await?;
            info!("tasks: {}", data_file.display());

            if generator.is_available() {
                info!("subtask generation enabled (model: {})", cli.generation.model);
            } else {
                warn!("subtask generation disabled (no GOOGLE_GENERATIVE_AI_API_KEY)");
            }

            let listener = TcpListener::bind(addr).await?;
            info!("smarttask listening on http://{addr}");

            smarttask_server::serve(listener, store, generator).await?;
        }
    }

    Ok(())
}
