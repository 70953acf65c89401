use anyhow::Context;
use bookshelf_kernel::settings::{Settings, StoreBackend};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about = "Book catalogue service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP service
    Serve {
        /// Storage backend, overriding `store.backend`
        #[arg(long)]
        backend: Option<StoreBackend>,
        /// Listen port, overriding `server.port`
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the PostgreSQL schema the service bootstraps
    Schema {
        /// Also execute it against `database.url`
        #[arg(long)]
        apply: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve { backend, port } => {
            if let Some(backend) = backend {
                settings.store.backend = backend;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            bookshelf_app::run(settings).await
        }
        Command::Schema { apply } => {
            let statements: Vec<(String, _)> = bookshelf_app::books::schema()
                .into_iter()
                .map(|statement| ("books".to_string(), statement))
                .collect();

            for (module, statement) in &statements {
                println!("-- {}/{}", module, statement.id);
                println!("{}", statement.ddl.trim());
            }

            if apply {
                let pool = bookshelf_db::connect(&settings.database).await?;
                bookshelf_db::ensure_schema(&pool, &statements).await?;
                pool.close().await;
                tracing::info!("schema applied");
            }
            Ok(())
        }
    }
}
