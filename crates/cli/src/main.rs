use api_shared::{dispatch, GatewayRequest};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use repo_core::classify::{classification, is_recognized_file};
use repo_core::constants::ENV_STORAGE_URL;
use repo_core::render::render_row;
use repo_core::{ArtifactStore, CoordinateParser, ReadOutcome, RepoConfig, RepositoryService};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "lambda-repo")]
#[command(about = "Lambda Repo Maven repository CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a repository path to its coordinate
    Parse {
        /// Repository path, e.g. org/slf4j/slf4j-api/2.0.0/slf4j-api-2.0.0.jar
        path: String,
    },
    /// Show how a file name is classified
    Classify {
        /// File name
        name: String,
    },
    /// List a directory
    Ls {
        /// Storage URL (defaults to LAMBDA_REPO_STORAGE_URL)
        #[arg(long)]
        storage: Option<String>,
        /// Directory path (defaults to the root)
        path: Option<String>,
    },
    /// Download a file
    Get {
        #[arg(long)]
        storage: Option<String>,
        /// Repository path of the file
        path: String,
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Upload a file
    Put {
        #[arg(long)]
        storage: Option<String>,
        /// Repository path to store at
        path: String,
        /// Local file to upload
        file: PathBuf,
    },
    /// Run a gateway event and print the response
    Invoke {
        #[arg(long)]
        storage: Option<String>,
        /// JSON event file
        event: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { path } => {
            let config = load_config(None)?;
            let parser = CoordinateParser::new(config.metadata_checksums().to_vec());
            match parser.parse(&path) {
                Ok(parsed) => println!("{}", serde_json::to_string_pretty(&parsed)?),
                Err(e) => eprintln!("Error parsing {}: {}", path, e),
            }
        }
        Commands::Classify { name } => {
            let config = load_config(None)?;
            let parser = CoordinateParser::new(config.metadata_checksums().to_vec());
            println!("{}", classify_report(&name, &parser));
        }
        Commands::Ls { storage, path } => {
            let service = open_service(storage)?;
            match service.read(path.as_deref(), "/").await? {
                ReadOutcome::Listing(listing) => println!("{}", listing_rows(&listing.entries)?),
                _ => eprintln!("Not a directory: {}", path.unwrap_or_default()),
            }
        }
        Commands::Get { storage, path, out } => {
            let service = open_service(storage)?;
            match service.read(Some(&path), &path).await? {
                ReadOutcome::Artifact(artifact) => match out {
                    Some(file) => {
                        std::fs::write(&file, &artifact.body)?;
                        println!("Wrote {} bytes to {}", artifact.body.len(), file.display());
                    }
                    None => std::io::stdout().write_all(&artifact.body)?,
                },
                _ => eprintln!("Not a file: {} (use `ls` for directories)", path),
            }
        }
        Commands::Put {
            storage,
            path,
            file,
        } => {
            let service = open_service(storage)?;
            let body = Bytes::from(std::fs::read(&file)?);
            let parsed = service.write(&path, body).await?;
            println!("Uploaded {}", path);
            println!("{}", serde_json::to_string_pretty(&parsed)?);
        }
        Commands::Invoke { storage, event } => {
            let service = open_service(storage)?;
            let event: GatewayRequest = serde_json::from_str(&std::fs::read_to_string(&event)?)?;
            let response = dispatch(&service, event).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

/// Environment configuration, with `--storage` taking precedence over the storage URL.
fn load_config(storage: Option<String>) -> Result<RepoConfig, Box<dyn std::error::Error>> {
    Ok(RepoConfig::from_lookup(|name| {
        if name == ENV_STORAGE_URL && storage.is_some() {
            return storage.clone();
        }
        std::env::var(name).ok()
    })?)
}

fn open_service(storage: Option<String>) -> Result<RepositoryService, Box<dyn std::error::Error>> {
    let config = load_config(storage)?;
    let store = ArtifactStore::from_url(config.storage_url())?;
    Ok(RepositoryService::new(store, Arc::new(config)))
}

fn classify_report(name: &str, parser: &CoordinateParser) -> String {
    format!(
        "classification: {}\nrecognized: {}\nmetadata: {}",
        classification(name),
        is_recognized_file(name),
        parser.is_metadata_file(name)
    )
}

fn listing_rows(entries: &[repo_core::DirectoryEntry]) -> Result<String, askama::Error> {
    Ok(entries
        .iter()
        .map(render_row)
        .collect::<Result<Vec<_>, _>>()?
        .join("\n"))
}
