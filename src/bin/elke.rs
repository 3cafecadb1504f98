use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use elke::storage;
use elke::{DataTree, RenderOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "elke")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a tree from a JSON or YAML file and print its canonical text.
    Build {
        file: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        annotate: bool,
        #[arg(long)]
        output: Option<String>,
    },
    /// Print every node of the tree as JSON.
    Nodes {
        file: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Print the node at an address.
    Get {
        file: String,
        address: String,
        #[arg(long)]
        name: Option<String>,
    },
}

fn build(file: &str, name: Option<String>) -> Result<DataTree> {
    let graph = storage::load_graph(file)?;
    let name = name.unwrap_or_else(|| storage::default_root_name(file));
    Ok(DataTree::build(&name, &graph)?)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            file,
            name,
            annotate,
            output,
        } => {
            let tree = build(&file, name)?;
            let options = RenderOptions {
                annotate_types: annotate,
            };
            match output {
                Some(path) => {
                    if storage::exists(&path) {
                        println!("Overwriting {}", path);
                    }
                    storage::save_tree(&path, &tree, &options)?;
                    println!("Wrote {} nodes to {}", tree.len(), path);
                }
                None => print!("{}", tree.serialize_with(&options)),
            }
        }
        Commands::Nodes { file, name } => {
            let tree = build(&file, name)?;
            let nodes: Vec<_> = tree.iter().collect();
            println!("{}", serde_json::to_string_pretty(&nodes)?);
        }
        Commands::Get {
            file,
            address,
            name,
        } => {
            let tree = build(&file, name)?;
            let node = tree
                .lookup(&address)
                .ok_or_else(|| anyhow!("Node not found: {}", address))?;
            println!("{}", serde_json::to_string_pretty(node)?);
        }
    }

    Ok(())
}
