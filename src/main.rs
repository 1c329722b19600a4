use clap::{Parser, Subcommand};
use quire::config::{self, SiteConfig};
use quire::document::{Document, find_output_collisions, sort_documents};
use quire::frontmatter::YamlFrontMatter;
use quire::load::{LoadSettings, load_documents};
use quire::output;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "quire")]
#[command(about = "Load a static site's content into routed documents")]
#[command(long_about = "\
Load a static site's content into routed documents

File names carry the routing: a date or order prefix, the output
extension, and any rendering extensions. Front matter overrides any
computed value.

Site structure:

  site/
  ├── config.toml                        # Site config (optional)
  └── documents/
      ├── About Us.html.md               # → about-us/index.html, /about-us/
      ├── feed.xml.liquid                # → feed.xml
      ├── blog/
      │   └── 2023-5-14-Hello.html.md    # → blog/2023/5/14/hello/index.html
      └── guide/
          ├── 01.intro.html.md           # order 1
          └── 02.setup.html.md           # order 2

Front matter keys with meaning:
  output, id, parent, order, paginate, title, date, draft

Run 'quire gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Site root (holds config.toml and the content directory)
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load documents and print the inventory
    Load,
    /// Write loaded documents as JSON
    Manifest {
        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Validate content without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Load => {
            let documents = load_site(&cli.source)?;
            output::print_load_output(&documents);
        }
        Command::Manifest { out } => {
            let documents = load_site(&cli.source)?;
            let json = serde_json::to_string_pretty(&documents)?;
            match out {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, json)?;
                    log::info!("Wrote {} documents to {}", documents.len(), path.display());
                }
                None => println!("{json}"),
            }
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let documents = load_site(&cli.source)?;
            let collisions = find_output_collisions(&documents);
            if !collisions.is_empty() {
                output::print_collisions(&collisions);
                return Err(format!("{} output paths are claimed more than once", collisions.len()).into());
            }
            println!("==> {} documents are valid", documents.len());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load config, size the pool, and load every document, sorted.
fn load_site(site_root: &Path) -> Result<Vec<Document>, Box<dyn std::error::Error>> {
    let site_config: SiteConfig = config::load_config(site_root)?;
    init_thread_pool(&site_config.processing);

    let settings = LoadSettings::from_config(site_root, &site_config);
    let mut documents = load_documents(&settings, &YamlFrontMatter)?;
    sort_documents(&mut documents);
    Ok(documents)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
