use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use wauramoon_site::config::{self, SiteConfig};
use wauramoon_site::generate::{self, Route, Target};
use wauramoon_site::output;
use wauramoon_site::store::Dataset;
use wauramoon_site::views::Theme;

#[derive(Parser)]
#[command(name = "wauramoon-site")]
#[command(about = "Static site generator for the gallery wauramoon catalog")]
#[command(long_about = "\
Static site generator for the gallery wauramoon catalog

Content comes from a dataset export of the content studio: one JSON document
per line. Every page is rendered in Simplified Chinese, Traditional Chinese
and English.

Content structure:

  content/
  ├── config.toml                  # Site config (store, languages, colors)
  ├── dataset.ndjson               # Dataset export ([store] dataset)
  └── assets/                      # Static assets (favicon, fonts) → copied to output root

Generated routes (per language):

  /{lang}/                         Home page sections
  /{lang}/category/{id}/           Category page
  /{lang}/category/{parent}/{id}/  Sub-category under a specific parent
  /{lang}/product/{id}/            Product page
  /{lang}/event/{id}/              Event page

Set RUST_LOG=debug to trace membership resolution.

Run 'wauramoon-site gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render every page of the site into the output directory
    Build,
    /// Validate config and dataset without building
    Check,
    /// Resolve a single page and print it
    Render {
        /// Site path, e.g. /en/category/cat-cups/
        path: String,
        /// Parent category to resolve a sub-category under
        #[arg(long)]
        parent: Option<String>,
        /// Print the resolved page data as JSON instead of HTML
        #[arg(long)]
        json: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            println!("==> Stage 1: Loading {}", cli.source.display());
            let (site_config, dataset) = open_site(&cli.source)?;
            output::print_check_output(&dataset, &site_config);

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            init_thread_pool(&site_config.processing);
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_generate_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let report = generate::generate(
                &dataset,
                &site_config,
                &cli.source,
                &cli.output,
                Some(tx),
            )?;
            printer.join().ok();
            output::print_generate_report(&report, &cli.output);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let (site_config, dataset) = open_site(&cli.source)?;
            output::print_check_output(&dataset, &site_config);
            println!("==> Content is valid");
        }
        Command::Render { path, parent, json } => {
            let (site_config, dataset) = open_site(&cli.source)?;
            let mut route = Route::parse(&path, site_config.languages.default)
                .ok_or_else(|| format!("not a site path: {path}"))?;
            if let (Target::Category { parent: hint, .. }, Some(explicit)) = (&mut route.target, parent) {
                *hint = Some(explicit);
            }
            if json {
                let data = generate::route_json(&dataset, &route)?;
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                let theme = Theme::from_config(&site_config);
                let markup = generate::render_route(&dataset, &theme, &route)
                    .ok_or_else(|| format!("page not found: {}", route.href()))?;
                println!("{}", markup.into_string());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load and validate the site config, then open its dataset.
///
/// Fails before any page is resolved when the store is unconfigured or missing.
fn open_site(source: &Path) -> Result<(SiteConfig, Dataset), Box<dyn std::error::Error>> {
    let site_config = config::load_config(source)?;
    let dataset = Dataset::connect(source, &site_config.store)?;
    Ok((site_config, dataset))
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
