use clap::{Parser, Subcommand};
use docs_router::cache::ManifestError;
use docs_router::config::{self, ConfigError, SiteConfig};
use docs_router::fetch::{DirFetcher, Fetch};
use docs_router::manifest::{check_fragments, parse_manifest, validate};
use docs_router::output;
use docs_router::paths::parse_query;
use docs_router::router::with_default_menu;
use docs_router::surface::Document;
use docs_router::types::{Manifest, Route};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Route selection shared by `resolve` and `render`.
#[derive(clap::Args, Clone)]
struct RouteArgs {
    /// Full query string, as in `?cat=01_Intro&page=1.1`
    #[arg(long, conflicts_with_all = ["cat", "subcat", "page"])]
    query: Option<String>,

    /// Category key
    #[arg(long)]
    cat: Option<String>,

    /// Subcategory key (ignored without --cat)
    #[arg(long)]
    subcat: Option<String>,

    /// Page identifier
    #[arg(long)]
    page: Option<String>,

    /// Location path of the entry page, as in `/docs/index.html`. Its
    /// directory replaces `base_path` for every fetch.
    #[arg(long)]
    location: Option<String>,
}

impl RouteArgs {
    fn route(&self) -> Route {
        match &self.query {
            Some(query) => parse_query(query),
            None => Route::new(self.cat.as_deref(), self.subcat.as_deref(), self.page.as_deref()),
        }
    }

    /// Site config with the entry page location applied, if one was given.
    fn config(&self, site: &Path) -> Result<SiteConfig, ConfigError> {
        let mut config = config::load_config(site)?;
        if let Some(location) = &self.location {
            config.apply_location(location);
        }
        Ok(config)
    }
}

#[derive(Parser)]
#[command(name = "docs-router")]
#[command(about = "Route, render and check a fragment-based documentation site")]
#[command(long_about = "\
Route, render and check a fragment-based documentation site

The site is a directory of HTML fragments indexed by a JSON manifest.
Routes are query strings: ?cat=<category>[&subcat=<subcategory>][&page=<page>].

Site structure:

  site/
  ├── config.toml                     # Optional, overrides stock defaults
  ├── data/articles.json              # Manifest: categories → articles
  ├── includes/
  │   ├── header.html                 # Layout partials
  │   └── footer.html
  └── content/
      ├── home.html                   # Landing page (no cat, no page)
      ├── about.html                  # Top-level page (?page=about)
      └── articles/
          ├── 01_Intro/1.1.html       # ?cat=01_Intro&page=1.1
          └── 02_Frontend/01_HTML/2.1.1.html

Set RUST_LOG=debug to trace each load phase.

Run 'docs-router gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Site root directory
    #[arg(long, default_value = ".", global = true)]
    site: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show what a route resolves to: fragment, breadcrumb, neighbours
    Resolve(RouteArgs),
    /// Render a route to a complete HTML page
    Render {
        #[command(flatten)]
        route: RouteArgs,

        /// Write the page here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List every article in reading order
    Order,
    /// Validate the manifest and its fragments
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("manifest: {0}")]
    Manifest(#[from] ManifestError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("check found {0} issue(s)")]
    Check(usize),
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Resolve(args) => {
            let config = args.config(&cli.site)?;
            let fetcher = DirFetcher::new(&cli.site);
            let manifest = match read_manifest(&fetcher, &config).await {
                Ok(manifest) => Some(manifest),
                Err(e) => {
                    tracing::warn!(error = %e, "resolving without manifest");
                    None
                }
            };
            output::print_resolve_output(&args.route(), manifest.as_ref(), &config);
        }
        Command::Render { route, output: destination } => {
            let config = route.config(&cli.site)?;
            let router = with_default_menu(DirFetcher::new(&cli.site), config);
            let mut document = Document::full();
            let outcome = router.load(&route.route(), &mut document).await;
            let html = document.to_html().into_string();
            match &destination {
                Some(path) => std::fs::write(path, html)?,
                None => println!("{}", html),
            }
            output::print_render_output(&outcome, destination.as_deref(), router.cache_stats().await);
        }
        Command::Order => {
            let config = config::load_config(&cli.site)?;
            let manifest = read_manifest(&DirFetcher::new(&cli.site), &config).await?;
            output::print_order_output(&manifest);
        }
        Command::Check => {
            let config = config::load_config(&cli.site)?;
            println!("==> Checking {}", cli.site.display());
            let manifest = read_manifest(&DirFetcher::new(&cli.site), &config).await?;
            let mut issues = validate(&manifest);
            let root = cli.site.join(config.base_path.trim_start_matches('/'));
            issues.extend(check_fragments(&manifest, &root));
            output::print_check_output(&manifest, &issues);
            if !issues.is_empty() {
                return Err(CliError::Check(issues.len()));
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

async fn read_manifest(fetcher: &DirFetcher, config: &SiteConfig) -> Result<Manifest, ManifestError> {
    let body = fetcher.fetch_text(&config.site_path(&config.manifest_path)).await?;
    Ok(parse_manifest(&body)?)
}
