//! Wayfinder command line
//!
//! Renders menus declared in a menu file for a given current URL.
//!
//! Usage:
//!   wayfinder render main --config menus.yml --current /admin/users --param userId=42
//!   wayfinder list --config menus.yml

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use wayfinder_kernel::Config;
use wayfinder_kernel::access::{Gate, GateAccessHandler, Subject};
use wayfinder_kernel::locale::CatalogTranslator;
use wayfinder_kernel::menu::{DynamicParams, MenuGenerator, MenuRegistry};
use wayfinder_kernel::routing::RouteUrlResolver;
use wayfinder_kernel::theme::MenuRenderer;

/// Navigation menu generator.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate and render a menu.
    Render(RenderArgs),

    /// List the menus declared in the menu file.
    List {
        /// Menu file (overrides WAYFINDER_MENUS).
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Name of the menu to render.
    menu: String,

    /// Menu file (overrides WAYFINDER_MENUS).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Page being viewed: an absolute URL, a path under the base URL
    /// (`/admin/users`), a query or fragment (`?tab=2`), or `//host/path`.
    #[arg(long)]
    current: Option<String>,

    /// Application root URL (overrides WAYFINDER_BASE_URL).
    #[arg(long)]
    base_url: Option<String>,

    /// Dynamic parameter as key=value; may be repeated.
    #[arg(long = "param", value_parser = parse_key_value)]
    params: Vec<(String, String)>,

    /// Translation catalog (overrides WAYFINDER_TRANSLATIONS).
    #[arg(long)]
    translations: Option<PathBuf>,

    /// Directory with custom menu templates.
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
    format: OutputFormat,

    /// CSS class of the outer list.
    #[arg(long)]
    class: Option<String>,

    /// Render for a logged-in user.
    #[arg(long)]
    logged_in: bool,

    /// Role of the user; may be repeated (implies --logged-in).
    #[arg(long = "role")]
    roles: Vec<String>,

    /// Permission of the user; may be repeated.
    #[arg(long = "permission")]
    permissions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Html,
    Json,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;

    match cli.command {
        Command::Render(args) => cmd_render(&config, args),
        Command::List { config: path } => {
            cmd_list(&path.unwrap_or_else(|| config.menus_path.clone()))
        }
    }
}

fn cmd_render(config: &Config, args: RenderArgs) -> Result<()> {
    let menus_path = args.config.clone().unwrap_or_else(|| config.menus_path.clone());
    let registry = MenuRegistry::from_file(&menus_path)
        .with_context(|| format!("failed to load menus from {}", menus_path.display()))?;

    let base_url = args.base_url.as_deref().unwrap_or(&config.base_url);
    let mut urls = RouteUrlResolver::new(base_url, registry.routes().clone())
        .context("invalid base url")?;
    if let Some(current) = &args.current {
        urls = urls.with_current(absolute_url(base_url, current)?);
    }

    let mut generator = MenuGenerator::new(Arc::new(urls)).with_options(config.menu_options());

    let translations = args
        .translations
        .clone()
        .or_else(|| config.translations_path.clone());
    if config.translate_texts
        && let Some(path) = translations
    {
        let translator = CatalogTranslator::from_file(&path)?;
        generator = generator.with_translator(Arc::new(translator));
    }

    if config.control_access {
        let subject = if args.logged_in || !args.roles.is_empty() {
            Subject::authenticated(args.roles.clone())
        } else {
            Subject::anonymous()
        }
        .with_permissions(args.permissions.clone());

        let handler = GateAccessHandler::new(Arc::new(Gate::permission_based()), subject);
        generator = generator.with_access_handler(Arc::new(handler));
    }

    generator.set_params(args.params.into_iter().collect::<DynamicParams>());

    let items = registry
        .make(&args.menu, &mut generator)
        .with_context(|| format!("failed to generate menu '{}'", args.menu))?;

    info!(
        menu = %args.menu,
        items = items.len(),
        current = ?generator.current_id(),
        "menu generated"
    );

    let output = match args.format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&items).context("failed to serialize menu")?
        }
        OutputFormat::Html => {
            let renderer = match &args.templates {
                Some(dir) => MenuRenderer::from_dir(dir)?,
                None => MenuRenderer::new()?,
            };
            renderer.render(&args.menu, &items, args.class.as_deref())?
        }
    };

    println!("{output}");
    Ok(())
}

fn cmd_list(path: &std::path::Path) -> Result<()> {
    let registry = MenuRegistry::from_file(path)
        .with_context(|| format!("failed to load menus from {}", path.display()))?;

    if registry.is_empty() {
        println!("No menus found.");
        return Ok(());
    }

    println!("{:<20} {:<8}", "MENU", "ITEMS");
    println!("{}", "-".repeat(29));
    for name in registry.names() {
        let count = registry.get(name).map(|items| items.len()).unwrap_or_default();
        println!("{name:<20} {count:<8}");
    }

    Ok(())
}

/// Resolve the `--current` value against `base_url`.
///
/// Absolute URLs are kept, paths are appended to the base URL so a base
/// sub-path survives, and query strings, fragments and scheme-relative URLs
/// follow standard URL resolution.
fn absolute_url(base_url: &str, url: &str) -> Result<String> {
    if let Ok(parsed) = Url::parse(url)
        && parsed.has_host()
    {
        return Ok(url.to_string());
    }

    if url.starts_with("//") || url.starts_with(['?', '#']) {
        let base = Url::parse(base_url).context("invalid base url")?;
        let joined = base
            .join(url)
            .with_context(|| format!("invalid current url '{url}'"))?;
        return Ok(joined.to_string());
    }

    let path = url.trim_start_matches('/');
    let base = base_url.trim_end_matches('/');
    if path.is_empty() {
        Ok(base.to_string())
    } else {
        Ok(format!("{base}/{path}"))
    }
}

fn parse_key_value(value: &str) -> Result<(String, String), String> {
    let (key, val) = value
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{value}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty parameter name in '{value}'"));
    }
    Ok((key.to_string(), val.to_string()))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn relative_current_urls_join_base() {
        assert_eq!(
            absolute_url("http://localhost:3000/", "/admin/users").unwrap(),
            "http://localhost:3000/admin/users"
        );
        assert_eq!(absolute_url("http://localhost:3000", "/").unwrap(), "http://localhost:3000");
        assert_eq!(
            absolute_url("http://localhost:3000/app", "users").unwrap(),
            "http://localhost:3000/app/users"
        );
    }

    #[test]
    fn absolute_and_special_current_urls() {
        assert_eq!(
            absolute_url("http://localhost:3000", "https://other.test/x").unwrap(),
            "https://other.test/x"
        );
        assert_eq!(
            absolute_url("http://localhost:3000", "?tab=2").unwrap(),
            "http://localhost:3000/?tab=2"
        );
        assert_eq!(
            absolute_url("https://localhost:3000", "//cdn.test/x").unwrap(),
            "https://cdn.test/x"
        );
        // a host:port without a scheme is a path, not a URL
        assert_eq!(
            absolute_url("http://localhost:3000", "localhost:3000/x").unwrap(),
            "http://localhost:3000/localhost:3000/x"
        );
        assert!(absolute_url("not a url", "?tab=2").is_err());
    }

    #[test]
    fn key_value_params() {
        assert_eq!(
            parse_key_value("userId=42").unwrap(),
            ("userId".to_string(), "42".to_string())
        );
        assert_eq!(
            parse_key_value("q=a=b").unwrap(),
            ("q".to_string(), "a=b".to_string())
        );
        assert!(parse_key_value("userId").is_err());
        assert!(parse_key_value("=42").is_err());
    }

    #[test]
    fn cli_parses_render() {
        let cli = Cli::try_parse_from([
            "wayfinder",
            "render",
            "main",
            "--current",
            "/admin",
            "--param",
            "userId=42",
            "--role",
            "editor",
            "--format",
            "json",
        ])
        .unwrap();

        let Command::Render(args) = cli.command else {
            panic!("expected render command");
        };
        assert_eq!(args.menu, "main");
        assert_eq!(args.params, vec![("userId".to_string(), "42".to_string())]);
        assert_eq!(args.roles, vec!["editor".to_string()]);
        assert_eq!(args.format, OutputFormat::Json);
    }
}
