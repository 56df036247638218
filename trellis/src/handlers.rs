use anyhow::{Context, Result, anyhow, bail};
use clap::ArgMatches;
use colored::Colorize;
use std::path::PathBuf;
use tracing::Level;
use trellis_core::report::{
    ReportFormat, gather_report_data, generate_check_report, generate_document_report,
    generate_report, save_report,
};
use trellis_core::{ContentGraph, IndexOptions, Neighborhood, execute_index};

/// Flags shared by every subcommand
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub quiet: bool,
    pub verbosity: u8,
    pub extension: String,
    pub threads: usize,
}

impl GlobalOptions {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            quiet: matches.get_flag("quiet"),
            verbosity: matches.get_count("verbose"),
            extension: matches
                .get_one::<String>("extension")
                .cloned()
                .unwrap_or_else(|| "md".to_string()),
            threads: matches.get_one::<usize>("threads").copied().unwrap_or(8),
        }
    }
}

/// Log level for a `-v` count; `--quiet` wins.
pub fn log_level(verbosity: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

pub fn init_logging(verbosity: u8, quiet: bool) {
    // A subscriber may already be installed when running under tests.
    let _ = tracing_subscriber::fmt()
        .with_max_level(log_level(verbosity, quiet))
        .with_writer(std::io::stderr)
        .try_init();
}

/// Expand `~` in a user-supplied path.
pub fn expand_root(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

fn root_from(args: &ArgMatches) -> PathBuf {
    let raw = args
        .get_one::<String>("ROOT")
        .map(String::as_str)
        .unwrap_or("./content");
    expand_root(raw)
}

fn id_from(args: &ArgMatches) -> Result<&str> {
    args.get_one::<String>("ID")
        .map(String::as_str)
        .ok_or_else(|| anyhow!("Missing document identifier"))
}

pub async fn load_graph(root: PathBuf, global: &GlobalOptions) -> Result<ContentGraph> {
    let options = IndexOptions {
        root: root.clone(),
        extension: global.extension.clone(),
        threads: global.threads,
        show_progress_bars: !global.quiet,
    };

    execute_index(options, None, None)
        .await
        .with_context(|| format!("Failed to index {}", root.display()))
}

fn print_divider() {
    eprintln!("{}", "═".repeat(60).bright_blue().bold());
}

pub fn render_document(graph: &ContentGraph, id: &str, json: bool) -> Result<String> {
    graph.require(id)?;
    let deep = graph
        .get_deep(id)
        .ok_or_else(|| anyhow!("Document not found: {}", id))?;

    if json {
        Ok(serde_json::to_string_pretty(&deep)?)
    } else {
        Ok(generate_document_report(&deep))
    }
}

pub fn render_neighborhood(neighborhood: &Neighborhood, format: &str) -> Result<String> {
    match format {
        "json" => Ok(serde_json::to_string_pretty(neighborhood)?),
        "elements" => Ok(serde_json::to_string_pretty(&neighborhood.to_elements())?),
        "dot" => Ok(neighborhood.to_dot()),
        other => bail!("Unsupported graph format: {}", other),
    }
}

pub fn render_search_feed(graph: &ContentGraph) -> Result<String> {
    Ok(serde_json::to_string_pretty(&graph.search_documents())?)
}

pub async fn handle_index(args: &ArgMatches, global: &GlobalOptions) -> Result<()> {
    let root = root_from(args);
    let format_str = args
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");
    let format = ReportFormat::from_str(format_str)
        .ok_or_else(|| anyhow!("Unsupported report format: {}", format_str))?;
    let include_tree = args.get_flag("include-tree");
    let output = args.get_one::<PathBuf>("output");

    if !global.quiet {
        print_divider();
        eprintln!(
            "{} Indexing {}",
            "→".blue(),
            root.display().to_string().bright_white()
        );
        eprintln!("{} Workers: {}", "→".blue(), global.threads);
        print_divider();
    }

    let graph = load_graph(root.clone(), global).await?;
    let data = gather_report_data(&graph, &root.display().to_string(), include_tree);
    let report = generate_report(&data, format).context("Failed to render report")?;

    match output {
        Some(path) => {
            save_report(&report, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            if !global.quiet {
                eprintln!(
                    "{} Report saved to {}",
                    "✓".green().bold(),
                    path.display().to_string().bright_white()
                );
            }
        }
        None => print!("{}", report),
    }

    Ok(())
}

pub async fn handle_show(args: &ArgMatches, global: &GlobalOptions) -> Result<()> {
    let id = id_from(args)?;
    let graph = load_graph(root_from(args), global).await?;
    println!("{}", render_document(&graph, id, args.get_flag("json"))?);
    Ok(())
}

pub async fn handle_graph(args: &ArgMatches, global: &GlobalOptions) -> Result<()> {
    let id = id_from(args)?;
    let format = args
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("json");

    let graph = load_graph(root_from(args), global).await?;
    let focal = graph.require(id)?;
    let neighborhood = trellis_core::expand(focal, &graph);

    println!("{}", render_neighborhood(&neighborhood, format)?);
    Ok(())
}

pub async fn handle_search_docs(args: &ArgMatches, global: &GlobalOptions) -> Result<()> {
    let graph = load_graph(root_from(args), global).await?;
    println!("{}", render_search_feed(&graph)?);
    Ok(())
}

pub async fn handle_check(args: &ArgMatches, global: &GlobalOptions) -> Result<()> {
    let graph = load_graph(root_from(args), global).await?;
    let stats = graph.stats();

    print!("{}", generate_check_report(&graph));

    let broken = stats.dangling + stats.unresolved;
    if broken > 0 {
        bail!("{} broken links found", broken);
    }

    if !global.quiet {
        eprintln!("{} No broken links", "✓".green().bold());
    }
    Ok(())
}
