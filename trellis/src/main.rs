use colored::Colorize;
use trellis::commands::command_argument_builder;
use trellis::handlers::{
    GlobalOptions, handle_check, handle_graph, handle_index, handle_search_docs, handle_show,
    init_logging,
};
use trellis_core::print_banner;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let global = GlobalOptions::from_matches(&chosen_command);

    init_logging(global.verbosity, global.quiet);

    // Show banner unless --quiet flag is set
    if !global.quiet {
        print_banner();
    }

    let result = match chosen_command.subcommand() {
        Some(("index", primary_command)) => handle_index(primary_command, &global).await,
        Some(("show", primary_command)) => handle_show(primary_command, &global).await,
        Some(("graph", primary_command)) => handle_graph(primary_command, &global).await,
        Some(("search-docs", primary_command)) => {
            handle_search_docs(primary_command, &global).await
        }
        Some(("check", primary_command)) => handle_check(primary_command, &global).await,
        // No subcommand provided, just show the banner
        None => Ok(()),
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
