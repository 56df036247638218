use crate::CLAP_STYLING;
use clap::{arg, command};

const DEFAULT_ROOT: &str = "./content";

fn root_arg() -> clap::Arg {
    arg!([ROOT])
        .required(false)
        .help("Directory holding the document tree")
        .default_value(DEFAULT_ROOT)
}

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("trellis")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("trellis")
        .about("Backlinks and link neighborhoods for a tree of interlinked documents")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner, progress and log output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Increase log verbosity (repeatable)")
                .required(false)
                .action(clap::ArgAction::Count)
                .global(true),
        )
        .arg(
            arg!(--"extension" <EXT>)
                .required(false)
                .help("File extension marking documents")
                .default_value("md")
                .global(true),
        )
        .arg(
            arg!(-t --"threads" <NUM_WORKERS>)
                .required(false)
                .help("The number of async worker 'threads' reading documents.")
                .value_parser(clap::value_parser!(usize))
                .default_value("8")
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("index")
                .about("Build the content graph and print a summary report")
                .arg(root_arg())
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, markdown")
                        .value_parser(["text", "json", "markdown"])
                        .default_value("text"),
                )
                .arg(
                    arg!(--"include-tree")
                        .required(false)
                        .help("Include the document tree in the report")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("show")
                .about("Show one document with its links and backlinks")
                .arg(arg!(<ID>).help("Document identifier, e.g. guides/setup"))
                .arg(root_arg())
                .arg(
                    arg!(--"json")
                        .required(false)
                        .help("Print the document as JSON")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("graph")
                .about("Export the two-hop link neighborhood of a document")
                .arg(arg!(<ID>).help("Focal document identifier"))
                .arg(root_arg())
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Output format: json, elements, dot")
                        .value_parser(["json", "elements", "dot"])
                        .default_value("json"),
                ),
        )
        .subcommand(
            command!("search-docs")
                .about("Print the per-document search feed as JSON")
                .arg(root_arg()),
        )
        .subcommand(
            command!("check")
                .about("List dangling and unresolvable links. Exits non-zero when any exist.")
                .arg(root_arg()),
        )
}
