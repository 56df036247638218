pub mod commands;
pub mod handlers;

pub use handlers::{
    GlobalOptions, expand_root, init_logging, load_graph, log_level, render_document,
    render_neighborhood, render_search_feed,
};

// Re-export index functionality from trellis-core
pub use trellis_core::index::{IndexOptions, IndexProgressCallback, execute_index};

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
