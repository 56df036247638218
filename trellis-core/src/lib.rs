pub mod error;
pub mod graph;
pub mod index;
pub mod model;
pub mod neighborhood;
pub mod report;

pub use error::{GraphError, Result};
pub use graph::{ContentGraph, GraphBuilder};
pub use index::{IndexOptions, IndexProgressCallback, IndexResultCallback, execute_index};
pub use model::{
    DanglingLink, DeepDocument, DocumentNode, GraphStats, SearchDocument, UnresolvedLink,
};
pub use neighborhood::{Edge, NeighborNode, Neighborhood, expand};

const BANNER: &str = r#"
  _            _ _ _
 | |_ _ _ ___| | (_)___
 |  _| '_/ -_) | | (_-<
  \__|_| \___|_|_|_/__/
"#;

pub fn print_banner() {
    eprintln!("{}", BANNER);
    eprintln!(
        "  trellis v{} - backlinks and neighborhoods for document trees\n",
        env!("CARGO_PKG_VERSION")
    );
}
