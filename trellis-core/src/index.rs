use crate::error::Result;
use crate::graph::ContentGraph;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;
use trellis_scanner::{DEFAULT_EXTENSION, ScannedDocument, Scanner};

/// Default number of worker tasks reading documents.
pub const DEFAULT_THREADS: usize = 8;

/// Options for building a graph from a content directory
#[derive(Debug, Clone)]
pub struct IndexOptions {
    pub root: PathBuf,
    pub extension: String,
    pub threads: usize,
    pub show_progress_bars: bool,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./content"),
            extension: DEFAULT_EXTENSION.to_string(),
            threads: DEFAULT_THREADS,
            show_progress_bars: false,
        }
    }
}

/// Callback for reporting index progress messages
pub type IndexProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Callback for each document as it is read
pub type IndexResultCallback = Arc<dyn Fn(&ScannedDocument) + Send + Sync>;

/// Scan the content root and build the graph.
///
/// Any unreadable entry fails the whole index; a partial graph is never
/// returned.
pub async fn execute_index(
    options: IndexOptions,
    progress_callback: Option<IndexProgressCallback>,
    result_callback: Option<IndexResultCallback>,
) -> Result<ContentGraph> {
    let IndexOptions {
        root,
        extension,
        threads,
        show_progress_bars,
    } = options;

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Discovering documents...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let processed_count = Arc::new(AtomicUsize::new(0));

    let internal_progress_callback: trellis_scanner::ProgressCallback = match progress_bar {
        Some(ref pb) => {
            let pb_clone = pb.clone();
            let count_clone = processed_count.clone();
            Arc::new(move |_worker_id: usize, _id: String| {
                let count = count_clone.fetch_add(1, Ordering::Relaxed) + 1;
                pb_clone.set_message(format!("Indexing... {} documents read", count));
                pb_clone.tick();
            })
        }
        None => {
            let count_clone = processed_count.clone();
            Arc::new(move |_worker_id: usize, _id: String| {
                count_clone.fetch_add(1, Ordering::Relaxed);
            })
        }
    };

    let mut scanner = Scanner::new(&root)
        .with_extension(&extension)
        .with_workers(threads)
        .with_progress_callback(internal_progress_callback);

    if let Some(cb) = result_callback {
        scanner = scanner.with_result_callback(cb);
    }

    if let Some(ref callback) = progress_callback {
        callback(format!("Scanning {}", root.display()));
    }

    let documents = match scanner.scan().await {
        Ok(documents) => documents,
        Err(e) => {
            if let Some(ref pb) = progress_bar {
                pb.finish_and_clear();
            }
            return Err(e.into());
        }
    };

    if let Some(ref callback) = progress_callback {
        callback(format!("Linking {} documents", documents.len()));
    }

    let graph = ContentGraph::from_scanned(documents, &extension);

    if let Some(ref pb) = progress_bar {
        let total = processed_count.load(Ordering::Relaxed);
        pb.finish_with_message(format!("Index complete! {} documents read", total));
    }
    info!("Indexed {} documents from {}", graph.len(), root.display());

    Ok(graph)
}
