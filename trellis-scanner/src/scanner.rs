use crate::error::{Result, ScanError};
use crate::extract::LinkExtractor;
use crate::resolve::DEFAULT_EXTENSION;
use crate::result::ScannedDocument;
use crate::store::{DocumentEntry, DocumentTree};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;
pub type ResultCallback = Arc<dyn Fn(&ScannedDocument) + Send + Sync>;

/// Reads every document under a content root on a pool of worker tasks.
pub struct Scanner {
    root: PathBuf,
    extractor: LinkExtractor,
    workers: usize,
    progress_callback: Option<ProgressCallback>,
    result_callback: Option<ResultCallback>,
}

impl Scanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extractor: LinkExtractor::new(DEFAULT_EXTENSION),
            workers: 8,
            progress_callback: None,
            result_callback: None,
        }
    }

    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extractor = LinkExtractor::new(extension);
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn with_result_callback(mut self, callback: ResultCallback) -> Self {
        self.result_callback = Some(callback);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extension(&self) -> &str {
        self.extractor.extension()
    }

    /// Walk the content root without reading any document.
    pub async fn discover(&self) -> Result<DocumentTree> {
        let root = self.root.clone();
        let extension = self.extension().to_string();
        tokio::task::spawn_blocking(move || DocumentTree::scan(&root, &extension)).await?
    }

    /// Read and parse every document.
    ///
    /// Documents come back sorted by identifier. If any read fails the scan
    /// stops handing out work and returns one [`ScanError::StoreAccess`] with
    /// every failure seen.
    pub async fn scan(&self) -> Result<Vec<ScannedDocument>> {
        info!(
            "Scanning {} for .{} documents with {} workers",
            self.root.display(),
            self.extension(),
            self.workers
        );

        let tree = self.discover().await?;
        let entries = tree.documents();
        let workers = self.workers.min(entries.len()).max(1);
        debug!("Discovered {} documents", entries.len());

        // Round-robin the entries across worker-owned queues
        let mut queues: Vec<VecDeque<DocumentEntry>> = (0..workers).map(|_| VecDeque::new()).collect();
        for (idx, entry) in entries.into_iter().enumerate() {
            queues[idx % workers].push_back(entry);
        }

        let failed = Arc::new(AtomicBool::new(false));
        let mut worker_handles = Vec::with_capacity(workers);

        for (worker_id, mut queue) in queues.into_iter().enumerate() {
            let extractor = self.extractor.clone();
            let progress_cb = self.progress_callback.clone();
            let result_cb = self.result_callback.clone();
            let failed = failed.clone();

            worker_handles.push(tokio::spawn(async move {
                debug!("Worker {} started with {} documents", worker_id, queue.len());
                let mut scanned = Vec::with_capacity(queue.len());
                let mut failures = Vec::new();

                while let Some(entry) = queue.pop_front() {
                    if failed.load(Ordering::Relaxed) {
                        debug!("Worker {} stopping after a failed read", worker_id);
                        break;
                    }

                    if let Some(ref callback) = progress_cb {
                        callback(worker_id, entry.id.clone());
                    }

                    match Self::read_document(&entry, &extractor).await {
                        Ok(document) => {
                            if let Some(ref callback) = result_cb {
                                callback(&document);
                            }
                            scanned.push(document);
                        }
                        Err(e) => {
                            warn!("Read error for {}: {}", entry.path.display(), e);
                            failed.store(true, Ordering::Relaxed);
                            failures.push(e);
                        }
                    }
                }

                debug!("Worker {} finished", worker_id);
                (scanned, failures)
            }));
        }

        let outcomes = futures::future::try_join_all(worker_handles).await?;

        let mut documents = Vec::new();
        let mut failures = Vec::new();
        for (scanned, worker_failures) in outcomes {
            documents.extend(scanned);
            failures.extend(worker_failures);
        }

        if !failures.is_empty() {
            return Err(ScanError::StoreAccess(failures));
        }

        documents.sort_by(|a, b| a.id.cmp(&b.id));
        info!("Scan complete. Read {} documents", documents.len());
        Ok(documents)
    }

    async fn read_document(entry: &DocumentEntry, extractor: &LinkExtractor) -> Result<ScannedDocument> {
        let bytes = tokio::fs::read(&entry.path)
            .await
            .map_err(|source| ScanError::Read {
                path: entry.path.clone(),
                source,
            })?;
        let raw = String::from_utf8_lossy(&bytes);

        Ok(ScannedDocument::parse(&entry.id, &raw, extractor).with_path(entry.path.clone()))
    }
}
