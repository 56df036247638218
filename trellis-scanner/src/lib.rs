pub mod error;
pub mod extract;
pub mod resolve;
pub mod result;
pub mod scanner;
pub mod store;

pub use error::ScanError;
pub use extract::LinkExtractor;
pub use resolve::{DEFAULT_EXTENSION, Resolver};
pub use result::ScannedDocument;
pub use scanner::{ProgressCallback, ResultCallback, Scanner};
pub use store::{DocumentEntry, DocumentTree};
