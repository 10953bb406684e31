pub mod archive;
pub mod consolidate;
pub mod error;
pub mod naming;
pub mod ynab;

pub use archive::{discover, ArchivedFile};
pub use consolidate::{remove_known, Consolidation, Consolidator};
pub use error::StorageError;
pub use naming::{ensure_vacant, Basename};
pub use ynab::{read_transactions, write_transactions};
