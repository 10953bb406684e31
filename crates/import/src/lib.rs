pub mod adapter;
pub mod error;
pub mod normalize;
pub mod obos;
pub mod reader;
pub(crate) mod util;

pub use adapter::{Format, FormatAdapter};
pub use error::ImportError;
pub use normalize::{normalize, RowContext, Transform, TransactionKind, TransformError};
pub use reader::{read_rows, Column, Dialect, Field, RawRow, Rows, TextEncoding};
