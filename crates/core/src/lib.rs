pub mod money;
pub mod period;
pub mod scale;
pub mod transaction;

pub use money::{Money, MoneyError, NumberFormat};
pub use period::{DateRange, FILE_DATE_FORMAT};
pub use scale::scale;
pub use transaction::{CanonicalTransaction, TransactionDraft, TransactionError, TO_BE_BUDGETED};
