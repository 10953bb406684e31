use rust_decimal::Decimal;

use crate::transaction::CanonicalTransaction;

/// Multiplies every surviving record by `factor`. Only ever called on the
/// deduplicated set, so duplicates are judged on unscaled amounts.
pub fn scale(records: Vec<CanonicalTransaction>, factor: Decimal) -> Vec<CanonicalTransaction> {
    if factor == Decimal::ONE {
        return records;
    }
    records.iter().map(|r| r.scaled(factor)).collect()
}
