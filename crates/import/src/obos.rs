//! OBOS Bank (Norway) exports. Both layouts are Latin-1, tab separated and
//! fully quoted; they differ in columns and in the type tags they use.

use ledgerline_core::NumberFormat;

use crate::adapter::FormatAdapter;
use crate::normalize::TransactionKind;
use crate::reader::{Column, Dialect, Field, TextEncoding};

const DATE_PATTERN: &str = r"^\d{2}\.\d{2}\.\d{4}";
const ANY_PATTERN: &str = r"^.+$";
const AMOUNT_PATTERN: &str = r"^-?\d{1,}(\.\d{3})*(.\d{1,2})?$";

const DIALECT: Dialect = Dialect {
    encoding: TextEncoding::Latin1,
    delimiter: b'\t',
    quote: b'"',
    has_header: true,
};

/// "Last transactions" export from the net bank.
pub static RECENT: FormatAdapter = FormatAdapter {
    name: "obos.recent",
    dialect: DIALECT,
    columns: &[
        Column::checked(Field::Date, DATE_PATTERN),
        Column::checked(Field::Type, ANY_PATTERN),
        Column::checked(Field::Text, ANY_PATTERN),
        Column::checked(Field::Amount, AMOUNT_PATTERN),
    ],
    kinds: &[
        ("Innbetaling", TransactionKind::Incoming),
        ("Overføring", TransactionKind::Incoming),
        ("Vipps overføring", TransactionKind::MobileTransfer),
        ("Varekjøp", TransactionKind::Purchase),
        ("AvtaleGiro", TransactionKind::RecurringInvoice),
        ("eFaktura", TransactionKind::Invoice),
        ("Betaling", TransactionKind::Payment),
    ],
    date_format: "%d.%m.%Y",
    number_format: NumberFormat::NB_NO,
    home_currency: "NOK",
    mobile_payee: "Vipps",
};

/// Archive export, which adds interest date, reference and account columns.
pub static ARCHIVE: FormatAdapter = FormatAdapter {
    name: "obos.archive",
    dialect: DIALECT,
    columns: &[
        Column::checked(Field::Date, DATE_PATTERN),
        Column::checked(Field::InterestDate, DATE_PATTERN),
        Column::checked(Field::Type, ANY_PATTERN),
        Column::checked(Field::Text, ANY_PATTERN),
        Column::checked(Field::Amount, AMOUNT_PATTERN),
        Column::unchecked(Field::Reference),
        Column::unchecked(Field::Account),
    ],
    kinds: &[
        ("LØNN", TransactionKind::Incoming),
        ("GIRO", TransactionKind::Incoming),
        ("OVERFØRT", TransactionKind::Incoming),
        ("StraksOvf", TransactionKind::MobileTransfer),
        ("VARER", TransactionKind::Purchase),
        ("VISA VARE", TransactionKind::Purchase),
        ("AVTGI", TransactionKind::RecurringInvoice),
        ("E-FAKTURA", TransactionKind::Invoice),
        ("NETTGIRO", TransactionKind::Payment),
    ],
    date_format: "%d.%m.%Y",
    number_format: NumberFormat::NB_NO,
    home_currency: "NOK",
    mobile_payee: "Vipps",
};
