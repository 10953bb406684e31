use std::ops::Range;
use std::path::Path;
use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use ledgerline_core::{
    CanonicalTransaction, MoneyError, TransactionDraft, TransactionError, TO_BE_BUDGETED,
};
use regex::Regex;
use thiserror::Error;

use crate::adapter::FormatAdapter;
use crate::error::ImportError;
use crate::reader::RawRow;
use crate::util::capitalize;

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

re!(re_short_date,
    r"(?:^|\s)(?P<day>\d{2})\.(?P<month>\d{2})(?:\s|$)");
re!(re_purchase,
    r"(?:(?P<card>\*\d{4})\s+)?(?P<date>\d{2}\.\d{2})\s+(?:(?P<currency>[A-Z]{3}) (?P<amount>\d+\.\d{1,2})\s+)?(?:Kurs: (?P<lead_rate>\d*\.\d*)\s+)?(?P<payee>.*?)(?:\s+Kurs: (?P<rate>\d*\.\d*))?$");
re!(re_meta_key,
    r"(?P<key>Nettgiro til|Nettgiro fra|Fra|Til|Betalt): ");
re!(re_meta_end,
    r" (?:Fra|Til|Betalt):");

/// Keys whose value names the counterparty.
const PAYEE_KEYS: &[&str] = &["Til", "Fra", "Nettgiro fra", "Nettgiro til"];

const RECURRING_INVOICE_MEMO: &str = "AvtaleGiro ";

// ── Kinds and their transform lists ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    /// Salary, incoming giro and transfers.
    Incoming,
    /// Mobile payment service; the payee is fixed.
    MobileTransfer,
    /// Card purchase carrying its own short date in the text.
    Purchase,
    /// Automatic recurring invoice.
    RecurringInvoice,
    Invoice,
    Payment,
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("text does not look like a purchase")]
    NotAPurchase,
    #[error("invalid short date {day:02}.{month:02} for year {year}")]
    InvalidShortDate { day: u32, month: u32, year: i32 },
    #[error("invalid settlement date '{0}'")]
    InvalidDate(String),
    #[error(transparent)]
    Amount(#[from] MoneyError),
    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

/// What a transform can see besides the draft it is handed.
pub struct RowContext<'a> {
    pub row: &'a RawRow,
    pub kind: TransactionKind,
    pub adapter: &'a FormatAdapter,
}

pub type Transform = fn(TransactionDraft, &RowContext<'_>) -> Result<TransactionDraft, TransformError>;

static INCOMING: [Transform; 1] = [categorize_incoming];
static MOBILE_TRANSFER: [Transform; 1] = [fixed_mobile_payee];
static PURCHASE: [Transform; 2] = [correct_rollover_date, extract_purchase];
/// Runs after every kind's own list.
static COMMON_TAIL: [Transform; 2] = [enrich_memo, append_account];

impl TransactionKind {
    pub fn transforms(self) -> &'static [Transform] {
        match self {
            TransactionKind::Incoming => &INCOMING,
            TransactionKind::MobileTransfer => &MOBILE_TRANSFER,
            TransactionKind::Purchase => &PURCHASE,
            TransactionKind::RecurringInvoice
            | TransactionKind::Invoice
            | TransactionKind::Payment => &[],
        }
    }
}

// ── Pipeline ─────────────────────────────────────────────────────────────────

pub fn normalize(
    adapter: &FormatAdapter,
    path: &Path,
    row: &RawRow,
) -> Result<CanonicalTransaction, ImportError> {
    let kind = adapter
        .kind_of(&row.kind)
        .ok_or_else(|| ImportError::UnknownTransactionType {
            path: path.to_path_buf(),
            line: row.line,
            kind: row.kind.clone(),
        })?;
    let ctx = RowContext { row, kind, adapter };

    let tx = run(&ctx).map_err(|e| ImportError::Extraction {
        path: path.to_path_buf(),
        line: row.line,
        raw: row.raw.clone(),
        reason: e.to_string(),
    })?;
    tracing::debug!(line = row.line, ?kind, date = %tx.date, "normalized row");
    Ok(tx)
}

fn run(ctx: &RowContext<'_>) -> Result<CanonicalTransaction, TransformError> {
    let date = NaiveDate::parse_from_str(ctx.row.date.trim(), ctx.adapter.date_format)
        .map_err(|_| TransformError::InvalidDate(ctx.row.date.clone()))?;
    let amount = ctx.adapter.number_format.parse(&ctx.row.amount)?;

    let draft = ctx
        .kind
        .transforms()
        .iter()
        .chain(COMMON_TAIL.iter())
        .try_fold(TransactionDraft::from_signed(date, amount), |draft, transform| {
            transform(draft, ctx)
        })?;

    Ok(CanonicalTransaction::validate(draft)?)
}

// ── Transforms ───────────────────────────────────────────────────────────────

/// Replaces the settlement date with the purchase date printed in the text.
/// The text only has day and month, so a date after settlement belongs to the
/// previous year.
pub fn correct_rollover_date(
    draft: TransactionDraft,
    ctx: &RowContext<'_>,
) -> Result<TransactionDraft, TransformError> {
    let Some(caps) = re_short_date().captures(&ctx.row.text) else {
        return Ok(draft);
    };
    let day: u32 = caps["day"].parse().unwrap_or(0);
    let month: u32 = caps["month"].parse().unwrap_or(0);
    let settled = draft.date;
    let invalid = |year| TransformError::InvalidShortDate { day, month, year };

    let purchased =
        NaiveDate::from_ymd_opt(settled.year(), month, day).ok_or(invalid(settled.year()))?;
    if purchased == settled {
        return Ok(draft);
    }
    let purchased = if purchased > settled {
        NaiveDate::from_ymd_opt(settled.year() - 1, month, day)
            .ok_or(invalid(settled.year() - 1))?
    } else {
        purchased
    };
    Ok(draft.with_date(purchased))
}

pub fn extract_purchase(
    draft: TransactionDraft,
    ctx: &RowContext<'_>,
) -> Result<TransactionDraft, TransformError> {
    let caps = re_purchase()
        .captures(&ctx.row.text)
        .ok_or(TransformError::NotAPurchase)?;
    let draft = draft.with_payee(caps["payee"].trim());

    match (caps.name("currency"), caps.name("amount")) {
        (Some(currency), Some(amount)) if currency.as_str() != ctx.adapter.home_currency => {
            let rate = caps.name("lead_rate").or_else(|| caps.name("rate"));
            let memo = match rate {
                Some(rate) => format!(
                    "Valuta: {} {} ved {}",
                    amount.as_str(),
                    currency.as_str(),
                    rate.as_str()
                ),
                None => format!("Valuta: {} {}", amount.as_str(), currency.as_str()),
            };
            Ok(draft.with_memo(memo))
        }
        _ => Ok(draft),
    }
}

pub fn fixed_mobile_payee(
    draft: TransactionDraft,
    ctx: &RowContext<'_>,
) -> Result<TransactionDraft, TransformError> {
    Ok(draft.with_payee(ctx.adapter.mobile_payee))
}

pub fn categorize_incoming(
    draft: TransactionDraft,
    _ctx: &RowContext<'_>,
) -> Result<TransactionDraft, TransformError> {
    if draft.inflow.is_positive() {
        Ok(draft.with_category(TO_BE_BUDGETED))
    } else {
        Ok(draft)
    }
}

/// Pulls `Key: value` segments out of the free text into payee and memo.
pub fn enrich_memo(
    draft: TransactionDraft,
    ctx: &RowContext<'_>,
) -> Result<TransactionDraft, TransformError> {
    if ctx.kind == TransactionKind::Purchase {
        return Ok(draft);
    }

    let mut draft = if draft.payee.as_deref() == Some(ctx.adapter.mobile_payee) {
        draft
    } else {
        draft.append_memo(&capitalize(&ctx.row.kind))
    };

    let text = ctx.row.text.as_str();
    let segments = segments(text);

    if ctx.kind == TransactionKind::RecurringInvoice {
        return Ok(draft
            .with_memo(RECURRING_INVOICE_MEMO)
            .with_payee(strip_segments(text, &segments)));
    }

    for seg in &segments {
        if PAYEE_KEYS.contains(&seg.key) && !draft.has_payee() {
            draft = draft.with_payee(seg.value);
            continue;
        }
        draft = draft.append_memo(&format!(" {}: {}", seg.key, seg.value));
    }
    Ok(draft)
}

pub fn append_account(
    draft: TransactionDraft,
    ctx: &RowContext<'_>,
) -> Result<TransactionDraft, TransformError> {
    match ctx.row.account.as_deref() {
        Some(account) if !account.is_empty() => Ok(draft.append_memo(&format!(" ({account})"))),
        _ => Ok(draft),
    }
}

// ── Key/value segments ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
struct Segment<'a> {
    key: &'a str,
    value: &'a str,
    span: Range<usize>,
}

/// A value runs until the next ` Fra:`, ` Til:` or ` Betalt:`, or to the end.
fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut pos = 0;
    while let Some(caps) = re_meta_key().captures_at(text, pos) {
        let (Some(whole), Some(key)) = (caps.get(0), caps.name("key")) else {
            break;
        };
        let end = re_meta_end()
            .find_at(text, whole.end())
            .map_or(text.len(), |m| m.start());
        out.push(Segment {
            key: key.as_str(),
            value: &text[whole.end()..end],
            span: whole.start()..end,
        });
        pos = end;
    }
    out
}

fn strip_segments(text: &str, segments: &[Segment<'_>]) -> String {
    let mut rest = String::with_capacity(text.len());
    let mut pos = 0;
    for seg in segments {
        rest.push_str(&text[pos..seg.span.start]);
        pos = seg.span.end;
    }
    rest.push_str(&text[pos..]);
    rest
}
