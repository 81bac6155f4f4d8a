//! Text rendering for invocation results.
//!
//! Renders a claims register as a case card followed by a claims table, and
//! a document search as one line per downloadable part.

use chrono::DateTime;
use docketfill_core::{ClaimEntry, ClaimsRegister, DocumentLink};

const CLAIMS_HEADING: [&str; 5] = [
    "#",
    "Original File Date",
    "Creditor",
    "Total Amount Claimed",
    "Last Updated",
];

// ── Public API ──

pub fn print_claims_register(register: &ClaimsRegister) {
    print!("{}", render_claims_register(register));
}

pub fn print_documents(documents: &[DocumentLink]) {
    if documents.is_empty() {
        println!("No documents matched.");
        return;
    }
    for doc in documents {
        println!("{:<40} {}", doc.filename, doc.download_url);
    }
}

pub fn render_claims_register(register: &ClaimsRegister) -> String {
    let mut out = String::new();
    let case = &register.case;

    let title = case.title.as_deref().unwrap_or_default();
    out.push_str(&format!("=== {} {} ===\n", case.court, case.case_number));
    if !title.is_empty() {
        out.push_str(&format!("{title}\n"));
    }
    if let Some(chapter) = &case.chapter {
        out.push_str(&format!("  {:<12} {chapter}\n", "chapter"));
    }
    if let Some(date_filed) = &case.date_filed {
        out.push_str(&format!("  {:<12} {date_filed}\n", "filed"));
    }
    out.push('\n');

    if let Some(html) = &register.header.html {
        out.push_str("Claims Summary\n");
        out.push_str(html);
        out.push_str("\n\n");
    }

    // Heading row only when there is at least one claim.
    if !register.entries.is_empty() {
        out.push_str(&claims_row(&CLAIMS_HEADING.map(str::to_string)));
    }
    for entry in &register.entries {
        out.push_str(&claims_row(&claim_cells(entry)));
    }
    out
}

// ── Claims table ──

fn claim_cells(entry: &ClaimEntry) -> [String; 5] {
    [
        entry.claim_number.clone(),
        entry.filed_date.clone().unwrap_or_default(),
        entry.creditor.clone(),
        entry.claimed_amount.map(format_amount).unwrap_or_default(),
        entry
            .last_updated
            .and_then(format_timestamp)
            .unwrap_or_default(),
    ]
}

fn claims_row(cells: &[String; 5]) -> String {
    format!(
        "{:<6} {:<20} {:<40} {:>22} {}\n",
        cells[0], cells[1], cells[2], cells[3], cells[4]
    )
}

/// Dollar amount with thousands separators, e.g. `$1,234.56`.
pub fn format_amount(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

/// Unix seconds as `mm/dd/yyyy` (UTC).
pub fn format_timestamp(secs: i64) -> Option<String> {
    DateTime::from_timestamp(secs, 0).map(|dt| dt.format("%m/%d/%Y").to_string())
}
