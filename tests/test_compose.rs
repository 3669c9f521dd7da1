//! Composition tests: layout content, totals rules, pagination.
//!
//! Content streams are uncompressed by default, so the produced document
//! can be checked for visible text by scanning for `(...) Tj` runs.

use chrono::{TimeZone, Utc};
use invoice_press::pdf::Font;
use invoice_press::{Composer, InvoiceRecord, LineItem, Party, ProjectSummary};

fn sample_record() -> InvoiceRecord {
    InvoiceRecord {
        id: "inv-100".to_string(),
        invoice_number: "INV-2024-100".to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 3, 12, 9, 0, 0).unwrap(),
        due_date: None,
        transaction_id: "tx-555".to_string(),
        transaction_hash: "0xdeadbeefcafebabe".to_string(),
        amount: 110.0,
        currency: "USD".to_string(),
        status: "completed".to_string(),
        client: Party {
            id: "client-1".to_string(),
            name: "Acme Corp".to_string(),
            email: "billing@acme.test".to_string(),
            address: Some("742 Evergreen Terrace".to_string()),
            wallet_address: None,
        },
        freelancer: Party {
            id: "freelancer-1".to_string(),
            name: "Jo Developer".to_string(),
            email: "jo@freelance.test".to_string(),
            address: None,
            wallet_address: Some("0x1234abcd".to_string()),
        },
        project: ProjectSummary {
            id: "project-1".to_string(),
            title: "Marketplace backend".to_string(),
            description: "Design and implementation of the settlement and \
                          payout flows for the marketplace backend service."
                .to_string(),
        },
        items: vec![
            LineItem {
                description: "API integration".to_string(),
                quantity: 2,
                unit_price: 40.0,
                total: 80.0,
            },
            LineItem {
                description: "Code review".to_string(),
                quantity: 1,
                unit_price: 20.0,
                total: 20.0,
            },
        ],
        subtotal: 100.0,
        tax: Some(10.0),
        tax_rate: Some(10.0),
        total: 110.0,
    }
}

fn compose_to_text(record: &InvoiceRecord) -> String {
    let bytes = Composer::new().compose(record).unwrap();
    assert!(!bytes.is_empty());
    String::from_utf8_lossy(&bytes).to_string()
}

fn shown(content: &str, text: &str) -> bool {
    content.contains(&format!("({}) Tj", text))
}

#[test]
fn test_document_contains_identifying_text() {
    let record = sample_record();
    let content = compose_to_text(&record);

    assert!(content.starts_with("%PDF-1.7"));
    assert!(content.ends_with("%%EOF"));
    assert!(shown(&content, "INVOICE"));
    assert!(shown(&content, "INV-2024-100"));
    assert!(shown(&content, "0xdeadbeefcafebabe"));
    for item in &record.items {
        assert!(shown(&content, &item.description), "missing {}", item.description);
    }
}

#[test]
fn test_party_block_renders_optional_fields() {
    let content = compose_to_text(&sample_record());
    assert!(shown(&content, "De:"));
    assert!(shown(&content, "Para:"));
    assert!(shown(&content, "Jo Developer"));
    assert!(shown(&content, "Wallet: 0x1234abcd"));
    assert!(shown(&content, "742 Evergreen Terrace"));
}

#[test]
fn test_issue_date_in_reference_locale() {
    let content = compose_to_text(&sample_record());
    assert!(shown(&content, "12 de marzo de 2024"));
}

#[test]
fn test_expiration_row_only_with_due_date() {
    let mut record = sample_record();
    let without = compose_to_text(&record);
    assert!(!shown(&without, "Expiration Date:"));

    record.due_date = Some(Utc.with_ymd_and_hms(2024, 4, 12, 0, 0, 0).unwrap());
    let with = compose_to_text(&record);
    assert!(shown(&with, "Expiration Date:"));
    assert!(shown(&with, "12 de abril de 2024"));
}

#[test]
fn test_totals_block_with_tax_shows_three_rows() {
    let content = compose_to_text(&sample_record());
    assert!(shown(&content, "Subtotal:"));
    assert!(shown(&content, "$100.00"));
    assert!(content.contains("(Tax\\(10%\\):) Tj"));
    assert!(shown(&content, "$10.00"));
    assert!(shown(&content, "Total:"));
    assert!(shown(&content, "$110.00"));
}

#[test]
fn test_totals_block_without_tax_shows_two_rows() {
    let mut record = sample_record();
    record.tax = None;
    record.tax_rate = None;
    record.subtotal = 100.0;
    record.total = 100.0;

    let content = compose_to_text(&record);
    assert!(shown(&content, "Subtotal:"));
    assert!(shown(&content, "Total:"));
    assert!(!content.contains("(Tax\\("));
}

#[test]
fn test_tax_requires_both_amount_and_rate() {
    let mut record = sample_record();
    record.tax_rate = None;
    let content = compose_to_text(&record);
    assert!(!content.contains("(Tax\\("));
}

#[test]
fn test_empty_item_list_renders_header_only() {
    let mut record = sample_record();
    record.items.clear();
    let content = compose_to_text(&record);

    assert!(shown(&content, "Description"));
    assert!(shown(&content, "Quantity"));
    assert!(shown(&content, "Unit Price"));
    assert!(shown(&content, "Total"));
    assert!(!shown(&content, "API integration"));
}

#[test]
fn test_prices_currency_formatted() {
    let content = compose_to_text(&sample_record());
    assert!(shown(&content, "$40.00"));
    assert!(shown(&content, "$80.00"));
}

#[test]
fn test_unknown_currency_prefixes_raw_code() {
    let mut record = sample_record();
    record.currency = "XYZ".to_string();
    let content = compose_to_text(&record);
    assert!(shown(&content, "XYZ40.00"));
}

#[test]
fn test_unknown_status_passes_through() {
    let mut record = sample_record();
    record.status = "refunded".to_string();
    let content = compose_to_text(&record);
    assert!(shown(&content, "Status: refunded"));
}

#[test]
fn test_composition_is_deterministic() {
    let record = sample_record();
    let composer = Composer::new();
    let first = composer.compose(&record).unwrap();
    let second = composer.compose(&record).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_long_item_list_paginates_and_repeats_header() {
    let mut record = sample_record();
    record.items = (0..80)
        .map(|i| LineItem {
            description: format!("Work package {}", i),
            quantity: 1,
            unit_price: 10.0,
            total: 10.0,
        })
        .collect();

    let content = compose_to_text(&record);

    let count_line = content
        .lines()
        .find(|l| l.contains("/Count "))
        .expect("page tree present");
    let pages: usize = count_line
        .split("/Count ")
        .nth(1)
        .unwrap()
        .split_whitespace()
        .next()
        .unwrap()
        .parse()
        .unwrap();
    assert!(pages >= 2, "expected pagination, got {} page(s)", pages);

    let header_rows = content.matches("(Description) Tj").count();
    assert!(header_rows >= 2, "table header not repeated: {}", header_rows);

    // Every row survived pagination.
    for i in 0..80 {
        assert!(shown(&content, &format!("Work package {}", i)));
    }
}

/// Every baseline the document positions text at, taken from the `Td`
/// operands of the (uncompressed) content streams.
fn text_baselines(content: &str) -> Vec<f32> {
    content
        .lines()
        .filter_map(|l| l.strip_suffix(" Td"))
        .map(|operands| {
            operands
                .split_whitespace()
                .nth(1)
                .and_then(|y| y.parse().ok())
                .expect("well-formed Td operands")
        })
        .collect()
}

#[test]
fn test_long_description_paginates_instead_of_drawing_off_page() {
    let mut record = sample_record();
    record.project.description = (0..2000)
        .map(|i| format!("word{}", i))
        .collect::<Vec<_>>()
        .join(" ");

    let content = compose_to_text(&record);

    let baselines = text_baselines(&content);
    assert!(!baselines.is_empty());
    for y in baselines {
        assert!(y >= 50.0, "text positioned below the bottom margin (y = {})", y);
    }

    // A description this long cannot fit one page.
    let page_objects = content.matches("/Type /Page >>").count();
    assert!(page_objects >= 2, "expected multiple pages, got {}", page_objects);
}

#[test]
fn test_wrapped_description_lines_all_present() {
    let mut record = sample_record();
    record.project.description = (0..60)
        .map(|i| format!("segment{}", i))
        .collect::<Vec<_>>()
        .join(" ");

    let lines = Font::Regular.wrap(&record.project.description, 10.0, 500.0);
    assert!(lines.len() >= 3);

    let content = compose_to_text(&record);
    for line in &lines {
        assert!(shown(&content, line), "missing description line: {}", line);
    }
}

#[test]
fn test_item_description_clipped_to_its_column() {
    let mut record = sample_record();
    let long = "m".repeat(120);
    record.items[0].description = long.clone();

    let content = compose_to_text(&record);
    assert!(!shown(&content, &long));

    let visible = Font::Regular.truncate_to_width(&long, 10.0, 240.0);
    assert!(Font::Regular.text_width(&visible, 10.0) <= 240.0);
    assert!(shown(&content, &visible));
}

#[test]
fn test_non_finite_amount_rejected() {
    let mut record = sample_record();
    record.total = f64::NAN;
    let err = Composer::new().compose(&record).unwrap_err();
    assert!(err.to_string().contains("Composition failed"));
}

#[test]
fn test_compressed_output_still_valid_shell() {
    let bytes = Composer::new()
        .with_compress(true)
        .compose(&sample_record())
        .unwrap();
    let content = String::from_utf8_lossy(&bytes);
    assert!(content.starts_with("%PDF-1.7"));
    assert!(content.contains("/Filter /FlateDecode"));
    assert!(content.ends_with("%%EOF"));
}
