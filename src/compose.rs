//! Invoice document composition.
//!
//! Translates an [`InvoiceRecord`] into an ordered sequence of draw
//! operations and hands them to the PDF encoder. Composition is a pure
//! function of the record: identical input yields identical bytes (no
//! generation timestamp lives here; that belongs to the output resolver's
//! filenames).
//!
//! Layout state is an explicit [`Sheet`] value threaded through the section
//! steps in fixed order (header, parties, invoice metadata, item table,
//! totals, footer), each consuming the sheet and returning the advanced
//! one. When a section would cross the bottom margin the sheet breaks to a
//! new page; inside the item table the shaded header row is repeated on
//! continuation pages.

use crate::error::{Error, Result};
use crate::format::{format_currency, format_date, format_status};
use crate::pdf::{ContentStream, DocumentConfig, DocumentWriter, Font};
use crate::record::{InvoiceRecord, LineItem};

// US Letter with the 50-unit margin of the reference layout.
const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 50.0;

const BODY_SIZE: f32 = 10.0;
const SMALL_SIZE: f32 = 8.0;
const TITLE_SIZE: f32 = 20.0;
const LINE: f32 = 14.0;

// Item table geometry: spans x=50..550, rows 20 units tall.
const TABLE_X: f32 = 50.0;
const TABLE_WIDTH: f32 = 500.0;
const ROW_HEIGHT: f32 = 20.0;
const COL_DESCRIPTION_X: f32 = 55.0;
const COL_DESCRIPTION_W: f32 = 240.0;
const COL_QUANTITY_X: f32 = 300.0;
const COL_QUANTITY_W: f32 = 70.0;
const COL_UNIT_PRICE_EDGE: f32 = 440.0;
const COL_TOTAL_EDGE: f32 = 510.0;

// Totals block: labels at x=400, values right-aligned to x=550.
const TOTALS_LABEL_X: f32 = 400.0;
const TOTALS_VALUE_EDGE: f32 = 550.0;

const HEADER_SHADE: f32 = 0.902; // #e6e6e6
const STRIPE_SHADE: f32 = 0.965; // #f6f6f6
const SEPARATOR_RGB: (f32, f32, f32) = (0.667, 0.667, 0.667); // #aaaaaa

const ATTRIBUTION: &str =
    "Thank you for using OFFER-HUB - The decentralized freelance platform";

/// Per-composition layout context: finished pages, the page being drawn,
/// and the downward vertical cursor.
struct Sheet {
    done: Vec<ContentStream>,
    page: ContentStream,
    y: f32,
}

impl Sheet {
    fn new() -> Self {
        Self {
            done: Vec::new(),
            page: ContentStream::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    /// Break to a fresh page, resetting the cursor to the top margin.
    fn break_page(mut self) -> Self {
        self.done.push(std::mem::take(&mut self.page));
        self.y = PAGE_HEIGHT - MARGIN;
        self
    }

    /// Break to a fresh page unless `needed` vertical units still fit.
    fn ensure(self, needed: f32) -> Self {
        if self.y - needed < MARGIN {
            self.break_page()
        } else {
            self
        }
    }

    /// Show text centered on the page width.
    fn centered(&mut self, font: Font, size: f32, text: &str) {
        let x = (PAGE_WIDTH - font.text_width(text, size)) / 2.0;
        self.page.show_text(font, size, x, self.y, text);
    }

    /// Show text with its right edge at `edge`.
    fn right_aligned(&mut self, font: Font, size: f32, edge: f32, y: f32, text: &str) {
        let x = edge - font.text_width(text, size);
        self.page.show_text(font, size, x, y, text);
    }
}

/// Translates invoice records into PDF documents.
///
/// A plain value with explicit configuration; construct once and share
/// freely, composition holds no mutable state.
#[derive(Debug, Clone)]
pub struct Composer {
    compress: bool,
}

impl Composer {
    /// Create a composer producing uncompressed content streams.
    pub fn new() -> Self {
        Self { compress: false }
    }

    /// Enable FlateDecode compression of the produced content streams.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Compose the invoice document and return its bytes.
    ///
    /// Deterministic for identical input. Fails with
    /// [`Error::Composition`] on a malformed record (non-finite amounts)
    /// or an encoder failure.
    pub fn compose(&self, record: &InvoiceRecord) -> Result<Vec<u8>> {
        validate(record)?;

        let sheet = Sheet::new();
        let sheet = header(sheet);
        let sheet = party_block(sheet, record);
        let sheet = metadata_block(sheet, record);
        let sheet = item_table(sheet, record);
        let sheet = totals_block(sheet, record);
        let sheet = footer(sheet, record);

        let config = DocumentConfig::default()
            .with_title(format!("Invoice {}", record.invoice_number))
            .with_compress(self.compress);
        let mut writer = DocumentWriter::with_config(config);
        for page in sheet.done {
            writer.add_page(PAGE_WIDTH, PAGE_HEIGHT, page);
        }
        writer.add_page(PAGE_WIDTH, PAGE_HEIGHT, sheet.page);

        log::debug!(
            "Composed invoice {} ({} items, {} page(s))",
            record.invoice_number,
            record.items.len(),
            writer.page_count()
        );
        writer.finish().map_err(|e| Error::Composition(e.to_string()))
    }
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject records the encoder cannot render meaningfully.
fn validate(record: &InvoiceRecord) -> Result<()> {
    let amounts = [record.amount, record.subtotal, record.total]
        .into_iter()
        .chain(record.tax)
        .chain(record.tax_rate)
        .chain(record.items.iter().flat_map(|i| [i.unit_price, i.total]));
    for value in amounts {
        if !value.is_finite() {
            return Err(Error::Composition(format!(
                "invoice {} carries a non-finite amount",
                record.id
            )));
        }
    }
    Ok(())
}

/// Centered document title.
fn header(mut sheet: Sheet) -> Sheet {
    sheet.y -= TITLE_SIZE;
    sheet.centered(Font::Bold, TITLE_SIZE, "INVOICE");
    sheet.y -= 2.0 * LINE;
    sheet
}

/// Two-column party block: payee (`De:`) left, payer (`Para:`) right,
/// sharing the same starting vertical position.
fn party_block(mut sheet: Sheet, record: &InvoiceRecord) -> Sheet {
    sheet = sheet.ensure(5.0 * LINE);
    let top = sheet.y;

    let mut left = top;
    let mut line_left = |sheet: &mut Sheet, font: Font, text: &str| {
        left -= LINE;
        sheet.page.show_text(font, BODY_SIZE, TABLE_X, left, text);
    };
    line_left(&mut sheet, Font::Bold, "De:");
    line_left(&mut sheet, Font::Regular, &record.freelancer.name);
    line_left(&mut sheet, Font::Regular, &record.freelancer.email);
    if let Some(address) = &record.freelancer.address {
        line_left(&mut sheet, Font::Regular, address);
    }
    if let Some(wallet) = &record.freelancer.wallet_address {
        line_left(&mut sheet, Font::Regular, &format!("Wallet: {}", wallet));
    }

    let mut right = top;
    let mut line_right = |sheet: &mut Sheet, font: Font, text: &str| {
        right -= LINE;
        sheet.page.show_text(font, BODY_SIZE, COL_QUANTITY_X, right, text);
    };
    line_right(&mut sheet, Font::Bold, "Para:");
    line_right(&mut sheet, Font::Regular, &record.client.name);
    line_right(&mut sheet, Font::Regular, &record.client.email);
    if let Some(address) = &record.client.address {
        line_right(&mut sheet, Font::Regular, address);
    }

    sheet.y = left.min(right) - 2.0 * LINE;
    sheet
}

/// Invoice metadata rows plus the project title and wrapped description.
fn metadata_block(mut sheet: Sheet, record: &InvoiceRecord) -> Sheet {
    let description_lines = Font::Regular.wrap(&record.project.description, BODY_SIZE, TABLE_WIDTH);
    // Reserve the fixed rows up front; the description paginates per line.
    sheet = sheet.ensure(8.0 * LINE + 15.0 * 5.0);

    sheet.y -= LINE;
    sheet
        .page
        .show_text(Font::Bold, BODY_SIZE, TABLE_X, sheet.y, "Invoice Information:");
    sheet.y -= 4.0;

    let mut rows: Vec<(&str, String)> = vec![
        ("Invoice Number:", record.invoice_number.clone()),
        ("Issue Date:", format_date(&record.created_at)),
    ];
    // The expiration row exists only when a due date does; later rows shift
    // down accordingly.
    if let Some(due) = &record.due_date {
        rows.push(("Expiration Date:", format_date(due)));
    }
    rows.push(("Transaction ID:", record.transaction_id.clone()));
    rows.push(("Transaction HASH:", record.transaction_hash.clone()));

    for (label, value) in rows {
        sheet.y -= 15.0;
        sheet.page.show_text(Font::Regular, BODY_SIZE, TABLE_X, sheet.y, label);
        sheet.page.show_text(Font::Regular, BODY_SIZE, 200.0, sheet.y, &value);
    }

    sheet.y -= 2.0 * LINE;
    sheet.y -= LINE;
    sheet.page.show_text(Font::Bold, BODY_SIZE, TABLE_X, sheet.y, "Project:");
    sheet.y -= LINE;
    sheet
        .page
        .show_text(Font::Regular, BODY_SIZE, TABLE_X, sheet.y, &record.project.title);
    for line in &description_lines {
        if sheet.y - LINE < MARGIN {
            sheet = sheet.break_page();
        }
        sheet.y -= LINE;
        sheet.page.show_text(Font::Regular, BODY_SIZE, TABLE_X, sheet.y, line);
    }

    sheet.y -= 2.0 * LINE;
    sheet
}

/// Shaded table header row with the four column labels.
fn table_header(mut sheet: Sheet) -> Sheet {
    sheet
        .page
        .fill_rect_gray(TABLE_X, sheet.y - ROW_HEIGHT, TABLE_WIDTH, ROW_HEIGHT, HEADER_SHADE);
    let baseline = sheet.y - LINE;

    sheet
        .page
        .show_text(Font::Bold, BODY_SIZE, COL_DESCRIPTION_X, baseline, "Description");
    let qty_x = COL_QUANTITY_X
        + (COL_QUANTITY_W - Font::Bold.text_width("Quantity", BODY_SIZE)) / 2.0;
    sheet.page.show_text(Font::Bold, BODY_SIZE, qty_x, baseline, "Quantity");
    sheet.right_aligned(Font::Bold, BODY_SIZE, COL_UNIT_PRICE_EDGE, baseline, "Unit Price");
    sheet.right_aligned(Font::Bold, BODY_SIZE, COL_TOTAL_EDGE, baseline, "Total");

    sheet.y -= ROW_HEIGHT;
    sheet
}

/// One 20-unit item row; even-indexed rows carry the light stripe.
fn item_row(mut sheet: Sheet, index: usize, item: &LineItem, currency: &str) -> Sheet {
    if index % 2 == 0 {
        sheet
            .page
            .fill_rect_gray(TABLE_X, sheet.y - ROW_HEIGHT, TABLE_WIDTH, ROW_HEIGHT, STRIPE_SHADE);
    }
    let baseline = sheet.y - LINE;

    // Clip the description to its column so it never runs under Quantity.
    let description = Font::Regular.truncate_to_width(&item.description, BODY_SIZE, COL_DESCRIPTION_W);
    sheet
        .page
        .show_text(Font::Regular, BODY_SIZE, COL_DESCRIPTION_X, baseline, &description);

    let quantity = item.quantity.to_string();
    let qty_x =
        COL_QUANTITY_X + (COL_QUANTITY_W - Font::Regular.text_width(&quantity, BODY_SIZE)) / 2.0;
    sheet.page.show_text(Font::Regular, BODY_SIZE, qty_x, baseline, &quantity);

    let unit_price = format_currency(item.unit_price, currency);
    sheet.right_aligned(Font::Regular, BODY_SIZE, COL_UNIT_PRICE_EDGE, baseline, &unit_price);
    let total = format_currency(item.total, currency);
    sheet.right_aligned(Font::Regular, BODY_SIZE, COL_TOTAL_EDGE, baseline, &total);

    sheet.y -= ROW_HEIGHT;
    sheet
}

/// Line-item table. An empty item list renders only the header row.
fn item_table(mut sheet: Sheet, record: &InvoiceRecord) -> Sheet {
    sheet = sheet.ensure(2.0 * ROW_HEIGHT);
    sheet = table_header(sheet);

    for (index, item) in record.items.iter().enumerate() {
        if sheet.y - ROW_HEIGHT < MARGIN {
            sheet = sheet.break_page();
            sheet = table_header(sheet);
        }
        sheet = item_row(sheet, index, item, &record.currency);
    }

    sheet.y -= 2.0 * LINE;
    sheet
}

/// Separator line and the right-aligned Subtotal / Tax / Total rows.
fn totals_block(mut sheet: Sheet, record: &InvoiceRecord) -> Sheet {
    sheet = sheet.ensure(7.0 * LINE);

    sheet
        .page
        .stroke_line(TABLE_X, sheet.y, TOTALS_VALUE_EDGE, sheet.y, SEPARATOR_RGB, 1.0);
    sheet.y -= LINE;

    let currency = &record.currency;
    let mut row = |sheet: &mut Sheet, font: Font, label: String, amount: f64, advance: f32| {
        sheet.y -= advance;
        sheet.page.show_text(font, BODY_SIZE, TOTALS_LABEL_X, sheet.y, &label);
        let value = format_currency(amount, currency);
        sheet.right_aligned(font, BODY_SIZE, TOTALS_VALUE_EDGE, sheet.y, &value);
    };

    row(&mut sheet, Font::Regular, "Subtotal:".to_string(), record.subtotal, 0.0);

    // Tax renders only when both the amount and the rate are present and
    // non-zero, with the rate shown in parentheses.
    if let (Some(tax), Some(rate)) = (record.tax, record.tax_rate) {
        if tax != 0.0 && rate != 0.0 {
            row(&mut sheet, Font::Regular, format!("Tax({}%):", trim_rate(rate)), tax, 15.0);
        }
    }

    row(&mut sheet, Font::Bold, "Total:".to_string(), record.total, 15.0);

    sheet.y -= 2.0 * LINE;
    sheet
}

/// Centered status, platform attribution, and the blockchain provenance
/// small print.
fn footer(mut sheet: Sheet, record: &InvoiceRecord) -> Sheet {
    sheet = sheet.ensure(6.0 * LINE);

    sheet.y -= LINE;
    let status = format!("Status: {}", format_status(&record.status));
    sheet.centered(Font::Regular, BODY_SIZE, &status);

    sheet.y -= 2.0 * LINE;
    sheet.centered(Font::Regular, BODY_SIZE, ATTRIBUTION);

    sheet.y -= 2.0 * LINE;
    let provenance = format!(
        "This invoice has been recorded on the blockchain with the transaction hash: {}",
        record.transaction_hash
    );
    for line in Font::Regular.wrap(&provenance, SMALL_SIZE, PAGE_WIDTH - 2.0 * MARGIN) {
        sheet.centered(Font::Regular, SMALL_SIZE, &line);
        sheet.y -= 10.0;
    }

    sheet
}

/// Render a tax rate without a trailing `.0` for whole percentages.
fn trim_rate(rate: f64) -> String {
    if rate.fract() == 0.0 {
        format!("{}", rate as i64)
    } else {
        format!("{}", rate)
    }
}
