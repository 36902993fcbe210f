//! A4 invoice layout
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ INVOICE                          Store Name  │
//! │ Shop:   Acme                                 │
//! │ Date:   2024-03-10 14:05                     │
//! │ Bill #: 12                                   │
//! │                                              │
//! │ Description           Qty  Unit Price  Total │
//! │ ──────────────────────────────────────────── │
//! │ Widget                  2       25.00  50.00 │
//! │ ...                                          │
//! │ ──────────────────────────────────────────── │
//! │                        Grand Total: Rs 50.00 │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Coordinates are in millimetres from the bottom-left corner of the page.

use chrono::{FixedOffset, Offset, Utc};
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point,
};
use tally_core::invoice::InvoiceDocument;
use tally_core::money::CurrencyFormat;
use tracing::debug;

use crate::error::InvoiceResult;
use crate::metrics::{text_width_mm, truncate_to_width, Weight};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const RIGHT: f32 = PAGE_WIDTH - MARGIN;
const BOTTOM: f32 = 25.0;

const TITLE_SIZE: f32 = 22.0;
const META_SIZE: f32 = 11.0;
const BODY_SIZE: f32 = 10.0;
const TOTAL_SIZE: f32 = 13.0;
const ROW_HEIGHT: f32 = 7.0;

// Right edges of the numeric columns.
const QTY_RIGHT: f32 = 120.0;
const PRICE_RIGHT: f32 = 155.0;
const DESCRIPTION_WIDTH: f32 = 80.0;

/// Presentation settings that do not come from the bill.
#[derive(Debug, Clone)]
pub struct InvoiceStyle {
    /// Printed at the top right when set.
    pub store_name: Option<String>,
    pub currency: CurrencyFormat,
    /// Offset used to print the bill date.
    pub utc_offset: FixedOffset,
}

impl Default for InvoiceStyle {
    fn default() -> Self {
        InvoiceStyle {
            store_name: None,
            currency: CurrencyFormat::default(),
            utc_offset: Utc.fix(),
        }
    }
}

/// Fonts and the current write position.
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
    pages: usize,
}

impl PageWriter {
    fn new(title: &str) -> InvoiceResult<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Page 1");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(PageWriter {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT - MARGIN,
            pages: 1,
        })
    }

    fn font(&self, weight: Weight) -> &IndirectFontRef {
        match weight {
            Weight::Regular => &self.regular,
            Weight::Bold => &self.bold,
        }
    }

    fn text(&self, text: &str, size: f32, x: f32, weight: Weight) {
        self.layer
            .use_text(text, size, Mm(x), Mm(self.y), self.font(weight));
    }

    fn text_right(&self, text: &str, size: f32, right: f32, weight: Weight) {
        let x = right - text_width_mm(text, size, weight);
        self.text(text, size, x, weight);
    }

    fn rule(&self) {
        let y = self.y + 2.0;
        self.layer.set_outline_thickness(0.5);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(MARGIN), Mm(y)), false),
                (Point::new(Mm(RIGHT), Mm(y)), false),
            ],
            is_closed: false,
        });
    }

    fn advance(&mut self, mm: f32) {
        self.y -= mm;
    }

    fn new_page(&mut self) {
        self.pages += 1;
        let (page, layer) = self.doc.add_page(
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            format!("Page {}", self.pages),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn table_header(&mut self) {
        self.text("Description", BODY_SIZE, MARGIN, Weight::Bold);
        self.text_right("Qty", BODY_SIZE, QTY_RIGHT, Weight::Bold);
        self.text_right("Unit Price", BODY_SIZE, PRICE_RIGHT, Weight::Bold);
        self.text_right("Total", BODY_SIZE, RIGHT, Weight::Bold);
        self.advance(2.5);
        self.rule();
        self.advance(ROW_HEIGHT - 1.0);
    }
}

/// Renders the invoice as a PDF document.
pub fn render_pdf(invoice: &InvoiceDocument, style: &InvoiceStyle) -> InvoiceResult<Vec<u8>> {
    let mut w = PageWriter::new(&format!("{} #{}", invoice.title, invoice.bill_id))?;

    // Header
    w.advance(TITLE_SIZE / 2.0);
    w.text(&invoice.title, TITLE_SIZE, MARGIN, Weight::Bold);
    if let Some(store) = style.store_name.as_deref() {
        w.text_right(store, META_SIZE, RIGHT, Weight::Bold);
    }
    w.advance(12.0);

    let date = invoice
        .date
        .with_timezone(&style.utc_offset)
        .format("%Y-%m-%d %H:%M")
        .to_string();
    for (label, value) in [
        ("Shop:", invoice.shop_name.clone()),
        ("Date:", date),
        ("Bill #:", invoice.bill_id.to_string()),
    ] {
        w.text(label, META_SIZE, MARGIN, Weight::Bold);
        w.text(&value, META_SIZE, MARGIN + 18.0, Weight::Regular);
        w.advance(6.0);
    }
    w.advance(6.0);

    // Line items
    w.table_header();
    for row in &invoice.rows {
        if w.y < BOTTOM {
            w.new_page();
            w.table_header();
        }

        let description =
            truncate_to_width(&row.description, DESCRIPTION_WIDTH, BODY_SIZE, Weight::Regular);
        w.text(&description, BODY_SIZE, MARGIN, Weight::Regular);
        w.text_right(&row.quantity.to_string(), BODY_SIZE, QTY_RIGHT, Weight::Regular);
        w.text_right(
            &style.currency.format(row.unit_price),
            BODY_SIZE,
            PRICE_RIGHT,
            Weight::Regular,
        );
        w.text_right(
            &style.currency.format(row.line_total),
            BODY_SIZE,
            RIGHT,
            Weight::Regular,
        );
        w.advance(ROW_HEIGHT);
    }

    // Grand total
    if w.y < BOTTOM {
        w.new_page();
    }
    w.rule();
    w.advance(4.0);
    let total = format!("Grand Total: {}", style.currency.format(invoice.grand_total));
    w.text_right(&total, TOTAL_SIZE, RIGHT, Weight::Bold);

    debug!(
        bill_id = invoice.bill_id,
        rows = invoice.rows.len(),
        pages = w.pages,
        "Invoice rendered"
    );

    Ok(w.doc.save_to_bytes()?)
}
