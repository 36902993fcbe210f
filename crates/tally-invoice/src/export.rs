//! Writing rendered invoices to disk

use std::fs;
use std::path::{Path, PathBuf};

use tally_core::invoice::InvoiceDocument;
use tracing::info;

use crate::error::InvoiceResult;
use crate::pdf::{render_pdf, InvoiceStyle};

/// Renders the invoice and writes it into `dir`.
///
/// The directory is created when missing. The file is named after the bill
/// id and shop (see [`InvoiceDocument::file_name`]); an existing file with
/// the same name is replaced.
///
/// ## Returns
/// * `Ok(PathBuf)` - Full path of the written file
/// * `Err(InvoiceError::Pdf)` - Rendering failed
/// * `Err(InvoiceError::Io)` - Directory or file could not be written
pub fn export_pdf(
    invoice: &InvoiceDocument,
    style: &InvoiceStyle,
    dir: &Path,
) -> InvoiceResult<PathBuf> {
    let bytes = render_pdf(invoice, style)?;

    fs::create_dir_all(dir)?;
    let path = dir.join(invoice.file_name());
    fs::write(&path, &bytes)?;

    info!(
        bill_id = invoice.bill_id,
        path = %path.display(),
        size = bytes.len(),
        "Invoice exported"
    );

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tally_core::invoice::InvoiceRow;
    use tally_core::Money;

    #[test]
    fn test_export_writes_named_file() {
        let dir = std::env::temp_dir().join(format!("tally-invoice-test-{}", std::process::id()));
        let invoice = InvoiceDocument {
            title: "INVOICE".to_string(),
            bill_id: 7,
            shop_name: "Acme".to_string(),
            date: Utc::now(),
            rows: vec![InvoiceRow {
                description: "Widget".to_string(),
                quantity: 1,
                unit_price: Money::from_cents(2500),
                line_total: Money::from_cents(2500),
            }],
            grand_total: Money::from_cents(2500),
        };

        let path = export_pdf(&invoice, &InvoiceStyle::default(), &dir).unwrap();

        assert_eq!(path.file_name().unwrap(), "Invoice_7_Acme.pdf");
        let written = fs::read(&path).unwrap();
        assert!(written.starts_with(b"%PDF"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
