//! # Invoice Command
//!
//! Projects a bill's current state into an invoice and writes it as
//! `Invoice_<billId>_<shopName>.pdf`. Nothing in the database changes.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::{ConfigState, DbState};
use tally_core::invoice::InvoiceDocument;
use tally_invoice::export_pdf;

/// Where an invoice was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceExported {
    pub bill_id: i64,
    pub path: PathBuf,
}

/// Exports the invoice for `bill_id` into `dir`, or the configured invoice
/// directory when `dir` is `None`.
pub async fn export_invoice(
    db: &DbState,
    config: &ConfigState,
    bill_id: i64,
    dir: Option<&Path>,
) -> Result<InvoiceExported, ApiError> {
    debug!(bill_id = bill_id, "export_invoice command");

    let details = db.inner().bills().bill_details(bill_id).await?;
    let invoice = InvoiceDocument::project(&details)?;

    let dir = dir.map(Path::to_path_buf).unwrap_or_else(|| config.invoice_dir());
    let path = export_pdf(&invoice, &config.invoice_style(), &dir)?;

    Ok(InvoiceExported { bill_id, path })
}
