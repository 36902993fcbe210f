//! # tally-invoice: PDF Invoices
//!
//! Renders the invoice projection built by `tally_core::invoice` as an A4
//! PDF and writes it to disk.
//!
//! ## Flow
//! ```text
//! ┌──────────────┐   project()   ┌─────────────────┐  render_pdf()  ┌─────────┐
//! │ BillDetails  │ ────────────► │ InvoiceDocument │ ─────────────► │ Vec<u8> │
//! │ (tally-db)   │               │ (tally-core)    │                └────┬────┘
//! └──────────────┘               └─────────────────┘                     │
//!                                                        export_pdf()    ▼
//!                                                    <dir>/Invoice_12_Acme.pdf
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use tally_core::invoice::InvoiceDocument;
//! use tally_invoice::{export_pdf, InvoiceStyle};
//!
//! let details = db.bills().bill_details(12).await?;
//! let invoice = InvoiceDocument::project(&details)?;
//! let path = export_pdf(&invoice, &InvoiceStyle::default(), &invoice_dir)?;
//! ```

pub mod error;
pub mod export;
pub mod metrics;
pub mod pdf;

pub use error::{InvoiceError, InvoiceResult};
pub use export::export_pdf;
pub use pdf::{render_pdf, InvoiceStyle};
