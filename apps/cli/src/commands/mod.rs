//! # Commands Module
//!
//! Every operation the terminal application can perform, as plain async
//! functions over the state they need.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── shop.rs       ◄─── Shop create/edit/list
//! ├── product.rs    ◄─── Product create/edit/delete/list
//! ├── cart.rs       ◄─── Billing session: shop selection, cart lines
//! ├── bill.rs       ◄─── Bill commit, quick sale, details, returns
//! ├── history.rs    ◄─── Filtered bill history
//! ├── dashboard.rs  ◄─── Shop count, month-to-date sales, recent bills
//! ├── invoice.rs    ◄─── PDF export
//! └── config.rs     ◄─── Effective configuration
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  tally> bill return 42 1                                                │
//! │         │                                                               │
//! │         │ (clap parses into a typed `Command`)                          │
//! │         ▼                                                               │
//! │  Command::Bill(BillCommand::Return { item: 42, quantity: 1 })           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  commands::bill::return_item(&state.db, 42, 1)                          │
//! │      -> Result<ReturnReceipt, ApiError>                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ✓ toast + re-rendered view   or   ✗ error toast                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod bill;
pub mod cart;
pub mod config;
pub mod dashboard;
pub mod history;
pub mod invoice;
pub mod product;
pub mod shop;
