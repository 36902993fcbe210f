//! # Repository Module
//!
//! Database repository implementations for Tally POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  CLI command                                                           │
//! │       │                                                                 │
//! │       │  db.bills().return_item(item_id, 1)                            │
//! │       ▼                                                                 │
//! │  BillRepository                                                        │
//! │  ├── commit_bill(&draft)       ─┐                                      │
//! │  ├── return_item(id, qty)      ─┴─ one transaction each                │
//! │  ├── list_bills(&filter, tz)                                           │
//! │  └── bill_details(id)                                                  │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ShopRepository`](shop::ShopRepository) - Shop CRUD
//! - [`ProductRepository`](product::ProductRepository) - Product CRUD
//! - [`BillRepository`](bill::BillRepository) - Ledger writes and history reads

pub mod bill;
pub mod product;
pub mod shop;
