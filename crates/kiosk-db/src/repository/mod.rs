//! # Repository Module
//!
//! Database repository implementations for Smart Kiosk.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  state.db.sales().create_sale(&lines, mode, today, rate)       │
//! │       ▼                                                                 │
//! │  SaleRepository                                                        │
//! │  ├── BEGIN                                                             │
//! │  ├── load products, owner rate                                         │
//! │  ├── kiosk_core::billing::price_order()   ← pure pricing               │
//! │  ├── INSERT sale + items, UPDATE stock                                 │
//! │  └── COMMIT (or rollback on drop)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`UserRepository`](user::UserRepository) - Login accounts
//! - [`OwnerRepository`](owner::OwnerRepository) - Shop profile singleton
//! - [`ProductRepository`](product::ProductRepository) - Catalog CRUD and search
//! - [`SaleRepository`](sale::SaleRepository) - Atomic billing and receipts
//! - [`ReportRepository`](report::ReportRepository) - Summaries and export rows

pub mod owner;
pub mod product;
pub mod report;
pub mod sale;
pub mod user;
