//! manhours-cli - manhour and cost estimation from predefined item groups
//!
//! Items are catalogued in named groups with a unit and unit rate. An
//! estimating session opens a group as a working set of rows, derives hours
//! and values as days and persons change, and consolidates finished groups
//! into a single estimate that can be exported as a spreadsheet.
//!
//! # Architecture
//!
//! - `config`: path resolution and user settings
//! - `error`: crate-wide error type
//! - `models`: groups, items, manpower catalogue, money and units
//! - `estimate`: rows, derivation, working sets and the consolidation ledger
//! - `export`: spreadsheet layout plus xlsx, csv, json and yaml writers
//! - `extract`: MTO table extraction from PDFs through a language model
//! - `storage`: JSON file storage and the session file
//! - `audit`: append-only audit log
//! - `services`: business logic over storage
//! - `display`: terminal tables
//! - `cli`: command handlers

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod estimate;
pub mod export;
pub mod extract;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{ManhoursError, ManhoursResult};
