//! # xkcd-index
//!
//! An offline, searchable index of xkcd comics.
//!
//! The index is built incrementally from the public JSON interface
//! (`https://xkcd.com/{n}/info.0.json`), persisted as a single JSON snapshot,
//! and queried locally with weighted keyword search.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌─────────────┐   ┌──────────────┐
//! │   Fetcher   │──▶│   Builder   │──▶│  IndexStore  │
//! │ (HTTP JSON) │   │ (ingest.rs) │   │ (JSON file)  │
//! └─────────────┘   └─────────────┘   └──────┬───────┘
//!                                            │
//!                      ┌─────────────────────┤
//!                      ▼                     ▼
//!                 ┌──────────┐        ┌─────────────┐
//!                 │  search  │        │ show/random │
//!                 │ (scored) │        │    stats    │
//!                 └──────────┘        └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! xkcd update                      # download missing comics
//! xkcd search "programming python" # weighted keyword search
//! xkcd show 353                    # print one comic
//! xkcd random                      # print a random comic
//! xkcd stats                       # index summary
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | The `Comic` record |
//! | [`error`] | Fetch, store, and lookup errors |
//! | [`fetch`] | Remote API client |
//! | [`store`] | In-memory index and JSON snapshot |
//! | [`ingest`] | Incremental index builder |
//! | [`progress`] | Update progress reporting |
//! | [`search`] | Weighted keyword search |
//! | [`get`] | Lookup by number and random pick |
//! | [`stats`] | Index statistics |
//! | [`display`] | Terminal rendering |

pub mod config;
pub mod display;
pub mod error;
pub mod fetch;
pub mod get;
pub mod ingest;
pub mod models;
pub mod progress;
pub mod search;
pub mod stats;
pub mod store;
