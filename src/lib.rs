//! # CultureVault
//!
//! A local-first cultural heritage catalog with AI-assisted place search.
//!
//! CultureVault keeps a curated catalog of places and their cultural records
//! (festivals, cuisine, crafts, rituals) and merges instant catalog filtering
//! with a debounced AI gateway lookup, so searching "kyoto" is free and
//! offline while searching a village the catalog has never heard of still
//! finds an answer.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌─────────────┐   ┌─────────────┐
//! │ Catalog  │──▶│ SearchMerge │◀──│ AI Gateway  │
//! │ (JSON)   │   │   engine    │   │ (debounced) │
//! └──────────┘   └──────┬──────┘   └─────────────┘
//!                       │
//!           ┌───────────┴───────┐
//!           ▼                   ▼
//!      ┌─────────┐        ┌──────────┐
//!      │   CLI   │        │   HTTP   │
//!      │  (cv)   │        │ (serve)  │
//!      └─────────┘        └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! cv init                        # write config, create data dir
//! cv search "kyoto"              # filter the local catalog
//! cv search "timbuktu" --select 1
//! cv show kyoto                  # full cultural record
//! cv history list                # recent selections
//! cv serve                       # start HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`dataset`] | Bundled and external catalog loading |
//! | [`gateway`] | AI gateway lookup providers |
//! | [`stores`] | File-backed history and stash |
//! | [`search`] | The `cv search` command |
//! | [`show`] | The `cv show` command |
//! | [`history`] | The `cv history` commands |
//! | [`catalog_cmd`] | The `cv catalog` commands |
//! | [`server`] | HTTP API server |
//!
//! The engine itself, along with the catalog and store seams, lives in the
//! `culturevault-core` crate.

pub mod catalog_cmd;
pub mod config;
pub mod dataset;
pub mod gateway;
pub mod history;
pub mod search;
pub mod server;
pub mod show;
pub mod stores;
