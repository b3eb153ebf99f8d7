//! # Fortunecookie - tap-to-reveal fortunes
//!
//! Fortunecookie picks one fortune from a fixed list. It was built for NFC tags:
//! each tag carries a link, and the link decides how the fortune is chosen.
//!
//! ## Features
//!
//! - **Deterministic mode**: a link with `?id=TAG123` always shows the same fortune,
//!   chosen by FNV-1a hashing the identifier (UTF-16 code units, browser compatible).
//! - **Random no-repeat mode**: a link without an id draws from the OS random source
//!   and cycles through the whole list before repeating.
//! - **Persisted cycles**: the seen set survives restarts in a versioned JSON file.
//! - **Graceful degradation**: corrupt state, failed writes and empty lists never
//!   fail a pick.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fortunecookie::config::Config;
//! use fortunecookie::fortune::{render, Mode, Selector};
//! use fortunecookie::invocation::identifier_from_url;
//! use fortunecookie::storage::JsonFileStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load_or_default("config.toml").await?;
//!     let list = config.fortune_list()?;
//!     let total = list.len();
//!     let mut selector = Selector::new(list, JsonFileStore::new(&config.storage.data_dir));
//!
//!     let id = identifier_from_url("https://yourdomain.example/?id=TAG123");
//!     let pick = selector.new_selection(id.as_ref());
//!     println!("{}", render(pick.as_ref(), Mode::for_identifier(id.as_ref()), total));
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`fortune`] - hashing, the fortune list, selection and rendering
//! - [`storage`] - seen-set persistence behind the `SeenSetStore` trait
//! - [`invocation`] - identifier parsing from links and tag link generation
//! - [`config`] - configuration loading and defaults
//! - [`logutil`] - single-line log sanitizing

pub mod config;
pub mod fortune;
pub mod invocation;
pub mod logutil;
pub mod storage;
