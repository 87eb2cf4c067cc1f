//! # scout-sphinx
//!
//! Sphinx / Manticore Search engine for searchable application models.
//!
//! Models describe themselves through [`Searchable`]; the engine writes them
//! with `REPLACE`, removes them with `DELETE`, and matches them with
//! `SELECT … MATCH(…)`. Hits are resolved back into models through a
//! [`ModelRepository`].
//!
//! ## Example
//!
//! ```no_run
//! use scout_sphinx::{Document, Engine, SearchBuilder, SphinxConfig, SphinxEngineProvider};
//!
//! # async fn run() -> scout_sphinx::Result<()> {
//! let engine = SphinxEngineProvider::new(SphinxConfig::load()?).boot()?;
//!
//! let doc = Document::new("articles", 1).with_field("title", "Hello Sphinx");
//! engine.update(&[doc]).await?;
//!
//! let builder = SearchBuilder::new(Document::template("articles", ["title"]), "sphinx");
//! let page = engine.paginate(&builder, 10, 1).await?;
//! println!("{} of {}", page.len(), engine.get_total_count(&page));
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod connector;
pub mod engine;
pub mod error;
pub mod provider;
pub mod results;
pub mod searchable;
pub mod sphinx;

pub use builder::SearchBuilder;
pub use config::{ConnectionOptions, HostConfig, SphinxConfig};
pub use engine::Engine;
pub use error::{ErrorCategory, Result, ScoutError};
pub use provider::{ENGINE_NAME, SphinxEngineProvider};
pub use results::SearchResults;
pub use searchable::{DOCUMENT_ID, Document, Fields, ModelRepository, Searchable};
pub use sphinx::SphinxEngine;
