//! # sphinxql
//!
//! A small SphinxQL client for Sphinx and Manticore Search: a fluent statement
//! builder, batched execution, and a MySQL-protocol driver.
//!
//! ## Example
//!
//! ```no_run
//! use sphinxql::{ConnectParams, Helper, MySqlConnection, SphinxQL};
//!
//! # async fn run() -> sphinxql::Result<()> {
//! let connection = MySqlConnection::connect_lazy(&ConnectParams::default());
//!
//! let mut results = SphinxQL::select(["*"])
//!     .from("articles")
//!     .match_fields(["title", "body"], "rust")
//!     .limit_offset(0, 10)
//!     .enqueue(Helper::show_meta())
//!     .execute(&connection)
//!     .await?;
//!
//! let hits = results.current().cloned().unwrap_or_default();
//! results.advance();
//! println!("{} hits", hits.count());
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod error;
pub mod escape;
pub mod helper;
pub mod mysql;
pub mod query;
pub mod result;

pub use connection::Connection;
pub use error::{Result, SphinxQlError};
pub use helper::{Helper, SearchMeta};
pub use mysql::{ConnectParams, DEFAULT_PORT, MySqlConnection};
pub use query::{Batch, SphinxQL};
pub use result::{MultiResultSet, ResultSet, Row};
