//! # jobly
//!
//! Data-access core for the jobly companies/jobs backend on PostgreSQL.
//!
//! ## Features
//!
//! - **Partial updates**: [`sql_for_partial_update`] turns an ordered set of
//!   field changes into a `SET` clause and its positional parameters
//! - **Typed values**: [`FieldValue`] is a closed scalar variant that binds
//!   directly as a `tokio-postgres` parameter
//! - **Complete statements**: [`UpdateStatement`] places the key at `$n+1` and
//!   maps "zero rows" to [`JoblyError::NotFound`]
//! - **Records**: [`Company`], [`Job`] and [`User`] describe their tables and
//!   updatable fields for [`patch`]
//! - **Transaction-friendly**: pass a transaction anywhere a [`GenericClient`]
//!   is expected
//!
//! ## Example
//!
//! ```ignore
//! use jobly::{Company, FieldMap, patch};
//!
//! let changes = FieldMap::new()
//!     .with("numEmployees", 1200)
//!     .with("logoUrl", "https://img.example/ibm.png");
//!
//! let company: Company = patch(&client, &"ibm", &changes).await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod field_map;
pub mod partial_update;
pub mod records;
pub mod row;
pub mod update;
pub mod value;

pub use client::GenericClient;
pub use config::DatabaseConfig;
pub use error::{JoblyError, JoblyResult};
pub use field_map::{ColumnMap, FieldMap};
pub use partial_update::{PartialUpdate, sql_for_partial_update};
pub use records::{Company, Job, Patchable, User, check_updatable, patch, patch_json};
pub use row::{FromRow, RowExt};
pub use update::UpdateStatement;
pub use value::FieldValue;

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_from_config, create_pool_with_size};
