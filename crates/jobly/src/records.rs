//! Job-board records and their partial-update descriptors.
//!
//! Each record names its table, key column, the fields a client may change,
//! and how camelCase field names map to snake_case columns. [`patch`] ties a
//! descriptor to [`sql_for_partial_update`] and [`UpdateStatement`].

use std::fmt::Display;

use serde::Serialize;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::field_map::{ColumnMap, FieldMap};
use crate::partial_update::sql_for_partial_update;
use crate::row::{FromRow, RowExt};
use crate::update::UpdateStatement;

/// A record that can be partially updated by key.
pub trait Patchable: FromRow {
    /// Singular name used in error messages.
    const NAME: &'static str;
    const TABLE: &'static str;
    const KEY_COLUMN: &'static str;
    /// RETURNING list; columns are aliased back to field names.
    const RETURNING: &'static str;
    /// Fields a client may change.
    const UPDATABLE: &'static [&'static str];

    /// Field-to-column translation for this table.
    fn column_map() -> ColumnMap;
}

/// Reject fields outside `R::UPDATABLE`.
pub fn check_updatable<R: Patchable>(data: &FieldMap) -> JoblyResult<()> {
    match data.keys().find(|field| !R::UPDATABLE.contains(field)) {
        Some(field) => Err(JoblyError::bad_request(format!(
            "Field not updatable: {field}"
        ))),
        None => Ok(()),
    }
}

/// Update only the fields in `data` on the row identified by `key`.
///
/// Returns the updated record. Fails with `BadRequest` for an empty map or a
/// field not in `R::UPDATABLE`, and with `NotFound` when no row has `key`.
pub async fn patch<R, K>(conn: &impl GenericClient, key: &K, data: &FieldMap) -> JoblyResult<R>
where
    R: Patchable,
    K: ToSql + Sync + Display,
{
    check_updatable::<R>(data)?;
    let set = sql_for_partial_update(data, &R::column_map())?;

    let stmt = UpdateStatement::new(R::TABLE, R::KEY_COLUMN)?.returning(R::RETURNING);
    stmt.fetch_one::<R>(conn, &set, key)
        .await
        .map_err(|e| match e {
            JoblyError::NotFound(_) => JoblyError::not_found(format!("No {}: {key}", R::NAME)),
            other => other,
        })
}

/// [`patch`] from a JSON request body.
pub async fn patch_json<R, K>(
    conn: &impl GenericClient,
    key: &K,
    body: serde_json::Value,
) -> JoblyResult<R>
where
    R: Patchable,
    K: ToSql + Sync + Display,
{
    let data = FieldMap::from_json(body)?;
    patch::<R, K>(conn, key, &data).await
}

// ==================== companies ====================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl FromRow for Company {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            handle: row.try_get_column("handle")?,
            name: row.try_get_column("name")?,
            description: row.try_get_column("description")?,
            num_employees: row.try_get_column("numEmployees")?,
            logo_url: row.try_get_column("logoUrl")?,
        })
    }
}

impl Patchable for Company {
    const NAME: &'static str = "company";
    const TABLE: &'static str = "companies";
    const KEY_COLUMN: &'static str = "handle";
    const RETURNING: &'static str = r#"handle, name, description, num_employees AS "numEmployees", logo_url AS "logoUrl""#;
    const UPDATABLE: &'static [&'static str] = &["name", "description", "numEmployees", "logoUrl"];

    fn column_map() -> ColumnMap {
        ColumnMap::new()
            .with("numEmployees", "num_employees")
            .with("logoUrl", "logo_url")
    }
}

// ==================== jobs ====================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<f64>,
    pub company_handle: String,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("companyHandle")?,
        })
    }
}

impl Patchable for Job {
    const NAME: &'static str = "job";
    const TABLE: &'static str = "jobs";
    const KEY_COLUMN: &'static str = "id";
    const RETURNING: &'static str =
        r#"id, title, salary, equity, company_handle AS "companyHandle""#;
    // A job never moves between companies.
    const UPDATABLE: &'static [&'static str] = &["title", "salary", "equity"];

    fn column_map() -> ColumnMap {
        ColumnMap::new().with("companyHandle", "company_handle")
    }
}

// ==================== users ====================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

impl FromRow for User {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            username: row.try_get_column("username")?,
            first_name: row.try_get_column("firstName")?,
            last_name: row.try_get_column("lastName")?,
            email: row.try_get_column("email")?,
            is_admin: row.try_get_column("isAdmin")?,
        })
    }
}

impl Patchable for User {
    const NAME: &'static str = "user";
    const TABLE: &'static str = "users";
    const KEY_COLUMN: &'static str = "username";
    const RETURNING: &'static str = r#"username, first_name AS "firstName", last_name AS "lastName", email, is_admin AS "isAdmin""#;
    const UPDATABLE: &'static [&'static str] = &["firstName", "lastName", "email", "isAdmin"];

    fn column_map() -> ColumnMap {
        ColumnMap::new()
            .with("firstName", "first_name")
            .with("lastName", "last_name")
            .with("isAdmin", "is_admin")
    }
}
