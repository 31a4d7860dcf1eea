//! Complete UPDATE statements around a [`PartialUpdate`].
//!
//! The clause numbers its placeholders `$1..$n`; the key is bound at `$n+1`.
//! [`UpdateStatement`] keeps that ordering in one place so callers never
//! assemble the parameter list by hand.

use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::partial_update::PartialUpdate;
use crate::row::FromRow;
use tokio_postgres::types::ToSql;

/// `UPDATE <table> SET <clause> WHERE "<key>"=$<n+1> [RETURNING ...]`
#[derive(Debug, Clone)]
pub struct UpdateStatement {
    table: String,
    key_column: String,
    returning: Option<String>,
}

impl UpdateStatement {
    /// Target `table`, matching rows on `key_column`.
    ///
    /// Both must be plain identifiers (`[A-Za-z_][A-Za-z0-9_$]*`); the table
    /// may be schema-qualified.
    pub fn new(table: &str, key_column: &str) -> JoblyResult<Self> {
        if !table.split('.').all(is_plain_ident) || table.split('.').count() > 2 {
            return Err(JoblyError::bad_request(format!("Invalid table name: {table:?}")));
        }
        if !is_plain_ident(key_column) {
            return Err(JoblyError::bad_request(format!(
                "Invalid key column: {key_column:?}"
            )));
        }
        Ok(Self {
            table: table.to_string(),
            key_column: key_column.to_string(),
            returning: None,
        })
    }

    /// Set the RETURNING list (raw SQL, e.g. `handle, num_employees AS "numEmployees"`).
    pub fn returning(mut self, columns: &str) -> Self {
        self.returning = Some(columns.to_string());
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Render the SQL for `set`; the key placeholder is `set.next_placeholder()`.
    pub fn to_sql(&self, set: &PartialUpdate) -> String {
        let mut sql = format!(
            "UPDATE {} SET {} WHERE \"{}\"=${}",
            self.table,
            set.clause,
            self.key_column,
            set.next_placeholder()
        );
        if let Some(cols) = &self.returning {
            sql.push_str(" RETURNING ");
            sql.push_str(cols);
        }
        sql
    }

    /// Render the SQL and the full parameter list (`values` then `key`).
    pub fn build<'a>(
        &self,
        set: &'a PartialUpdate,
        key: &'a (dyn ToSql + Sync),
    ) -> JoblyResult<(String, Vec<&'a (dyn ToSql + Sync)>)> {
        if set.is_empty() {
            return Err(JoblyError::bad_request("No data"));
        }
        let mut params = set.params_ref();
        params.push(key);
        Ok((self.to_sql(set), params))
    }

    /// Run the update; zero affected rows is `NotFound`.
    pub async fn execute(
        &self,
        conn: &impl GenericClient,
        set: &PartialUpdate,
        key: &(dyn ToSql + Sync),
    ) -> JoblyResult<u64> {
        let (sql, params) = self.build(set, key)?;
        self.trace(&sql, params.len());

        let affected = conn.execute(&sql, &params).await?;
        if affected == 0 {
            return Err(JoblyError::not_found(format!(
                "No row in {} matched the key",
                self.table
            )));
        }
        Ok(affected)
    }

    /// Run the update and map the row returned by RETURNING.
    ///
    /// Without an explicit `returning` list, `RETURNING *` is used.
    pub async fn fetch_one<T: FromRow>(
        &self,
        conn: &impl GenericClient,
        set: &PartialUpdate,
        key: &(dyn ToSql + Sync),
    ) -> JoblyResult<T> {
        let stmt;
        let this = if self.returning.is_some() {
            self
        } else {
            stmt = self.clone().returning("*");
            &stmt
        };

        let (sql, params) = this.build(set, key)?;
        this.trace(&sql, params.len());

        match conn.query_opt(&sql, &params).await? {
            Some(row) => T::from_row(&row),
            None => Err(JoblyError::not_found(format!(
                "No row in {} matched the key",
                self.table
            ))),
        }
    }

    fn trace(&self, sql: &str, param_count: usize) {
        tracing::debug!(
            target: "jobly.sql",
            table = %self.table,
            param_count,
            sql = %sql,
            "executing partial update"
        );
    }
}

fn is_plain_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
