//! Dynamic, fully parameterized statement construction.
//!
//! Every function here is pure: it turns a table name and typed columns
//! into SQL text plus an ordered parameter list. Column names come from
//! the entity's column enumeration and values are always bound as `$n`
//! placeholders, never spliced into the text.

use std::fmt::Write;

use medidir_core::types::{Changes, Column, ColumnKind, FieldValue, Filter};
use medidir_core::{AppError, AppResult};

/// One bound parameter: the value and the column type it binds as.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub kind: ColumnKind,
    pub value: FieldValue,
}

/// SQL text and its parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Param>,
}

impl Statement {
    fn new(sql: String) -> Self {
        Self {
            sql,
            params: Vec::new(),
        }
    }

    /// Append a parameter and return its placeholder.
    fn bind(&mut self, kind: ColumnKind, value: FieldValue) -> String {
        self.params.push(Param { kind, value });
        format!("${}", self.params.len())
    }

    fn push_where<C: Column>(&mut self, filter: &Filter<C>) {
        if filter.is_empty() {
            return;
        }
        let mut clauses = Vec::with_capacity(filter.len());
        for (column, value) in filter.conditions() {
            if value.is_null() {
                clauses.push(format!("{} IS NULL", column.name()));
            } else {
                let placeholder = self.bind(column.kind(), value.clone());
                clauses.push(format!("{} = {placeholder}", column.name()));
            }
        }
        let _ = write!(self.sql, " WHERE {}", clauses.join(" AND "));
    }

    fn push_set<C: Column>(&mut self, changes: &Changes<C>) {
        let mut assignments = Vec::with_capacity(changes.len() + 1);
        for (column, value) in changes.assignments() {
            let placeholder = self.bind(column.kind(), value.clone());
            assignments.push(format!("{} = {placeholder}", column.name()));
        }
        assignments.push("updated_at = NOW()".to_string());
        let _ = write!(self.sql, " SET {}", assignments.join(", "));
    }
}

/// `SELECT * FROM table WHERE id = $1`
pub fn select_by_id(table: &str, id: i64) -> Statement {
    let mut stmt = Statement::new(format!("SELECT * FROM {table}"));
    let placeholder = stmt.bind(ColumnKind::BigInt, FieldValue::Int(id));
    let _ = write!(stmt.sql, " WHERE id = {placeholder}");
    stmt
}

/// `SELECT * FROM table [WHERE ...] ORDER BY id`
pub fn select_many<C: Column>(table: &str, filter: &Filter<C>) -> Statement {
    let mut stmt = Statement::new(format!("SELECT * FROM {table}"));
    stmt.push_where(filter);
    stmt.sql.push_str(" ORDER BY id");
    stmt
}

/// `INSERT INTO table (...) VALUES (...) RETURNING *`
pub fn insert<C: Column>(table: &str, values: &[(C, FieldValue)]) -> Statement {
    if values.is_empty() {
        return Statement::new(format!("INSERT INTO {table} DEFAULT VALUES RETURNING *"));
    }
    let mut stmt = Statement::new(String::new());
    let mut columns = Vec::with_capacity(values.len());
    let mut placeholders = Vec::with_capacity(values.len());
    for (column, value) in values {
        columns.push(column.name());
        placeholders.push(stmt.bind(column.kind(), value.clone()));
    }
    stmt.sql = format!(
        "INSERT INTO {table} ({}) VALUES ({}) RETURNING *",
        columns.join(", "),
        placeholders.join(", ")
    );
    stmt
}

/// `UPDATE table SET ..., updated_at = NOW() WHERE id = $n RETURNING *`
pub fn update_by_id<C: Column>(table: &str, id: i64, changes: &Changes<C>) -> AppResult<Statement> {
    require_changes(changes)?;
    let mut stmt = Statement::new(format!("UPDATE {table}"));
    stmt.push_set(changes);
    let placeholder = stmt.bind(ColumnKind::BigInt, FieldValue::Int(id));
    let _ = write!(stmt.sql, " WHERE id = {placeholder} RETURNING *");
    Ok(stmt)
}

/// `UPDATE table SET ..., updated_at = NOW() WHERE ...`
pub fn update_many<C: Column>(
    table: &str,
    filter: &Filter<C>,
    changes: &Changes<C>,
) -> AppResult<Statement> {
    require_filter(filter, "update")?;
    require_changes(changes)?;
    let mut stmt = Statement::new(format!("UPDATE {table}"));
    stmt.push_set(changes);
    stmt.push_where(filter);
    Ok(stmt)
}

/// `DELETE FROM table WHERE id = $1 RETURNING *`
pub fn delete_by_id(table: &str, id: i64) -> Statement {
    let mut stmt = Statement::new(format!("DELETE FROM {table}"));
    let placeholder = stmt.bind(ColumnKind::BigInt, FieldValue::Int(id));
    let _ = write!(stmt.sql, " WHERE id = {placeholder} RETURNING *");
    stmt
}

/// `DELETE FROM table WHERE ... RETURNING *`
pub fn delete_many<C: Column>(table: &str, filter: &Filter<C>) -> AppResult<Statement> {
    require_filter(filter, "delete")?;
    let mut stmt = Statement::new(format!("DELETE FROM {table}"));
    stmt.push_where(filter);
    stmt.sql.push_str(" RETURNING *");
    Ok(stmt)
}

fn require_filter<C: Column>(filter: &Filter<C>, action: &str) -> AppResult<()> {
    if filter.is_empty() {
        return Err(AppError::validation(format!(
            "refusing to {action} every row: filter is empty"
        )));
    }
    Ok(())
}

fn require_changes<C: Column>(changes: &Changes<C>) -> AppResult<()> {
    if changes.is_empty() {
        return Err(AppError::validation("no fields to update"));
    }
    Ok(())
}
