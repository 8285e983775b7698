mod postgresql;
pub use postgresql::Postgresql;

mod sql_server;
pub use sql_server::SqlServer;

mod sqlite;
pub use sqlite::Sqlite;

use crate::serializer::IsolationLevel;

use quarry_core::{
    schema::Column,
    stmt::{Lock, Type},
    Error, Result,
};

use std::fmt;

/// Everything the serializer needs to know about a database engine.
///
/// The serializer never asks which engine it is talking to; every difference
/// in syntax or semantics is expressed through this trait.
pub trait Dialect: fmt::Debug + Send + Sync {
    /// Short engine name used in diagnostics.
    fn name(&self) -> &'static str;

    fn capability(&self) -> &'static Capability;

    /// Writes `ident` as a quoted identifier.
    fn quote_ident(&self, ident: &str, dst: &mut String) {
        dst.push('"');
        for c in ident.chars() {
            if c == '"' {
                dst.push('"');
            }
            dst.push(c);
        }
        dst.push('"');
    }

    /// Writes the placeholder for a bound parameter.
    ///
    /// `position` is the zero-based position of the parameter in the
    /// statement's own parameter list and `name` its wire-level name.
    fn placeholder(&self, position: usize, name: &str, dst: &mut String) {
        let _ = position;
        dst.push('@');
        dst.push_str(name);
    }

    /// Token for a boolean literal nested inside a larger predicate.
    fn bool_literal(&self, value: bool) -> &'static str;

    /// Token for a predicate consisting only of a boolean literal.
    fn tautology(&self, value: bool) -> &'static str {
        if value {
            "1=1"
        } else {
            "1=0"
        }
    }

    /// Maps a catalog type name (without nullability) to a host type.
    fn map_type(&self, sql_type: &str) -> Result<Type>;

    /// The host type of a column, wrapped in `Option` when nullable.
    fn column_type(&self, column: &Column) -> Result<Type> {
        let ty = self.map_type(&column.sql_type).map_err(|err| {
            err.context(quarry_core::err!("mapping the type of column `{}`", column.name))
        })?;

        Ok(if column.nullable { Type::option(ty) } else { ty })
    }

    /// Text placed right after `SELECT` to limit the number of rows.
    fn pagination_head(&self, limit: u64) -> Option<String> {
        let _ = limit;
        None
    }

    /// Text appended after `ORDER BY` to limit the number of rows.
    fn pagination_tail(&self, limit: u64) -> Option<String> {
        Some(format!("LIMIT {limit}"))
    }

    /// The row locking clause, or an error when the engine has none.
    fn lock_clause(&self, lock: &Lock) -> Result<String> {
        if !self.capability().select_for_update {
            return Err(Error::unsupported_feature(
                self.name(),
                format!("row locking (`FOR {}`)", lock.clause()),
            ));
        }

        Ok(format!("FOR {}", lock.clause()))
    }

    /// Renders "`operand` is contained in the collection bound to
    /// `collection`". Only called when [`Capability::collection_params`] is
    /// set.
    fn membership(&self, operand: &str, collection: &str) -> Result<String> {
        let _ = (operand, collection);
        Err(Error::unsupported_feature(
            self.name(),
            "membership tests against collection parameters",
        ))
    }

    /// How an insert reads back database-assigned values.
    fn insert_read_back(&self) -> InsertReadBack;

    /// Expression yielding the number of rows the previous statement
    /// affected, or `-1` when the engine cannot report it.
    fn rows_affected_probe(&self) -> &'static str {
        "-1"
    }

    /// True when a concurrency token written inside a transaction keeps its
    /// value for later statements of the same transaction.
    fn token_stable_in_transaction(&self) -> bool {
        self.capability().token_stable_in_transaction
    }

    fn begin_transaction(
        &self,
        isolation: Option<IsolationLevel>,
        read_only: bool,
    ) -> Result<String> {
        let mut sql = String::from("BEGIN");
        if let Some(level) = isolation {
            sql.push_str(" ISOLATION LEVEL ");
            sql.push_str(level.as_sql());
        }
        if read_only {
            sql.push_str(" READ ONLY");
        }
        Ok(sql)
    }

    fn commit_transaction(&self) -> String {
        "COMMIT".to_string()
    }

    fn rollback_transaction(&self) -> String {
        "ROLLBACK".to_string()
    }

    fn savepoint(&self, name: &str) -> String {
        format!("SAVEPOINT {name}")
    }

    fn release_savepoint(&self, name: &str) -> Result<String> {
        Ok(format!("RELEASE SAVEPOINT {name}"))
    }

    fn rollback_to_savepoint(&self, name: &str) -> String {
        format!("ROLLBACK TO SAVEPOINT {name}")
    }
}

/// Strategy for hydrating a record after `INSERT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertReadBack {
    /// `INSERT ... RETURNING <columns>`
    Returning,

    /// A follow-up `SELECT` keyed on this expression, which yields the last
    /// identity value assigned on the connection.
    LastInsertId(&'static str),
}

#[derive(Debug)]
pub struct Capability {
    /// Supports `SELECT ... FOR UPDATE` style row locking.
    pub select_for_update: bool,

    /// Can bind a list parameter and test membership against it.
    pub collection_params: bool,

    /// See [`Dialect::token_stable_in_transaction`].
    pub token_stable_in_transaction: bool,
}

impl Capability {
    pub const SQLITE: Self = Self {
        select_for_update: false,
        collection_params: false,
        token_stable_in_transaction: false,
    };

    pub const POSTGRESQL: Self = Self {
        select_for_update: true,
        collection_params: true,
        token_stable_in_transaction: true,
    };

    pub const SQL_SERVER: Self = Self {
        select_for_update: false,
        collection_params: true,
        ..Self::SQLITE
    };
}

/// Strips argument lists (`varchar(20)`, `numeric(10, 2)`) from a catalog
/// type name and lowercases it.
pub(crate) fn base_type_name(sql_type: &str) -> String {
    let mut name = String::with_capacity(sql_type.len());
    let mut depth = 0usize;

    for c in sql_type.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if depth == 0 => name.push(c.to_ascii_lowercase()),
            _ => {}
        }
    }

    name.trim().to_string()
}

pub(crate) fn unknown_type(dialect: &'static str, sql_type: &str) -> Error {
    Error::unsupported_feature(dialect, format!("column type `{sql_type}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_type_name_strips_arguments() {
        assert_eq!(base_type_name("NUMERIC(10, 2)"), "numeric");
        assert_eq!(base_type_name("varchar(20)[]"), "varchar[]");
        assert_eq!(
            base_type_name("timestamp(3) with time zone"),
            "timestamp with time zone"
        );
    }
}
