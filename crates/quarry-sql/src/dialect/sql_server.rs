use super::{base_type_name, unknown_type, Capability, Dialect, InsertReadBack};
use crate::serializer::IsolationLevel;

use quarry_core::{stmt::Type, Error, Result};

/// The SQL-Server-like engine.
///
/// Identifiers are bracket-quoted, row limits use `TOP`, and collection
/// parameters are passed as table-valued parameters with a single `value`
/// column.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqlServer;

impl Dialect for SqlServer {
    fn name(&self) -> &'static str {
        "sql-server"
    }

    fn capability(&self) -> &'static Capability {
        &Capability::SQL_SERVER
    }

    fn quote_ident(&self, ident: &str, dst: &mut String) {
        dst.push('[');
        for c in ident.chars() {
            if c == ']' {
                dst.push(']');
            }
            dst.push(c);
        }
        dst.push(']');
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        // There is no boolean type usable as a predicate.
        if value {
            "(1=1)"
        } else {
            "(1=0)"
        }
    }

    fn map_type(&self, sql_type: &str) -> Result<Type> {
        Ok(match &base_type_name(sql_type)[..] {
            "bit" => Type::Bool,
            "tinyint" | "smallint" => Type::I16,
            "int" => Type::I32,
            "bigint" => Type::I64,
            "real" => Type::F32,
            "float" => Type::F64,
            "decimal" | "numeric" | "money" | "smallmoney" => Type::Decimal,
            "char" | "varchar" | "nchar" | "nvarchar" | "text" | "ntext" | "xml" => Type::String,
            "binary" | "varbinary" | "image" | "rowversion" | "timestamp" => Type::Bytes,
            "uniqueidentifier" => Type::Uuid,
            "date" => Type::Date,
            "time" => Type::Time,
            "datetime" | "datetime2" | "smalldatetime" => Type::DateTime,
            "datetimeoffset" => Type::DateTimeOffset,
            _ => return Err(unknown_type(self.name(), sql_type)),
        })
    }

    fn pagination_head(&self, limit: u64) -> Option<String> {
        Some(format!("TOP ({limit})"))
    }

    fn pagination_tail(&self, _limit: u64) -> Option<String> {
        None
    }

    fn membership(&self, operand: &str, collection: &str) -> Result<String> {
        Ok(format!("{operand} IN (SELECT [value] FROM {collection})"))
    }

    fn insert_read_back(&self) -> InsertReadBack {
        InsertReadBack::LastInsertId("SCOPE_IDENTITY()")
    }

    fn rows_affected_probe(&self) -> &'static str {
        "@@ROWCOUNT"
    }

    fn begin_transaction(
        &self,
        isolation: Option<IsolationLevel>,
        read_only: bool,
    ) -> Result<String> {
        if read_only {
            return Err(Error::unsupported_feature(
                self.name(),
                "read-only transactions",
            ));
        }

        let mut sql = String::new();
        if let Some(level) = isolation {
            sql.push_str("SET TRANSACTION ISOLATION LEVEL ");
            sql.push_str(level.as_sql());
            sql.push_str("; ");
        }
        sql.push_str("BEGIN TRANSACTION");
        Ok(sql)
    }

    fn commit_transaction(&self) -> String {
        "COMMIT TRANSACTION".to_string()
    }

    fn rollback_transaction(&self) -> String {
        "ROLLBACK TRANSACTION".to_string()
    }

    fn savepoint(&self, name: &str) -> String {
        format!("SAVE TRANSACTION {name}")
    }

    fn release_savepoint(&self, _name: &str) -> Result<String> {
        Err(Error::unsupported_feature(
            self.name(),
            "releasing a savepoint",
        ))
    }

    fn rollback_to_savepoint(&self, name: &str) -> String {
        format!("ROLLBACK TRANSACTION {name}")
    }
}
