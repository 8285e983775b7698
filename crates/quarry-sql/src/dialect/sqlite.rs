use super::{base_type_name, unknown_type, Capability, Dialect, InsertReadBack};
use crate::serializer::IsolationLevel;

use quarry_core::{stmt::Type, Result};

/// The embedded engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sqlite;

impl Dialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value {
            "1"
        } else {
            "0"
        }
    }

    fn map_type(&self, sql_type: &str) -> Result<Type> {
        Ok(match &base_type_name(sql_type)[..] {
            "integer" | "int" | "bigint" | "int8" => Type::I64,
            "smallint" | "int2" => Type::I16,
            "mediumint" | "int4" => Type::I32,
            "boolean" | "bool" => Type::Bool,
            "real" | "double" | "double precision" | "float" => Type::F64,
            "numeric" | "decimal" => Type::Decimal,
            "text" | "varchar" | "char" | "nvarchar" | "nchar" | "clob" => Type::String,
            "blob" => Type::Bytes,
            "date" => Type::Date,
            "time" => Type::Time,
            "datetime" | "timestamp" => Type::DateTime,
            "uuid" => Type::Uuid,
            "json" => Type::Json,
            _ => return Err(unknown_type(self.name(), sql_type)),
        })
    }

    fn insert_read_back(&self) -> InsertReadBack {
        InsertReadBack::LastInsertId("last_insert_rowid()")
    }

    fn rows_affected_probe(&self) -> &'static str {
        "changes()"
    }

    fn begin_transaction(
        &self,
        isolation: Option<IsolationLevel>,
        read_only: bool,
    ) -> Result<String> {
        // SQLite transactions are always serializable and cannot be read-only.
        if isolation.is_some() || read_only {
            tracing::debug!(?isolation, read_only, "sqlite ignores transaction options");
        }
        Ok("BEGIN".to_string())
    }
}
