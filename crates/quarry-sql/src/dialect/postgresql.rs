use super::{base_type_name, unknown_type, Capability, Dialect, InsertReadBack};

use quarry_core::{stmt::Type, Result};

/// The Postgres-like engine.
///
/// Placeholders are positional (`$1`, `$2`, ...), numbered per statement.
#[derive(Debug, Default, Clone, Copy)]
pub struct Postgresql;

impl Dialect for Postgresql {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn capability(&self) -> &'static Capability {
        &Capability::POSTGRESQL
    }

    fn placeholder(&self, position: usize, _name: &str, dst: &mut String) {
        dst.push('$');
        dst.push_str(&(position + 1).to_string());
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value {
            "TRUE"
        } else {
            "FALSE"
        }
    }

    fn map_type(&self, sql_type: &str) -> Result<Type> {
        let name = base_type_name(sql_type);

        // `integer[]`, `_int4`
        if let Some(element) = name.strip_suffix("[]") {
            return Ok(Type::list(self.map_type(element)?));
        }

        if let Some(element) = name.strip_prefix('_') {
            return Ok(Type::list(self.map_type(element)?));
        }

        Ok(match &name[..] {
            "smallint" | "int2" | "smallserial" => Type::I16,
            "integer" | "int" | "int4" | "serial" => Type::I32,
            "bigint" | "int8" | "bigserial" => Type::I64,
            "boolean" | "bool" => Type::Bool,
            "real" | "float4" => Type::F32,
            "double precision" | "float8" => Type::F64,
            "numeric" | "decimal" | "money" => Type::Decimal,
            "text" | "varchar" | "character varying" | "char" | "character" | "bpchar"
            | "citext" | "name" => Type::String,
            "bytea" => Type::Bytes,
            "uuid" => Type::Uuid,
            "date" => Type::Date,
            "time" | "time without time zone" => Type::Time,
            "timestamp" | "timestamp without time zone" => Type::DateTime,
            "timestamptz" | "timestamp with time zone" => Type::DateTimeOffset,
            "json" | "jsonb" => Type::Json,
            _ => return Err(unknown_type(self.name(), sql_type)),
        })
    }

    fn membership(&self, operand: &str, collection: &str) -> Result<String> {
        Ok(format!("{operand} = ANY({collection})"))
    }

    fn insert_read_back(&self) -> InsertReadBack {
        InsertReadBack::Returning
    }
}
