use super::{Formatter, ToSql};

use quarry_core::{
    schema::{Column, Table},
    stmt::TableRefId,
    Result,
};

/// A quoted identifier
pub(super) struct Ident<S>(pub(super) S);

/// A table name, schema-qualified when the table has a schema.
pub(super) struct TableName<'a>(pub(super) &'a Table);

/// A column name, optionally qualified by a table alias.
#[derive(Clone, Copy)]
pub(super) struct ColumnName<'a> {
    alias: Option<TableRefId>,
    column: &'a Column,
}

impl<'a> ColumnName<'a> {
    pub(super) fn bare(column: &'a Column) -> ColumnName<'a> {
        ColumnName {
            alias: None,
            column,
        }
    }

    pub(super) fn qualified(alias: TableRefId, column: &'a Column) -> ColumnName<'a> {
        ColumnName {
            alias: Some(alias),
            column,
        }
    }
}

impl<S: AsRef<str>> ToSql for Ident<S> {
    fn to_sql(self, f: &mut Formatter<'_>) -> Result<()> {
        f.dialect().quote_ident(self.0.as_ref(), &mut f.dst);
        Ok(())
    }
}

impl ToSql for TableName<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) -> Result<()> {
        if let Some(schema) = &self.0.schema {
            fmt!(f, Ident(schema) ".");
        }
        fmt!(f, Ident(&self.0.name));
        Ok(())
    }
}

impl ToSql for ColumnName<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) -> Result<()> {
        if let Some(alias) = self.alias {
            fmt!(f, alias ".");
        }
        fmt!(f, Ident(&self.column.name));
        Ok(())
    }
}
