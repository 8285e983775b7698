use super::{
    Binder, ColumnName, Comma, Delimited, Formatter, Placeholder, Serializer, SqlText, TableName,
    ToSql,
};
use crate::InsertReadBack;

use quarry_core::{
    schema::{Column, ColumnId, Table, TableId},
    stmt::{CrudKind, CrudRequest, SqlParamBinding, TableRefId},
    Error, Result,
};

/// The statements that insert, update or delete one record.
///
/// `mutation` runs first. `verify`, when present, runs right after it on the
/// same connection and reads back the record. For update and delete its first
/// column is the rows-affected probe. When an insert hydrates through
/// `RETURNING`, the mutation itself returns `hydrate_columns`.
#[derive(Debug, Clone, PartialEq)]
pub struct CrudStatement {
    pub kind: CrudKind,
    pub table: TableId,

    /// Primary key columns followed by concurrency tokens.
    pub identifier_columns: Vec<ColumnId>,

    /// Columns the statement writes.
    pub mutated_columns: Vec<ColumnId>,

    /// Columns read back into the record after the mutation.
    pub hydrate_columns: Vec<ColumnId>,

    pub mutation: SqlText,
    pub verify: Option<SqlText>,

    /// True when the first column of `verify` is the rows-affected probe.
    pub rows_affected: bool,

    /// See [`Dialect::token_stable_in_transaction`](crate::Dialect::token_stable_in_transaction).
    pub token_stable_in_transaction: bool,

    /// Bindings shared by both statements; each statement lists the ones it
    /// uses.
    pub params: Vec<SqlParamBinding>,
}

/// The placeholder bound to a record field.
struct Field<'a>(&'a Column);

/// `column = <field>`
struct Assign<'a>(&'a Column);

/// A null-safe equality between a column and its record field.
struct Identifies<'a> {
    alias: Option<TableRefId>,
    column: &'a Column,
}

impl CrudStatement {
    /// Both statements, separated by a newline.
    pub fn sql(&self) -> String {
        self.statements()
            .map(|stmt| stmt.sql.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn statements(&self) -> impl Iterator<Item = &SqlText> + '_ {
        std::iter::once(&self.mutation).chain(self.verify.as_ref())
    }

    /// The bindings of `stmt`, in the order its placeholders expect them.
    pub fn params_of<'a>(
        &'a self,
        stmt: &'a SqlText,
    ) -> impl Iterator<Item = &'a SqlParamBinding> + 'a {
        stmt.params.iter().map(|index| &self.params[*index])
    }
}

impl Serializer<'_> {
    /// Compiles the statements for an insert, update or delete of one record.
    pub fn compile_crud(&self, request: &CrudRequest) -> Result<CrudStatement> {
        let table = self.table(request.table)?;

        let res = match request.kind {
            CrudKind::Insert => self.compile_insert(table, request),
            CrudKind::Update => self.compile_update(table),
            CrudKind::Delete => self.compile_delete(table),
        };

        let stmt = res.map_err(|err| {
            err.context(quarry_core::err!(
                "compiling {} on `{}`",
                request.kind,
                table.name
            ))
        })?;

        tracing::debug!(
            table = %table.name,
            kind = %stmt.kind,
            dialect = self.dialect.name(),
            params = stmt.params.len(),
            "compiled crud statement"
        );

        Ok(stmt)
    }

    fn compile_insert(&self, table: &Table, request: &CrudRequest) -> Result<CrudStatement> {
        let instance = request.instance.as_ref();

        if let Some(instance) = instance {
            if instance.len() != table.columns.len() {
                return Err(Error::invalid_statement(format!(
                    "record has {} fields but {} has {} columns",
                    instance.len(),
                    table.describe(),
                    table.columns.len()
                )));
            }
        }

        let mut columns = vec![];
        for column in &table.columns {
            if column.auto_increment || column.computed {
                continue;
            }

            if column.has_default {
                let proposed = instance.and_then(|record| record.get(column.id.index));
                let include = self
                    .options
                    .insert_defaults
                    .include(table, column, instance, proposed);

                if !include {
                    tracing::trace!(column = %column.name, "column left to its database default");
                    continue;
                }
            }

            columns.push(column);
        }

        let read_back = self.dialect.insert_read_back();
        let mut binder = Binder::default();

        let mutation = {
            let mut f = Formatter::new(self, &mut binder, None);

            fmt!(&mut f, "INSERT INTO " TableName(table));

            if columns.is_empty() {
                fmt!(&mut f, " DEFAULT VALUES");
            } else {
                let names = Comma(columns.iter().map(|column| ColumnName::bare(column)));
                let values = Comma(columns.iter().map(|column| Field(column)));
                fmt!(&mut f, " (" names ") VALUES (" values ")");
            }

            if read_back == InsertReadBack::Returning {
                let returning = Comma(table.columns.iter().map(ColumnName::bare));
                fmt!(&mut f, " RETURNING " returning);
            }

            f.finish()
        };

        let (verify, hydrate_columns) = match read_back {
            InsertReadBack::Returning => (None, column_ids(&table.columns)),
            InsertReadBack::LastInsertId(_) if !table.has_primary_key() => (None, vec![]),
            InsertReadBack::LastInsertId(last_insert_id) => {
                let mut f = Formatter::new(self, &mut binder, None);

                let alias = TableRefId(0);
                let columns = Comma(
                    table
                        .columns
                        .iter()
                        .map(|column| ColumnName::qualified(alias, column)),
                );
                fmt!(&mut f, "SELECT " columns " FROM " TableName(table) " AS " alias " WHERE ");

                let mut s = "";
                for column in table.primary_key_columns() {
                    let name = ColumnName::qualified(alias, column);
                    fmt!(&mut f, s name " = ");
                    if column.auto_increment {
                        fmt!(&mut f, last_insert_id);
                    } else {
                        fmt!(&mut f, Field(column));
                    }
                    s = " AND ";
                }

                (Some(f.finish()), column_ids(&table.columns))
            }
        };

        Ok(CrudStatement {
            kind: CrudKind::Insert,
            table: table.id,
            identifier_columns: column_ids(table.identifier_columns()),
            mutated_columns: column_ids(columns),
            hydrate_columns,
            mutation,
            verify,
            rows_affected: false,
            token_stable_in_transaction: self.dialect.token_stable_in_transaction(),
            params: binder.into_bindings(),
        })
    }

    fn compile_update(&self, table: &Table) -> Result<CrudStatement> {
        require_primary_key(table, CrudKind::Update)?;

        let identifiers = table.identifier_columns();
        let mutated: Vec<_> = table
            .columns
            .iter()
            .filter(|column| {
                !column.is_identifier() && !column.computed && !column.auto_increment
            })
            .collect();

        if mutated.is_empty() {
            return Err(Error::invalid_statement(format!(
                "{} has no columns an update could write",
                table.describe()
            )));
        }

        let mut binder = Binder::default();

        let mutation = {
            let mut f = Formatter::new(self, &mut binder, None);

            let assignments = Comma(mutated.iter().map(|column| Assign(column)));
            let predicate = Delimited(
                identifiers.iter().map(|column| Identifies::bare(column)),
                " AND ",
            );
            fmt!(&mut f, "UPDATE " TableName(table) " SET " assignments " WHERE " predicate);

            f.finish()
        };

        // Read the row back by primary key only: a successful update changes
        // the concurrency tokens.
        let verify = {
            let mut f = Formatter::new(self, &mut binder, None);

            let alias = TableRefId(0);
            let probe = self.dialect.rows_affected_probe();
            let columns = Comma(
                table
                    .columns
                    .iter()
                    .map(|column| ColumnName::qualified(alias, column)),
            );
            let on = Delimited(
                table
                    .primary_key_columns()
                    .map(|column| Identifies::qualified(alias, column)),
                " AND ",
            );

            fmt!(
                &mut f,
                "SELECT p.rows_affected, " columns
                " FROM (SELECT " probe " AS rows_affected) AS p LEFT OUTER JOIN "
                TableName(table) " AS " alias " ON " on
            );

            f.finish()
        };

        Ok(CrudStatement {
            kind: CrudKind::Update,
            table: table.id,
            identifier_columns: column_ids(identifiers),
            mutated_columns: column_ids(mutated),
            hydrate_columns: column_ids(&table.columns),
            mutation,
            verify: Some(verify),
            rows_affected: true,
            token_stable_in_transaction: self.dialect.token_stable_in_transaction(),
            params: binder.into_bindings(),
        })
    }

    fn compile_delete(&self, table: &Table) -> Result<CrudStatement> {
        require_primary_key(table, CrudKind::Delete)?;

        let identifiers = table.identifier_columns();
        let mut binder = Binder::default();

        let mutation = {
            let mut f = Formatter::new(self, &mut binder, None);

            let predicate = Delimited(
                identifiers.iter().map(|column| Identifies::bare(column)),
                " AND ",
            );
            fmt!(&mut f, "DELETE FROM " TableName(table) " WHERE " predicate);

            f.finish()
        };

        let verify = {
            let mut f = Formatter::new(self, &mut binder, None);
            let probe = self.dialect.rows_affected_probe();
            fmt!(&mut f, "SELECT " probe " AS rows_affected");
            f.finish()
        };

        Ok(CrudStatement {
            kind: CrudKind::Delete,
            table: table.id,
            identifier_columns: column_ids(identifiers),
            mutated_columns: vec![],
            hydrate_columns: vec![],
            mutation,
            verify: Some(verify),
            rows_affected: true,
            token_stable_in_transaction: self.dialect.token_stable_in_transaction(),
            params: binder.into_bindings(),
        })
    }
}

fn require_primary_key(table: &Table, kind: CrudKind) -> Result<()> {
    if table.has_primary_key() {
        return Ok(());
    }

    Err(Error::invalid_statement(format!(
        "{} has no primary key; a {kind} cannot identify a single row",
        table.describe()
    )))
}

fn column_ids<'a>(columns: impl IntoIterator<Item = &'a Column>) -> Vec<ColumnId> {
    columns.into_iter().map(|column| column.id).collect()
}

impl<'a> Identifies<'a> {
    fn bare(column: &'a Column) -> Identifies<'a> {
        Identifies {
            alias: None,
            column,
        }
    }

    fn qualified(alias: TableRefId, column: &'a Column) -> Identifies<'a> {
        Identifies {
            alias: Some(alias),
            column,
        }
    }
}

impl ToSql for Field<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) -> Result<()> {
        let ty = f.dialect().column_type(self.0)?;
        let index = f.binder.column(self.0.id, &self.0.name, ty);
        fmt!(f, Placeholder(index));
        Ok(())
    }
}

impl ToSql for Assign<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) -> Result<()> {
        fmt!(f, ColumnName::bare(self.0) " = " Field(self.0));
        Ok(())
    }
}

impl ToSql for Identifies<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) -> Result<()> {
        let name = match self.alias {
            Some(alias) => ColumnName::qualified(alias, self.column),
            None => ColumnName::bare(self.column),
        };

        if self.column.nullable {
            // `NULL = NULL` is not true; match two nulls explicitly.
            fmt!(
                f,
                "(" name " = " Field(self.column) " OR (" name " IS NULL AND "
                Field(self.column) " IS NULL))"
            );
        } else {
            fmt!(f, name " = " Field(self.column));
        }

        Ok(())
    }
}
