use super::{QuerySpec, TableRefId, Value, ValueRecord};
use crate::{schema::Schema, schema::TableId, Error, Result};

/// Describes how a result row of a compiled query splits into records.
///
/// Each projected table contributes all of its columns, in declaration order,
/// as one contiguous range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLayout {
    pub tables: Vec<RowLayoutTable>,

    /// Total number of columns in a row.
    pub width: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLayoutTable {
    pub table_ref: TableRefId,
    pub table: TableId,

    /// Index of the table's first column in the row.
    pub offset: usize,

    /// Number of columns the table contributes.
    pub len: usize,

    /// Offsets of the primary key columns, relative to `offset`.
    pub primary_key: Vec<usize>,

    pub may_be_null: bool,
}

impl RowLayout {
    pub fn for_query(schema: &Schema, spec: &QuerySpec) -> Result<RowLayout> {
        let mut tables = vec![];
        let mut offset = 0;

        for id in spec.output_tables() {
            let table_ref = spec.table_ref(id)?;
            let table = schema.get_table(table_ref.table)?;

            tables.push(RowLayoutTable {
                table_ref: id,
                table: table.id,
                offset,
                len: table.columns.len(),
                primary_key: table
                    .primary_key_columns()
                    .map(|column| column.id.index)
                    .collect(),
                may_be_null: table_ref.may_be_null,
            });

            offset += table.columns.len();
        }

        Ok(RowLayout {
            tables,
            width: offset,
        })
    }

    /// Splits a row into one record per projected table.
    ///
    /// A nullable table whose primary key is entirely null yields `None` and
    /// its remaining columns are not read.
    pub fn decode(&self, row: &[Value]) -> Result<Vec<Option<ValueRecord>>> {
        if row.len() != self.width {
            return Err(Error::invalid_result(format!(
                "expected a row of {} columns, got {}",
                self.width,
                row.len()
            )));
        }

        let mut records = Vec::with_capacity(self.tables.len());

        for table in &self.tables {
            let columns = &row[table.offset..table.offset + table.len];
            let absent = !table.primary_key.is_empty()
                && table.primary_key.iter().all(|index| columns[*index].is_null());

            if absent {
                if !table.may_be_null {
                    return Err(Error::invalid_result(format!(
                        "primary key of `{}` is null but the table is not optional in this query",
                        table.table_ref
                    )));
                }

                records.push(None);
                continue;
            }

            records.push(Some(ValueRecord::from_vec(columns.to_vec())));
        }

        Ok(records)
    }
}
