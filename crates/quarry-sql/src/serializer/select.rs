use super::{
    params::rename_reserved, Binder, ColumnName, Comma, Condition, Delimited, Formatter,
    Serializer, TableName, ToSql,
};

use quarry_core::{
    schema::Table,
    stmt::{
        Direction, ExprColumn, JoinEdge, JoinKind, OuterParam, QuerySpec, RowLayout, SqlParamBinding,
        TableRefId,
    },
    Error, Result,
};

/// A `SELECT` statement compiled from a [`QuerySpec`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,

    /// Parameters of the generated method, after reserved names were renamed.
    pub method_params: Vec<OuterParam>,

    /// SQL parameters in binding order, which is also the order the statement
    /// first uses them.
    pub params: Vec<SqlParamBinding>,

    /// How a result row splits into records of the projected tables.
    pub layout: RowLayout,
}

struct Join<'a> {
    kind: JoinKind,
    alias: TableRefId,
    table: &'a Table,
    on: Vec<Equals<'a>>,
}

struct Equals<'a>(ColumnName<'a>, ColumnName<'a>);

struct OrderBy<'a>(ColumnName<'a>, Direction);

impl Serializer<'_> {
    /// Compiles a query to a single `SELECT` statement.
    pub fn compile(&self, spec: &QuerySpec) -> Result<CompiledQuery> {
        let root = spec
            .tables
            .first()
            .ok_or_else(|| Error::invalid_statement("query has no root table"))?;
        let root = self.table(root.table)?;

        self.compile_select(spec, root).map_err(|err| {
            err.context(quarry_core::err!("compiling query on `{}`", root.name))
        })
    }

    fn compile_select(&self, spec: &QuerySpec, root: &Table) -> Result<CompiledQuery> {
        validate_joins(spec)?;

        let output = spec.output_tables();
        let mut columns = vec![];
        for id in &output {
            let table = self.table(spec.table_ref(*id)?.table)?;
            columns.extend(
                table
                    .columns
                    .iter()
                    .map(|column| ColumnName::qualified(*id, column)),
            );
        }

        let lock = spec
            .lock
            .as_ref()
            .map(|lock| self.dialect.lock_clause(lock))
            .transpose()?;

        let mut binder = Binder::default();
        let mut f = Formatter::new(self, &mut binder, Some(spec));

        fmt!(&mut f, "SELECT ");

        if let Some(head) = spec.limit.and_then(|limit| self.dialect.pagination_head(limit)) {
            fmt!(&mut f, &head " ");
        }

        fmt!(&mut f, Comma(columns) " FROM " TableName(root) " AS " TableRefId(0));

        for edge in &spec.joins {
            let join = self.join(edge, &f)?;
            fmt!(&mut f, join);
        }

        if let Some(filter) = &spec.filter {
            fmt!(&mut f, " WHERE " Condition::top(filter));
        }

        if !spec.order_by.is_empty() {
            let mut order_by = vec![];
            for expr in &spec.order_by {
                let column = f.column(ExprColumn {
                    table: expr.table,
                    column: expr.column,
                })?;
                order_by.push(OrderBy(column, expr.direction));
            }
            fmt!(&mut f, " ORDER BY " Comma(order_by));
        }

        if let Some(tail) = spec.limit.and_then(|limit| self.dialect.pagination_tail(limit)) {
            let tail = &tail;
            fmt!(&mut f, " " tail);
        }

        if let Some(lock) = &lock {
            fmt!(&mut f, " " lock);
        }

        let text = f.finish();

        let mut params = binder.into_bindings();
        let mut method_params = spec.params.clone();
        rename_reserved(
            &mut method_params,
            &mut params,
            &|name: &str| self.options.is_reserved(name),
            &self.options.rename_prefix,
        );

        tracing::debug!(
            table = %root.name,
            dialect = self.dialect.name(),
            params = params.len(),
            "compiled query"
        );

        Ok(CompiledQuery {
            sql: text.sql,
            method_params,
            params,
            layout: RowLayout::for_query(self.schema, spec)?,
        })
    }

    fn join<'a>(&'a self, edge: &JoinEdge, f: &Formatter<'a>) -> Result<Join<'a>> {
        let owner = self.table(edge.foreign_key.table)?;
        let foreign_key = owner.foreign_keys.get(edge.foreign_key.index).ok_or_else(|| {
            Error::schema_lookup(
                "foreign key",
                format!("#{}", edge.foreign_key.index),
                owner.describe(),
            )
        })?;

        let mut on = vec![];
        for (fk_side, pk_side) in edge.on_columns(foreign_key) {
            on.push(Equals(f.column(fk_side)?, f.column(pk_side)?));
        }

        Ok(Join {
            kind: edge.kind,
            alias: edge.target,
            table: f.query_table(edge.target)?,
            on,
        })
    }
}

/// Every table but the root must be introduced by exactly one join, in
/// binding order, from a table bound before it.
fn validate_joins(spec: &QuerySpec) -> Result<()> {
    if spec.joins.len() + 1 != spec.tables.len() {
        return Err(Error::invalid_statement(format!(
            "{} tables are bound but {} joins introduce them",
            spec.tables.len(),
            spec.joins.len()
        )));
    }

    for (index, edge) in spec.joins.iter().enumerate() {
        if edge.target != TableRefId(index + 1) || edge.source >= edge.target {
            return Err(Error::invalid_statement(format!(
                "join from `{}` to `{}` is out of binding order",
                edge.source, edge.target
            )));
        }
    }

    Ok(())
}

impl ToSql for Join<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) -> Result<()> {
        let kind = match self.kind {
            JoinKind::Inner => " INNER JOIN ",
            JoinKind::Left => " LEFT OUTER JOIN ",
        };

        fmt!(f, kind TableName(self.table) " AS " self.alias " ON " Delimited(self.on, " AND "));
        Ok(())
    }
}

impl ToSql for Equals<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) -> Result<()> {
        fmt!(f, self.0 " = " self.1);
        Ok(())
    }
}

impl ToSql for OrderBy<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) -> Result<()> {
        let direction = match self.1 {
            Direction::Asc => " ASC",
            Direction::Desc => " DESC",
        };
        fmt!(f, self.0 direction);
        Ok(())
    }
}
