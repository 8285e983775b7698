use super::{
    Direction, Expr, JoinDirection, JoinEdge, JoinKind, JoinRequest, JoinTarget, Lock,
    LogicalOp, OrderByExpr, OuterParam, Projection, QuerySpec, TableRef, TableRefId,
};
use crate::{
    schema::{Schema, Table},
    Error, Result,
};

/// Resolves joins and collects the clauses of a [`QuerySpec`].
///
/// Tables are bound in the order they are discovered: the root is `t0` and
/// each successful join binds the next alias. A table's nullability is fixed
/// when it is bound and never revisited.
#[derive(Debug)]
pub struct QueryBuilder<'a> {
    schema: &'a Schema,
    spec: QuerySpec,

    /// The most recently bound table; joins without an explicit source start
    /// here.
    current: TableRefId,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(schema: &'a Schema, root: &str) -> Result<QueryBuilder<'a>> {
        let table = schema.find_table(root)?;

        Ok(QueryBuilder {
            schema,
            spec: QuerySpec {
                tables: vec![TableRef::root(table.id)],
                joins: vec![],
                filter: None,
                projection: None,
                order_by: vec![],
                limit: None,
                lock: None,
                params: vec![],
            },
            current: TableRefId(0),
        })
    }

    pub fn root(&self) -> TableRefId {
        TableRefId(0)
    }

    /// Binds a new table through a foreign key and returns its alias.
    pub fn join(&mut self, request: JoinRequest) -> Result<TableRefId> {
        let source = request.from.unwrap_or(self.current);
        let source_table = self.table(source)?;

        let (foreign_key, target_table, direction) = match &request.target {
            JoinTarget::Forward { foreign_key } => {
                let fk = source_table.foreign_key_by_name(foreign_key)?;
                (fk, fk.target, JoinDirection::Forward)
            }
            JoinTarget::Inverse { table, foreign_key } => {
                let owner = self.schema.find_table(table)?;
                let fk = owner.foreign_key_by_name(foreign_key)?;

                if fk.target != source_table.id {
                    return Err(Error::invalid_statement(format!(
                        "foreign key `{}` on {} does not reference {}",
                        foreign_key,
                        owner.describe(),
                        source_table.describe()
                    )));
                }

                (fk, owner.id, JoinDirection::Inverse)
            }
        };

        // A missing row is told apart by its primary key reading NULL.
        if request.kind == JoinKind::Left {
            let target = self.schema.table(target_table);
            if !target.has_primary_key() {
                return Err(Error::unsupported_expr(format!(
                    "left join to {}, which has no primary key",
                    target.describe()
                )));
            }
        }

        let id = TableRefId(self.spec.tables.len());

        // Only the newly bound table is affected by the join kind; tables
        // bound earlier keep the nullability they were given.
        self.spec.tables.push(TableRef {
            id,
            table: target_table,
            may_be_null: request.kind == JoinKind::Left,
        });

        self.spec.joins.push(JoinEdge {
            kind: request.kind,
            source,
            target: id,
            foreign_key: foreign_key.id,
            direction,
        });

        tracing::trace!(
            source = %source,
            target = %id,
            table = %self.schema.table(target_table).name,
            foreign_key = %foreign_key.name,
            kind = ?request.kind,
            ?direction,
            "bound join"
        );

        self.current = id;
        Ok(id)
    }

    /// A reference to the column `name` of a bound table.
    pub fn column(&self, table: TableRefId, name: &str) -> Result<Expr> {
        let column = self.table(table)?.column_by_name(name)?;
        Ok(Expr::column(table, column.id.index))
    }

    /// Declares a parameter of the generated method.
    pub fn param(&mut self, param: OuterParam) -> Result<&mut Self> {
        if self.spec.param(&param.name).is_some() {
            return Err(Error::invalid_statement(format!(
                "parameter `{}` is declared more than once",
                param.name
            )));
        }

        self.spec.params.push(param);
        Ok(self)
    }

    /// Sets the predicate. Calling it again combines both predicates with
    /// `AND`.
    pub fn filter(&mut self, expr: Expr) -> &mut Self {
        self.spec.filter = Some(match self.spec.filter.take() {
            Some(Expr::Logical(mut and)) if and.op == LogicalOp::And => {
                and.operands.push(expr);
                Expr::Logical(and)
            }
            Some(existing) => Expr::and([existing, expr]),
            None => expr,
        });
        self
    }

    pub fn project(&mut self, projection: impl Into<Projection>) -> Result<&mut Self> {
        if self.spec.projection.is_some() {
            return Err(Error::duplicate_clause("projection"));
        }

        let projection = projection.into();
        for table in projection.tables() {
            self.spec.table_ref(*table)?;
        }

        self.spec.projection = Some(projection);
        Ok(self)
    }

    pub fn order_by(
        &mut self,
        table: TableRefId,
        column: &str,
        direction: Direction,
    ) -> Result<&mut Self> {
        let column = self.table(table)?.column_by_name(column)?.id.index;

        self.spec.order_by.push(OrderByExpr {
            table,
            column,
            direction,
        });
        Ok(self)
    }

    pub fn limit(&mut self, limit: u64) -> Result<&mut Self> {
        if self.spec.limit.is_some() {
            return Err(Error::duplicate_clause("limit"));
        }

        self.spec.limit = Some(limit);
        Ok(self)
    }

    pub fn lock(&mut self, lock: Lock) -> Result<&mut Self> {
        if self.spec.lock.is_some() {
            return Err(Error::duplicate_clause("lock"));
        }

        self.spec.lock = Some(lock);
        Ok(self)
    }

    pub fn build(self) -> QuerySpec {
        self.spec
    }

    /// The schema table a bound reference points at.
    pub fn table(&self, id: TableRefId) -> Result<&'a Table> {
        let table_ref = self.spec.table_ref(id)?;
        self.schema.get_table(table_ref.table)
    }
}
