use super::{ExprColumn, TableRefId};
use crate::schema::{ForeignKey, ForeignKeyId};

/// How a joined table participates in the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    /// `INNER JOIN`: rows without a match are dropped.
    Inner,

    /// `LEFT OUTER JOIN`: rows without a match are kept and the joined table's
    /// columns are null.
    Left,
}

/// Which side of a join owns the foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinDirection {
    /// The source table owns the foreign key and points at the target.
    Forward,

    /// The target table owns a foreign key pointing back at the source.
    Inverse,
}

/// A resolved join between two bound tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinEdge {
    pub kind: JoinKind,

    /// The already-bound table the join starts from.
    pub source: TableRefId,

    /// The table introduced by this join.
    pub target: TableRefId,

    pub foreign_key: ForeignKeyId,

    pub direction: JoinDirection,
}

/// Asks the join resolver to bind one more table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    pub kind: JoinKind,

    /// The table to join from. Defaults to the most recently bound table.
    pub from: Option<TableRefId>,

    pub target: JoinTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinTarget {
    /// Follow the foreign key declared under this field name on the source
    /// table.
    Forward { foreign_key: String },

    /// Bind `table`, whose foreign key `foreign_key` points at the source
    /// table.
    Inverse { table: String, foreign_key: String },
}

impl JoinRequest {
    pub fn inner(foreign_key: impl Into<String>) -> JoinRequest {
        JoinRequest::forward(JoinKind::Inner, foreign_key)
    }

    pub fn left(foreign_key: impl Into<String>) -> JoinRequest {
        JoinRequest::forward(JoinKind::Left, foreign_key)
    }

    pub fn inner_inverse(
        table: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> JoinRequest {
        JoinRequest::inverse(JoinKind::Inner, table, foreign_key)
    }

    pub fn left_inverse(table: impl Into<String>, foreign_key: impl Into<String>) -> JoinRequest {
        JoinRequest::inverse(JoinKind::Left, table, foreign_key)
    }

    /// Joins from `table` instead of the most recently bound table.
    pub fn from(mut self, table: TableRefId) -> JoinRequest {
        self.from = Some(table);
        self
    }

    fn forward(kind: JoinKind, foreign_key: impl Into<String>) -> JoinRequest {
        JoinRequest {
            kind,
            from: None,
            target: JoinTarget::Forward {
                foreign_key: foreign_key.into(),
            },
        }
    }

    fn inverse(
        kind: JoinKind,
        table: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> JoinRequest {
        JoinRequest {
            kind,
            from: None,
            target: JoinTarget::Inverse {
                table: table.into(),
                foreign_key: foreign_key.into(),
            },
        }
    }
}

impl JoinEdge {
    /// The `ON` clause operands as `(referencing column, referenced column)`
    /// pairs, in key order.
    ///
    /// `foreign_key` must be the key this edge was resolved with.
    pub fn on_columns(&self, foreign_key: &ForeignKey) -> Vec<(ExprColumn, ExprColumn)> {
        debug_assert_eq!(foreign_key.id, self.foreign_key);

        let (fk_side, pk_side) = match self.direction {
            JoinDirection::Forward => (self.source, self.target),
            JoinDirection::Inverse => (self.target, self.source),
        };

        foreign_key
            .columns
            .iter()
            .map(|pair| {
                (
                    ExprColumn {
                        table: fk_side,
                        column: pair.source.index,
                    },
                    ExprColumn {
                        table: pk_side,
                        column: pair.target.index,
                    },
                )
            })
            .collect()
    }
}
