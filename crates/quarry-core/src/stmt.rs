mod crud;
pub use crud::{CrudKind, CrudRequest, GeneratedDefault, InsertDefaultPolicy, InsertDefaults};

mod expr;
pub use expr::Expr;

mod expr_column;
pub use expr_column::ExprColumn;

mod expr_comparison;
pub use expr_comparison::{BinaryOp, ExprComparison};

mod expr_logical;
pub use expr_logical::{ExprLogical, LogicalOp};

mod expr_membership;
pub use expr_membership::ExprMembership;

mod expr_null_check;
pub use expr_null_check::{ExprColumnNullCheck, ExprEntityNullCheck};

mod join;
pub use join::{JoinDirection, JoinEdge, JoinKind, JoinRequest, JoinTarget};

mod outer_param;
pub use outer_param::OuterParam;

mod param_binding;
pub use param_binding::{ParamSource, SqlParamBinding};

mod primitive;
pub use primitive::Primitive;

mod query;
pub use query::{Direction, Lock, OrderByExpr, Projection, QuerySpec};

mod query_builder;
pub use query_builder::QueryBuilder;

mod row_layout;
pub use row_layout::{RowLayout, RowLayoutTable};

mod rows_affected;
pub use rows_affected::{
    ConcurrencyConflictHandler, IgnoreViolations, RowsAffected, RowsAffectedHandler,
    RowsAffectedViolation,
};

mod table_ref;
pub use table_ref::{TableRef, TableRefId};

mod ty;
pub use ty::Type;

mod value;
pub use value::Value;

mod value_record;
pub use value_record::ValueRecord;
