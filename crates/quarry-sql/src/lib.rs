pub mod dialect;
pub use dialect::{Capability, Dialect, InsertReadBack, Postgresql, SqlServer, Sqlite};

pub mod serializer;
pub use serializer::{
    CompileOptions, CompiledQuery, CrudStatement, IsolationLevel, Serializer, SqlText,
    Transaction,
};
