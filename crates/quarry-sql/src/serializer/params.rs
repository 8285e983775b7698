use super::{Formatter, ToSql};

use indexmap::IndexMap;
use quarry_core::{
    schema::ColumnId,
    stmt::{OuterParam, ParamSource, SqlParamBinding, Type, Value},
    Error, Result,
};

/// Allocates SQL parameter bindings for one compilation.
///
/// References to the same outer parameter (or, for CRUD statements, the same
/// record field) share one binding. Literals always get a fresh one.
#[derive(Debug, Default)]
pub(super) struct Binder {
    bindings: Vec<SqlParamBinding>,
    outer: IndexMap<String, usize>,
    columns: IndexMap<ColumnId, usize>,
}

/// A reference to a binding, rendered with the dialect's placeholder syntax.
pub(super) struct Placeholder(pub(super) usize);

impl Binder {
    pub(super) fn literal(&mut self, value: &Value) -> usize {
        self.push(None, Type::of(value), ParamSource::Literal(value.clone()))
    }

    /// The binding for the outer parameter `name`, allocated on first use.
    pub(super) fn outer(&mut self, params: &[OuterParam], name: &str) -> Result<usize> {
        if let Some(index) = self.outer.get(name) {
            return Ok(*index);
        }

        let param = params
            .iter()
            .find(|param| param.name == name)
            .ok_or_else(|| Error::schema_lookup("parameter", name, "this query"))?;

        let index = self.push(
            Some(name.to_string()),
            param.ty.clone(),
            ParamSource::OuterParam(name.to_string()),
        );
        self.outer.insert(name.to_string(), index);
        Ok(index)
    }

    /// The binding for a field of the record a CRUD statement writes.
    pub(super) fn column(&mut self, column: ColumnId, name: &str, ty: Type) -> usize {
        if let Some(index) = self.columns.get(&column) {
            return *index;
        }

        let index = self.push(Some(name.to_string()), ty, ParamSource::Column(column));
        self.columns.insert(column, index);
        index
    }

    pub(super) fn get(&self, index: usize) -> &SqlParamBinding {
        &self.bindings[index]
    }

    pub(super) fn into_bindings(self) -> Vec<SqlParamBinding> {
        self.bindings
    }

    fn push(&mut self, name: Option<String>, ty: Type, source: ParamSource) -> usize {
        let index = self.bindings.len();
        let sql_name = format!("p{index}");

        self.bindings.push(SqlParamBinding {
            name: name.unwrap_or_else(|| sql_name.clone()),
            sql_name,
            ty,
            source,
        });

        index
    }
}

impl ToSql for Placeholder {
    fn to_sql(self, f: &mut Formatter<'_>) -> Result<()> {
        let position = match f.params.iter().position(|index| *index == self.0) {
            Some(position) => position,
            None => {
                f.params.push(self.0);
                f.params.len() - 1
            }
        };

        let dialect = f.dialect();
        let binding = f.binder.get(self.0);
        dialect.placeholder(position, &binding.sql_name, &mut f.dst);
        Ok(())
    }
}

/// Renames method parameters whose names are reserved by generated code.
///
/// A reserved name gets `prefix` prepended until it is neither reserved nor
/// taken by another parameter. The new name replaces the old one in the
/// method signature and in every binding that referred to it.
pub(super) fn rename_reserved(
    method_params: &mut [OuterParam],
    bindings: &mut [SqlParamBinding],
    is_reserved: &dyn Fn(&str) -> bool,
    prefix: &str,
) {
    for i in 0..method_params.len() {
        if !is_reserved(&method_params[i].name) {
            continue;
        }

        let old = method_params[i].name.clone();
        let mut new = format!("{prefix}{old}");

        while is_reserved(&new) || method_params.iter().any(|param| param.name == new) {
            new = format!("{prefix}{new}");
        }

        tracing::trace!(from = %old, to = %new, "renamed reserved parameter");

        for binding in bindings.iter_mut() {
            if binding.source.as_outer_param() == Some(old.as_str()) {
                binding.source = ParamSource::OuterParam(new.clone());
                binding.name = new.clone();
            }
        }

        method_params[i].name = new;
    }
}
