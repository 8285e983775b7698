use heck::{ToSnakeCase, ToUpperCamelCase};

/// Turns schema names into identifier names for generated code.
///
/// Implementations must be pure: the same input always produces the same name.
pub trait NamingConvention {
    fn table_name_to_type_name(&self, name: &str) -> String;

    fn column_name_to_field_name(
        &self,
        table_index: usize,
        table_name: &str,
        column_index: usize,
        column_name: &str,
    ) -> String;
}

/// `UpperCamelCase` type names and `snake_case` field names.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultNaming;

impl NamingConvention for DefaultNaming {
    fn table_name_to_type_name(&self, name: &str) -> String {
        identifier(name.to_upper_camel_case(), "Table")
    }

    fn column_name_to_field_name(
        &self,
        _table_index: usize,
        _table_name: &str,
        _column_index: usize,
        column_name: &str,
    ) -> String {
        identifier(column_name.to_snake_case(), "column")
    }
}

/// Names that do not start with a letter or underscore get a prefix.
fn identifier(name: String, prefix: &str) -> String {
    match name.chars().next() {
        Some(c) if c.is_alphabetic() || c == '_' => name,
        Some(_) => format!("{prefix}_{name}"),
        None => prefix.to_string(),
    }
}

impl<T, C> NamingConvention for (T, C)
where
    T: Fn(&str) -> String,
    C: Fn(usize, &str, usize, &str) -> String,
{
    fn table_name_to_type_name(&self, name: &str) -> String {
        (self.0)(name)
    }

    fn column_name_to_field_name(
        &self,
        table_index: usize,
        table_name: &str,
        column_index: usize,
        column_name: &str,
    ) -> String {
        (self.1)(table_index, table_name, column_index, column_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_naming() {
        let naming = DefaultNaming;
        assert_eq!(naming.table_name_to_type_name("child_of_foo"), "ChildOfFoo");
        assert_eq!(naming.table_name_to_type_name("2fa_codes"), "Table_2faCodes");
        assert_eq!(
            naming.column_name_to_field_name(0, "foo", 1, "NullableInt"),
            "nullable_int"
        );
        assert_eq!(naming.column_name_to_field_name(0, "foo", 2, "1st"), "column_1st");
    }

    #[test]
    fn closure_pair() {
        let naming = (
            |name: &str| format!("Db{name}"),
            |_: usize, table: &str, index: usize, _: &str| format!("{table}_{index}"),
        );
        assert_eq!(naming.table_name_to_type_name("foo"), "Dbfoo");
        assert_eq!(naming.column_name_to_field_name(0, "foo", 3, "x"), "foo_3");
    }
}
