use super::Formatter;

use quarry_core::{stmt::TableRefId, Result};

macro_rules! fmt {
    ($f:expr, $( $fragments:expr )*) => {{
        $(
            $fragments.to_sql($f)?;
        )*
    }};
}

pub(super) trait ToSql {
    fn to_sql(self, f: &mut Formatter<'_>) -> Result<()>;
}

impl ToSql for &str {
    fn to_sql(self, f: &mut Formatter<'_>) -> Result<()> {
        f.dst.push_str(self);
        Ok(())
    }
}

impl ToSql for &String {
    fn to_sql(self, f: &mut Formatter<'_>) -> Result<()> {
        f.dst.push_str(self);
        Ok(())
    }
}

impl ToSql for TableRefId {
    fn to_sql(self, f: &mut Formatter<'_>) -> Result<()> {
        f.dst.push('t');
        f.dst.push_str(&self.0.to_string());
        Ok(())
    }
}
