use super::Value;
use crate::{Error, Result};

/// A host type that generated record types hold, loaded from a decoded
/// column value.
pub trait Primitive: Sized {
    fn load(value: Value) -> Result<Self>;
}

fn mismatch(value: &Value, expected: &str) -> Error {
    Error::invalid_result(format!("cannot load {value:?} as {expected}"))
}

impl Primitive for bool {
    fn load(value: Value) -> Result<Self> {
        match value {
            Value::Bool(v) => Ok(v),
            // Engines without a boolean type store 0 / 1.
            Value::I32(v @ (0 | 1)) => Ok(v == 1),
            Value::I64(v @ (0 | 1)) => Ok(v == 1),
            _ => Err(mismatch(&value, "bool")),
        }
    }
}

impl Primitive for i16 {
    fn load(value: Value) -> Result<Self> {
        let wide = i64::load(value)?;
        i16::try_from(wide).map_err(|_| mismatch(&Value::I64(wide), "i16"))
    }
}

impl Primitive for i32 {
    fn load(value: Value) -> Result<Self> {
        let wide = i64::load(value)?;
        i32::try_from(wide).map_err(|_| mismatch(&Value::I64(wide), "i32"))
    }
}

impl Primitive for i64 {
    fn load(value: Value) -> Result<Self> {
        match value {
            Value::I64(v) => Ok(v),
            Value::I32(v) => Ok(v.into()),
            _ => Err(mismatch(&value, "i64")),
        }
    }
}

impl Primitive for f32 {
    fn load(value: Value) -> Result<Self> {
        Ok(f64::load(value)? as f32)
    }
}

impl Primitive for f64 {
    fn load(value: Value) -> Result<Self> {
        match value {
            Value::F64(v) => Ok(v),
            Value::I32(v) => Ok(v.into()),
            _ => Err(mismatch(&value, "f64")),
        }
    }
}

impl Primitive for String {
    fn load(value: Value) -> Result<Self> {
        match value {
            Value::String(v) => Ok(v),
            _ => Err(mismatch(&value, "String")),
        }
    }
}

impl Primitive for Vec<u8> {
    fn load(value: Value) -> Result<Self> {
        match value {
            Value::Bytes(v) => Ok(v),
            _ => Err(mismatch(&value, "bytes")),
        }
    }
}

impl Primitive for Value {
    fn load(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl<T: Primitive> Primitive for Option<T> {
    fn load(value: Value) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            Ok(Some(T::load(value)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_narrow_with_range_check() {
        assert_eq!(i32::load(Value::I64(7)).unwrap(), 7);
        assert!(i16::load(Value::I64(70_000))
            .unwrap_err()
            .is_invalid_result());
    }

    #[test]
    fn option_maps_null() {
        assert_eq!(Option::<String>::load(Value::Null).unwrap(), None);
        assert_eq!(
            Option::<String>::load(Value::from("x")).unwrap(),
            Some("x".to_string())
        );
    }

    #[test]
    fn integer_booleans() {
        assert!(bool::load(Value::I64(1)).unwrap());
        assert!(bool::load(Value::I64(2)).is_err());
    }
}
