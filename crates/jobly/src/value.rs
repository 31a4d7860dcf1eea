//! Scalar values carried by a partial update.
//!
//! [`FieldValue`] is the closed set of values a client may assign to a column
//! through a partial update: text, integer, floating point, boolean or null.
//! It binds directly as a `tokio-postgres` parameter and adapts integer and
//! float widths to the column type PostgreSQL reports for the placeholder.

use bytes::BytesMut;
use serde::{Deserialize, Serialize};
use std::error::Error;
use tokio_postgres::types::{IsNull, ToSql, Type};

use crate::error::{JoblyError, JoblyResult};

/// A single scalar value assigned to a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// SQL NULL
    Null,
    /// `boolean`
    Bool(bool),
    /// Any integer column (`smallint`, `integer`, `bigint`)
    Int(i64),
    /// `real` / `double precision`
    Float(f64),
    /// `text` / `varchar` / `char`
    Text(String),
}

impl FieldValue {
    /// Returns `true` for [`FieldValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Name of the variant, used in bind errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
        }
    }

    /// Convert a JSON scalar. Arrays and objects are rejected.
    pub fn from_json(value: serde_json::Value) -> JoblyResult<Self> {
        use serde_json::Value;

        match value {
            Value::Null => Ok(Self::Null),
            Value::Bool(b) => Ok(Self::Bool(b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Self::Float(f))
                } else {
                    Err(JoblyError::bad_request(format!(
                        "Number out of range: {n}"
                    )))
                }
            }
            Value::String(s) => Ok(Self::Text(s)),
            Value::Array(_) => Err(JoblyError::bad_request(
                "Expected a scalar value, got an array",
            )),
            Value::Object(_) => Err(JoblyError::bad_request(
                "Expected a scalar value, got an object",
            )),
        }
    }
}

impl TryFrom<serde_json::Value> for FieldValue {
    type Error = JoblyError;

    fn try_from(value: serde_json::Value) -> JoblyResult<Self> {
        Self::from_json(value)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i16> for FieldValue {
    fn from(v: i16) -> Self {
        Self::Int(v.into())
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        Self::Float(v.into())
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

fn mismatch(value: &FieldValue, ty: &Type) -> Box<dyn Error + Sync + Send> {
    format!("cannot bind {} value to column of type {}", value.kind(), ty).into()
}

fn to_f32(v: f64) -> Result<f32, Box<dyn Error + Sync + Send>> {
    let narrowed = v as f32;
    if v.is_finite() && !narrowed.is_finite() {
        return Err(format!("value {v} out of range for type real").into());
    }
    Ok(narrowed)
}

impl ToSql for FieldValue {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Self::Null => Ok(IsNull::Yes),
            Self::Bool(b) if <bool as ToSql>::accepts(ty) => b.to_sql(ty, out),
            Self::Int(i) => match *ty {
                Type::INT2 => i16::try_from(*i)?.to_sql(ty, out),
                Type::INT4 => i32::try_from(*i)?.to_sql(ty, out),
                Type::INT8 => i.to_sql(ty, out),
                Type::FLOAT4 => to_f32(*i as f64)?.to_sql(ty, out),
                Type::FLOAT8 => (*i as f64).to_sql(ty, out),
                _ => Err(mismatch(self, ty)),
            },
            Self::Float(f) => match *ty {
                Type::FLOAT4 => to_f32(*f)?.to_sql(ty, out),
                Type::FLOAT8 => f.to_sql(ty, out),
                _ => Err(mismatch(self, ty)),
            },
            Self::Text(s) if <&str as ToSql>::accepts(ty) => s.as_str().to_sql(ty, out),
            _ => Err(mismatch(self, ty)),
        }
    }

    // NULL binds to any column, so the per-variant check happens in `to_sql`.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    tokio_postgres::types::to_sql_checked!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_json_scalars() {
        assert_eq!(FieldValue::from_json(json!(null)).unwrap(), FieldValue::Null);
        assert_eq!(FieldValue::from_json(json!(true)).unwrap(), FieldValue::Bool(true));
        assert_eq!(FieldValue::from_json(json!(32)).unwrap(), FieldValue::Int(32));
        assert_eq!(FieldValue::from_json(json!(0.25)).unwrap(), FieldValue::Float(0.25));
        assert_eq!(
            FieldValue::from_json(json!("ibm")).unwrap(),
            FieldValue::Text("ibm".into())
        );
    }

    #[test]
    fn rejects_json_containers() {
        let err = FieldValue::from_json(json!([1, 2])).unwrap_err();
        assert!(err.is_bad_request());
        let err = FieldValue::from_json(json!({"a": 1})).unwrap_err();
        assert!(err.is_bad_request());
    }

    #[test]
    fn deserializes_untagged() {
        let values: Vec<FieldValue> = serde_json::from_str(r#"[null, false, 7, 1.5, "x"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                FieldValue::Null,
                FieldValue::Bool(false),
                FieldValue::Int(7),
                FieldValue::Float(1.5),
                FieldValue::Text("x".into()),
            ]
        );
    }

    #[test]
    fn serializes_as_plain_json() {
        let out = serde_json::to_string(&vec![
            FieldValue::Text("Aliya".into()),
            FieldValue::Int(32),
            FieldValue::Null,
        ])
        .unwrap();
        assert_eq!(out, r#"["Aliya",32,null]"#);
    }

    #[test]
    fn option_none_becomes_null() {
        assert_eq!(FieldValue::from(None::<i32>), FieldValue::Null);
        assert_eq!(FieldValue::from(Some("a")), FieldValue::Text("a".into()));
    }

    #[test]
    fn int_narrows_to_column_width() {
        let mut buf = BytesMut::new();
        FieldValue::Int(42).to_sql(&Type::INT4, &mut buf).unwrap();
        assert_eq!(&buf[..], &42_i32.to_be_bytes());

        let mut buf = BytesMut::new();
        assert!(FieldValue::Int(i64::MAX).to_sql(&Type::INT4, &mut buf).is_err());
    }

    #[test]
    fn null_binds_to_any_type() {
        let mut buf = BytesMut::new();
        let is_null = FieldValue::Null.to_sql(&Type::JSONB, &mut buf).unwrap();
        assert!(matches!(is_null, IsNull::Yes));
    }

    #[test]
    fn text_refuses_integer_column() {
        let mut buf = BytesMut::new();
        let err = FieldValue::Text("ten".into())
            .to_sql(&Type::INT4, &mut buf)
            .err()
            .expect("text must not bind to int4");
        assert!(err.to_string().contains("cannot bind text"));
    }

    #[test]
    fn float_overflowing_real_is_rejected() {
        let mut buf = BytesMut::new();
        let err = FieldValue::Float(1e300)
            .to_sql(&Type::FLOAT4, &mut buf)
            .err()
            .expect("1e300 must not bind to real");
        assert!(err.to_string().contains("out of range for type real"));
        assert!(buf.is_empty());

        let mut buf = BytesMut::new();
        FieldValue::Float(1e300).to_sql(&Type::FLOAT8, &mut buf).unwrap();
        assert_eq!(&buf[..], &1e300_f64.to_be_bytes());
    }

    #[test]
    fn real_keeps_non_finite_and_small_values() {
        let mut buf = BytesMut::new();
        FieldValue::Float(f64::INFINITY)
            .to_sql(&Type::FLOAT4, &mut buf)
            .unwrap();
        assert_eq!(&buf[..], &f32::INFINITY.to_be_bytes());

        let mut buf = BytesMut::new();
        FieldValue::Float(0.5).to_sql(&Type::FLOAT4, &mut buf).unwrap();
        assert_eq!(&buf[..], &0.5_f32.to_be_bytes());

        let mut buf = BytesMut::new();
        FieldValue::Int(i64::MAX).to_sql(&Type::FLOAT4, &mut buf).unwrap();
        assert_eq!(buf.len(), 4);
    }
}
