use std::error::Error;
use std::fmt;

/// A borrowed log field value.
///
/// Call sites hand the sanitizer whatever they were about to log; this enum
/// keeps enough of the original type for the rules to tell a string from an
/// error from an opaque value without allocating up front.
#[derive(Clone, Copy)]
pub enum FieldValue<'a> {
    Str(&'a str),
    I64(i64),
    U64(u64),
    I128(i128),
    U128(u128),
    F64(f64),
    Bool(bool),
    Error(&'a (dyn Error + 'static)),
    Debug(&'a dyn fmt::Debug),
    Null,
}

impl<'a> FieldValue<'a> {
    /// Wrap any `Debug` value that has no dedicated variant.
    pub fn debug<T: fmt::Debug>(value: &'a T) -> Self {
        FieldValue::Debug(value)
    }

    /// Wrap an error so the error rule can extract its message.
    pub fn error(err: &'a (dyn Error + 'static)) -> Self {
        FieldValue::Error(err)
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Default textual representation, before any collapsing or truncation.
    pub fn render(&self) -> String {
        match self {
            FieldValue::Str(s) => (*s).to_string(),
            FieldValue::I64(v) => v.to_string(),
            FieldValue::U64(v) => v.to_string(),
            FieldValue::I128(v) => v.to_string(),
            FieldValue::U128(v) => v.to_string(),
            FieldValue::F64(v) => v.to_string(),
            FieldValue::Bool(v) => v.to_string(),
            FieldValue::Error(err) => err.to_string(),
            FieldValue::Debug(value) => format!("{:?}", value),
            FieldValue::Null => "null".to_string(),
        }
    }
}

impl fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(s) => f.debug_tuple("Str").field(s).finish(),
            FieldValue::Error(err) => f.debug_tuple("Error").field(&err.to_string()).finish(),
            FieldValue::Debug(value) => f.debug_tuple("Debug").field(value).finish(),
            FieldValue::Null => f.write_str("Null"),
            other => f.debug_tuple("Scalar").field(&other.render()).finish(),
        }
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(value: &'a str) -> Self {
        FieldValue::Str(value)
    }
}

impl<'a> From<&'a String> for FieldValue<'a> {
    fn from(value: &'a String) -> Self {
        FieldValue::Str(value.as_str())
    }
}

impl<'a> From<&'a (dyn Error + 'static)> for FieldValue<'a> {
    fn from(value: &'a (dyn Error + 'static)) -> Self {
        FieldValue::Error(value)
    }
}

impl<'a> From<&'a (dyn Error + Send + Sync + 'static)> for FieldValue<'a> {
    fn from(value: &'a (dyn Error + Send + Sync + 'static)) -> Self {
        FieldValue::Error(value)
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue<'_> {
            fn from(value: $t) -> Self {
                FieldValue::I64(value as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue<'_> {
            fn from(value: $t) -> Self {
                FieldValue::U64(value as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<i128> for FieldValue<'_> {
    fn from(value: i128) -> Self {
        FieldValue::I128(value)
    }
}

impl From<u128> for FieldValue<'_> {
    fn from(value: u128) -> Self {
        FieldValue::U128(value)
    }
}

impl From<f32> for FieldValue<'_> {
    fn from(value: f32) -> Self {
        FieldValue::F64(value as f64)
    }
}

impl From<f64> for FieldValue<'_> {
    fn from(value: f64) -> Self {
        FieldValue::F64(value)
    }
}

impl From<bool> for FieldValue<'_> {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl<'a, T> From<Option<T>> for FieldValue<'a>
where
    T: Into<FieldValue<'a>>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}
