use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;

use crate::access::PathArg;
use crate::info::Type;

/// A path argument converted to the exact type of its parameter.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Literal {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Char(char),
    String(String),
}

macro_rules! convert_int {
    ($ty:ident, $value:expr, $($int:ident => $variant:ident),*) => {
        $(
            if $ty.is::<$int>() {
                return $int::try_from($value).ok().map(Literal::$variant);
            }
        )*
    };
}

impl Literal {
    /// Converts `arg` to `ty`, returning `None` when the literal does not fit.
    ///
    /// Integers convert to every integer type they fit in and to floats.
    pub(crate) fn convert(arg: &PathArg, ty: Type) -> Option<Self> {
        match arg {
            PathArg::Int(value) => {
                let value = *value;
                convert_int!(
                    ty, value,
                    i8 => I8, i16 => I16, i32 => I32, i64 => I64,
                    u8 => U8, u16 => U16, u32 => U32, u64 => U64
                );
                Self::float(value as f64, ty)
            }
            PathArg::Float(value) => Self::float(*value, ty),
            PathArg::Bool(value) => ty.is::<bool>().then_some(Self::Bool(*value)),
            PathArg::Char(value) => {
                if ty.is::<char>() {
                    Some(Self::Char(*value))
                } else if ty.is::<String>() {
                    Some(Self::String((*value).into()))
                } else {
                    None
                }
            }
            PathArg::Str(value) => ty.is::<String>().then(|| Self::String(value.clone())),
        }
    }

    fn float(value: f64, ty: Type) -> Option<Self> {
        if ty.is::<f64>() {
            Some(Self::F64(value))
        } else if ty.is::<f32>() {
            Some(Self::F32(value as f32))
        } else {
            None
        }
    }

    pub(crate) fn to_boxed(&self) -> Box<dyn Any> {
        match self {
            Self::Bool(v) => Box::new(*v),
            Self::I8(v) => Box::new(*v),
            Self::I16(v) => Box::new(*v),
            Self::I32(v) => Box::new(*v),
            Self::I64(v) => Box::new(*v),
            Self::U8(v) => Box::new(*v),
            Self::U16(v) => Box::new(*v),
            Self::U32(v) => Box::new(*v),
            Self::U64(v) => Box::new(*v),
            Self::F32(v) => Box::new(*v),
            Self::F64(v) => Box::new(*v),
            Self::Char(v) => Box::new(*v),
            Self::String(v) => Box::new(v.clone()),
        }
    }
}

/// Boxes every literal, in order.
pub(crate) fn to_values(args: &[Literal]) -> Vec<Box<dyn Any>> {
    args.iter().map(Literal::to_boxed).collect()
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::Literal;
    use crate::access::PathArg;
    use crate::info::Type;

    #[test]
    fn integers_respect_range() {
        assert_eq!(Literal::convert(&PathArg::Int(200), Type::of::<u8>()), Some(Literal::U8(200)));
        assert_eq!(Literal::convert(&PathArg::Int(300), Type::of::<u8>()), None);
        assert_eq!(Literal::convert(&PathArg::Int(-1), Type::of::<u32>()), None);
        assert_eq!(Literal::convert(&PathArg::Int(3), Type::of::<f32>()), Some(Literal::F32(3.0)));
    }

    #[test]
    fn other_literals() {
        assert_eq!(Literal::convert(&PathArg::Float(1.5), Type::of::<i32>()), None);
        assert_eq!(Literal::convert(&PathArg::Bool(true), Type::of::<bool>()), Some(Literal::Bool(true)));
        assert_eq!(
            Literal::convert(&PathArg::Char('x'), Type::of::<String>()),
            Some(Literal::String("x".into()))
        );
        let boxed = Literal::convert(&PathArg::Str("hi".into()), Type::of::<String>())
            .unwrap()
            .to_boxed();
        assert_eq!(boxed.downcast_ref::<String>().map(String::as_str), Some("hi"));
    }
}
