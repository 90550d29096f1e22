//! Type descriptors for preferred-type inference.
//!
//! [`TypeDescriptor`] is a deliberately small model of the front end's types:
//! just enough to tell the operator heuristics apart and to render the result
//! the way the front end prints types (`int`, `int *`, `enum A`, `class Cls`).

use std::fmt;

use smol_str::SmolStr;

/// Rendering of [`TypeDescriptor::Unknown`].
pub const UNKNOWN_TYPE: &str = "NULL TYPE";

/// Rendering of [`TypeDescriptor::Boolean`].
pub const BOOLEAN_TYPE: &str = "_Bool";

/// Spelled width class of an integral type.
///
/// `long` and `long long` usually share a bit width but are distinct types,
/// so the width is kept as the spelling rather than a number of bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IntWidth {
    Char,
    Short,
    Int,
    Long,
    LongLong,
}

impl IntWidth {
    fn spelling(self) -> &'static str {
        match self {
            IntWidth::Char => "char",
            IntWidth::Short => "short",
            IntWidth::Int => "int",
            IntWidth::Long => "long",
            IntWidth::LongLong => "long long",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FloatWidth {
    Float,
    Double,
    LongDouble,
}

impl FloatWidth {
    fn spelling(self) -> &'static str {
        match self {
            FloatWidth::Float => "float",
            FloatWidth::Double => "double",
            FloatWidth::LongDouble => "long double",
        }
    }
}

/// The class-key a record was declared with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordTag {
    Class,
    Struct,
    Union,
}

impl RecordTag {
    fn keyword(self) -> &'static str {
        match self {
            RecordTag::Class => "class",
            RecordTag::Struct => "struct",
            RecordTag::Union => "union",
        }
    }
}

/// Target data model; decides which integral type a pointer difference has.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DataModel {
    /// 64-bit Unix: `ptrdiff_t` is `long`.
    #[default]
    Lp64,
    /// 64-bit Windows: `ptrdiff_t` is `long long`.
    Llp64,
    /// 32-bit targets: `ptrdiff_t` is `int`.
    Ilp32,
}

impl DataModel {
    /// The type of `p - q` for pointers `p` and `q`.
    pub fn pointer_difference(self) -> TypeDescriptor {
        let width = match self {
            DataModel::Lp64 => IntWidth::Long,
            DataModel::Llp64 => IntWidth::LongLong,
            DataModel::Ilp32 => IntWidth::Int,
        };
        TypeDescriptor::Integral { width, signed: true }
    }
}

/// A type as far as completion cares about it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Integral { width: IntWidth, signed: bool },
    FloatingPoint(FloatWidth),
    Pointer(Box<TypeDescriptor>),
    Boolean,
    /// An enumeration; `name` is qualified (`ns::E`).
    Enum { name: SmolStr, scoped: bool },
    /// A class, struct or union; `name` is qualified.
    Record { name: SmolStr, tag: RecordTag },
    /// No opinion. Distinct from an error.
    #[default]
    Unknown,
}

impl TypeDescriptor {
    /// Plain `int`.
    pub const INT: TypeDescriptor = TypeDescriptor::Integral {
        width: IntWidth::Int,
        signed: true,
    };

    pub fn integral(width: IntWidth, signed: bool) -> Self {
        TypeDescriptor::Integral { width, signed }
    }

    pub fn pointer_to(pointee: TypeDescriptor) -> Self {
        TypeDescriptor::Pointer(Box::new(pointee))
    }

    pub fn enumeration(name: impl Into<SmolStr>, scoped: bool) -> Self {
        TypeDescriptor::Enum {
            name: name.into(),
            scoped,
        }
    }

    pub fn record(name: impl Into<SmolStr>, tag: RecordTag) -> Self {
        TypeDescriptor::Record {
            name: name.into(),
            tag,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, TypeDescriptor::Unknown)
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, TypeDescriptor::Pointer(_))
    }

    pub fn is_record(&self) -> bool {
        matches!(self, TypeDescriptor::Record { .. })
    }

    pub fn is_floating(&self) -> bool {
        matches!(self, TypeDescriptor::FloatingPoint(_))
    }

    /// Integer types including `bool`, excluding enumerations.
    pub fn is_integral(&self) -> bool {
        matches!(self, TypeDescriptor::Integral { .. } | TypeDescriptor::Boolean)
    }

    /// Types the built-in arithmetic operators accept: integers, `bool`,
    /// floating point and unscoped enumerations.
    pub fn is_arithmetic(&self) -> bool {
        match self {
            TypeDescriptor::Integral { .. }
            | TypeDescriptor::FloatingPoint(_)
            | TypeDescriptor::Boolean => true,
            TypeDescriptor::Enum { scoped, .. } => !scoped,
            TypeDescriptor::Pointer(_) | TypeDescriptor::Record { .. } | TypeDescriptor::Unknown => {
                false
            }
        }
    }

    /// The pointed-to type, or `Unknown` for non-pointers.
    pub fn pointee(&self) -> TypeDescriptor {
        match self {
            TypeDescriptor::Pointer(pointee) => (**pointee).clone(),
            _ => TypeDescriptor::Unknown,
        }
    }

    /// The same type with a scoped enumeration folded to its plain form.
    pub fn unscoped(&self) -> TypeDescriptor {
        match self {
            TypeDescriptor::Enum { name, .. } => TypeDescriptor::Enum {
                name: name.clone(),
                scoped: false,
            },
            other => other.clone(),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Integral { width, signed } => {
                if !signed {
                    f.write_str("unsigned ")?;
                }
                f.write_str(width.spelling())
            }
            TypeDescriptor::FloatingPoint(width) => f.write_str(width.spelling()),
            TypeDescriptor::Pointer(pointee) => {
                if pointee.is_pointer() {
                    write!(f, "{pointee}*")
                } else {
                    write!(f, "{pointee} *")
                }
            }
            TypeDescriptor::Boolean => f.write_str(BOOLEAN_TYPE),
            // scoped enumerations print like plain ones
            TypeDescriptor::Enum { name, .. } => write!(f, "enum {name}"),
            TypeDescriptor::Record { name, tag } => write!(f, "{} {name}", tag.keyword()),
            TypeDescriptor::Unknown => f.write_str(UNKNOWN_TYPE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_rendering() {
        assert_eq!(TypeDescriptor::INT.to_string(), "int");
        assert_eq!(TypeDescriptor::integral(IntWidth::Long, true).to_string(), "long");
        assert_eq!(
            TypeDescriptor::integral(IntWidth::LongLong, true).to_string(),
            "long long"
        );
        assert_eq!(
            TypeDescriptor::integral(IntWidth::Int, false).to_string(),
            "unsigned int"
        );
        assert_eq!(
            TypeDescriptor::integral(IntWidth::Char, false).to_string(),
            "unsigned char"
        );
    }

    #[test]
    fn test_pointer_rendering() {
        let ptr = TypeDescriptor::pointer_to(TypeDescriptor::INT);
        assert_eq!(ptr.to_string(), "int *");
        assert_eq!(TypeDescriptor::pointer_to(ptr).to_string(), "int **");
        assert_eq!(
            TypeDescriptor::pointer_to(TypeDescriptor::record("Cls", RecordTag::Class)).to_string(),
            "class Cls *"
        );
    }

    #[test]
    fn test_named_type_rendering() {
        assert_eq!(TypeDescriptor::enumeration("A", false).to_string(), "enum A");
        assert_eq!(TypeDescriptor::enumeration("A", true).to_string(), "enum A");
        assert_eq!(
            TypeDescriptor::record("ns::S", RecordTag::Struct).to_string(),
            "struct ns::S"
        );
        assert_eq!(TypeDescriptor::Boolean.to_string(), "_Bool");
        assert_eq!(TypeDescriptor::FloatingPoint(FloatWidth::Float).to_string(), "float");
    }

    #[test]
    fn test_unknown_is_distinct_sentinel() {
        assert_eq!(TypeDescriptor::Unknown.to_string(), UNKNOWN_TYPE);
        assert!(TypeDescriptor::default().is_unknown());
    }

    #[test]
    fn test_pointer_difference_by_data_model() {
        assert_eq!(DataModel::default().pointer_difference().to_string(), "long");
        assert_eq!(DataModel::Llp64.pointer_difference().to_string(), "long long");
        assert_eq!(DataModel::Ilp32.pointer_difference().to_string(), "int");
    }

    #[test]
    fn test_classification() {
        assert!(TypeDescriptor::Boolean.is_integral());
        assert!(TypeDescriptor::enumeration("E", false).is_arithmetic());
        assert!(!TypeDescriptor::enumeration("E", true).is_arithmetic());
        assert!(!TypeDescriptor::pointer_to(TypeDescriptor::INT).is_arithmetic());
        assert_eq!(
            TypeDescriptor::enumeration("E", true).unscoped(),
            TypeDescriptor::enumeration("E", false)
        );
        assert_eq!(
            TypeDescriptor::pointer_to(TypeDescriptor::INT).pointee(),
            TypeDescriptor::INT
        );
    }
}
