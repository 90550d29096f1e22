//! Preferred-type inference for the token at the cursor.
//!
//! The heuristics ignore user-defined operator overloads. Records are assumed
//! to combine with their own type under arithmetic and comparison, and no
//! guess is made for the operators that are commonly overloaded with a
//! non-arithmetic meaning (`<<`, `>>`, `&`, `|`, `^`).

use tracing::trace;

use super::expr::{BinaryOp, CursorSide, ExpressionShape, OperatorClass};
use super::types::{DataModel, TypeDescriptor};

/// Preferred type for the cursor in `shape`, or `Unknown` without a shape.
pub fn preferred_type(shape: Option<&ExpressionShape>, model: DataModel) -> TypeDescriptor {
    let Some(shape) = shape else {
        return TypeDescriptor::Unknown;
    };

    let preferred = match shape.cursor_side {
        CursorSide::Right => preferred_rhs_type(shape.op, &shape.known_operand, model),
        // The written operand on the right says little about the target.
        CursorSide::Left => TypeDescriptor::Unknown,
    };
    trace!(%shape, %preferred, "inferred preferred type");
    preferred
}

/// Preferred type of the right operand of `lhs <op> ^`.
pub fn preferred_rhs_type(op: BinaryOp, lhs: &TypeDescriptor, model: DataModel) -> TypeDescriptor {
    use TypeDescriptor as T;

    match op.class() {
        OperatorClass::Comma => T::Unknown,

        OperatorClass::Logical => T::Boolean,

        OperatorClass::Assignment => match lhs {
            // always assume an integer offset, even for `-=`
            T::Pointer(_) if matches!(op, BinaryOp::AddAssign | BinaryOp::SubAssign) => {
                model.pointer_difference()
            }
            _ => lhs.clone(),
        },

        OperatorClass::Additive => match lhs {
            T::Pointer(_) => model.pointer_difference(),
            _ if same_type_operand(lhs) => lhs.clone(),
            _ => T::Unknown,
        },

        OperatorClass::Subtractive => match lhs {
            // assume pointer - pointer
            T::Pointer(_) => lhs.clone(),
            _ if same_type_operand(lhs) => lhs.clone(),
            _ => T::Unknown,
        },

        OperatorClass::Multiplicative => {
            if same_type_operand(lhs) {
                lhs.clone()
            } else {
                T::Unknown
            }
        }

        OperatorClass::Comparison => lhs.clone(),

        OperatorClass::Bitwise => match lhs {
            // scoped enums are not legal here without overloads, but the
            // plain spelling is still the best guess
            T::Enum { .. } => lhs.unscoped(),
            T::Integral { .. } | T::Boolean => lhs.clone(),
            T::Record { .. } | T::FloatingPoint(_) | T::Pointer(_) | T::Unknown => T::Unknown,
        },

        // the left operand is promoted, so its width says nothing about the
        // shift count; enumerations shift like their underlying integer
        OperatorClass::Shift => match lhs {
            T::Integral { .. } | T::Boolean | T::Enum { .. } => T::INT,
            T::Record { .. } | T::FloatingPoint(_) | T::Pointer(_) | T::Unknown => T::Unknown,
        },
    }
}

/// Operands for which arithmetic assumes the other side has the same type.
fn same_type_operand(ty: &TypeDescriptor) -> bool {
    ty.is_arithmetic() || ty.is_record()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::types::{FloatWidth, IntWidth, RecordTag};

    fn rhs(op: BinaryOp, lhs: &TypeDescriptor) -> String {
        preferred_rhs_type(op, lhs, DataModel::Lp64).to_string()
    }

    #[test]
    fn test_no_shape_is_unknown() {
        assert!(preferred_type(None, DataModel::Lp64).is_unknown());
    }

    #[test]
    fn test_left_side_is_unknown() {
        let shape = ExpressionShape::new(BinaryOp::Assign, TypeDescriptor::INT, CursorSide::Left);
        assert!(preferred_type(Some(&shape), DataModel::Lp64).is_unknown());
    }

    #[test]
    fn test_assignments_keep_target_type() {
        let float = TypeDescriptor::FloatingPoint(FloatWidth::Float);
        let cls = TypeDescriptor::record("Cls", RecordTag::Class);
        let ptr = TypeDescriptor::pointer_to(TypeDescriptor::INT);
        for op in [
            BinaryOp::Assign,
            BinaryOp::AddAssign,
            BinaryOp::SubAssign,
            BinaryOp::MulAssign,
            BinaryOp::DivAssign,
            BinaryOp::RemAssign,
        ] {
            assert_eq!(rhs(op, &TypeDescriptor::INT), "int", "{op}");
            assert_eq!(rhs(op, &float), "float", "{op}");
            assert_eq!(rhs(op, &cls), "class Cls", "{op}");
        }
        assert_eq!(rhs(BinaryOp::Assign, &ptr), "int *");
    }

    #[test]
    fn test_pointer_offsets() {
        let ptr = TypeDescriptor::pointer_to(TypeDescriptor::INT);
        assert_eq!(rhs(BinaryOp::Add, &ptr), "long");
        assert_eq!(rhs(BinaryOp::AddAssign, &ptr), "long");
        assert_eq!(rhs(BinaryOp::SubAssign, &ptr), "long");
        assert_eq!(rhs(BinaryOp::Sub, &ptr), "int *");
        assert_eq!(
            preferred_rhs_type(BinaryOp::Add, &ptr, DataModel::Llp64).to_string(),
            "long long"
        );
    }

    #[test]
    fn test_logical_is_always_boolean() {
        let ptr = TypeDescriptor::pointer_to(TypeDescriptor::INT);
        let cls = TypeDescriptor::record("Cls", RecordTag::Class);
        for lhs in [TypeDescriptor::INT, ptr, cls, TypeDescriptor::Unknown] {
            assert_eq!(rhs(BinaryOp::LogicalAnd, &lhs), "_Bool");
            assert_eq!(rhs(BinaryOp::LogicalOr, &lhs), "_Bool");
        }
    }

    #[test]
    fn test_bitwise_and_shift() {
        let ll = TypeDescriptor::integral(IntWidth::LongLong, true);
        let scoped = TypeDescriptor::enumeration("A", true);
        let cls = TypeDescriptor::record("Cls", RecordTag::Class);

        assert_eq!(rhs(BinaryOp::BitOr, &ll), "long long");
        assert_eq!(rhs(BinaryOp::AndAssign, &ll), "long long");
        assert_eq!(
            preferred_rhs_type(BinaryOp::BitAnd, &scoped, DataModel::Lp64),
            TypeDescriptor::enumeration("A", false)
        );
        assert_eq!(rhs(BinaryOp::Shl, &ll), "int");
        assert_eq!(rhs(BinaryOp::ShrAssign, &TypeDescriptor::INT), "int");
        for op in [
            BinaryOp::Shl,
            BinaryOp::Shr,
            BinaryOp::BitOr,
            BinaryOp::BitAnd,
            BinaryOp::ShlAssign,
            BinaryOp::ShrAssign,
            BinaryOp::OrAssign,
            BinaryOp::AndAssign,
        ] {
            assert_eq!(rhs(op, &cls), "NULL TYPE", "{op}");
        }
    }

    #[test]
    fn test_enum_shifts_prefer_int() {
        let plain = TypeDescriptor::enumeration("E", false);
        let scoped = TypeDescriptor::enumeration("S", true);
        assert_eq!(rhs(BinaryOp::Shl, &plain), "int");
        assert_eq!(rhs(BinaryOp::ShrAssign, &plain), "int");
        assert_eq!(rhs(BinaryOp::Shr, &scoped), "int");
        assert_eq!(rhs(BinaryOp::Shl, &TypeDescriptor::Boolean), "int");
        assert_eq!(
            rhs(BinaryOp::Shl, &TypeDescriptor::FloatingPoint(FloatWidth::Double)),
            "NULL TYPE"
        );
    }

    #[test]
    fn test_comma_has_no_opinion() {
        assert_eq!(rhs(BinaryOp::Comma, &TypeDescriptor::INT), "NULL TYPE");
    }

    #[test]
    fn test_unusual_operands_fall_back_to_unknown() {
        let ptr = TypeDescriptor::pointer_to(TypeDescriptor::INT);
        let scoped = TypeDescriptor::enumeration("A", true);
        assert_eq!(rhs(BinaryOp::Mul, &ptr), "NULL TYPE");
        assert_eq!(rhs(BinaryOp::Add, &scoped), "NULL TYPE");
        assert_eq!(rhs(BinaryOp::Shl, &ptr), "NULL TYPE");
        assert_eq!(rhs(BinaryOp::BitOr, &ptr), "NULL TYPE");
        assert_eq!(rhs(BinaryOp::Eq, &scoped), "enum A");
    }
}
