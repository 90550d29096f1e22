//! Expression shapes: the little that is known about the expression
//! surrounding the cursor.

use std::fmt;

use super::types::{DataModel, IntWidth, TypeDescriptor};

/// A binary or assignment operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Comma,
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    RemAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    ShlAssign,
    ShrAssign,
    LogicalOr,
    LogicalAnd,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

/// Operator families the preferred-type table is written in terms of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperatorClass {
    /// `=` and the arithmetic compound assignments `+= -= *= /= %=`.
    Assignment,
    /// `+`
    Additive,
    /// `-`
    Subtractive,
    /// `* / %`
    Multiplicative,
    /// `== != < <= > >=`
    Comparison,
    /// `&& ||`
    Logical,
    /// `& | ^` and `&= |= ^=`
    Bitwise,
    /// `<< >>` and `<<= >>=`
    Shift,
    /// `,`
    Comma,
}

impl BinaryOp {
    pub fn class(self) -> OperatorClass {
        use BinaryOp::*;
        match self {
            Assign | AddAssign | SubAssign | MulAssign | DivAssign | RemAssign => {
                OperatorClass::Assignment
            }
            Add => OperatorClass::Additive,
            Sub => OperatorClass::Subtractive,
            Mul | Div | Rem => OperatorClass::Multiplicative,
            Eq | Ne | Lt | Le | Gt | Ge => OperatorClass::Comparison,
            LogicalAnd | LogicalOr => OperatorClass::Logical,
            BitAnd | BitOr | BitXor | AndAssign | OrAssign | XorAssign => OperatorClass::Bitwise,
            Shl | Shr | ShlAssign | ShrAssign => OperatorClass::Shift,
            Comma => OperatorClass::Comma,
        }
    }

    /// Whether the operator stores into its left operand.
    pub fn is_assignment(self) -> bool {
        use BinaryOp::*;
        matches!(
            self,
            Assign
                | AddAssign
                | SubAssign
                | MulAssign
                | DivAssign
                | RemAssign
                | AndAssign
                | OrAssign
                | XorAssign
                | ShlAssign
                | ShrAssign
        )
    }

    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        use BinaryOp::*;
        match self {
            Comma => 1,
            Assign | AddAssign | SubAssign | MulAssign | DivAssign | RemAssign | AndAssign
            | OrAssign | XorAssign | ShlAssign | ShrAssign => 2,
            LogicalOr => 3,
            LogicalAnd => 4,
            BitOr => 5,
            BitXor => 6,
            BitAnd => 7,
            Eq | Ne => 8,
            Lt | Le | Gt | Ge => 9,
            Shl | Shr => 10,
            Add | Sub => 11,
            Mul | Div | Rem => 12,
        }
    }

    /// Assignments group right-to-left, everything else left-to-right.
    pub fn is_right_associative(self) -> bool {
        self.is_assignment()
    }

    pub fn symbol(self) -> &'static str {
        use BinaryOp::*;
        match self {
            Comma => ",",
            Assign => "=",
            AddAssign => "+=",
            SubAssign => "-=",
            MulAssign => "*=",
            DivAssign => "/=",
            RemAssign => "%=",
            AndAssign => "&=",
            OrAssign => "|=",
            XorAssign => "^=",
            ShlAssign => "<<=",
            ShrAssign => ">>=",
            LogicalOr => "||",
            LogicalAnd => "&&",
            BitOr => "|",
            BitXor => "^",
            BitAnd => "&",
            Eq => "==",
            Ne => "!=",
            Lt => "<",
            Le => "<=",
            Gt => ">",
            Ge => ">=",
            Shl => "<<",
            Shr => ">>",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Rem => "%",
        }
    }

    /// Approximate type of `lhs op rhs`, used to type the left operand of the
    /// next operator in a chain such as `a + b * ^`.
    pub fn result_type(
        self,
        lhs: &TypeDescriptor,
        rhs: &TypeDescriptor,
        model: DataModel,
    ) -> TypeDescriptor {
        match self.class() {
            OperatorClass::Comma => rhs.clone(),
            _ if self.is_assignment() => lhs.clone(),
            OperatorClass::Comparison | OperatorClass::Logical => TypeDescriptor::Boolean,
            OperatorClass::Shift => promote(lhs),
            OperatorClass::Additive => match (lhs, rhs) {
                (TypeDescriptor::Pointer(_), _) => lhs.clone(),
                (_, TypeDescriptor::Pointer(_)) => rhs.clone(),
                _ => usual_arithmetic(lhs, rhs),
            },
            OperatorClass::Subtractive => match (lhs, rhs) {
                (TypeDescriptor::Pointer(_), TypeDescriptor::Pointer(_)) => {
                    model.pointer_difference()
                }
                (TypeDescriptor::Pointer(_), _) => lhs.clone(),
                _ => usual_arithmetic(lhs, rhs),
            },
            OperatorClass::Multiplicative | OperatorClass::Bitwise => usual_arithmetic(lhs, rhs),
            OperatorClass::Assignment => lhs.clone(),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Integral promotion: anything narrower than `int` becomes `int`.
fn promote(ty: &TypeDescriptor) -> TypeDescriptor {
    match ty {
        TypeDescriptor::Integral { width, .. } if *width < IntWidth::Int => TypeDescriptor::INT,
        TypeDescriptor::Boolean | TypeDescriptor::Enum { scoped: false, .. } => TypeDescriptor::INT,
        other => other.clone(),
    }
}

/// A simplified version of the usual arithmetic conversions.
fn usual_arithmetic(lhs: &TypeDescriptor, rhs: &TypeDescriptor) -> TypeDescriptor {
    use TypeDescriptor::*;
    match (lhs, rhs) {
        (FloatingPoint(a), FloatingPoint(b)) => FloatingPoint((*a).max(*b)),
        (FloatingPoint(_), _) => lhs.clone(),
        (_, FloatingPoint(_)) if lhs.is_arithmetic() => rhs.clone(),
        (Integral { width: a, signed: sa }, Integral { width: b, signed: sb }) => {
            let widest = if a >= b {
                Integral { width: *a, signed: *sa }
            } else {
                Integral { width: *b, signed: *sb }
            };
            promote(&widest)
        }
        (Record { .. }, _) => lhs.clone(),
        (Unknown, _) => rhs.clone(),
        _ => promote(lhs),
    }
}

/// Which operand of the binary operator the cursor occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CursorSide {
    Left,
    Right,
}

/// The binary construct recovered around the cursor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExpressionShape {
    pub op: BinaryOp,
    /// Type of the operand that is already written.
    pub known_operand: TypeDescriptor,
    pub cursor_side: CursorSide,
}

impl ExpressionShape {
    pub fn new(op: BinaryOp, known_operand: TypeDescriptor, cursor_side: CursorSide) -> Self {
        Self {
            op,
            known_operand,
            cursor_side,
        }
    }

    /// `known <op> ^`
    pub fn right_of(op: BinaryOp, known_operand: TypeDescriptor) -> Self {
        Self::new(op, known_operand, CursorSide::Right)
    }
}

impl fmt::Display for ExpressionShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cursor_side {
            CursorSide::Right => write!(f, "({}) {} ^", self.known_operand, self.op),
            CursorSide::Left => write!(f, "^ {} ({})", self.op, self.known_operand),
        }
    }
}
