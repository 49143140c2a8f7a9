//! Typed, already-type-checked expression trees.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::il::Variable;
use crate::numeric::NumericValue;

/// The declared type a cast converts to.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Type {
    Integer,
    Float,
    Double,
    Bool,
    Pointer,
}

impl Type {
    pub fn is_floating(&self) -> bool {
        matches!(self, Type::Float | Type::Double)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Type::Integer => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::Double => write!(f, "double"),
            Type::Bool => write!(f, "bool"),
            Type::Pointer => write!(f, "ptr"),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl BinaryOp {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge | BinaryOp::Eq | BinaryOp::Ne
        )
    }

    /// The comparison holding exactly when this one does not:
    /// `>` ↔ `≤`, `≥` ↔ `<`, `==` ↔ `!=`.
    pub fn negated(&self) -> BinaryOp {
        match self {
            BinaryOp::Lt => BinaryOp::Ge,
            BinaryOp::Le => BinaryOp::Gt,
            BinaryOp::Gt => BinaryOp::Le,
            BinaryOp::Ge => BinaryOp::Lt,
            BinaryOp::Eq => BinaryOp::Ne,
            BinaryOp::Ne => BinaryOp::Eq,
            _ => unreachable!("negating a non-comparison operator"),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let symbol = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
        };
        write!(f, "{}", symbol)
    }
}

/// An expression over literals and scope-qualified variables.
///
/// The front end type-checks and desugars before handing expressions over:
/// compound assignments and `++`/`--` arrive as plain assignments with the
/// updated variable on both sides.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Expression {
    Literal(NumericValue),
    Variable(Variable),
    Unary(UnaryOp, Box<Expression>),
    Binary(BinaryOp, Box<Expression>, Box<Expression>),
    Cast(Type, Box<Expression>),
}

macro_rules! expression_binop {
    ($op: expr, $name: ident) => {
        pub fn $name(lhs: Expression, rhs: Expression) -> Expression {
            Expression::Binary($op, Box::new(lhs), Box::new(rhs))
        }
    };
}

impl Expression {
    pub fn literal<V: Into<NumericValue>>(value: V) -> Expression {
        Expression::Literal(value.into())
    }

    pub fn variable(variable: Variable) -> Expression {
        Expression::Variable(variable)
    }

    pub fn neg(expression: Expression) -> Expression {
        Expression::Unary(UnaryOp::Neg, Box::new(expression))
    }

    pub fn not(expression: Expression) -> Expression {
        Expression::Unary(UnaryOp::Not, Box::new(expression))
    }

    pub fn cast(target: Type, expression: Expression) -> Expression {
        Expression::Cast(target, Box::new(expression))
    }

    expression_binop!(BinaryOp::Add, add);
    expression_binop!(BinaryOp::Sub, sub);
    expression_binop!(BinaryOp::Mul, mul);
    expression_binop!(BinaryOp::Div, div);
    expression_binop!(BinaryOp::Mod, modulo);
    expression_binop!(BinaryOp::Lt, lt);
    expression_binop!(BinaryOp::Le, le);
    expression_binop!(BinaryOp::Gt, gt);
    expression_binop!(BinaryOp::Ge, ge);
    expression_binop!(BinaryOp::Eq, eq);
    expression_binop!(BinaryOp::Ne, ne);
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expression::Literal(value) => value.fmt(f),
            Expression::Variable(variable) => variable.fmt(f),
            Expression::Unary(UnaryOp::Neg, e) => write!(f, "-({})", e),
            Expression::Unary(UnaryOp::Not, e) => write!(f, "!({})", e),
            Expression::Binary(op, lhs, rhs) => write!(f, "({} {} {})", lhs, op, rhs),
            Expression::Cast(target, e) => write!(f, "({})({})", target, e),
        }
    }
}
