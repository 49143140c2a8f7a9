//! The transfer relation: edge dispatch and expression decompilation.
//!
//! Every edge handler clones the predecessor first and edits the clone.
//! Assignments decompile their right-hand side into an affine
//! [`CoefficientVector`]; a shape outside the affine fragment is recovered
//! locally by forgetting the assigned variable, which is sound. Guards are
//! different: approximating an un-decompilable guard as a no-op would be
//! unsound, so those propagate a hard [`Error::UnhandledTransfer`] to the
//! driver instead.

use log::{debug, trace};

use crate::coefficients::CoefficientVector;
use crate::il::{BinaryOp, Edge, Expression, UnaryOp, Variable};
use crate::kernel::ConstraintStore;
use crate::numeric::NumericValue;
use crate::state::AbstractState;
use crate::Error;

/// An operand of the affine fragment: a literal (with any leading unary
/// minus folded in) or a tracked-variable reference.
enum Term<'e> {
    Literal(NumericValue),
    Variable(&'e Variable),
}

/// Classify an expression as a literal or variable operand, or neither.
fn classify(expression: &Expression) -> Option<Term> {
    match expression {
        Expression::Literal(value) => Some(Term::Literal(value.clone())),
        Expression::Variable(variable) => Some(Term::Variable(variable)),
        Expression::Unary(UnaryOp::Neg, inner) => match inner.as_ref() {
            Expression::Literal(value) => Some(Term::Literal(value.neg())),
            _ => None,
        },
        _ => None,
    }
}

/// The edge-dispatching transfer relation of the octagon domain.
#[derive(Clone, Copy, Debug, Default)]
pub struct TransferRelation;

impl TransferRelation {
    pub fn new() -> TransferRelation {
        TransferRelation
    }

    /// Compute the successor of `predecessor` across `edge`.
    pub fn successor<S: ConstraintStore>(
        &self,
        predecessor: &AbstractState<S>,
        edge: &Edge,
    ) -> Result<AbstractState<S>, Error> {
        trace!("transfer across \"{}\" from {}", edge, predecessor);
        let mut state = predecessor.clone();
        match edge {
            Edge::Declaration { variable } => {
                if !state.contains(variable) {
                    state.add_variable(variable.clone());
                }
                Ok(state)
            }
            Edge::Assignment { lhs, rhs } => {
                self.apply_assignment(&mut state, lhs, rhs)?;
                Ok(state)
            }
            Edge::Assume { condition, truth } => self.apply_assume(state, condition, *truth),
            Edge::Call {
                callee,
                formals,
                actuals,
            } => {
                if formals.len() != actuals.len() {
                    return Err(Error::UnhandledTransfer(format!(
                        "call to {} passes {} actuals for {} formals",
                        callee,
                        actuals.len(),
                        formals.len()
                    )));
                }
                for name in formals {
                    state.add_variable(Variable::new(name.clone(), callee.clone()));
                }
                state.add_variable(Variable::function_return(callee.clone()));
                for (name, actual) in formals.iter().zip(actuals) {
                    let formal = Variable::new(name.clone(), callee.clone());
                    self.apply_assignment(&mut state, &formal, actual)?;
                }
                Ok(state)
            }
            Edge::Return { callee, result } => {
                if let Some(expression) = result {
                    let target = Variable::function_return(callee.clone());
                    self.apply_assignment(&mut state, &target, expression)?;
                }
                Ok(state)
            }
            Edge::ReturnToCallSite { lhs, callee } => {
                if let Some(lhs) = lhs {
                    let result = Expression::Variable(Variable::function_return(callee.clone()));
                    self.apply_assignment(&mut state, lhs, &result)?;
                }
                let removed = state.remove_all_variables_of_scope(callee);
                trace!("pruned {} variables of scope {}", removed, callee);
                Ok(state)
            }
            Edge::Skip | Edge::Summary { .. } => Ok(state),
        }
    }

    /// Strong-update `lhs` from `rhs`, or forget it when `rhs` has no
    /// affine form.
    fn apply_assignment<S: ConstraintStore>(
        &self,
        state: &mut AbstractState<S>,
        lhs: &Variable,
        rhs: &Expression,
    ) -> Result<(), Error> {
        let index = state
            .index_of(lhs)
            .ok_or_else(|| Error::UntrackedVariable(lhs.to_string()))?;
        match self.decompile(state, rhs) {
            Some(vector) => state.assign(index, &vector),
            None => {
                debug!("no affine form for the value of {}, forgetting it", lhs);
                state.forget(index);
            }
        }
        Ok(())
    }

    /// Decompile an expression into the affine fragment. The handled
    /// shapes are exhaustive; everything else returns `None` and the
    /// caller forgets the assigned variable.
    fn decompile<S: ConstraintStore>(
        &self,
        state: &AbstractState<S>,
        expression: &Expression,
    ) -> Option<CoefficientVector> {
        let size = state.size();
        match expression {
            Expression::Literal(value) => {
                Some(CoefficientVector::constant(size, value.clone()))
            }
            Expression::Variable(variable) => state
                .index_of(variable)
                .map(|index| CoefficientVector::variable(size, index)),
            Expression::Unary(UnaryOp::Neg, inner) => match inner.as_ref() {
                Expression::Literal(value) => {
                    Some(CoefficientVector::constant(size, value.neg()))
                }
                Expression::Variable(variable) => state.index_of(variable).map(|index| {
                    CoefficientVector::scaled_variable(size, index, NumericValue::one().neg())
                }),
                _ => None,
            },
            Expression::Unary(UnaryOp::Not, _) => None,
            Expression::Cast(target, inner) => {
                // A value cast to a floating type is carried over
                // unchanged; any other conversion may truncate or wrap.
                if !target.is_floating() {
                    return None;
                }
                match inner.as_ref() {
                    Expression::Literal(_) | Expression::Variable(_) => {
                        self.decompile(state, inner)
                    }
                    _ => None,
                }
            }
            Expression::Binary(op @ (BinaryOp::Add | BinaryOp::Sub), lhs, rhs) => {
                let left = classify(lhs)?;
                let right = classify(rhs)?;
                if !matches!(left, Term::Variable(_)) && !matches!(right, Term::Variable(_)) {
                    return None;
                }
                let left = self.term_vector(state, &left)?;
                let right = self.term_vector(state, &right)?;
                Some(match op {
                    BinaryOp::Add => left.add(&right),
                    _ => left.sub(&right),
                })
            }
            Expression::Binary(BinaryOp::Mul, lhs, rhs) => {
                match (classify(lhs)?, classify(rhs)?) {
                    (Term::Literal(value), Term::Variable(variable))
                    | (Term::Variable(variable), Term::Literal(value)) => state
                        .index_of(variable)
                        .map(|index| CoefficientVector::scaled_variable(size, index, value)),
                    _ => None,
                }
            }
            Expression::Binary(..) => None,
        }
    }

    /// The coefficient vector of one classified operand; `None` for an
    /// untracked variable.
    fn term_vector<S: ConstraintStore>(
        &self,
        state: &AbstractState<S>,
        term: &Term,
    ) -> Option<CoefficientVector> {
        let size = state.size();
        match term {
            Term::Literal(value) => Some(CoefficientVector::constant(size, value.clone())),
            Term::Variable(variable) => state
                .index_of(variable)
                .map(|index| CoefficientVector::variable(size, index)),
        }
    }

    /// Constrain the state by a branch guard.
    ///
    /// Strict comparisons bias the constant by one: `a < b` becomes
    /// `a - b + 1 ≤ 0`. This assumes integer-typed operands; the bias is
    /// applied regardless of the declared type, so a real-typed guard may
    /// receive a bound that is too tight by less than one unit.
    fn apply_assume<S: ConstraintStore>(
        &self,
        state: AbstractState<S>,
        condition: &Expression,
        truth: bool,
    ) -> Result<AbstractState<S>, Error> {
        match condition {
            Expression::Unary(UnaryOp::Not, inner) => self.apply_assume(state, inner, !truth),
            Expression::Binary(op, lhs, rhs) if op.is_comparison() => {
                let op = if truth { *op } else { op.negated() };
                let unhandled = || {
                    Error::UnhandledTransfer(format!(
                        "guard \"{}\" is outside the comparison fragment",
                        condition
                    ))
                };
                let left = classify(lhs).ok_or_else(unhandled)?;
                let right = classify(rhs).ok_or_else(unhandled)?;
                let left = self.term_vector(&state, &left).ok_or_else(unhandled)?;
                let right = self.term_vector(&state, &right).ok_or_else(unhandled)?;
                let size = state.size();
                let one = CoefficientVector::constant(size, NumericValue::one());
                // difference ≤ 0 encodes lhs ≤ rhs
                let difference = left.sub(&right);
                Ok(match op {
                    BinaryOp::Le => Self::constrained(state, &difference),
                    BinaryOp::Lt => Self::constrained(state, &difference.add(&one)),
                    BinaryOp::Ge => Self::constrained(state, &difference.neg()),
                    BinaryOp::Gt => Self::constrained(state, &difference.neg().add(&one)),
                    BinaryOp::Eq => {
                        let state = Self::constrained(state, &difference);
                        Self::constrained(state, &difference.neg())
                    }
                    BinaryOp::Ne => {
                        // strictly-less or strictly-greater, explored as
                        // two constrained clones and re-collapsed
                        let less = Self::constrained(state.clone(), &difference.add(&one));
                        let greater = Self::constrained(state, &difference.neg().add(&one));
                        less.union(&greater)
                    }
                    _ => unreachable!("guarded by is_comparison"),
                })
            }
            _ => Err(Error::UnhandledTransfer(format!(
                "guard \"{}\" is not a comparison of variables and literals",
                condition
            ))),
        }
    }

    fn constrained<S: ConstraintStore>(
        mut state: AbstractState<S>,
        vector: &CoefficientVector,
    ) -> AbstractState<S> {
        state.add_constraint(vector);
        state
    }
}
