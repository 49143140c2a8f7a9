use super::*;
use crate::il::{expr_lit, expr_var};
use crate::interval::{Bound, Interval};
use crate::merge::{MergeOperator, WideningHint};
use crate::numeric::NumericValue;
use crate::stop::StopOperator;

fn int(value: i64) -> NumericValue {
    NumericValue::from(value)
}

fn range(lower: i64, upper: i64) -> Interval {
    Interval::new(Bound::Finite(int(lower)), Bound::Finite(int(upper)))
}

fn fresh() -> AbstractState<BoundsStore> {
    AbstractState::new()
}

#[test_log::test]
fn assigned_literals_pin_bounds() {
    // declare x; x = 3
    let state = run(
        fresh(),
        &[declare("x", "main"), assign("x", "main", expr_lit(3))],
    );
    assert_eq!(state.bounds_of(&var("x", "main")), Some(range(3, 3)));
}

#[test_log::test]
fn strict_guards_bias_integer_bounds_by_one() {
    // declare x; assume x > 0; assume x < 10
    let state = run(
        fresh(),
        &[
            declare("x", "main"),
            assume(Expression::gt(expr_var("x", "main"), expr_lit(0)), true),
            assume(Expression::lt(expr_var("x", "main"), expr_lit(10)), true),
        ],
    );
    assert_eq!(state.bounds_of(&var("x", "main")), Some(range(1, 9)));
}

#[test_log::test]
fn formals_carry_actual_values_and_vanish_on_return() {
    // a = 3; f(a) with formal p; return p; back at the call site
    let state = run(
        fresh(),
        &[
            declare("a", "main"),
            declare("r", "main"),
            assign("a", "main", expr_lit(3)),
            call("f", &["p"], vec![expr_var("a", "main")]),
        ],
    );
    assert_eq!(state.bounds_of(&var("p", "f")), Some(range(3, 3)));

    let before = run(
        fresh(),
        &[declare("a", "main"), declare("r", "main"), assign("a", "main", expr_lit(3))],
    );
    let state = run(
        state,
        &[
            return_edge("f", Some(expr_var("p", "f"))),
            return_to_call_site(Some(("r", "main")), "f"),
        ],
    );
    assert!(!state.contains(&var("p", "f")));
    assert!(!state.contains(&crate::il::Variable::function_return("f")));
    assert_eq!(state.bounds_of(&var("r", "main")), Some(range(3, 3)));
    // the namespace is exactly as before the call
    assert_eq!(state.namespace(), before.namespace());
}

#[test_log::test]
fn products_of_two_variables_are_forgotten() {
    // a = b * c with neither side constant behaves exactly like forget(a)
    let prelude = [
        declare("a", "main"),
        declare("b", "main"),
        declare("c", "main"),
        assign("a", "main", expr_lit(1)),
        assume(Expression::gt(expr_var("b", "main"), expr_lit(0)), true),
        assume(Expression::lt(expr_var("c", "main"), expr_lit(5)), true),
    ];
    let predecessor = run(fresh(), &prelude);
    let assigned = run(
        predecessor.clone(),
        &[assign(
            "a",
            "main",
            Expression::mul(expr_var("b", "main"), expr_var("c", "main")),
        )],
    );

    let mut forgotten = predecessor.clone();
    let index = forgotten.index_of(&var("a", "main")).unwrap();
    forgotten.forget(index);
    assert_eq!(assigned, forgotten);
    assert_eq!(
        assigned.bounds_of(&var("a", "main")),
        Some(Interval::unbounded())
    );
    assert_eq!(
        assigned.bounds_of(&var("b", "main")),
        predecessor.bounds_of(&var("b", "main"))
    );
}

#[test_log::test]
fn disequality_excludes_the_pinned_value() {
    let pinned = run(
        fresh(),
        &[declare("x", "main"), assign("x", "main", expr_lit(5))],
    );
    // x != 5 can no longer hold
    let excluded = run(
        pinned.clone(),
        &[assume(
            Expression::ne(expr_var("x", "main"), expr_lit(5)),
            true,
        )],
    );
    assert!(excluded.is_empty());
    // the false branch of x != 5 is x == 5
    let kept = run(
        pinned.clone(),
        &[assume(
            Expression::ne(expr_var("x", "main"), expr_lit(5)),
            false,
        )],
    );
    let equal = run(
        pinned,
        &[assume(
            Expression::eq(expr_var("x", "main"), expr_lit(5)),
            true,
        )],
    );
    assert_eq!(kept, equal);
    assert_eq!(kept.bounds_of(&var("x", "main")), Some(range(5, 5)));
}

#[test_log::test]
fn disequality_splits_wide_states_soundly() {
    let state = run(
        fresh(),
        &[
            declare("x", "main"),
            assume(Expression::ge(expr_var("x", "main"), expr_lit(0)), true),
            assume(Expression::le(expr_var("x", "main"), expr_lit(10)), true),
            assume(Expression::ne(expr_var("x", "main"), expr_lit(0)), true),
        ],
    );
    // the strictly-less branch is infeasible, so the union keeps the
    // strictly-positive part
    assert_eq!(state.bounds_of(&var("x", "main")), Some(range(1, 10)));
}

#[test_log::test]
fn forgetting_never_empties_a_feasible_state() {
    let state = run(
        fresh(),
        &[
            declare("x", "main"),
            declare("y", "main"),
            assign("x", "main", expr_lit(2)),
            assign("y", "main", expr_lit(7)),
        ],
    );
    let mut forgotten = state.clone();
    forgotten.forget(0);
    assert!(!forgotten.is_empty());
    assert_eq!(forgotten.bounds_of(&var("y", "main")), Some(range(7, 7)));
}

#[test_log::test]
fn dimension_invariant_holds_across_edges() {
    let transfer = TransferRelation::new();
    let mut state = fresh();
    let edges = [
        declare("x", "main"),
        declare("y", "main"),
        call("f", &["p", "q"], vec![expr_lit(1), expr_var("x", "main")]),
        return_edge("f", Some(expr_var("p", "f"))),
        return_to_call_site(Some(("y", "main")), "f"),
    ];
    for edge in &edges {
        state = transfer.successor(&state, edge).unwrap();
        assert_eq!(state.namespace().size() * 2, state.dimension());
    }
}

#[test_log::test]
fn separate_merge_keeps_and_separate_stop_prunes() {
    let analysis = crate::analysis::OctagonAnalysis::new(
        MergeOperator::Separate,
        StopOperator::Separate,
    );
    let narrow = run(
        fresh(),
        &[
            declare("x", "main"),
            assume(Expression::ge(expr_var("x", "main"), expr_lit(2)), true),
            assume(Expression::le(expr_var("x", "main"), expr_lit(3)), true),
        ],
    );
    let wide = run(
        fresh(),
        &[
            declare("x", "main"),
            assume(Expression::ge(expr_var("x", "main"), expr_lit(0)), true),
            assume(Expression::le(expr_var("x", "main"), expr_lit(9)), true),
        ],
    );
    // merge(S, S) == S under inclusion-based equality
    assert_eq!(
        analysis.merge(&narrow, &narrow, WideningHint::Precise),
        narrow
    );
    // a narrow candidate is covered by a wide reached state
    assert!(analysis.stop(&narrow, std::slice::from_ref(&wide)));
    assert!(!analysis.stop(&wide, std::slice::from_ref(&narrow)));
}
