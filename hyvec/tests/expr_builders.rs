use std::borrow::Cow;

use either::Either;
use hyvec::prelude::*;

#[test]
fn type_promotion_example() {
    let ints = vec![1, NA_INTEGER, 3];
    let reals = vec![1.5, 2.5, NA_REAL];

    let e = leaf(&ints) + leaf(&reals);
    assert_eq!(e.element_type(), ElementType::Real);

    let out: Vec<f64> = e.materialize().unwrap();
    assert_eq!(out.len(), 3);
    assert_eq!(out[0], 2.5);
    assert!(is_na(out[1]));
    assert!(is_na(out[2]));
}

#[test]
fn shorter_operand_truncates() {
    let short = vec![1, 2];
    let long = vec![10, 20, 30, 40];

    let e = leaf(&short) * leaf(&long);
    assert_eq!(e.length(), Length::Finite(2));
    assert_eq!(e.materialize().unwrap(), vec![10, 40]);

    let e = leaf(&long) - leaf(&short);
    assert_eq!(e.materialize().unwrap(), vec![9, 18]);

    let empty: Vec<f64> = Vec::new();
    let e = leaf(&long) + leaf(&empty);
    assert_eq!(e.length(), Length::Finite(0));
    assert!(e.materialize().unwrap().is_empty());
}

#[test]
fn scalar_broadcasts_to_vector_length() {
    let v = vec![1.0, 2.0, 3.0];

    let e = leaf(&v) * 10;
    assert_eq!(e.length(), Length::Finite(3));
    assert_eq!(e.materialize().unwrap(), vec![10.0, 20.0, 30.0]);

    let e = 1.0 - leaf(&v);
    assert_eq!(e.materialize().unwrap(), vec![0.0, -1.0, -2.0]);

    let e = leaf(&v).pmax(scalar(2.0));
    assert_eq!(e.materialize().unwrap(), vec![2.0, 2.0, 3.0]);
}

#[test]
fn scalar_only_tree_is_unbounded() {
    let e = scalar(2) + scalar(3);
    assert_eq!(e.length(), Length::Unbounded);
    assert_eq!(e.materialize(), Err(HvError::UnboundedLength));
    assert_eq!(materialize_len(&e, 3).unwrap(), vec![5, 5, 5]);
}

#[test]
fn builder_methods_match_operators() {
    let a = vec![4, -2, 9];
    let b = vec![2, 5, 3];

    assert_eq!(
        leaf(&a).add(leaf(&b)).materialize().unwrap(),
        (leaf(&a) + leaf(&b)).materialize().unwrap()
    );
    assert_eq!(
        leaf(&a).sub(3).materialize().unwrap(),
        (leaf(&a) - 3).materialize().unwrap()
    );
    assert_eq!(
        leaf(&a).neg().materialize().unwrap(),
        (-leaf(&a)).materialize().unwrap()
    );
    assert_eq!(leaf(&a).pmin(leaf(&b)).materialize().unwrap(), vec![2, -2, 3]);
    assert_eq!(pmax(leaf(&a), leaf(&b)).materialize().unwrap(), vec![4, 5, 9]);
}

#[test]
fn nodes_can_be_shared_by_reference() {
    let v = vec![1, 2, 3];
    let base = leaf(&v) * 2;
    let a = &base + 1;
    let b = &base - &base;
    assert_eq!(a.materialize().unwrap(), vec![3, 5, 7]);
    assert_eq!(b.materialize().unwrap(), vec![0, 0, 0]);
    assert_eq!(base.materialize().unwrap(), vec![2, 4, 6]);
}

#[test]
fn sources_can_be_owned_or_borrowed() {
    let owned = leaf(vec![1.0, 2.0]);
    let array = leaf([3.0, 4.0]);
    let slice: &[f64] = &[5.0, 6.0];
    let cow = leaf(Cow::Borrowed(slice));

    let e = (owned + array) * cow;
    assert_eq!(e.materialize().unwrap(), vec![20.0, 36.0]);
}

#[test]
fn real_valued_functions() {
    let v = vec![1, 4, 9];
    let e = leaf(&v).sqrt();
    assert_eq!(e.element_type(), ElementType::Real);
    assert_eq!(e.materialize().unwrap(), vec![1.0, 2.0, 3.0]);

    let z = vec![0.0];
    assert_eq!(leaf(&z).exp().materialize().unwrap(), vec![1.0]);
    assert_eq!(leaf(&z).exp().ln().materialize().unwrap(), vec![0.0]);
}

#[test]
fn either_selects_a_branch_at_run_time() {
    let a = vec![1, 2, 3];
    let b = vec![10, 20, 30];

    let pick = |left: bool| -> Either<_, _> {
        if left {
            Either::Left(leaf(&a) + 1)
        } else {
            Either::Right(leaf(&b) * leaf(&a))
        }
    };

    assert_eq!(pick(true).materialize().unwrap(), vec![2, 3, 4]);
    assert_eq!(pick(false).materialize().unwrap(), vec![10, 40, 90]);
    assert_eq!(pick(true).add(pick(false)).materialize().unwrap(), vec![12, 43, 94]);
    assert_eq!(pick(false).pretty().to_string(), "(integer[3] * integer[3])");
}

#[test]
fn views_expose_structure() {
    let ints = vec![1, 2, 3];
    let reals = vec![1.0, 2.0];
    let e = (leaf(&ints) + 2).pmin(leaf(&reals).sqrt());

    assert_eq!(e.view().kind(), NodeKind::Binary);
    assert_eq!(e.node_count(), 6);
    assert_eq!(e.depth(), 3);

    match e.view() {
        NodeView::Binary { op, lhs, rhs } => {
            assert_eq!(op, BinaryOpKind::Min);
            assert!(lhs.view().is_binary());
            assert!(rhs.view().is_unary());
        }
        other => panic!("expected a binary view, got {:?}", other.kind()),
    }

    assert_eq!(e.pretty().to_string(), "pmin((integer[3] + 2L), sqrt(real[2]))");
    assert_eq!((-leaf(&ints)).pretty().to_string(), "-integer[3]");
    assert_eq!(
        leaf(&reals).coerce::<i32>().pretty().to_string(),
        "as.integer(real[2])"
    );
}

#[test]
fn missing_scalar_prints_as_na() {
    let v = vec![1.0];
    let e = leaf(&v) + na_scalar::<f64>();
    assert_eq!(e.pretty().to_string(), "(real[1] + NA)");
}
