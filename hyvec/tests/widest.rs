use hyvec::prelude::*;
use hyvec::widest::{Widest, WidestWith, widest_of};
use strum::IntoEnumIterator;

#[test]
fn table_is_reflexive_and_symmetric() {
    for a in ElementType::iter() {
        assert_eq!(a.widest(a), a);
        for b in ElementType::iter() {
            assert_eq!(a.widest(b), b.widest(a), "{a} vs {b}");
        }
    }
}

#[test]
fn table_never_narrows() {
    for a in ElementType::iter() {
        for b in ElementType::iter() {
            let c = a.widest(b);
            assert!(c.rank() >= a.rank() && c.rank() >= b.rank(), "{a} + {b} -> {c}");
        }
    }
}

#[test]
fn table_is_associative() {
    for a in ElementType::iter() {
        for b in ElementType::iter() {
            for c in ElementType::iter() {
                assert_eq!(a.widest(b).widest(c), a.widest(b.widest(c)));
            }
        }
    }
}

#[test]
fn compile_time_table_matches_runtime_table() {
    fn check<A: WidestWith<B>, B: Element>() {
        assert_eq!(widest_of::<A, B>(), A::TYPE.widest(B::TYPE));
        assert_eq!(<Widest<A, B> as Element>::TYPE, widest_of::<A, B>());
    }

    check::<i32, i32>();
    check::<i32, f64>();
    check::<f64, i32>();
    check::<f64, f64>();
}

#[test]
fn nodes_resolve_their_type_at_construction() {
    let ints = vec![1, 2, 3];
    let reals = vec![0.5, 1.0, 1.5];

    assert_eq!((leaf(&ints) + leaf(&ints)).element_type(), ElementType::Integer);
    assert_eq!((leaf(&ints) + leaf(&reals)).element_type(), ElementType::Real);
    assert_eq!((leaf(&reals) - leaf(&ints)).element_type(), ElementType::Real);
    assert_eq!((leaf(&ints) / 2).element_type(), ElementType::Integer);
    assert_eq!((leaf(&ints) / 2.0).element_type(), ElementType::Real);
    assert_eq!((2.0 * leaf(&ints)).element_type(), ElementType::Real);

    // Deep trees compose the table from the leaves upwards
    let deep = ((leaf(&ints) * 3) - leaf(&ints)) + (leaf(&ints) * leaf(&reals));
    assert_eq!(deep.lhs.element_type(), ElementType::Integer);
    assert_eq!(deep.rhs.element_type(), ElementType::Real);
    assert_eq!(deep.element_type(), ElementType::Real);
}

#[test]
fn narrower_operand_is_widened_before_the_operator_runs() {
    let ints = vec![3, 7, -7];
    let reals = vec![2.0, 2.0, 2.0];
    assert_eq!((leaf(&ints) / leaf(&reals)).materialize().unwrap(), vec![1.5, 3.5, -3.5]);
    assert_eq!((leaf(&ints) / 2).materialize().unwrap(), vec![1, 3, -3]);
}

#[test]
fn explicit_coercion_overrides_inference() {
    let ints = vec![3, 7, NA_INTEGER];
    let e = leaf(&ints).coerce::<f64>() / 2;
    assert_eq!(e.element_type(), ElementType::Real);
    let out = e.materialize().unwrap();
    assert_eq!(&out[..2], &[1.5, 3.5]);
    assert!(is_na(out[2]));

    let reals = vec![2.9, -2.9, f64::NAN, 1e12];
    let e = leaf(&reals).coerce::<i32>();
    assert_eq!(e.element_type(), ElementType::Integer);
    assert_eq!(e.materialize().unwrap(), vec![2, -2, NA_INTEGER, NA_INTEGER]);
}
