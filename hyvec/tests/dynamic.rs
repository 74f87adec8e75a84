use hyvec::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn random_ints(rng: &mut impl Rng, len: usize) -> Vec<i32> {
    (0..len)
        .map(|_| {
            if rng.random_bool(0.15) {
                NA_INTEGER
            } else {
                rng.random_range(-50..50)
            }
        })
        .collect()
}

fn random_reals(rng: &mut impl Rng, len: usize) -> Vec<f64> {
    (0..len)
        .map(|_| {
            if rng.random_bool(0.15) {
                NA_REAL
            } else {
                rng.random_range(-5.0..5.0)
            }
        })
        .collect()
}

fn same_bits(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
}

#[test]
fn type_promotion_example() {
    let ints = vec![1, NA_INTEGER, 3];
    let reals = vec![1.5, 2.5, NA_REAL];
    let e = DynExpr::leaf(&ints[..]) + DynExpr::leaf(&reals[..]);

    assert_eq!(e.element_type(), ElementType::Real);
    let out = e.materialize().unwrap();
    assert!(out.is_real());
    assert_eq!(out.get(0), Some(Value::Real(2.5)));
    assert!(out.get(1).is_some_and(Value::is_na));
    assert!(out.get(2).is_some_and(Value::is_na));
}

#[test]
fn static_and_dynamic_trees_agree() {
    let mut rng = ChaCha20Rng::seed_from_u64(0x42);

    for _ in 0..32 {
        let len = rng.random_range(0..48);
        let a = random_ints(&mut rng, len);
        let b = random_reals(&mut rng, len + 2);
        let c = random_ints(&mut rng, len);

        let typed = ((leaf(&a) + leaf(&c)) * leaf(&b) - 1).pmax(leaf(&c)).abs();
        let dynamic = ((DynExpr::leaf(&a[..]) + DynExpr::leaf(&c[..])) * DynExpr::leaf(&b[..]) - 1)
            .pmax(DynExpr::leaf(&c[..]))
            .abs();

        assert_eq!(typed.element_type(), dynamic.element_type());
        assert_eq!(typed.length(), dynamic.length());
        assert_eq!(typed.pretty().to_string(), dynamic.to_string());

        let expected = typed.materialize().unwrap();
        let actual = dynamic.materialize().unwrap().try_as_real().unwrap();
        assert!(same_bits(&expected, &actual));
        assert_eq!(typed.any_na(), dynamic.any_na());
    }
}

#[test]
fn integer_trees_stay_integer() {
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    let a = random_ints(&mut rng, 20);
    let b = random_ints(&mut rng, 20);

    let typed = (leaf(&a) / leaf(&b)).pmin(-leaf(&a));
    let dynamic = (DynExpr::leaf(&a[..]) / DynExpr::leaf(&b[..])).pmin(-DynExpr::leaf(&a[..]));

    assert_eq!(dynamic.element_type(), ElementType::Integer);
    let out = dynamic.materialize().unwrap();
    assert_eq!(out, HostVector::Integer(typed.materialize().unwrap()));
    assert_eq!(out.count_na(), count_na(&typed).unwrap());
}

#[test]
fn owned_leaves_and_scalars() {
    let e = DynExpr::leaf(vec![1.0, 4.0, 9.0]).sqrt() * 2;
    assert_eq!(e.length(), Length::Finite(3));
    assert_eq!(e.materialize().unwrap(), HostVector::Real(vec![2.0, 4.0, 6.0]));

    let e = DynExpr::scalar(3) + DynExpr::na(ElementType::Real);
    assert_eq!(e.length(), Length::Unbounded);
    assert_eq!(e.materialize(), Err(HvError::UnboundedLength));
    assert!(e.any_na());
    let out = e.materialize_len(2).unwrap();
    assert_eq!(out.count_na(), 2);
}

#[test]
fn coercion_overrides_inference() {
    let reals = vec![1.9, -1.9, NA_REAL];
    let e = DynExpr::leaf(&reals[..]).coerce(ElementType::Integer) * 10;
    assert_eq!(e.element_type(), ElementType::Integer);
    assert_eq!(
        e.materialize().unwrap(),
        HostVector::Integer(vec![10, -10, NA_INTEGER])
    );
}

#[test]
fn views_and_materialized_vectors_round_trip_through_host_slices() {
    let out = (DynExpr::leaf(vec![1, 2, 3]) * 2).materialize().unwrap();
    let again = DynExpr::leaf(&out) + 1;
    assert_eq!(again.view().kind(), NodeKind::Binary);
    assert_eq!(again.node_count(), 3);
    assert_eq!(again.to_string(), "(integer[3] + 1L)");
    assert_eq!(again.materialize().unwrap(), HostVector::Integer(vec![3, 5, 7]));

    let mut sink = HostVector::with_capacity(ElementType::Real, 3);
    assert_eq!(
        again.materialize_into(3, &mut sink),
        Err(HvError::TypeMismatch {
            expected: ElementType::Real,
            found: ElementType::Integer
        })
    );
}
