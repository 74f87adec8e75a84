use hyvec::prelude::*;

fn main() {
    let counts = vec![3, NA_INTEGER, 12, 7];
    let weights = vec![0.5, 1.25, NA_REAL, 2.0];

    let expr = (leaf(&counts) * 2 + leaf(&weights)).pmax(1.0).sqrt();
    println!("{}: {} [{:?}]", expr.pretty(), expr.element_type(), expr.length());

    for (i, x) in expr.materialize().unwrap().into_iter().enumerate() {
        if is_na(x) {
            println!("  [{i}] NA");
        } else {
            println!("  [{i}] {x:.4}");
        }
    }
    println!("any missing: {}", expr.any_na());

    let dynamic = DynExpr::leaf(&counts[..]).coerce(ElementType::Real) / 3;
    println!("{dynamic} = {:?}", dynamic.materialize().unwrap());
}
