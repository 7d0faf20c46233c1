use criterion::{criterion_group, criterion_main, Criterion};
use dirmin::algo::Powell;
use dirmin::testing::*;
use dirmin::{EvalBudget, Problem};

const BUDGET_CAP: usize = 2000;

fn sphere(c: &mut Criterion) {
    let f = Sphere::new(5);
    let dom = f.domain();
    let x0 = f.initials()[0].clone_owned();

    c.bench_function("powell sphere 5", |b| {
        b.iter(|| {
            let mut x = x0.clone_owned();
            let mut budget = EvalBudget::capped(BUDGET_CAP);
            let mut powell = Powell::new(&f, &dom);
            powell.minimize(&f, &dom, &mut x, &mut budget)
        })
    });
}

fn rosenbrock(c: &mut Criterion) {
    let f = ExtendedRosenbrock::new(2);
    let dom = f.domain();
    let x0 = f.initials()[0].clone_owned();

    c.bench_function("powell rosenbrock 2", |b| {
        b.iter(|| {
            let mut x = x0.clone_owned();
            let mut budget = EvalBudget::capped(BUDGET_CAP);
            let mut powell = Powell::new(&f, &dom);
            powell.minimize(&f, &dom, &mut x, &mut budget)
        })
    });
}

criterion_group!(benches, sphere, rosenbrock);
criterion_main!(benches);
