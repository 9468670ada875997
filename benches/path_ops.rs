use criterion::{black_box, criterion_group, criterion_main, Criterion};
use propbag::{Bag, Fallback, Value};

fn deep_bag(depth: usize) -> (Bag, String) {
    let path = (0..depth).map(|i| format!("k{}", i)).collect::<Vec<_>>().join(".");
    let mut bag = Bag::new();
    bag.set(path.as_str(), 42);
    (bag, path)
}

fn criterion_benchmark(c: &mut Criterion) {
    let (bag, path) = deep_bag(16);

    c.bench_function("get_deep_path", |b| {
        b.iter(|| black_box(bag.get(black_box(path.as_str()), Value::Null)))
    });

    c.bench_function("exists_missing_path", |b| {
        b.iter(|| black_box(bag.exists(black_box("k0.k1.nope.k3"))))
    });

    c.bench_function("set_deep_path", |b| {
        let mut target = bag.view();
        b.iter(|| black_box(target.set(black_box(path.as_str()), 7)))
    });

    let defaults = Bag::with_defaults(Fallback::value(""), Fallback::value(0));
    c.bench_function("deferred_attr_chain", |b| {
        b.iter(|| {
            let attr = defaults.attrs(black_box(["a", "b", "c", "d"]));
            black_box(attr.map(|a| a.is_missing()))
        })
    });

    c.bench_function("to_json_compact", |b| {
        b.iter(|| black_box(bag.to_json(false, 2, true)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
