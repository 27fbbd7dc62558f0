use criterion::{black_box, Criterion};
use holdfast::{ScopedPtr, SharedPtr, TransferPtr};

pub fn run(c: &mut Criterion) {
    bench_adopt_dispose(c);
    bench_share(c);
}

fn bench_adopt_dispose(c: &mut Criterion) {
    let mut group = c.benchmark_group("micro_adopt_dispose");
    group.warm_up_time(std::time::Duration::from_millis(500));
    group.measurement_time(std::time::Duration::from_secs(1));

    group.bench_function("box_16b", |b| {
        b.iter(|| {
            black_box(Box::new(black_box(10u128)));
        })
    });

    group.bench_function("transfer_16b", |b| {
        b.iter(|| {
            black_box(TransferPtr::new(black_box(10u128)));
        })
    });

    group.bench_function("scoped_16b", |b| {
        b.iter(|| {
            black_box(ScopedPtr::new(black_box(10u128)));
        })
    });

    group.bench_function("shared_16b", |b| {
        b.iter(|| {
            black_box(SharedPtr::new(black_box(10u128)));
        })
    });

    group.finish();
}

fn bench_share(c: &mut Criterion) {
    let mut group = c.benchmark_group("micro_share");

    group.bench_function("rc_clone_drop", |b| {
        let rc = std::rc::Rc::new(10u64);
        b.iter(|| {
            black_box(rc.clone());
        })
    });

    group.bench_function("shared_clone_drop", |b| {
        let p = SharedPtr::new(10u64);
        b.iter(|| {
            black_box(p.clone());
        })
    });

    group.finish();
}
