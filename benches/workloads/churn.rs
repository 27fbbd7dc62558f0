use criterion::{black_box, BatchSize, Criterion};
use holdfast::{SharedPtr, TransferPtr};

const HANDOFFS: usize = 1000;

pub fn run(c: &mut Criterion) {
    bench_transfer_chain(c);
    bench_shared_fanout(c);
}

fn bench_transfer_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn_transfer");

    group.bench_function("take_from_1000", |b| {
        b.iter_batched(
            || TransferPtr::new([0u8; 64]),
            |mut p| {
                for _ in 0..HANDOFFS {
                    p = TransferPtr::take_from(&mut p);
                }
                black_box(p);
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_shared_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn_shared");

    group.bench_function("fanout_1000", |b| {
        b.iter(|| {
            let root = SharedPtr::new(vec![0u32; 16]);
            let owners: Vec<_> = (0..HANDOFFS).map(|_| root.clone()).collect();
            black_box(root.use_count());
            drop(owners);
        })
    });

    group.bench_function("reassign_1000", |b| {
        let a = SharedPtr::new(1u32);
        let z = SharedPtr::new(2u32);
        b.iter(|| {
            let mut slot = a.clone();
            for i in 0..HANDOFFS {
                slot.clone_from(if i % 2 == 0 { &z } else { &a });
            }
            black_box(slot);
        })
    });

    group.finish();
}
