#[macro_use]
extern crate criterion;

use chrono::Local;
use criterion::Criterion;

use sentinel_core::events::{PacketEvent, Protocol};
use sentinel_core::store::AggregationStore;

fn bench_store_ingest(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_ingest");

    for capacity in [60, 600, 3600] {
        group.throughput(criterion::Throughput::Elements(1));
        group.bench_function(format!("window_{}", capacity), |b| {
            let store = AggregationStore::new(capacity);
            store.begin_session().unwrap();
            let event = PacketEvent::new(
                Local::now(),
                Protocol::Tcp,
                "192.168.1.10",
                "172.217.16.1 (Google)",
                512,
            );
            let mut n = 0u64;
            b.iter(|| {
                store.ingest(event.clone()).unwrap();
                n += 1;
                if n % 1000 == 0 {
                    store.rotate_window().unwrap();
                    store.snapshot().unwrap();
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_store_ingest);
criterion_main!(benches);
