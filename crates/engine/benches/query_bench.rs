use criterion::{Criterion, criterion_group, criterion_main};
use engine::{MutationService, PageCursor, QueryEngine, QueryOptions};
use record_store::{InMemoryRecordStore, Person, RecordStore};

fn seeded_engine(rt: &tokio::runtime::Runtime, rows: usize) -> QueryEngine<InMemoryRecordStore> {
    let store = InMemoryRecordStore::new();
    rt.block_on(async {
        for i in 0..rows {
            store
                .insert(Person::new(format!("person-{i:04}"), (i % 100) as i16))
                .await
                .unwrap();
        }
    });
    QueryEngine::new(store)
}

fn bench_unfiltered_query(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let engine = seeded_engine(&rt, 1_000);

    c.bench_function("engine/query_unfiltered_1k", |b| {
        b.iter(|| {
            rt.block_on(async {
                engine.query(QueryOptions::new()).await.unwrap();
            });
        });
    });
}

fn bench_filtered_query(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let engine = seeded_engine(&rt, 1_000);

    c.bench_function("engine/query_search_and_min_age_1k", |b| {
        b.iter(|| {
            rt.block_on(async {
                engine
                    .query(QueryOptions::new().search_text("person-09").min_age(50))
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_paging_to_exhaustion(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let engine = seeded_engine(&rt, 1_000);

    c.bench_function("engine/page_through_1k_by_50", |b| {
        b.iter(|| {
            rt.block_on(async {
                let mut cursor = PageCursor::new(engine.clone(), QueryOptions::new(), 50);
                while cursor.has_more() {
                    cursor.load_next_page().await.unwrap();
                }
            });
        });
    });
}

fn bench_create(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let engine = QueryEngine::new(InMemoryRecordStore::new());
    let mutations = MutationService::new(engine);

    c.bench_function("engine/create", |b| {
        b.iter(|| {
            rt.block_on(async {
                mutations.create("Benchmark Person", "42").await.unwrap();
            });
        });
    });
}

criterion_group!(
    benches,
    bench_unfiltered_query,
    bench_filtered_query,
    bench_paging_to_exhaustion,
    bench_create
);
criterion_main!(benches);
