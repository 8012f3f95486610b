//! Benchmarks for schema reconciliation and introspection.

use criterion::{criterion_group, criterion_main, Criterion};
use object_db_core::{Group, WriteTransaction};
use object_db_schema::{
    schema_from_group, update_store_with_schema, ObjectSchema, Property, PropertyType,
};

fn build_target(types: usize) -> Vec<ObjectSchema> {
    (0..types)
        .map(|i| {
            ObjectSchema::new(
                format!("Type{i}"),
                vec![
                    Property::new("name", PropertyType::String).indexed(),
                    Property::new("value", PropertyType::Int),
                    Property::new("created_at", PropertyType::Date),
                ],
            )
            .with_primary_key("name")
        })
        .collect()
}

fn bench_initialize(c: &mut Criterion) {
    c.bench_function("initialize_50_types", |b| {
        b.iter(|| {
            let mut group = Group::new();
            let mut schema = build_target(50);
            let mut txn = group.begin_write();
            update_store_with_schema(&mut txn, 1, &mut schema, None::<fn(&mut WriteTransaction)>)
                .unwrap();
            txn.commit();
            group
        })
    });
}

fn bench_noop_revalidation(c: &mut Criterion) {
    let mut group = Group::new();
    let mut schema = build_target(50);
    let mut txn = group.begin_write();
    update_store_with_schema(&mut txn, 1, &mut schema, None::<fn(&mut WriteTransaction)>).unwrap();
    txn.commit();

    c.bench_function("revalidate_50_types", |b| {
        b.iter(|| {
            let mut schema = build_target(50);
            let mut txn = group.begin_write();
            let changed = update_store_with_schema(
                &mut txn,
                1,
                &mut schema,
                None::<fn(&mut WriteTransaction)>,
            )
            .unwrap();
            txn.commit();
            changed
        })
    });
}

fn bench_introspection(c: &mut Criterion) {
    let mut group = Group::new();
    let mut schema = build_target(50);
    let mut txn = group.begin_write();
    update_store_with_schema(&mut txn, 1, &mut schema, None::<fn(&mut WriteTransaction)>).unwrap();
    txn.commit();

    c.bench_function("introspect_50_types", |b| {
        b.iter(|| schema_from_group(&group).unwrap())
    });
}

criterion_group!(
    benches,
    bench_initialize,
    bench_noop_revalidation,
    bench_introspection
);
criterion_main!(benches);
