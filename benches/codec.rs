use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use schema_json::{from_str_with_options, schema, to_string, to_string_pretty, JsonOptions, Strategy};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
struct Product {
    sku: String,
    name: String,
    price: f64,
    quantity: u32,
    in_stock: bool,
}

schema!(Product {
    sku: String,
    name: String,
    price: f64,
    quantity: u32,
    "inStock": bool,
});

#[derive(Serialize, Deserialize, Clone, Default)]
struct Order {
    id: u64,
    customer: Customer,
    lines: Vec<Product>,
    notes: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Default)]
struct Customer {
    name: String,
    email: String,
}

schema!(Order {
    id: u64,
    customer: Customer,
    lines: Vec<Product>,
    notes: Option<String>,
});

schema!(Customer {
    name: String,
    email: String => "mail",
});

fn products(size: u32) -> Vec<Product> {
    (0..size)
        .map(|i| Product {
            sku: format!("SKU{}", i),
            name: format!("Product {}", i),
            price: 9.99 + f64::from(i),
            quantity: i,
            in_stock: i % 3 != 0,
        })
        .collect()
}

fn order() -> Order {
    Order {
        id: 42,
        customer: Customer {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
        },
        lines: products(5),
        notes: Some("leave at the door".to_string()),
    }
}

fn benchmark_serialize_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize_array");

    for size in [10, 100, 1000].iter() {
        let products = products(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| to_string(black_box(&products)))
        });
    }
    group.finish();
}

fn benchmark_deserialize_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("deserialize_array");

    for size in [10, 100, 1000].iter() {
        let json = to_string(&products(*size)).unwrap();
        for strategy in [Strategy::Dom, Strategy::Sax] {
            let options = JsonOptions::new().with_strategy(strategy);
            group.bench_with_input(BenchmarkId::new(strategy.as_str(), size), &json, |b, json| {
                b.iter(|| from_str_with_options::<Vec<Product>>(black_box(json), options.clone()))
            });
        }
    }
    group.finish();
}

fn benchmark_nested(c: &mut Criterion) {
    let order = order();
    c.bench_function("serialize_nested_pretty", |b| {
        b.iter(|| to_string_pretty(black_box(&order)))
    });

    let json = to_string(&order).unwrap();
    let mut group = c.benchmark_group("deserialize_nested");
    for strategy in [Strategy::Dom, Strategy::Sax] {
        let options = JsonOptions::new().with_strategy(strategy);
        group.bench_function(strategy.as_str(), |b| {
            b.iter(|| from_str_with_options::<Order>(black_box(&json), options.clone()))
        });
    }
    group.finish();
}

fn benchmark_matrix(c: &mut Criterion) {
    let grid: Vec<Vec<f64>> = (0..100)
        .map(|row| (0..100).map(|col| f64::from(row * col) / 7.0).collect())
        .collect();
    let json = to_string(&grid).unwrap();

    let mut group = c.benchmark_group("deserialize_matrix");
    for strategy in [Strategy::Dom, Strategy::Sax] {
        let options = JsonOptions::new().with_strategy(strategy);
        group.bench_function(strategy.as_str(), |b| {
            b.iter(|| from_str_with_options::<Vec<Vec<f64>>>(black_box(&json), options.clone()))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_serialize_array,
    benchmark_deserialize_array,
    benchmark_nested,
    benchmark_matrix
);
criterion_main!(benches);
