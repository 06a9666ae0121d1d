use criterion::{black_box, criterion_group, criterion_main, Criterion};
use feature_engine::{CategoricalField, EngineeredFeatures, FeatureSchema, RawInput, VectorBuilder};

fn request() -> RawInput {
    RawInput {
        car_body_type: "Sedan".to_string(),
        fuel_type: "Petrol".to_string(),
        market_segment: "Economy".to_string(),
        driveline_style: "FWD".to_string(),
        transmission_type: "Manual".to_string(),
        torque: 100.0,
        hp: 90.0,
        no_of_gears: 5.0,
        displacement: 1200.0,
        cylinders: 4.0,
        car_age: 2.0,
        length: 150.0,
        width: 60.0,
        height: 55.0,
    }
}

/// A schema shaped like a typical one-hot training export
fn wide_schema() -> FeatureSchema {
    let mut columns: Vec<String> = [
        "displacement",
        "cylinders",
        "hp",
        "torque",
        "no_of_gears",
        "Car_Age",
        "car_volume",
        "Power_Index",
    ]
    .map(str::to_string)
    .to_vec();

    for field in CategoricalField::ALL {
        for i in 0..12 {
            columns.push(field.one_hot_column(&format!("value{i}")));
        }
        columns.push(field.one_hot_column("Sedan"));
    }

    FeatureSchema::new(columns).expect("bench schema")
}

fn bench_build(c: &mut Criterion) {
    let input = request();
    let schema = wide_schema();
    let builder = VectorBuilder::new();

    c.bench_function("engineer_and_build", |b| {
        b.iter(|| {
            let engineered = EngineeredFeatures::from_input(black_box(&input));
            let vector = builder.build(black_box(&input), &engineered, &schema);
            black_box(vector.values().len())
        })
    });
}

criterion_group!(benches, bench_build);
criterion_main!(benches);
