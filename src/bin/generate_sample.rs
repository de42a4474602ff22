use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Row {
    price: Option<i64>,
    model_year: Option<i64>,
    make: &'static str,
    model: &'static str,
    kind: Option<&'static str>,
    odometer: Option<f64>,
    /// Occasionally written to the CSV instead of a number, so the lenient
    /// coercion path has something to chew on.
    odometer_note: Option<&'static str>,
}

const CATALOG: [(&str, &str, &str, f64); 8] = [
    ("ford", "f-150", "truck", 34000.0),
    ("chevrolet", "silverado 1500", "truck", 32000.0),
    ("toyota", "camry", "sedan", 24000.0),
    ("honda", "civic", "sedan", 21000.0),
    ("bmw", "x5", "suv", 52000.0),
    ("jeep", "wrangler", "suv", 30000.0),
    ("subaru", "outback", "wagon", 27000.0),
    ("chrysler", "pacifica", "mini-van", 29000.0),
];

const N_ROWS: usize = 500;
const CURRENT_YEAR: i64 = 2024;

fn generate_rows(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::with_capacity(N_ROWS);

    for _ in 0..N_ROWS {
        let (make, model, kind, new_price) = CATALOG[(rng.next_f64() * CATALOG.len() as f64)
            .floor() as usize % CATALOG.len()];

        let model_year = 1998 + (rng.next_f64() * 25.0).floor() as i64;
        let age = (CURRENT_YEAR - model_year) as f64;

        let odometer = rng.gauss(11_500.0 * age, 18_000.0).max(0.0).round();
        let price = (new_price * 0.85f64.powf(age) + rng.gauss(0.0, 900.0))
            .max(500.0)
            .round() as i64;

        let mut row = Row {
            price: Some(price),
            model_year: Some(model_year),
            make,
            model,
            kind: Some(kind),
            odometer: Some(odometer),
            odometer_note: None,
        };

        // Sprinkle in the dirt real listings have.
        if rng.next_f64() < 0.05 {
            row.odometer = None;
        } else if rng.next_f64() < 0.02 {
            row.odometer = None;
            row.odometer_note = Some("not recorded");
        }
        if rng.next_f64() < 0.03 {
            row.price = None;
        }
        if rng.next_f64() < 0.08 {
            row.kind = None;
        }
        if rng.next_f64() < 0.04 {
            row.model_year = None;
        }

        rows.push(row);
    }

    rows
}

fn write_csv(rows: &[Row], path: &str) {
    let mut writer = csv::Writer::from_path(path).expect("Failed to create CSV file");
    writer
        .write_record(["price", "model_year", "make", "model", "type", "odometer"])
        .expect("Failed to write CSV header");

    for row in rows {
        let odometer = match (row.odometer, row.odometer_note) {
            (_, Some(note)) => note.to_string(),
            (Some(v), None) => format!("{v}"),
            (None, None) => String::new(),
        };
        writer
            .write_record([
                row.price.map(|p| p.to_string()).unwrap_or_default(),
                row.model_year.map(|y| y.to_string()).unwrap_or_default(),
                row.make.to_string(),
                row.model.to_string(),
                row.kind.unwrap_or_default().to_string(),
                odometer,
            ])
            .expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV");
}

fn write_parquet(rows: &[Row], path: &str) {
    let price_array = Int64Array::from(rows.iter().map(|r| r.price).collect::<Vec<_>>());
    let year_array = Int64Array::from(rows.iter().map(|r| r.model_year).collect::<Vec<_>>());
    let make_array = StringArray::from(rows.iter().map(|r| Some(r.make)).collect::<Vec<_>>());
    let model_array = StringArray::from(rows.iter().map(|r| Some(r.model)).collect::<Vec<_>>());
    let kind_array = StringArray::from(rows.iter().map(|r| r.kind).collect::<Vec<_>>());
    // The CSV's malformed odometer notes have no typed equivalent: nulls here.
    let odometer_array = Float64Array::from(rows.iter().map(|r| r.odometer).collect::<Vec<_>>());

    let schema = Arc::new(Schema::new(vec![
        Field::new("price", DataType::Int64, true),
        Field::new("model_year", DataType::Int64, true),
        Field::new("make", DataType::Utf8, false),
        Field::new("model", DataType::Utf8, false),
        Field::new("type", DataType::Utf8, true),
        Field::new("odometer", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(price_array),
            Arc::new(year_array),
            Arc::new(make_array),
            Arc::new(model_array),
            Arc::new(kind_array),
            Arc::new(odometer_array),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    write_csv(&rows, "vehicles_sample.csv");
    write_parquet(&rows, "vehicles_sample.parquet");

    println!(
        "Wrote {} listings to vehicles_sample.csv and vehicles_sample.parquet",
        rows.len()
    );
}
