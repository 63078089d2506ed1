use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
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

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Listing {
    address: String,
    city: &'static str,
    beds: i64,
    baths: f64,
    price: f64,
    sqft: f64,
    year_built: i64,
    lot_size: f64,
    days_on_market: i64,
    latitude: f64,
    longitude: f64,
}

const CITIES: [(&str, f64, f64, f64); 3] = [
    // name, base price per sqft, latitude, longitude
    ("Riverton", 240.0, 47.61, -122.33),
    ("Lakewood", 185.0, 47.17, -122.52),
    ("Ashford", 310.0, 47.68, -122.12),
];

const STREETS: [&str; 5] = ["Elm St", "Oak Ave", "Cedar Ln", "Maple Dr", "Pine Ct"];

fn generate(n: usize, rng: &mut SimpleRng) -> Vec<Listing> {
    (0..n)
        .map(|i| {
            let (city, base, lat, lon) = CITIES[i % CITIES.len()];
            let sqft = rng.range(700.0, 4200.0).round();
            // larger homes sell for less per square foot
            let mut ppsf = base - 0.012 * (sqft - 2000.0) + rng.gauss(0.0, 18.0);
            if rng.next_f64() < 0.06 {
                ppsf *= 0.65;
            }
            let beds = ((sqft / 650.0).round() as i64).clamp(1, 6);
            Listing {
                address: format!("{} {}", 100 + i * 7, STREETS[i % STREETS.len()]),
                city,
                beds,
                baths: ((beds as f64 * 0.75) * 2.0).round() / 2.0,
                price: (ppsf.max(40.0) * sqft / 1000.0).round() * 1000.0,
                sqft,
                year_built: rng.range(1920.0, 2024.0) as i64,
                lot_size: (rng.range(0.08, 1.2) * 100.0).round() / 100.0,
                days_on_market: rng.range(0.0, 120.0) as i64,
                latitude: lat + rng.gauss(0.0, 0.02),
                longitude: lon + rng.gauss(0.0, 0.02),
            }
        })
        .collect()
}

fn write_parquet(path: &str, listings: &[Listing]) {
    let strings = |f: fn(&Listing) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(listings.iter().map(f).collect::<Vec<_>>()))
    };
    let floats = |f: fn(&Listing) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(listings.iter().map(f).collect::<Vec<_>>()))
    };
    let ints = |f: fn(&Listing) -> i64| -> ArrayRef {
        Arc::new(Int64Array::from(listings.iter().map(f).collect::<Vec<_>>()))
    };

    let columns: Vec<(&str, DataType, ArrayRef)> = vec![
        ("ADDRESS", DataType::Utf8, strings(|l| l.address.as_str())),
        ("CITY", DataType::Utf8, strings(|l| l.city)),
        ("SOURCE", DataType::Utf8, strings(|_| "MLS")),
        ("BEDS", DataType::Int64, ints(|l| l.beds)),
        ("BATHS", DataType::Float64, floats(|l| l.baths)),
        ("PRICE", DataType::Float64, floats(|l| l.price)),
        ("SQUARE FEET", DataType::Float64, floats(|l| l.sqft)),
        ("YEAR BUILT", DataType::Int64, ints(|l| l.year_built)),
        ("LOT SIZE", DataType::Float64, floats(|l| l.lot_size)),
        ("DAYS ON MARKET", DataType::Int64, ints(|l| l.days_on_market)),
        ("LATITUDE", DataType::Float64, floats(|l| l.latitude)),
        ("LONGITUDE", DataType::Float64, floats(|l| l.longitude)),
    ];

    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|(name, dtype, _)| Field::new(*name, dtype.clone(), false))
            .collect::<Vec<_>>(),
    ));
    let arrays = columns.into_iter().map(|(_, _, a)| a).collect();
    let batch = RecordBatch::try_new(schema.clone(), arrays).expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn write_csv(path: &str, listings: &[Listing]) {
    let mut writer = csv::Writer::from_path(path).expect("Failed to create output file");
    writer
        .write_record([
            "ADDRESS", "CITY", "SOURCE", "BEDS", "BATHS", "PRICE", "SQUARE FEET", "YEAR BUILT",
            "LOT SIZE", "DAYS ON MARKET", "LATITUDE", "LONGITUDE",
        ])
        .expect("Failed to write header");
    for l in listings {
        writer
            .write_record([
                l.address.clone(),
                l.city.to_string(),
                "MLS".to_string(),
                l.beds.to_string(),
                l.baths.to_string(),
                l.price.to_string(),
                l.sqft.to_string(),
                l.year_built.to_string(),
                l.lot_size.to_string(),
                l.days_on_market.to_string(),
                format!("{:.5}", l.latitude),
                format!("{:.5}", l.longitude),
            ])
            .expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush output");
}

fn main() {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_listings.parquet".to_string());

    let mut rng = SimpleRng::new(42);
    let listings = generate(250, &mut rng);

    if output_path.ends_with(".csv") {
        write_csv(&output_path, &listings);
    } else {
        write_parquet(&output_path, &listings);
    }

    println!("Wrote {} listings to {output_path}", listings.len());
}
