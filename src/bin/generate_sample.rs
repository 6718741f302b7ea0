use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;

/// Write a synthetic accident dataset with the dashboard's columns.
#[derive(Parser, Debug)]
#[command(name = "generate_sample", version)]
struct Args {
    #[arg(long = "rows", default_value_t = 5_000, help = "Number of accidents to generate")]
    rows: usize,

    #[arg(long = "out", default_value = "sample_accidents", help = "Output path without extension")]
    out: PathBuf,

    #[arg(long = "seed", default_value_t = 42)]
    seed: u64,
}

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

    /// Index drawn proportionally to `weights`.
    fn weighted(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().sum();
        let mut target = self.next_f64() * total;
        for (i, w) in weights.iter().enumerate() {
            if target < *w {
                return i;
            }
            target -= w;
        }
        weights.len() - 1
    }
}

const CITIES: [(&str, &str, f64); 12] = [
    ("Miami", "FL", 9.0),
    ("Houston", "TX", 8.0),
    ("Los Angeles", "CA", 10.0),
    ("Charlotte", "NC", 6.0),
    ("Dallas", "TX", 6.0),
    ("Orlando", "FL", 5.0),
    ("Austin", "TX", 4.0),
    ("Raleigh", "NC", 4.0),
    ("Nashville", "TN", 3.0),
    ("Baton Rouge", "LA", 3.0),
    ("Atlanta", "GA", 3.0),
    ("Sacramento", "CA", 3.0),
];

const WEATHER: [(&str, f64); 14] = [
    ("Fair", 30.0),
    ("Clear", 18.0),
    ("Mostly Cloudy", 12.0),
    ("Cloudy", 10.0),
    ("Partly Cloudy", 8.0),
    ("Overcast", 6.0),
    ("Light Rain", 5.0),
    ("Scattered Clouds", 3.0),
    ("Light Snow", 2.0),
    ("Fog", 2.0),
    ("Rain", 2.0),
    ("Haze", 1.0),
    ("Heavy Rain", 0.6),
    ("Thunderstorm", 0.4),
];

const TIME_OF_DAY: [(&str, f64); 4] = [
    ("Morning", 35.0),
    ("Afternoon", 30.0),
    ("Evening", 20.0),
    ("Night", 15.0),
];

const SEVERITY: [(i64, f64); 4] = [(1, 2.0), (2, 80.0), (3, 15.0), (4, 3.0)];

fn weights<T>(table: &[(T, f64)]) -> Vec<f64> {
    table.iter().map(|(_, w)| *w).collect()
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    let city_weights: Vec<f64> = CITIES.iter().map(|c| c.2).collect();
    let weather_weights = weights(&WEATHER);
    let tod_weights = weights(&TIME_OF_DAY);
    let severity_weights = weights(&SEVERITY);

    let mut ids = Vec::with_capacity(args.rows);
    let mut severity = Vec::with_capacity(args.rows);
    let mut city = Vec::with_capacity(args.rows);
    let mut state = Vec::with_capacity(args.rows);
    let mut temperature = Vec::with_capacity(args.rows);
    let mut humidity = Vec::with_capacity(args.rows);
    let mut pressure = Vec::with_capacity(args.rows);
    let mut wind = Vec::with_capacity(args.rows);
    let mut weather = Vec::with_capacity(args.rows);
    let mut time_of_day = Vec::with_capacity(args.rows);
    let mut elapsed = Vec::with_capacity(args.rows);

    for i in 0..args.rows {
        let (c, s, _) = CITIES[rng.weighted(&city_weights)];
        let w = WEATHER[rng.weighted(&weather_weights)].0;
        let tod = TIME_OF_DAY[rng.weighted(&tod_weights)].0;
        let sev = SEVERITY[rng.weighted(&severity_weights)].0;
        let wet = w.contains("Rain") || w.contains("Snow") || w == "Fog";

        ids.push(format!("A-{}", i + 1));
        severity.push(sev);
        city.push(c.to_string());
        state.push(s.to_string());
        temperature.push((rng.gauss(64.0, 18.0) * 10.0).round() / 10.0);
        humidity.push(rng.gauss(if wet { 88.0 } else { 62.0 }, 12.0).clamp(5.0, 100.0).round());
        pressure.push((rng.gauss(29.7, 0.6) * 100.0).round() / 100.0);
        wind.push((rng.gauss(7.5, 4.0).max(0.0) * 10.0).round() / 10.0);
        weather.push(w.to_string());
        time_of_day.push(tod.to_string());
        // Years since the start of the collection period.
        elapsed.push((rng.next_f64() * 10.0).floor() as i64);
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("ID", DataType::Utf8, false),
        Field::new("Severity", DataType::Int64, false),
        Field::new("City", DataType::Utf8, false),
        Field::new("State", DataType::Utf8, false),
        Field::new("Temperature(F)", DataType::Float64, false),
        Field::new("Humidity(%)", DataType::Float64, false),
        Field::new("Pressure(in)", DataType::Float64, false),
        Field::new("Wind_Speed(mph)", DataType::Float64, false),
        Field::new("Weather_Condition", DataType::Utf8, false),
        Field::new("Time_of_Day", DataType::Utf8, false),
        Field::new("Time_Elapsed", DataType::Int64, false),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(ids)),
        Arc::new(Int64Array::from(severity)),
        Arc::new(StringArray::from(city)),
        Arc::new(StringArray::from(state)),
        Arc::new(Float64Array::from(temperature)),
        Arc::new(Float64Array::from(humidity)),
        Arc::new(Float64Array::from(pressure)),
        Arc::new(Float64Array::from(wind)),
        Arc::new(StringArray::from(weather)),
        Arc::new(StringArray::from(time_of_day)),
        Arc::new(Int64Array::from(elapsed)),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    // Write Parquet
    let parquet_path = args.out.with_extension("parquet");
    let file = std::fs::File::create(&parquet_path)
        .with_context(|| format!("creating {}", parquet_path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;

    // Write CSV
    let csv_path = args.out.with_extension("csv");
    let mut csv_writer = csv::Writer::from_path(&csv_path)
        .with_context(|| format!("creating {}", csv_path.display()))?;
    let headers: Vec<String> = batch.schema().fields().iter().map(|f| f.name().clone()).collect();
    csv_writer.write_record(&headers)?;
    for row in 0..batch.num_rows() {
        let record: Vec<String> = batch
            .columns()
            .iter()
            .map(|col| arrow::util::display::array_value_to_string(col, row))
            .collect::<Result<_, _>>()
            .context("formatting CSV cell")?;
        csv_writer.write_record(&record)?;
    }
    csv_writer.flush()?;

    println!(
        "Wrote {} accidents to {} and {}",
        args.rows,
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
