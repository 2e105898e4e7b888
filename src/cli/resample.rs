use anyhow::{Context, Result};
use log::info;
use std::io::Write;
use std::path::Path;

use daqfile::resample::{resample, Series};

use super::{load, Config};

/// Resample one channel and write `time,value` rows as CSV
pub fn run(
    file: &Path,
    channel: &str,
    start: f32,
    end: Option<f32>,
    max_points: Option<u32>,
    output: Option<&Path>,
    config: &Config,
) -> Result<()> {
    let loaded = load(file, config)?;
    let ch = loaded
        .lookup(channel)
        .with_context(|| format!("Unknown channel: {}", channel))?;

    let end = end.unwrap_or(f32::INFINITY);
    let budget = config.max_points(max_points);
    let series = resample(ch, start, end, budget);
    info!(
        "{} ({}): {} of {} points kept for window {}..{} s",
        ch.id,
        ch.label,
        series.len(),
        ch.point_count(),
        start,
        end
    );

    match output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_csv(file, &series, &ch.unit)?;
            println!("Wrote {} points to {}", series.len(), path.display());
        }
        None => write_csv(std::io::stdout().lock(), &series, &ch.unit)?,
    }
    Ok(())
}

fn write_csv<W: Write>(writer: W, series: &Series, unit: &str) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    let value_column = format!("value_{}", unit);
    csv.write_record(["time_s", value_column.as_str()])?;
    for (t, v) in series.points() {
        csv.write_record([t.to_string(), v.to_string()])?;
    }
    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_csv() {
        let series = Series {
            time: vec![0.0, 0.5],
            values: vec![1.25, -2.0],
        };
        let mut out = Vec::new();
        write_csv(&mut out, &series, "A").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "time_s,value_A\n0,1.25\n0.5,-2\n");
    }
}
