use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use daqfile::resample::{statistics, Statistics};

use super::{load, Config};

#[derive(Serialize)]
struct ChannelStats {
    id: String,
    label: String,
    unit: String,
    #[serde(flatten)]
    stats: Statistics,
}

/// Print statistics for one channel or all of them
pub fn run(file: &Path, channel: Option<&str>, json: bool, config: &Config) -> Result<()> {
    let loaded = load(file, config)?;

    let selected: Vec<_> = match channel {
        Some(name) => match loaded.lookup(name) {
            Some(ch) => vec![ch],
            None => anyhow::bail!("Unknown channel: {}", name),
        },
        None => loaded.all_channels().collect(),
    };

    let rows: Vec<ChannelStats> = selected
        .into_iter()
        .map(|ch| ChannelStats {
            id: ch.id.to_string(),
            label: ch.label.clone(),
            unit: ch.unit.clone(),
            stats: statistics(ch),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "{:<4} {:<12} {:<6} {:>10} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "id", "label", "unit", "count", "min", "max", "mean", "stddev", "rms"
    );
    for row in &rows {
        let s = &row.stats;
        println!(
            "{:<4} {:<12} {:<6} {:>10} {:>12.4} {:>12.4} {:>12.4} {:>12.4} {:>12.4}",
            row.id, row.label, row.unit, s.count, s.min, s.max, s.mean, s.stddev, s.rms
        );
    }
    Ok(())
}
