use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use daqfile::channel::Channel;
use daqfile::format::{FileHeader, FormatVersion, StartTime, TimestampKind};

use super::{load, Config};

#[derive(Serialize)]
struct ChannelSummary<'a> {
    id: String,
    label: &'a str,
    unit: &'a str,
    downsampling_factor: u32,
    points: usize,
    duration_s: f32,
}

impl<'a> From<&'a Channel> for ChannelSummary<'a> {
    fn from(channel: &'a Channel) -> Self {
        Self {
            id: channel.id.to_string(),
            label: &channel.label,
            unit: &channel.unit,
            downsampling_factor: channel.downsampling_factor,
            points: channel.point_count(),
            duration_s: channel.duration(),
        }
    }
}

#[derive(Serialize)]
struct FileSummary<'a> {
    header: &'a FileHeader,
    format_version: FormatVersion,
    timestamp_kind: TimestampKind,
    start_time: StartTime,
    channels: Vec<ChannelSummary<'a>>,
    warnings: Vec<String>,
}

/// Display information about a measurement file
pub fn run(file: &Path, json: bool, config: &Config) -> Result<()> {
    let loaded = load(file, config)?;
    let header = loaded.file.header();

    let summary = FileSummary {
        header,
        format_version: header.format_version(),
        timestamp_kind: header.timestamp_kind(),
        start_time: header.start_time(),
        channels: loaded.all_channels().map(ChannelSummary::from).collect(),
        warnings: loaded.derived.warnings().iter().map(ToString::to_string).collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Measurement File Information");
    println!("============================");
    println!("File: {}", file.display());
    println!("Header: {}", header.header);
    println!("Format: {:?} ({:?} timestamp)", summary.format_version, summary.timestamp_kind);
    match summary.start_time.datetime() {
        Some(start) => println!("Start: {}", start.to_rfc3339()),
        None => println!("Start: unavailable (raw {})", header.start_time_raw),
    }
    println!("Rows: {}", header.buffer_size);
    println!("Sampling interval: {} ns", header.sampling_interval_ns);
    println!("Max ADC value: {}", header.max_adc_value);
    println!();

    println!("Channels:");
    println!(
        "  {:<4} {:<12} {:<6} {:>6} {:>10} {:>12}",
        "id", "label", "unit", "factor", "points", "duration s"
    );
    for ch in &summary.channels {
        println!(
            "  {:<4} {:<12} {:<6} {:>6} {:>10} {:>12.4}",
            ch.id, ch.label, ch.unit, ch.downsampling_factor, ch.points, ch.duration_s
        );
    }

    if !summary.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &summary.warnings {
            println!("  {}", warning);
        }
    }

    Ok(())
}
