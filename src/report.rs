use std::fmt::{self, Write};
use std::path::Path;

use colored::*;
use csv::Writer;

use crate::emission::EmissionTable;
use crate::trip::{DistanceSource, TripReport};

const BAR_WIDTH: usize = 30;

fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

fn paint(text: &str, color: &str) -> ColoredString {
    match hex_to_rgb(color) {
        Some((r, g, b)) => text.truecolor(r, g, b),
        None => text.normal(),
    }
}

/// Console summary: the selected mode's figures followed by the ranking of all modes.
pub fn render_text<W: Write>(
    report: &TripReport,
    table: &EmissionTable,
    out: &mut W,
) -> fmt::Result {
    let label = |id: &str| table.get(id).map_or(id.to_string(), |m| m.label.clone());
    let source = match report.distance_source {
        DistanceSource::Manual => "manual",
        DistanceSource::Routed => "road route",
    };

    writeln!(
        out,
        "{}",
        format!("{} -> {}", report.origin, report.destination).bold()
    )?;
    writeln!(out, "Distance: {:.1} km ({})", report.distance_km, source)?;
    writeln!(out, "Mode: {}", label(&report.mode))?;
    writeln!(
        out,
        "Emission: {}",
        format!("{:.2} kg CO2", report.result.emission_kg).red()
    )?;
    if report.result.savings.saved_kg > 0.0 {
        writeln!(
            out,
            "Saved vs {}: {}",
            label(table.reference_mode()),
            format!(
                "{:.2} kg ({:.1}%)",
                report.result.savings.saved_kg, report.result.savings.percentage
            )
            .green()
        )?;
    }
    writeln!(
        out,
        "Carbon credits: {:.4} (R$ {:.2} - R$ {:.2}, avg R$ {:.2})",
        report.result.carbon_credits,
        report.result.price_estimate.min,
        report.result.price_estimate.max,
        report.result.price_estimate.average
    )?;
    writeln!(out, "Trees to offset in a year: {}", report.tree_equivalent)?;

    writeln!(out, "\nComparison:")?;
    let max = report
        .comparison
        .iter()
        .map(|m| m.emission_kg)
        .fold(0.0_f64, f64::max);
    for entry in &report.comparison {
        let width = if max > 0.0 {
            ((entry.emission_kg / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let color = table.get(&entry.mode_id).map_or("", |m| m.color.as_str());
        let marker = if entry.mode_id == report.mode { "*" } else { " " };
        writeln!(
            out,
            "{} {:<12} {:>10.2} kg {}",
            marker,
            label(&entry.mode_id),
            entry.emission_kg,
            paint(&"█".repeat(width), color)
        )?;
    }
    Ok(())
}

pub fn write_comparison_csv<P: AsRef<Path>>(
    report: &TripReport,
    table: &EmissionTable,
    path: P,
) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_path(path)?;

    wtr.write_record(["mode", "label", "distance_km", "emission_kg", "selected"])?;

    for entry in &report.comparison {
        let label = table.get(&entry.mode_id).map_or("", |m| m.label.as_str());
        wtr.write_record([
            entry.mode_id.clone(),
            label.to_string(),
            report.distance_km.to_string(),
            format!("{:.3}", entry.emission_kg),
            (entry.mode_id == report.mode).to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
