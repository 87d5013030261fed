use std::collections::HashSet;
use std::path::Path;

use csv::ReaderBuilder;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::constant::REFERENCE_MODE;
use crate::domain::types::TransportMode;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Failed to read emission table: {0}")]
    Csv(#[from] csv::Error),

    /// `line` is the 1-based line of the CSV file.
    #[error("Line {line}: {message}")]
    InvalidRow { line: u64, message: String },

    #[error("Transport mode '{id}': {message}")]
    InvalidMode { id: String, message: String },

    #[error("Duplicate transport mode '{0}'")]
    DuplicateMode(String),

    #[error("Reference mode '{0}' is not in the table")]
    MissingReference(String),

    #[error("Emission table is empty")]
    Empty,
}

fn check_mode(id: &str, factor: f64) -> Result<(), String> {
    if id.is_empty() {
        return Err("empty mode id".to_string());
    }
    if !factor.is_finite() || factor < 0.0 {
        return Err(format!(
            "emission factor for '{}' must be a non-negative number",
            id
        ));
    }
    Ok(())
}

/// Transport modes in display order, plus the mode savings are measured against.
#[derive(Debug, Clone, PartialEq)]
pub struct EmissionTable {
    modes: Vec<TransportMode>,
    reference_mode: String,
}

impl Default for EmissionTable {
    fn default() -> Self {
        Self {
            modes: vec![
                TransportMode::new("bicycle", 0.0, "Bicicleta", "🚲", "#22c55e"),
                TransportMode::new("car", 0.12, "Carro", "🚗", "#3b82f6"),
                TransportMode::new("bus", 0.089, "Ônibus", "🚌", "#f59e0b"),
                TransportMode::new("truck", 0.96, "Caminhão", "🚚", "#ef4444"),
            ],
            reference_mode: REFERENCE_MODE.to_string(),
        }
    }
}

impl EmissionTable {
    pub fn new(modes: Vec<TransportMode>, reference_mode: &str) -> Result<Self, TableError> {
        if modes.is_empty() {
            return Err(TableError::Empty);
        }

        let mut seen = HashSet::new();
        for mode in &modes {
            if let Err(message) = check_mode(&mode.id, mode.emission_factor_kg_per_km) {
                return Err(TableError::InvalidMode {
                    id: mode.id.clone(),
                    message,
                });
            }
            if !seen.insert(mode.id.as_str()) {
                return Err(TableError::DuplicateMode(mode.id.clone()));
            }
        }

        if !seen.contains(reference_mode) {
            return Err(TableError::MissingReference(reference_mode.to_string()));
        }

        Ok(Self {
            modes,
            reference_mode: reference_mode.to_string(),
        })
    }

    /// Reads `id,factor,label,icon,color` rows. A header row is skipped when its
    /// factor column is not a number; label, icon and color are optional.
    pub fn from_csv_path<P: AsRef<Path>>(path: P, reference_mode: &str) -> Result<Self, TableError> {
        let path = path.as_ref();
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let mut modes = Vec::new();
        for (idx, row) in reader.records().enumerate() {
            let record = row?;
            let line = record.position().map_or(idx as u64 + 1, |p| p.line());
            let id = record.get(0).unwrap_or_default();
            let raw_factor = record.get(1).unwrap_or_default();
            if id.is_empty() && raw_factor.is_empty() {
                continue;
            }

            let factor = match raw_factor.parse::<f64>() {
                Ok(f) => f,
                Err(_) if idx == 0 => {
                    debug!("Skipping header row in {:?}", path);
                    continue;
                }
                Err(_) => {
                    return Err(TableError::InvalidRow {
                        line,
                        message: format!("'{}' is not a number", raw_factor),
                    })
                }
            };
            if let Err(message) = check_mode(id, factor) {
                return Err(TableError::InvalidRow { line, message });
            }

            let label = record.get(2).filter(|s| !s.is_empty()).unwrap_or(id);
            modes.push(TransportMode::new(
                id,
                factor,
                label,
                record.get(3).unwrap_or_default(),
                record.get(4).unwrap_or_default(),
            ));
        }

        let table = Self::new(modes, reference_mode)?;
        info!("Loaded {} transport modes from {:?}", table.modes.len(), path);
        Ok(table)
    }

    pub fn get(&self, id: &str) -> Option<&TransportMode> {
        self.modes.iter().find(|m| m.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn modes(&self) -> &[TransportMode] {
        &self.modes
    }

    pub fn reference_mode(&self) -> &str {
        &self.reference_mode
    }
}
