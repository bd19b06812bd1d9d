use super::CommandStatus;
use crate::io::{JsonStressDataset, ReferenceDataset, StressDataset};
use crate::material::{derive_min_thickness, lookup_allowable_stress};
use anyhow::Result;
use std::path::Path;

pub fn handle_stress_command(
    material: &str,
    temperature_c: f64,
    stress_table: Option<&Path>,
) -> Result<CommandStatus> {
    let table = match stress_table {
        Some(path) => JsonStressDataset::new(path).stress_table()?,
        None => ReferenceDataset.stress_table()?,
    };
    let lookup = lookup_allowable_stress(&table, material, temperature_c);
    println!("{}", serde_json::to_string_pretty(&lookup)?);

    match lookup.miss_reason() {
        None => Ok(CommandStatus::Success),
        Some(reason) => {
            eprintln!("No allowable stress for {} at {} °C: {}", material, temperature_c, reason);
            Ok(CommandStatus::CalculationFailed)
        }
    }
}

pub fn handle_tmin_command(
    pressure_mpa: f64,
    stress_mpa: f64,
    efficiency: f64,
    diameter_mm: f64,
) -> Result<CommandStatus> {
    let tmin = derive_min_thickness(pressure_mpa, stress_mpa, efficiency, diameter_mm)?;
    println!("{:.3}", tmin);
    Ok(CommandStatus::Success)
}
