use serde::{Deserialize, Serialize};

/// Banding thresholds for the 5x5 risk matrix.
///
/// Each list holds four strictly increasing upper bounds. A value at or
/// below `thresholds[0]` falls in the lowest band, a value above
/// `thresholds[3]` in the highest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskMatrixConfig {
    /// Damage-factor bounds for PoF categories 1..5
    #[serde(default = "default_pof_thresholds")]
    pub pof_thresholds: Vec<f64>,

    /// Affected-area bounds (m²) for CoF categories A..E
    #[serde(default = "default_area_thresholds")]
    pub area_thresholds_m2: Vec<f64>,

    /// Financial bounds for CoF categories A..E
    #[serde(default = "default_financial_thresholds")]
    pub financial_thresholds: Vec<f64>,
}

impl Default for RiskMatrixConfig {
    fn default() -> Self {
        Self {
            pof_thresholds: default_pof_thresholds(),
            area_thresholds_m2: default_area_thresholds(),
            financial_thresholds: default_financial_thresholds(),
        }
    }
}

impl RiskMatrixConfig {
    pub fn validate(&self) -> Result<(), String> {
        validate_bands("pof_thresholds", &self.pof_thresholds)?;
        validate_bands("area_thresholds_m2", &self.area_thresholds_m2)?;
        validate_bands("financial_thresholds", &self.financial_thresholds)
    }
}

/// Zero-based band index (0..=4) of `value` against four upper bounds.
pub fn band_index(value: f64, thresholds: &[f64]) -> usize {
    thresholds.iter().filter(|t| value > **t).count().min(4)
}

fn validate_bands(name: &str, bands: &[f64]) -> Result<(), String> {
    if bands.len() != 4 {
        return Err(format!("{} must have exactly 4 entries, got {}", name, bands.len()));
    }
    if bands.iter().any(|b| !b.is_finite() || *b <= 0.0) {
        return Err(format!("{} must be positive numbers", name));
    }
    if !bands.windows(2).all(|w| w[0] < w[1]) {
        return Err(format!("{} must be strictly increasing", name));
    }
    Ok(())
}

fn default_pof_thresholds() -> Vec<f64> {
    vec![1.0, 10.0, 100.0, 1000.0]
}
fn default_area_thresholds() -> Vec<f64> {
    vec![9.29, 92.9, 929.0, 9290.0]
}
fn default_financial_thresholds() -> Vec<f64> {
    vec![10_000.0, 100_000.0, 1_000_000.0, 10_000_000.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(RiskMatrixConfig::default().validate().is_ok());
    }

    #[test]
    fn test_band_edges_belong_to_lower_band() {
        let bands = default_pof_thresholds();
        assert_eq!(band_index(0.5, &bands), 0);
        assert_eq!(band_index(1.0, &bands), 0);
        assert_eq!(band_index(1.01, &bands), 1);
        assert_eq!(band_index(5000.0, &bands), 4);
    }

    #[test]
    fn test_unordered_bands_are_rejected() {
        let config = RiskMatrixConfig {
            area_thresholds_m2: vec![10.0, 5.0, 100.0, 1000.0],
            ..RiskMatrixConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("area_thresholds_m2"));
    }

    #[test]
    fn test_wrong_length_is_rejected() {
        let config = RiskMatrixConfig {
            pof_thresholds: vec![1.0, 10.0],
            ..RiskMatrixConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
