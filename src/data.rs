//! Loading of sensor readings.

use crate::error::ReportError;
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::{fs, path::Path};

/// Layout of a sensor data file.
#[derive(Debug, Deserialize)]
struct SensorFile {
    #[serde(deserialize_with = "null_as_empty")]
    data: Vec<[f64; 2]>,
}

/// The logger starts each file with an empty `data:` key, which YAML reads as null.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<[f64; 2]>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<[f64; 2]>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Paired temperature and humidity series of one sensor file.
///
/// Both series always have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorData {
    temperature: Vec<f64>,
    humidity: Vec<f64>,
}

impl SensorData {
    /// Build the series from `[temperature, humidity]` pairs.
    pub fn from_pairs(pairs: &[[f64; 2]]) -> Self {
        let (temperature, humidity) = pairs.iter().map(|&[t, h]| (t, h)).unzip();
        Self {
            temperature,
            humidity,
        }
    }

    /// Load readings from a YAML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, or a
    /// [`ReportError::MalformedInput`] if its structure is not a top-level
    /// `data` key holding numeric pairs.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let data =
            Self::from_yaml_str(&contents).with_context(|| format!("failed to parse {file:?}"))?;

        if data.is_empty() {
            log::warn!("{file:?} holds no readings");
        }
        let n_failed = data.n_failed_reads();
        if n_failed > 0 {
            log::warn!("{n_failed} readings are 0.0/0.0, likely failed sensor reads");
        }

        Ok(data)
    }

    /// Parse readings from a YAML string.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ReportError> {
        let sensor_file: SensorFile = serde_yaml::from_str(contents)
            .map_err(|err| ReportError::MalformedInput(err.to_string()))?;
        Ok(Self::from_pairs(&sensor_file.data))
    }

    pub fn temperature(&self) -> &[f64] {
        &self.temperature
    }

    pub fn humidity(&self) -> &[f64] {
        &self.humidity
    }

    pub fn len(&self) -> usize {
        self.temperature.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty()
    }

    /// Count readings where both sensors report exactly zero.
    fn n_failed_reads(&self) -> usize {
        self.temperature
            .iter()
            .zip(&self.humidity)
            .filter(|&(&t, &h)| t == 0.0 && h == 0.0)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logger_layout_is_parsed() {
        let contents = "data: \n  - - 21.50\n    - 45.20\n  - - 21.60\n    - 45.10\n";
        let data = SensorData::from_yaml_str(contents).unwrap();
        assert_eq!(data.temperature(), &[21.5, 21.6]);
        assert_eq!(data.humidity(), &[45.2, 45.1]);
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn flow_layout_with_integers_is_parsed() {
        let data = SensorData::from_yaml_str("data: [[20, 40], [21.5, 41]]").unwrap();
        assert_eq!(data.temperature(), &[20.0, 21.5]);
        assert_eq!(data.humidity(), &[40.0, 41.0]);
    }

    #[test]
    fn empty_data_key_gives_empty_series() {
        let data = SensorData::from_yaml_str("data: \n").unwrap();
        assert!(data.is_empty());
        let data = SensorData::from_yaml_str("data: []\n").unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn missing_key_is_malformed() {
        let err = SensorData::from_yaml_str("readings: [[20, 40]]").unwrap_err();
        assert!(matches!(err, ReportError::MalformedInput(_)));
    }

    #[test]
    fn non_pair_elements_are_malformed() {
        for contents in [
            "data: [[20, 40, 60]]",
            "data: [[20]]",
            "data: [20, 40]",
            "data: [[warm, 40]]",
            "data: 12",
        ] {
            let err = SensorData::from_yaml_str(contents).unwrap_err();
            assert!(matches!(err, ReportError::MalformedInput(_)), "{contents}");
        }
    }

    #[test]
    fn failed_reads_are_counted() {
        let data = SensorData::from_pairs(&[[0.0, 0.0], [21.0, 0.0], [0.0, 0.0]]);
        assert_eq!(data.n_failed_reads(), 2);
    }
}
