use std::fs;
use std::path::Path;

use camino::Utf8PathBuf;
use serde::Deserialize;

use crate::domain::ExtractRequest;
use crate::error::OsmprjError;

#[derive(Debug, Default, Deserialize)]
pub struct ExtractConfig {
    #[serde(default)]
    pub extracts: Vec<ExtractRequest>,
}

impl ExtractConfig {
    pub fn load(path: &Path) -> Result<Self, OsmprjError> {
        let content =
            fs::read_to_string(path).map_err(|_| OsmprjError::ConfigRead(path.to_path_buf()))?;
        serde_json::from_str(&content).map_err(|err| OsmprjError::ConfigParse(err.to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub struct ReportConfig {
    pub database: Utf8PathBuf,
}

impl ReportConfig {
    pub fn load(path: &Path) -> Result<Self, OsmprjError> {
        let content =
            fs::read_to_string(path).map_err(|_| OsmprjError::ConfigRead(path.to_path_buf()))?;
        serde_json::from_str(&content).map_err(|err| OsmprjError::ConfigParse(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_extract_config() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("extracts.json");
        fs::write(
            &path,
            r#"{"extracts": [{"output": "munich.osm.pbf", "bbox": [11.3, 48.0, 11.7, 48.2]}]}"#,
        )
        .unwrap();

        let config = ExtractConfig::load(&path).unwrap();
        assert_eq!(config.extracts.len(), 1);
        assert_eq!(config.extracts[0].output_stem(), "munich");
    }

    #[test]
    fn missing_extracts_key_defaults_to_empty() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("extracts.json");
        fs::write(&path, "{}").unwrap();

        let config = ExtractConfig::load(&path).unwrap();
        assert!(config.extracts.is_empty());
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("extracts.json");
        fs::write(&path, "{not json").unwrap();

        let err = ExtractConfig::load(&path).unwrap_err();
        assert_matches!(err, OsmprjError::ConfigParse(_));
    }

    #[test]
    fn missing_config_file_is_a_read_error() {
        let err = ReportConfig::load(Path::new("/nonexistent/report.json")).unwrap_err();
        assert_matches!(err, OsmprjError::ConfigRead(_));
    }

    #[test]
    fn report_config_requires_database_key() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("report.json");
        fs::write(&path, "{}").unwrap();

        let err = ReportConfig::load(&path).unwrap_err();
        assert_matches!(err, OsmprjError::ConfigParse(_));
    }
}
