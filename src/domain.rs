use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::OsmprjError;

pub const OSM_PBF_EXT: &str = ".osm.pbf";

pub fn strip_osm_ext(name: &str) -> &str {
    name.strip_suffix(OSM_PBF_EXT).unwrap_or(name)
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "[f64; 4]")]
pub struct BoundingBox {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl From<[f64; 4]> for BoundingBox {
    fn from(value: [f64; 4]) -> Self {
        Self {
            x_min: value[0],
            y_min: value[1],
            x_max: value[2],
            y_max: value[3],
        }
    }
}

impl BoundingBox {
    pub fn padded(&self, buffer: f64) -> Self {
        Self {
            x_min: self.x_min - buffer,
            y_min: self.y_min - buffer,
            x_max: self.x_max + buffer,
            y_max: self.y_max + buffer,
        }
    }

    pub fn arg_string(&self) -> String {
        format!("{},{},{},{}", self.x_min, self.y_min, self.x_max, self.y_max)
    }

    pub fn file_token(&self) -> String {
        format!("{}-{}-{}-{}", self.x_min, self.y_min, self.x_max, self.y_max)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExtractRequest {
    pub output: String,
    pub bbox: BoundingBox,
}

impl ExtractRequest {
    pub fn output_stem(&self) -> &str {
        strip_osm_ext(&self.output)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionDesc(String);

impl RegionDesc {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RegionDesc {
    type Err = OsmprjError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim().trim_matches('/');
        let is_valid = !trimmed.is_empty()
            && trimmed.split('/').all(|segment| {
                !segment.is_empty()
                    && segment
                        .chars()
                        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
            });
        if !is_valid {
            return Err(OsmprjError::InvalidRegion(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn bbox_padding_is_outward() {
        let bbox = BoundingBox::from([10.0, 10.0, 20.0, 20.0]);
        assert_eq!(bbox.padded(0.05).arg_string(), "9.95,9.95,20.05,20.05");

        let negative = BoundingBox::from([-10.0, -10.0, -5.0, -5.0]);
        let padded = negative.padded(0.05);
        assert_eq!(padded.arg_string(), "-10.05,-10.05,-4.95,-4.95");
    }

    #[test]
    fn bbox_file_token_uses_dashes() {
        let bbox = BoundingBox::from([0.0, 0.0, 1.0, 1.0]);
        assert_eq!(bbox.file_token(), "0-0-1-1");
    }

    #[test]
    fn degenerate_bbox_passes_through() {
        let bbox = BoundingBox::from([5.0, 5.0, 5.0, 5.0]);
        assert_eq!(bbox.arg_string(), "5,5,5,5");
    }

    #[test]
    fn extract_request_from_json() {
        let request: ExtractRequest =
            serde_json::from_str(r#"{"output": "munich.osm.pbf", "bbox": [11.3, 48.0, 11.7, 48.2], "population": 1488202}"#)
                .unwrap();
        assert_eq!(request.output_stem(), "munich");
        assert_eq!(request.bbox.x_max, 11.7);
    }

    #[test]
    fn strip_osm_ext_is_exact_suffix() {
        assert_eq!(strip_osm_ext("region.osm.pbf"), "region");
        assert_eq!(strip_osm_ext("region"), "region");
        assert_eq!(strip_osm_ext("bamberg.osm.pbf"), "bamberg");
        assert_eq!(strip_osm_ext("osmof"), "osmof");
    }

    #[test]
    fn parse_region_desc() {
        let region: RegionDesc = "europe/germany".parse().unwrap();
        assert_eq!(region.as_str(), "europe/germany");

        let err = "bad region!".parse::<RegionDesc>().unwrap_err();
        assert_matches!(err, OsmprjError::InvalidRegion(_));
    }
}
