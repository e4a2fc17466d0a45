use crate::error::{DashboardError, DashboardResult};
use crate::records::{Boundary, EmissionRecord, GeometryRecord};
use geojson::{Feature, GeoJson};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Default location of the emissions table
pub const EMISSIONS_FILE: &str = "Food_Processing_Emissions.csv";
/// Default location of the world geometry
pub const GEOMETRY_FILE: &str = "World.geojson";

/// The two static files the dashboard reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sources {
    pub emissions: PathBuf,
    pub geometry: PathBuf,
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            emissions: PathBuf::from(EMISSIONS_FILE),
            geometry: PathBuf::from(GEOMETRY_FILE),
        }
    }
}

impl Sources {
    pub fn load_emissions(&self) -> DashboardResult<Vec<EmissionRecord>> {
        load_emissions(&self.emissions)
    }

    pub fn load_geometry(&self) -> DashboardResult<Vec<GeometryRecord>> {
        load_geometry(&self.geometry)
    }
}

/// Load the emissions table (Area, Year, Element, Value) from a CSV file
pub fn load_emissions(path: &Path) -> DashboardResult<Vec<EmissionRecord>> {
    let file = File::open(path).map_err(|source| DashboardError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    let records = read_emissions(file).map_err(|source| DashboardError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), rows = records.len(), "loaded emissions");
    Ok(records)
}

/// Parse emissions rows from any CSV source with a header row
pub fn read_emissions<R: Read>(reader: R) -> Result<Vec<EmissionRecord>, csv::Error> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize()
        .collect()
}

/// Load the world geometry from a GeoJSON file
pub fn load_geometry(path: &Path) -> DashboardResult<Vec<GeometryRecord>> {
    let mut bytes = fs::read(path).map_err(|source| DashboardError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_geometry(&mut bytes).map_err(|message| DashboardError::Geometry {
        path: path.to_path_buf(),
        message,
    })?;
    tracing::debug!(path = %path.display(), features = records.len(), "loaded geometry");
    Ok(records)
}

/// Parse GeoJSON bytes into one record per feature.
/// simd-json parses in place, so the buffer is clobbered.
pub fn parse_geometry(bytes: &mut [u8]) -> Result<Vec<GeometryRecord>, String> {
    let geojson: GeoJson = simd_json::serde::from_slice(bytes).map_err(|e| e.to_string())?;

    match geojson {
        GeoJson::FeatureCollection(fc) => fc
            .features
            .iter()
            .enumerate()
            .map(|(idx, feature)| geometry_record(idx, feature))
            .collect(),
        GeoJson::Feature(feature) => Ok(vec![geometry_record(0, &feature)?]),
        GeoJson::Geometry(_) => Err("expected features with a name property".to_string()),
    }
}

fn geometry_record(idx: usize, feature: &Feature) -> Result<GeometryRecord, String> {
    let name = feature
        .property("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("feature {} has no name", idx))?
        .to_string();

    let geometry = feature
        .geometry
        .as_ref()
        .and_then(|g| Boundary::from_geojson(&g.value));

    Ok(GeometryRecord { name, geometry })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_emissions_ignores_extra_columns() {
        let csv = "Area Code,Area,Item,Element,Year,Unit,Value\n\
                   1,Nowhereland,Food Processing,Emissions (CO2),2010,kt,100.5\n\
                   1,Nowhereland,Food Processing,Emissions (N2O),2010,kt,\n";
        let rows = read_emissions(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], EmissionRecord::new("Nowhereland", 2010, "Emissions (CO2)", 100.5));
        assert_eq!(rows[1].value, None);
    }

    #[test]
    fn test_read_emissions_missing_markers_load_as_none() {
        let csv = "Area,Year,Element,Value\n\
                   A,2010,Emissions (CO2),100.0\n\
                   B,2010,Emissions (CO2),NaN\n\
                   C,2010,Emissions (CO2),NA\n\
                   D,2010,Emissions (CO2),N/A\n\
                   E,2010,Emissions (CO2),null\n";
        let rows = read_emissions(csv.as_bytes()).unwrap();
        let values: Vec<Option<f64>> = rows.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![Some(100.0), None, None, None, None]);
        assert_eq!(crate::pipeline::total_by_element(&rows, "Emissions (CO2)"), 100.0);
    }

    #[test]
    fn test_read_emissions_rejects_bad_value() {
        let csv = "Area,Year,Element,Value\nNowhereland,2010,Emissions (CO2),lots\n";
        let err = read_emissions(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("lots"));
    }

    #[test]
    fn test_read_emissions_rejects_bad_year() {
        let csv = "Area,Year,Element,Value\nNowhereland,soon,Emissions (CO2),1.0\n";
        assert!(read_emissions(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_parse_geometry_features() {
        let mut bytes = br#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"name": "Squareland"},
                 "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]]}},
                {"type": "Feature", "properties": {"name": "Ghostland"}, "geometry": null}
            ]
        }"#
        .to_vec();
        let records = parse_geometry(&mut bytes).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Squareland");
        assert!(records[0].geometry.is_some());
        assert!(records[1].geometry.is_none());
    }

    #[test]
    fn test_parse_geometry_requires_name() {
        let mut bytes = br#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {}, "geometry": null}
        ]}"#
        .to_vec();
        let err = parse_geometry(&mut bytes).unwrap_err();
        assert!(err.contains("feature 0"));
    }

    #[test]
    fn test_missing_file_is_file_access_error() {
        let err = load_emissions(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, DashboardError::FileAccess { .. }));
        assert!(!err.is_parse_error());
    }
}
