use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// Element label for carbon dioxide rows
pub const CO2: &str = "Emissions (CO2)";
/// Element label for nitrous oxide rows
pub const N2O: &str = "Emissions (N2O)";

/// One row of the emissions table. Extra columns in the file are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmissionRecord {
    #[serde(rename = "Area")]
    pub area: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Element")]
    pub element: String,
    /// Kilotonnes. Blank, NA-marker and NaN cells load as `None`.
    #[serde(rename = "Value", default, deserialize_with = "missing_or_float")]
    pub value: Option<f64>,
}

/// Cell contents read as missing, alongside the empty cell
const MISSING_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn missing_or_float<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(cell) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let cell = cell.trim();
    if cell.is_empty() || MISSING_MARKERS.contains(&cell) {
        return Ok(None);
    }
    let value: f64 = cell
        .parse()
        .map_err(|e| D::Error::custom(format!("invalid Value {:?}: {}", cell, e)))?;
    Ok(Some(value).filter(|v| !v.is_nan()))
}

impl EmissionRecord {
    pub fn new(area: &str, year: i32, element: &str, value: f64) -> Self {
        Self {
            area: area.to_string(),
            year,
            element: element.to_string(),
            value: Some(value),
        }
    }
}

/// A closed ring of (lon, lat) vertices
pub type Ring = Vec<(f64, f64)>;

/// Country boundary: one or more polygons, each an exterior ring followed by holes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Boundary {
    pub polygons: Vec<Vec<Ring>>,
}

impl Boundary {
    /// Convert a GeoJSON geometry. Only areal geometries produce a boundary.
    pub fn from_geojson(value: &geojson::Value) -> Option<Self> {
        let to_ring = |coords: &Vec<Vec<f64>>| -> Ring {
            coords
                .iter()
                .filter(|c| c.len() >= 2)
                .map(|c| (c[0], c[1]))
                .collect()
        };

        let polygons: Vec<Vec<Ring>> = match value {
            geojson::Value::Polygon(rings) => vec![rings.iter().map(to_ring).collect()],
            geojson::Value::MultiPolygon(polygons) => polygons
                .iter()
                .map(|rings| rings.iter().map(to_ring).collect())
                .collect(),
            geojson::Value::GeometryCollection(geometries) => geometries
                .iter()
                .filter_map(|g| Self::from_geojson(&g.value))
                .flat_map(|b| b.polygons)
                .collect(),
            _ => return None,
        };

        if polygons.is_empty() {
            None
        } else {
            Some(Self { polygons })
        }
    }

    /// Bounding box as (min_lon, min_lat, max_lon, max_lat)
    pub fn bbox(&self) -> (f64, f64, f64, f64) {
        let mut bbox = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for &(lon, lat) in self.polygons.iter().flatten().flatten() {
            bbox.0 = bbox.0.min(lon);
            bbox.1 = bbox.1.min(lat);
            bbox.2 = bbox.2.max(lon);
            bbox.3 = bbox.3.max(lat);
        }
        bbox
    }

    /// Even-odd point-in-polygon test over every ring
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.polygons.iter().any(|rings| {
            let mut inside = false;
            for ring in rings {
                if ring.len() < 3 {
                    continue;
                }
                let mut j = ring.len() - 1;
                for i in 0..ring.len() {
                    let (xi, yi) = ring[i];
                    let (xj, yj) = ring[j];
                    if (yi > lat) != (yj > lat) && lon < (xj - xi) * (lat - yi) / (yj - yi) + xi {
                        inside = !inside;
                    }
                    j = i;
                }
            }
            inside
        })
    }
}

/// One feature of the world geometry file
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryRecord {
    pub name: String,
    /// `None` when the feature has no areal geometry
    pub geometry: Option<Boundary>,
}

/// Geometry joined with the emissions value for the selected year and element
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRecord {
    pub area: String,
    /// `None` marks a country with no data for the selection
    pub value: Option<f64>,
    pub geometry: Boundary,
}

/// Total emissions for one year of one element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearlySummary {
    pub year: i32,
    pub total_value: f64,
}
