use crate::records::{EmissionRecord, GeometryRecord, JoinedRecord};
use std::collections::{HashMap, HashSet};

/// Result of joining geometry with one slice of emissions
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JoinOutcome {
    /// Joined rows, all with geometry, in geometry order
    pub records: Vec<JoinedRecord>,
    /// Emission areas that matched no geometry (dropped from `records`)
    pub unmatched_areas: Vec<String>,
}

/// Outer join on `name == Area`, then drop every row without geometry.
///
/// Geometry with no emissions row is kept with `value = None`. Several
/// emission rows for one area produce one joined row each.
pub fn join(geometry: &[GeometryRecord], emissions: &[EmissionRecord]) -> JoinOutcome {
    let mut by_area: HashMap<&str, Vec<&EmissionRecord>> = HashMap::new();
    for record in emissions {
        by_area.entry(record.area.as_str()).or_default().push(record);
    }

    let mut records = Vec::with_capacity(geometry.len());
    let mut matched: HashSet<&str> = HashSet::new();

    for geo in geometry {
        let rows = by_area.get(geo.name.as_str());
        if rows.is_some() {
            matched.insert(geo.name.as_str());
        }

        let Some(boundary) = &geo.geometry else {
            continue;
        };

        match rows {
            Some(rows) => {
                for row in rows {
                    records.push(JoinedRecord {
                        area: geo.name.clone(),
                        value: row.value,
                        geometry: boundary.clone(),
                    });
                }
            }
            None => records.push(JoinedRecord {
                area: geo.name.clone(),
                value: None,
                geometry: boundary.clone(),
            }),
        }
    }

    let mut seen = HashSet::new();
    let unmatched_areas: Vec<String> = emissions
        .iter()
        .map(|r| r.area.as_str())
        .filter(|area| !matched.contains(area) && seen.insert(*area))
        .map(str::to_string)
        .collect();

    if !unmatched_areas.is_empty() {
        tracing::debug!(count = unmatched_areas.len(), areas = ?unmatched_areas, "areas without geometry");
    }

    JoinOutcome {
        records,
        unmatched_areas,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Boundary, CO2};

    fn geo(name: &str, with_geometry: bool) -> GeometryRecord {
        GeometryRecord {
            name: name.to_string(),
            geometry: with_geometry.then(|| Boundary {
                polygons: vec![vec![vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]]],
            }),
        }
    }

    #[test]
    fn test_join_keeps_geometry_order_and_marks_missing() {
        let geometry = vec![geo("Alpha", true), geo("Beta", true), geo("Gamma", true)];
        let emissions = vec![
            EmissionRecord::new("Gamma", 2010, CO2, 3.0),
            EmissionRecord::new("Alpha", 2010, CO2, 1.0),
        ];

        let out = join(&geometry, &emissions);
        let areas: Vec<&str> = out.records.iter().map(|r| r.area.as_str()).collect();
        assert_eq!(areas, vec!["Alpha", "Beta", "Gamma"]);
        assert_eq!(out.records[0].value, Some(1.0));
        assert_eq!(out.records[1].value, None);
        assert_eq!(out.records[2].value, Some(3.0));
        assert!(out.unmatched_areas.is_empty());
    }

    #[test]
    fn test_join_drops_rows_without_geometry() {
        let geometry = vec![geo("Alpha", true), geo("Ghost", false)];
        let emissions = vec![
            EmissionRecord::new("Ghost", 2010, CO2, 9.0),
            EmissionRecord::new("Atlantis", 2010, CO2, 7.0),
            EmissionRecord::new("Atlantis", 2010, CO2, 8.0),
        ];

        let out = join(&geometry, &emissions);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].area, "Alpha");
        assert_eq!(out.unmatched_areas, vec!["Atlantis".to_string()]);
    }

    #[test]
    fn test_join_emits_row_per_duplicate_match() {
        let geometry = vec![geo("Alpha", true)];
        let emissions = vec![
            EmissionRecord::new("Alpha", 2010, CO2, 1.0),
            EmissionRecord::new("Alpha", 2010, CO2, 2.0),
        ];

        let out = join(&geometry, &emissions);
        let values: Vec<Option<f64>> = out.records.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![Some(1.0), Some(2.0)]);
    }

    #[test]
    fn test_join_empty_emissions_yields_no_data_rows() {
        let geometry = vec![geo("Alpha", true), geo("Beta", true)];
        let out = join(&geometry, &[]);
        assert_eq!(out.records.len(), 2);
        assert!(out.records.iter().all(|r| r.value.is_none()));
    }
}
