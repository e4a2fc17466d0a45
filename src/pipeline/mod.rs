//! Selection → view pipeline.
//!
//! Every selection change rebuilds the whole view from the source files:
//! load, filter, join, bucketize, aggregate. Nothing is cached between runs.

mod buckets;
mod filter;
mod join;
mod metrics;

pub use buckets::{ThresholdSequence, BAND_COUNT, BOUNDARY_COUNT};
pub use filter::{distinct_elements, distinct_years, filter};
pub use join::{join, JoinOutcome};
pub use metrics::{series_by_element, total_by_element, yearly_total_by_element};

use crate::data::Sources;
use crate::error::{DashboardError, DashboardResult};
use crate::records::{EmissionRecord, GeometryRecord, JoinedRecord, YearlySummary};

/// The year and emission type the user picked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub year: i32,
    pub element: String,
}

impl Selection {
    pub fn new(year: i32, element: &str) -> Self {
        Self {
            year,
            element: element.to_string(),
        }
    }
}

/// Input for the choropleth
#[derive(Debug, Clone, PartialEq)]
pub struct MapFrame {
    pub records: Vec<JoinedRecord>,
    /// `None` when no country has a value for the selection
    pub thresholds: Option<ThresholdSequence>,
    pub unmatched_areas: Vec<String>,
}

/// Metric panel numbers for one element
#[derive(Debug, Clone, PartialEq)]
pub struct ElementMetrics {
    pub element: String,
    pub total: f64,
    pub yearly_total: f64,
    pub series: Vec<YearlySummary>,
}

/// Everything the dashboard shows for one selection
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub selection: Selection,
    pub years: Vec<i32>,
    pub elements: Vec<String>,
    pub map: MapFrame,
    pub metrics: Vec<ElementMetrics>,
}

/// Build the map frame for a selection
pub fn map_frame(
    geometry: &[GeometryRecord],
    emissions: &[EmissionRecord],
    selection: &Selection,
) -> MapFrame {
    let filtered = filter(emissions, selection.year, &selection.element);
    let JoinOutcome {
        records,
        unmatched_areas,
    } = join(geometry, &filtered);

    let thresholds = match ThresholdSequence::from_optional(records.iter().map(|r| r.value)) {
        Ok(seq) => Some(seq),
        Err(DashboardError::EmptyInput) => {
            tracing::debug!(year = selection.year, element = %selection.element, "no values to bucket");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "threshold computation failed");
            None
        }
    };

    MapFrame {
        records,
        thresholds,
        unmatched_areas,
    }
}

/// Metrics for every element in the dataset
pub fn element_metrics(emissions: &[EmissionRecord], year: i32) -> Vec<ElementMetrics> {
    distinct_elements(emissions)
        .into_iter()
        .map(|element| ElementMetrics {
            total: total_by_element(emissions, &element),
            yearly_total: yearly_total_by_element(emissions, year, &element),
            series: series_by_element(emissions, &element),
            element,
        })
        .collect()
}

/// Pure view construction from already loaded data
pub fn build_view(
    geometry: &[GeometryRecord],
    emissions: &[EmissionRecord],
    selection: &Selection,
) -> DashboardView {
    DashboardView {
        selection: selection.clone(),
        years: distinct_years(emissions),
        elements: distinct_elements(emissions),
        map: map_frame(geometry, emissions, selection),
        metrics: element_metrics(emissions, selection.year),
    }
}

/// Load both sources and build the view. Load failures abort the run.
pub fn run(sources: &Sources, selection: &Selection) -> DashboardResult<DashboardView> {
    tracing::info!(year = selection.year, element = %selection.element, "building view");
    let emissions = sources.load_emissions()?;
    let geometry = sources.load_geometry()?;
    Ok(build_view(&geometry, &emissions, selection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Boundary, CO2, N2O};

    fn square(x0: f64) -> Boundary {
        Boundary {
            polygons: vec![vec![vec![(x0, 0.0), (x0 + 1.0, 0.0), (x0 + 1.0, 1.0), (x0, 0.0)]]],
        }
    }

    fn fixture() -> (Vec<GeometryRecord>, Vec<EmissionRecord>) {
        let geometry = vec![
            GeometryRecord { name: "Nowhereland".into(), geometry: Some(square(0.0)) },
            GeometryRecord { name: "Elsewhere".into(), geometry: Some(square(2.0)) },
        ];
        let emissions = vec![
            EmissionRecord::new("Nowhereland", 2010, CO2, 100.0),
            EmissionRecord::new("Nowhereland", 2011, CO2, 200.0),
            EmissionRecord::new("Elsewhere", 2010, CO2, 40.0),
            EmissionRecord::new("Elsewhere", 2010, N2O, 1.5),
        ];
        (geometry, emissions)
    }

    #[test]
    fn test_build_view_is_idempotent() {
        let (geometry, emissions) = fixture();
        let selection = Selection::new(2010, CO2);
        let a = build_view(&geometry, &emissions, &selection);
        let b = build_view(&geometry, &emissions, &selection);
        assert_eq!(a, b);
    }

    #[test]
    fn test_map_frame_buckets_selected_values() {
        let (geometry, emissions) = fixture();
        let frame = map_frame(&geometry, &emissions, &Selection::new(2010, CO2));
        let thresholds = frame.thresholds.unwrap();
        assert_eq!(thresholds.min(), 40.0);
        assert_eq!(thresholds.max(), 100.0);
    }

    #[test]
    fn test_map_frame_without_values_has_no_thresholds() {
        let (geometry, emissions) = fixture();
        let frame = map_frame(&geometry, &emissions, &Selection::new(2011, N2O));
        assert!(frame.thresholds.is_none());
        assert_eq!(frame.records.len(), 2);
        assert!(frame.records.iter().all(|r| r.value.is_none()));
    }

    #[test]
    fn test_element_metrics_cover_every_element() {
        let (_, emissions) = fixture();
        let metrics = element_metrics(&emissions, 2010);
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].element, CO2);
        assert_eq!(metrics[0].total, 340.0);
        assert_eq!(metrics[0].yearly_total, 140.0);
        assert_eq!(metrics[1].element, N2O);
        assert_eq!(metrics[1].series.len(), 1);
    }
}
