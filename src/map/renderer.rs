use crate::braille::BrailleCanvas;
use crate::map::geometry::{draw_ring, fill_polygon};
use crate::map::projection::Viewport;
use crate::pipeline::{ThresholdSequence, BAND_COUNT};
use crate::records::{Boundary, JoinedRecord};
use glam::DVec2;
use rayon::prelude::*;

/// Rasterized choropleth, one canvas per colour
pub struct ChoroplethLayers {
    /// Indexed by band, lowest emissions first
    pub bands: Vec<BrailleCanvas>,
    pub no_data: BrailleCanvas,
    pub outlines: Option<BrailleCanvas>,
}

/// Display settings for the map
#[derive(Clone)]
pub struct DisplaySettings {
    pub show_outlines: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self { show_outlines: true }
    }
}

/// Paints joined records into colour-band layers
#[derive(Default)]
pub struct ChoroplethRenderer {
    pub settings: DisplaySettings,
}

/// Layer a record is painted into; `BAND_COUNT` is the no-data layer
fn layer_of(record: &JoinedRecord, thresholds: Option<&ThresholdSequence>) -> usize {
    match (record.value.filter(|v| !v.is_nan()), thresholds) {
        (Some(value), Some(t)) => t.band_of(value),
        _ => BAND_COUNT,
    }
}

fn project_rings(rings: &[Vec<(f64, f64)>], viewport: &Viewport) -> Vec<Vec<DVec2>> {
    rings
        .iter()
        .map(|ring| ring.iter().map(|&(lon, lat)| viewport.project_point(lon, lat)).collect())
        .collect()
}

fn projected_bbox(rings: &[Vec<DVec2>]) -> (DVec2, DVec2) {
    rings.iter().flatten().fold(
        (DVec2::splat(f64::MAX), DVec2::splat(f64::MIN)),
        |(lo, hi), &p| (lo.min(p), hi.max(p)),
    )
}

fn fill_boundary(canvas: &mut BrailleCanvas, boundary: &Boundary, viewport: &Viewport) {
    for rings in &boundary.polygons {
        let projected = project_rings(rings, viewport);
        let (min, max) = projected_bbox(&projected);
        if viewport.bbox_might_be_visible(min, max) {
            fill_polygon(canvas, &projected);
        }
    }
}

fn outline_boundary(canvas: &mut BrailleCanvas, boundary: &Boundary, viewport: &Viewport) {
    let max_jump = viewport.width as f64 / 2.0;
    for rings in &boundary.polygons {
        for ring in project_rings(rings, viewport) {
            draw_ring(canvas, &ring, max_jump);
        }
    }
}

impl ChoroplethRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rasterize records into a `width` x `height` character area
    pub fn render(
        &self,
        records: &[JoinedRecord],
        thresholds: Option<&ThresholdSequence>,
        viewport: &Viewport,
        width: usize,
        height: usize,
    ) -> ChoroplethLayers {
        let mut groups: Vec<Vec<&JoinedRecord>> = vec![Vec::new(); BAND_COUNT + 1];
        for record in records {
            groups[layer_of(record, thresholds)].push(record);
        }

        let mut bands: Vec<BrailleCanvas> = groups
            .par_iter()
            .map(|group| {
                let mut canvas = BrailleCanvas::new(width, height);
                for record in group {
                    fill_boundary(&mut canvas, &record.geometry, viewport);
                }
                canvas
            })
            .collect();

        let no_data = bands.pop().unwrap_or_else(|| BrailleCanvas::new(width, height));

        let outlines = self.settings.show_outlines.then(|| {
            let mut canvas = BrailleCanvas::new(width, height);
            for record in records {
                outline_boundary(&mut canvas, &record.geometry, viewport);
            }
            canvas
        });

        ChoroplethLayers {
            bands,
            no_data,
            outlines,
        }
    }

    pub fn toggle_outlines(&mut self) {
        self.settings.show_outlines = !self.settings.show_outlines;
    }
}
