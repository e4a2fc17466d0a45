use glam::DVec2;
use std::f64::consts::PI;

/// Web Mercator is undefined at the poles
const MAX_LAT: f64 = 85.0;
const MIN_ZOOM: f64 = 0.5;
const MAX_ZOOM: f64 = 50.0;

/// Viewport representing the visible map area and zoom level
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Center longitude (-180 to 180)
    pub center_lon: f64,
    /// Center latitude (-85 to 85)
    pub center_lat: f64,
    /// Zoom level (higher = more zoomed in)
    pub zoom: f64,
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
}

/// Normalized Mercator coordinates in [0, 1]
fn mercator(lon: f64, lat: f64) -> DVec2 {
    let lat_rad = lat.clamp(-MAX_LAT, MAX_LAT) * PI / 180.0;
    DVec2::new(
        (lon + 180.0) / 360.0,
        (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0,
    )
}

impl Viewport {
    pub fn new(center_lon: f64, center_lat: f64, zoom: f64, width: usize, height: usize) -> Self {
        Self {
            center_lon,
            center_lat,
            zoom,
            width,
            height,
        }
    }

    /// World view centred slightly north of the equator
    pub fn world(width: usize, height: usize) -> Self {
        Self::new(0.0, 20.0, 1.0, width, height)
    }

    fn scale(&self) -> f64 {
        self.zoom * self.width as f64
    }

    fn half_size(&self) -> DVec2 {
        DVec2::new(self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// Pan the viewport by pixel delta
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let scale = 360.0 / self.scale().max(1.0);
        self.center_lon += dx as f64 * scale;
        self.center_lat -= dy as f64 * scale * 0.5; // Mercator distortion

        if self.center_lon > 180.0 {
            self.center_lon -= 360.0;
        } else if self.center_lon < -180.0 {
            self.center_lon += 360.0;
        }

        self.center_lat = self.center_lat.clamp(-MAX_LAT, MAX_LAT);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * 1.5).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / 1.5).max(MIN_ZOOM);
    }

    /// Zoom in towards a specific pixel location
    pub fn zoom_in_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.5);
    }

    /// Zoom out from a specific pixel location
    pub fn zoom_out_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.0 / 1.5);
    }

    /// Zoom by factor, keeping the point under (px, py) in place
    fn zoom_at(&mut self, px: i32, py: i32, factor: f64) {
        let (lon, lat) = self.unproject(px, py);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let (new_px, new_py) = self.project(lon, lat);
        self.pan(new_px - px, new_py - py);
    }

    /// Project to fractional pixel coordinates
    pub fn project_point(&self, lon: f64, lat: f64) -> DVec2 {
        let offset = mercator(lon, lat) - mercator(self.center_lon, self.center_lat);
        offset * self.scale() + self.half_size()
    }

    /// Project a geographic coordinate (lon, lat) to pixel coordinates
    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let p = self.project_point(lon, lat);
        (p.x as i32, p.y as i32)
    }

    /// Unproject pixel coordinates back to geographic coordinates (lon, lat)
    pub fn unproject(&self, px: i32, py: i32) -> (f64, f64) {
        let pixel = DVec2::new(px as f64, py as f64);
        let m = (pixel - self.half_size()) / self.scale().max(1.0)
            + mercator(self.center_lon, self.center_lat);

        let lon = m.x * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * m.y)).sinh().atan() * 180.0 / PI;
        (lon, lat)
    }

    /// Rough check whether a projected bounding box overlaps the canvas
    pub fn bbox_might_be_visible(&self, min: DVec2, max: DVec2) -> bool {
        max.x >= 0.0 && min.x < self.width as f64 && max.y >= 0.0 && min.y < self.height as f64
    }
}
