use emissions_map::map::{ChoroplethRenderer, CountryIndex, Viewport};
use emissions_map::pipeline::{self, DashboardView, Selection};
use emissions_map::records::JoinedRecord;
use emissions_map::Sources;
use ratatui::layout::Rect;

/// Application state
pub struct App {
    pub sources: Sources,
    pub years: Vec<i32>,
    pub elements: Vec<String>,
    year_idx: usize,
    element_idx: usize,
    /// Latest pipeline result; an error replaces the page body
    pub view: Result<DashboardView, String>,
    country_index: Option<CountryIndex>,
    pub viewport: Viewport,
    pub renderer: ChoroplethRenderer,
    /// Inner map rectangle from the last draw, for mouse mapping
    pub map_area: Rect,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    /// Current mouse position for the tooltip
    pub mouse_pos: Option<(u16, u16)>,
}

impl App {
    /// Build the app and run the pipeline for the initial selection
    pub fn new(sources: Sources, years: Vec<i32>, elements: Vec<String>, initial: &Selection) -> Self {
        let year_idx = years.iter().position(|&y| y == initial.year).unwrap_or(0);
        let element_idx = elements
            .iter()
            .position(|e| *e == initial.element)
            .unwrap_or(0);

        let mut app = Self {
            sources,
            years,
            elements,
            year_idx,
            element_idx,
            view: Err("not loaded".to_string()),
            country_index: None,
            viewport: Viewport::world(0, 0),
            renderer: ChoroplethRenderer::new(),
            map_area: Rect::default(),
            should_quit: false,
            last_mouse: None,
            mouse_pos: None,
        };
        app.refresh();
        app
    }

    pub fn selection(&self) -> Selection {
        Selection {
            year: self.years.get(self.year_idx).copied().unwrap_or_default(),
            element: self.elements.get(self.element_idx).cloned().unwrap_or_default(),
        }
    }

    /// Re-run the whole pipeline from the source files
    pub fn refresh(&mut self) {
        let selection = self.selection();
        match pipeline::run(&self.sources, &selection) {
            Ok(view) => {
                self.country_index = Some(CountryIndex::build(&view.map.records));
                self.view = Ok(view);
            }
            Err(e) => {
                tracing::error!(error = %e, "pipeline run failed");
                self.country_index = None;
                self.view = Err(e.to_string());
            }
        }
    }

    pub fn next_year(&mut self) {
        self.step_year(1);
    }

    pub fn prev_year(&mut self) {
        self.step_year(-1);
    }

    fn step_year(&mut self, delta: isize) {
        if self.years.is_empty() {
            return;
        }
        let len = self.years.len() as isize;
        self.year_idx = (self.year_idx as isize + delta).rem_euclid(len) as usize;
        self.refresh();
    }

    pub fn next_element(&mut self) {
        if self.elements.is_empty() {
            return;
        }
        self.element_idx = (self.element_idx + 1) % self.elements.len();
        self.refresh();
    }

    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.viewport.pan(dx, dy);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    /// Recentre on the world view
    pub fn reset_view(&mut self) {
        self.viewport = Viewport::world(self.viewport.width, self.viewport.height);
    }

    /// Convert terminal coordinates to braille pixels inside the map
    fn to_map_pixel(&self, col: u16, row: u16) -> Option<(i32, i32)> {
        let area = self.map_area;
        if col < area.x || row < area.y || col >= area.right() || row >= area.bottom() {
            return None;
        }
        Some((((col - area.x) as i32) * 2, ((row - area.y) as i32) * 4))
    }

    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.to_map_pixel(col, row) {
            self.viewport.zoom_in_at(px, py);
        }
    }

    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.to_map_pixel(col, row) {
            self.viewport.zoom_out_at(px, py);
        }
    }

    /// Pan by the mouse movement since the last drag event
    pub fn handle_drag(&mut self, x: u16, y: u16) {
        if let Some((last_x, last_y)) = self.last_mouse {
            let dx = (last_x as i32 - x as i32) * 2;
            let dy = (last_y as i32 - y as i32) * 4;
            self.pan(dx, dy);
        }
        self.last_mouse = Some((x, y));
    }

    pub fn end_drag(&mut self) {
        self.last_mouse = None;
    }

    pub fn set_mouse_pos(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
    }

    /// Country under the mouse cursor, if any
    pub fn hovered(&self) -> Option<&JoinedRecord> {
        let (col, row) = self.mouse_pos?;
        let (px, py) = self.to_map_pixel(col, row)?;
        let (lon, lat) = self.viewport.unproject(px, py);
        let view = self.view.as_ref().ok()?;
        let idx = self.country_index.as_ref()?.lookup(&view.map.records, lon, lat)?;
        view.map.records.get(idx)
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.viewport.zoom)
    }

    pub fn center_coords(&self) -> String {
        format!(
            "{:.1}°{}, {:.1}°{}",
            self.viewport.center_lat.abs(),
            if self.viewport.center_lat >= 0.0 { "N" } else { "S" },
            self.viewport.center_lon.abs(),
            if self.viewport.center_lon >= 0.0 { "E" } else { "W" }
        )
    }
}
