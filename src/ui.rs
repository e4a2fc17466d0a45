use crate::app::App;
use emissions_map::braille::BrailleCanvas;
use emissions_map::format::format_kilotonnes;
use emissions_map::map::palette::{band_color, NO_DATA, OUTLINE};
use emissions_map::map::ChoroplethLayers;
use emissions_map::pipeline::{DashboardView, ElementMetrics, ThresholdSequence, BAND_COUNT};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
    Frame,
};

pub const TITLE: &str = "Food Processing Emissions from 2000-2020";
pub const SUB_TITLE: &str = "Source: Food and Agriculture Organization of the United Nations";

/// "Emissions (CO2)" → "CO2"
fn short_label(element: &str) -> &str {
    element
        .strip_prefix("Emissions (")
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(element)
}

fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Render the UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Min(10),   // Body
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_title(frame, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(40)])
        .split(chunks[1]);

    render_sidebar(frame, app, body[0]);

    match app.view.as_ref().err().cloned() {
        None => render_dashboard(frame, app, body[1]),
        Some(message) => render_failure(frame, &message, body[1]),
    }

    render_status_bar(frame, app, chunks[2]);
}

fn render_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(vec![
        Line::from(Span::styled(
            TITLE,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(SUB_TITLE, dim())),
    ]);
    frame.render_widget(title, area);
}

fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(dim())
        .title(" Map and Yearly Metric Filters ");

    let selection = app.selection();
    let highlight = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

    let mut lines = vec![Line::from(Span::styled("Year  [ ]", dim()))];
    let years: Vec<Span> = app
        .years
        .iter()
        .map(|&year| {
            if year == selection.year {
                Span::styled(format!("[{}] ", year), highlight)
            } else {
                Span::raw(format!(" {}  ", year))
            }
        })
        .collect();
    for row in years.chunks(3) {
        lines.push(Line::from(row.to_vec()));
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Emission Type  Tab", dim())));
    for element in &app.elements {
        let line = if *element == selection.element {
            Line::from(Span::styled(format!("(•) {}", element), highlight))
        } else {
            Line::raw(format!("( ) {}", element))
        };
        lines.push(line);
    }

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn render_failure(frame: &mut Frame, message: &str, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Error ");
    let text = Paragraph::new(vec![
        Line::from(Span::styled(
            "The dashboard could not be built.",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::raw(message.to_string()),
    ])
    .wrap(Wrap { trim: false })
    .block(block);
    frame.render_widget(text, area);
}

fn render_dashboard(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),     // Map
            Constraint::Length(1),  // Legend
            Constraint::Length(4),  // Metrics
            Constraint::Length(10), // Charts
        ])
        .split(area);

    render_map(frame, app, chunks[0]);

    let Ok(view) = &app.view else {
        return;
    };
    render_legend(frame, view.map.thresholds.as_ref(), chunks[1]);
    render_metrics(frame, view, chunks[2]);
    render_charts(frame, &view.metrics, chunks[3]);
}

fn render_map(frame: &mut Frame, app: &mut App, area: Rect) {
    let selection = app.selection();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(dim())
        .title(Span::styled(
            format!(" {} {} ", selection.year, selection.element),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Braille gives 2x4 resolution per character
    app.map_area = inner;
    app.viewport.width = inner.width as usize * 2;
    app.viewport.height = inner.height as usize * 4;

    let Ok(view) = &app.view else {
        return;
    };

    let layers = app.renderer.render(
        &view.map.records,
        view.map.thresholds.as_ref(),
        &app.viewport,
        inner.width as usize,
        inner.height as usize,
    );

    let cursor_pos = app.mouse_pos.filter(|&(col, row)| {
        col >= inner.x && row >= inner.y && col < inner.right() && row < inner.bottom()
    });

    frame.render_widget(MapWidget { layers, cursor_pos }, inner);
}

/// Braille choropleth with a cursor marker
struct MapWidget {
    layers: ChoroplethLayers,
    cursor_pos: Option<(u16, u16)>,
}

impl MapWidget {
    /// Render a braille canvas layer with a specific color
    fn render_layer(canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
        for (col, row, ch) in canvas.cells() {
            if col >= area.width as usize || row >= area.height as usize {
                continue;
            }
            let x = area.x + col as u16;
            let y = area.y + row as u16;
            buf[(x, y)].set_char(ch).set_fg(color);
        }
    }

    /// Draw a layer on top, keeping the dots already in each cell
    fn overlay_layer(canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
        for (col, row, ch) in canvas.cells() {
            if col >= area.width as usize || row >= area.height as usize {
                continue;
            }
            let cell = &mut buf[(area.x + col as u16, area.y + row as u16)];
            let merged = merge_braille(cell.symbol(), ch);
            cell.set_char(merged).set_fg(color);
        }
    }
}

/// OR two braille glyphs together; a non-braille base is replaced
fn merge_braille(under: &str, over: char) -> char {
    let dots = |c: char| (c as u32).checked_sub(0x2800).filter(|&bits| bits <= 0xFF);
    match (under.chars().next().and_then(dots), dots(over)) {
        (Some(a), Some(b)) => char::from_u32(0x2800 + (a | b)).unwrap_or(over),
        _ => over,
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Back to front: no-data, bands from low to high, then outlines over the fills
        Self::render_layer(&self.layers.no_data, NO_DATA, area, buf);
        for (band, canvas) in self.layers.bands.iter().enumerate() {
            Self::render_layer(canvas, band_color(band), area, buf);
        }
        if let Some(outlines) = &self.layers.outlines {
            Self::overlay_layer(outlines, OUTLINE, area, buf);
        }

        if let Some((x, y)) = self.cursor_pos {
            buf[(x, y)].set_char('╋').set_fg(Color::White);
        }
    }
}

fn render_legend(frame: &mut Frame, thresholds: Option<&ThresholdSequence>, area: Rect) {
    let mut spans = vec![Span::styled(" Yearly Emissions ", dim())];
    match thresholds {
        Some(t) => {
            spans.push(Span::raw(format_kilotonnes(t.min())));
            spans.push(Span::raw(" "));
            for band in 0..BAND_COUNT {
                spans.push(Span::styled("█", Style::default().fg(band_color(band))));
            }
            spans.push(Span::raw(" "));
            spans.push(Span::raw(format_kilotonnes(t.max())));
        }
        None => spans.push(Span::styled("no values for this selection", dim())),
    }
    spans.push(Span::raw("   "));
    spans.push(Span::styled("█", Style::default().fg(NO_DATA)));
    spans.push(Span::styled(" no data", dim()));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_metrics(frame: &mut Frame, view: &DashboardView, area: Rect) {
    let value_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

    let mut totals = vec![Span::styled("20 Year Metrics: ", dim())];
    let mut yearly = vec![Span::styled("Yearly Metrics:  ", dim())];
    for m in &view.metrics {
        let label = short_label(&m.element);
        totals.push(Span::raw(format!("Total {} (Kilotonnes) ", label)));
        totals.push(Span::styled(format_kilotonnes(m.total), value_style));
        totals.push(Span::raw("   "));

        yearly.push(Span::raw(format!("{} {} (Kilotonnes) ", view.selection.year, label)));
        yearly.push(Span::styled(format_kilotonnes(m.yearly_total), value_style));
        yearly.push(Span::raw("   "));
    }

    let block = Block::default().borders(Borders::TOP).border_style(dim());
    let paragraph = Paragraph::new(vec![Line::from(totals), Line::from(yearly)])
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(paragraph, area);
}

fn render_charts(frame: &mut Frame, metrics: &[ElementMetrics], area: Rect) {
    if metrics.is_empty() {
        return;
    }

    let constraints = vec![Constraint::Ratio(1, metrics.len() as u32); metrics.len()];
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (m, column) in metrics.iter().zip(columns.iter()) {
        render_series_chart(frame, m, *column);
    }
}

fn render_series_chart(frame: &mut Frame, metrics: &ElementMetrics, area: Rect) {
    let points: Vec<(f64, f64)> = metrics
        .series
        .iter()
        .map(|s| (s.year as f64, s.total_value))
        .collect();

    let (min_x, max_x) = points
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), p| (lo.min(p.0), hi.max(p.0)));
    let max_y = points.iter().fold(0.0_f64, |hi, p| hi.max(p.1));
    let (min_x, max_x) = if min_x > max_x { (0.0, 1.0) } else { (min_x, max_x.max(min_x + 1.0)) };
    let max_y = if max_y > 0.0 { max_y } else { 1.0 };

    let dataset = Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(dim())
                .title(format!(" {} Emissions Per Year ", short_label(&metrics.element))),
        )
        .x_axis(
            Axis::default()
                .style(dim())
                .bounds([min_x, max_x])
                .labels(vec![format!("{}", min_x as i32), format!("{}", max_x as i32)]),
        )
        .y_axis(
            Axis::default()
                .style(dim())
                .bounds([0.0, max_y])
                .labels(vec!["0".to_string(), format_kilotonnes(max_y)]),
        );

    frame.render_widget(chart, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(" Zoom: ", dim()),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" | ", dim()),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(" | ", dim()),
    ];

    match app.hovered() {
        Some(record) => {
            let value = record
                .value
                .map(format_kilotonnes)
                .unwrap_or_else(|| "no data".to_string());
            spans.push(Span::styled("Country Name: ", dim()));
            spans.push(Span::styled(record.area.clone(), Style::default().fg(Color::White)));
            spans.push(Span::styled("  Emissions (Kilotonnes): ", dim()));
            spans.push(Span::styled(value, Style::default().fg(Color::Yellow)));
        }
        None => spans.push(Span::styled(
            "[ ]:year Tab:type hjkl:pan +/-:zoom b:outlines r:reset q:quit",
            dim(),
        )),
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_label() {
        assert_eq!(short_label("Emissions (CO2)"), "CO2");
        assert_eq!(short_label("Energy use"), "Energy use");
    }

    fn filled(width: usize, height: usize) -> BrailleCanvas {
        let mut canvas = BrailleCanvas::new(width, height);
        for y in 0..(height * 4) as i32 {
            canvas.fill_span(y, 0, (width * 2) as i32);
        }
        canvas
    }

    #[test]
    fn test_merge_braille() {
        assert_eq!(merge_braille("⠁", '⠈'), '⠉');
        assert_eq!(merge_braille(" ", '⠈'), '⠈');
        assert_eq!(merge_braille("⣿", '⠁'), '⣿');
    }

    #[test]
    fn test_outlines_drawn_over_fills() {
        let mut outlines = BrailleCanvas::new(2, 1);
        outlines.set_pixel(0, 0);

        let mut bands = vec![BrailleCanvas::new(2, 1); BAND_COUNT];
        bands[3] = filled(2, 1);
        let layers = ChoroplethLayers {
            bands,
            no_data: BrailleCanvas::new(2, 1),
            outlines: Some(outlines),
        };

        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        MapWidget { layers, cursor_pos: None }.render(area, &mut buf);

        assert_eq!(buf[(0, 0)].symbol(), "⣿");
        assert_eq!(buf[(0, 0)].fg, OUTLINE);
        assert_eq!(buf[(1, 0)].fg, band_color(3));
    }
}
