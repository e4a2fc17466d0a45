use crate::braille::BrailleCanvas;
use glam::DVec2;

/// Draw a line using Bresenham's algorithm
pub fn draw_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        canvas.set_pixel_signed(x, y);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }

        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Fill a polygon given as projected rings (exterior first, then holes)
/// with the even-odd rule, sampling each pixel row at its centre.
pub fn fill_polygon(canvas: &mut BrailleCanvas, rings: &[Vec<DVec2>]) {
    let (min_y, max_y) = rings
        .iter()
        .flatten()
        .fold((f64::MAX, f64::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
    if min_y > max_y {
        return;
    }

    let first_row = (min_y.floor() as i32).max(0);
    let last_row = (max_y.ceil() as i32).min(canvas.pixel_height() as i32 - 1);
    let mut crossings: Vec<f64> = Vec::new();

    for row in first_row..=last_row {
        let y = row as f64 + 0.5;
        crossings.clear();

        for ring in rings {
            if ring.len() < 3 {
                continue;
            }
            let mut prev = ring[ring.len() - 1];
            for &p in ring {
                if (p.y > y) != (prev.y > y) {
                    crossings.push(prev.x + (y - prev.y) * (p.x - prev.x) / (p.y - prev.y));
                }
                prev = p;
            }
        }

        crossings.sort_by(f64::total_cmp);
        for pair in crossings.chunks_exact(2) {
            let x0 = (pair[0] - 0.5).ceil() as i32;
            let x1 = (pair[1] - 0.5).floor() as i32;
            if x1 >= x0 {
                canvas.fill_span(row, x0, x1);
            } else {
                // sliver narrower than a pixel still gets one dot
                let mid = ((pair[0] + pair[1]) / 2.0).floor() as i32;
                canvas.fill_span(row, mid, mid);
            }
        }
    }
}

/// Trace a projected ring, skipping segments that jump across the map
pub fn draw_ring(canvas: &mut BrailleCanvas, ring: &[DVec2], max_jump: f64) {
    for pair in ring.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if (a - b).abs().max_element() < max_jump {
            draw_line(canvas, a.x as i32, a.y as i32, b.x as i32, b.y as i32);
        }
    }
}
