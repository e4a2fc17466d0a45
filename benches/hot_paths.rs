use criterion::{black_box, criterion_group, criterion_main, Criterion};
use emissions_map::map::{ChoroplethRenderer, Viewport};
use emissions_map::pipeline::{build_view, Selection};
use emissions_map::records::{Boundary, EmissionRecord, GeometryRecord, CO2, N2O};

/// A grid of square countries with 21 years of two elements each
fn synthetic_world() -> (Vec<GeometryRecord>, Vec<EmissionRecord>) {
    let mut geometry = Vec::new();
    let mut emissions = Vec::new();

    for i in 0..200 {
        let lon = -170.0 + (i % 20) as f64 * 17.0;
        let lat = -60.0 + (i / 20) as f64 * 12.0;
        let name = format!("Country {}", i);
        geometry.push(GeometryRecord {
            name: name.clone(),
            geometry: Some(Boundary {
                polygons: vec![vec![vec![
                    (lon, lat),
                    (lon + 15.0, lat),
                    (lon + 15.0, lat + 10.0),
                    (lon, lat + 10.0),
                    (lon, lat),
                ]]],
            }),
        });
        for year in 2000..=2020 {
            let value = ((i * 37 + year as usize * 11) % 1000) as f64;
            emissions.push(EmissionRecord::new(&name, year, CO2, value * 10.0));
            emissions.push(EmissionRecord::new(&name, year, N2O, value / 10.0));
        }
    }

    (geometry, emissions)
}

fn bench_build_view(c: &mut Criterion) {
    let (geometry, emissions) = synthetic_world();
    let selection = Selection::new(2010, CO2);

    c.bench_function("build_view", |b| {
        b.iter(|| build_view(black_box(&geometry), black_box(&emissions), &selection))
    });
}

fn bench_render_choropleth(c: &mut Criterion) {
    let (geometry, emissions) = synthetic_world();
    let view = build_view(&geometry, &emissions, &Selection::new(2010, CO2));
    let renderer = ChoroplethRenderer::new();
    let viewport = Viewport::world(400, 200);

    c.bench_function("render_choropleth", |b| {
        b.iter(|| {
            renderer.render(
                black_box(&view.map.records),
                view.map.thresholds.as_ref(),
                &viewport,
                200,
                50,
            )
        })
    });
}

criterion_group!(benches, bench_build_view, bench_render_choropleth);
criterion_main!(benches);
