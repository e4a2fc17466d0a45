use crate::records::JoinedRecord;
use std::collections::HashMap;

/// Grid index over country bounding boxes for hover lookups.
/// Each country is indexed into every cell its bbox overlaps, so a cell
/// query returns a superset that the point-in-polygon test narrows down.
pub struct CountryIndex {
    cells: HashMap<(i32, i32), Vec<usize>>,
    cell_size: f64,
}

impl CountryIndex {
    /// Cell size in degrees used by `build`
    pub const CELL_SIZE: f64 = 10.0;

    #[inline(always)]
    fn to_cell(&self, lon: f64, lat: f64) -> (i32, i32) {
        let x = (lon / self.cell_size).floor() as i32;
        let y = (lat / self.cell_size).floor() as i32;
        (x, y)
    }

    /// Index records by position in the slice
    pub fn build(records: &[JoinedRecord]) -> Self {
        let mut index = Self {
            cells: HashMap::new(),
            cell_size: Self::CELL_SIZE,
        };
        for (idx, record) in records.iter().enumerate() {
            let (min_lon, min_lat, max_lon, max_lat) = record.geometry.bbox();
            if min_lon > max_lon {
                continue;
            }
            let min_cell = index.to_cell(min_lon, min_lat);
            let max_cell = index.to_cell(max_lon, max_lat);
            for y in min_cell.1..=max_cell.1 {
                for x in min_cell.0..=max_cell.0 {
                    index.cells.entry((x, y)).or_default().push(idx);
                }
            }
        }
        index
    }

    /// Index of the first record whose boundary contains the point
    pub fn lookup(&self, records: &[JoinedRecord], lon: f64, lat: f64) -> Option<usize> {
        self.cells
            .get(&self.to_cell(lon, lat))?
            .iter()
            .copied()
            .find(|&idx| records.get(idx).is_some_and(|r| r.geometry.contains(lon, lat)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Boundary;

    fn country(name: &str, lon: f64, lat: f64, size: f64) -> JoinedRecord {
        JoinedRecord {
            area: name.to_string(),
            value: None,
            geometry: Boundary {
                polygons: vec![vec![vec![
                    (lon, lat),
                    (lon + size, lat),
                    (lon + size, lat + size),
                    (lon, lat + size),
                    (lon, lat),
                ]]],
            },
        }
    }

    #[test]
    fn test_lookup_hits_containing_country() {
        let records = vec![
            country("Big", -30.0, -30.0, 60.0),
            country("Small", 100.0, 5.0, 2.0),
        ];
        let index = CountryIndex::build(&records);
        assert_eq!(index.lookup(&records, 0.0, 0.0), Some(0));
        assert_eq!(index.lookup(&records, 101.0, 6.0), Some(1));
        assert_eq!(index.lookup(&records, 105.0, 6.0), None);
        assert_eq!(index.lookup(&records, -170.0, 80.0), None);
    }
}
