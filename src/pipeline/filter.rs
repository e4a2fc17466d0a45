use crate::records::EmissionRecord;

/// Rows for one year and element, in input order
pub fn filter(records: &[EmissionRecord], year: i32, element: &str) -> Vec<EmissionRecord> {
    records
        .iter()
        .filter(|r| r.year == year && r.element == element)
        .cloned()
        .collect()
}

/// Years in order of first appearance
pub fn distinct_years(records: &[EmissionRecord]) -> Vec<i32> {
    let mut years = Vec::new();
    for record in records {
        if !years.contains(&record.year) {
            years.push(record.year);
        }
    }
    years
}

/// Element labels in order of first appearance
pub fn distinct_elements(records: &[EmissionRecord]) -> Vec<String> {
    let mut elements: Vec<String> = Vec::new();
    for record in records {
        if !elements.iter().any(|e| *e == record.element) {
            elements.push(record.element.clone());
        }
    }
    elements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{CO2, N2O};

    fn rows() -> Vec<EmissionRecord> {
        vec![
            EmissionRecord::new("Nowhereland", 2011, CO2, 200.0),
            EmissionRecord::new("Nowhereland", 2010, CO2, 100.0),
            EmissionRecord::new("Elsewhere", 2010, N2O, 3.0),
            EmissionRecord::new("Elsewhere", 2010, CO2, 50.0),
        ]
    }

    #[test]
    fn test_filter_matches_year_and_element() {
        let rows = rows();
        let out = filter(&rows, 2010, CO2);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|r| r.year == 2010 && r.element == CO2));
        // input order preserved
        assert_eq!(out[0].area, "Nowhereland");
        assert_eq!(out[1].area, "Elsewhere");
    }

    #[test]
    fn test_filter_without_match_is_empty() {
        let rows = vec![
            EmissionRecord::new("Nowhereland", 2010, CO2, 100.0),
            EmissionRecord::new("Nowhereland", 2011, CO2, 200.0),
        ];
        assert!(filter(&rows, 2010, N2O).is_empty());
        assert!(filter(&rows, 1999, CO2).is_empty());
    }

    #[test]
    fn test_distinct_keeps_first_appearance_order() {
        let rows = rows();
        assert_eq!(distinct_years(&rows), vec![2011, 2010]);
        assert_eq!(distinct_elements(&rows), vec![CO2.to_string(), N2O.to_string()]);
    }
}
