use crate::data::{Sources, EMISSIONS_FILE, GEOMETRY_FILE};
use crate::pipeline::Selection;
use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "emissions-map")]
#[command(about = "Food Processing Emissions from 2000-2020, as a terminal choropleth")]
pub struct Cli {
    /// Emissions table (CSV with Area, Year, Element, Value)
    #[arg(long, default_value = EMISSIONS_FILE)]
    pub emissions: PathBuf,

    /// World boundaries (GeoJSON features with a `name` property)
    #[arg(long, default_value = GEOMETRY_FILE)]
    pub geometry: PathBuf,

    /// Initial year (defaults to the first year in the table)
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Initial emission type, e.g. "Emissions (CO2)"
    #[arg(short, long)]
    pub element: Option<String>,

    /// Print a text report for the selection and exit
    #[arg(long)]
    pub summary: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn sources(&self) -> Sources {
        Sources {
            emissions: self.emissions.clone(),
            geometry: self.geometry.clone(),
        }
    }

    /// Starting selection: the flags if given, else the first year and element.
    /// Values absent from the table are rejected.
    pub fn initial_selection(&self, years: &[i32], elements: &[String]) -> Result<Selection> {
        let (Some(&first_year), Some(first_element)) = (years.first(), elements.first()) else {
            bail!("{} has no rows", self.emissions.display());
        };

        let year = self.year.unwrap_or(first_year);
        if !years.contains(&year) {
            bail!("year {} is not in {}", year, self.emissions.display());
        }
        let element = self.element.clone().unwrap_or_else(|| first_element.clone());
        if !elements.contains(&element) {
            bail!("emission type {:?} is not in {}", element, self.emissions.display());
        }

        Ok(Selection { year, element })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["emissions-map"]);
        assert_eq!(cli.sources(), Sources::default());
        assert_eq!(cli.year, None);
        assert!(!cli.summary);
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_selection_flags() {
        let cli = Cli::parse_from([
            "emissions-map",
            "--year",
            "2015",
            "--element",
            "Emissions (N2O)",
            "--geometry",
            "maps/world.json",
            "--summary",
        ]);
        assert_eq!(cli.year, Some(2015));
        assert_eq!(cli.element.as_deref(), Some("Emissions (N2O)"));
        assert_eq!(cli.sources().geometry, PathBuf::from("maps/world.json"));
        assert!(cli.summary);
    }

    #[test]
    fn test_initial_selection_defaults_to_first() {
        let cli = Cli::parse_from(["emissions-map"]);
        let elements = vec!["Emissions (CO2)".to_string(), "Emissions (N2O)".to_string()];
        let selection = cli.initial_selection(&[2010, 2011], &elements).unwrap();
        assert_eq!(selection, Selection::new(2010, "Emissions (CO2)"));
    }

    #[test]
    fn test_initial_selection_rejects_unknown_values() {
        let elements = vec!["Emissions (CO2)".to_string()];

        let cli = Cli::parse_from(["emissions-map", "--year", "1999"]);
        let err = cli.initial_selection(&[2010, 2011], &elements).unwrap_err();
        assert!(err.to_string().contains("1999"));

        let cli = Cli::parse_from(["emissions-map", "--element", "Emissions (CH4)"]);
        assert!(cli.initial_selection(&[2010, 2011], &elements).is_err());

        let cli = Cli::parse_from(["emissions-map"]);
        assert!(cli.initial_selection(&[], &[]).is_err());
    }
}
