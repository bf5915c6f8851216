//! Rendering of result frames to terminal tables and CSV files.

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use sdmx_cli::render::{frame_table, write_csv};
use sdmx_ingest::catalog_frame;
use sdmx_model::{Catalog, CatalogEntry};

fn sample_catalog() -> Catalog {
    let mut exr = CatalogEntry::new("EXR");
    exr.name = Some("Exchange Rates".to_string());
    exr.structure = Some("ECB_EXR1".to_string());
    let mut bsi = CatalogEntry::new("BSI");
    bsi.name = Some("Balance Sheet Items".to_string());
    [exr, bsi].into_iter().collect()
}

#[test]
fn frame_table_respects_limit() {
    let df = catalog_frame(&sample_catalog()).unwrap();
    let rendered = frame_table(&df, 1).unwrap().to_string();
    assert!(rendered.contains("ID"));
    assert!(rendered.contains("Exchange Rates"));
    assert!(!rendered.contains("Balance Sheet Items"));
}

#[test]
fn frame_table_renders_nulls_as_blank() {
    let df = DataFrame::new(vec![
        Series::new("CODE".into(), vec![Some("A"), None]).into_column(),
    ])
    .unwrap();
    let rendered = frame_table(&df, 10).unwrap().to_string();
    assert!(rendered.contains('A'));
    assert!(!rendered.contains("null"));
}

#[test]
fn write_csv_includes_header_and_every_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flows.csv");
    let mut df = catalog_frame(&sample_catalog()).unwrap();

    write_csv(&mut df, &path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    let mut lines = written.lines();
    assert_eq!(
        lines.next(),
        Some("ID,NAME,STRUCTURE,SERIES_COUNT,AGENCY")
    );
    assert_eq!(lines.count(), 2);
    assert!(written.contains("EXR,Exchange Rates,ECB_EXR1,,"));
}

#[test]
fn write_csv_reports_unwritable_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.csv");
    let mut df = DataFrame::new(Vec::<Column>::new()).unwrap();
    let error = write_csv(&mut df, &path).unwrap_err();
    assert!(error.to_string().contains("out.csv"));
}
