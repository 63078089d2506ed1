use std::io::Write;

use rusty_realty::analysis::{DEFAULT_QUANTILE, detect};
use rusty_realty::data::filter::{self, FilterCriteria, Range};
use rusty_realty::data::loader::load_file;
use rusty_realty::data::model::{AREA, CellValue, PRICE_PER_AREA, UNDERVALUED};
use rusty_realty::error::AnalysisError;
use rusty_realty::report;
use rusty_realty::state::ListingState;

const LISTINGS: &str = "\
ADDRESS,BEDS,BATHS,PRICE,SQUARE FEET,YEAR BUILT,LOT SIZE,DAYS ON MARKET,SOURCE,LATITUDE,LONGITUDE
101 Elm St,2,1,205000,1000,1955,0.15,10,MLS,47.6,-122.3
108 Oak Ave,3,2,214500,1100,1962,0.18,25,MLS,47.6,-122.3
115 Cedar Ln,3,2,246000,1200,1970,0.20,3,MLS,47.6,-122.3
122 Maple Dr,3,2,253500,1300,1978,0.22,40,MLS,47.6,-122.3
129 Pine Ct,3,2,168000,1400,1985,0.25,90,MLS,47.6,-122.3
136 Elm St,3,2.5,292500,1500,1991,0.27,14,MLS,47.6,-122.3
143 Oak Ave,4,2.5,328000,1600,1999,0.30,7,MLS,47.6,-122.3
150 Cedar Ln,4,3,331500,1700,2004,0.33,21,MLS,47.6,-122.3
157 Maple Dr,4,3,369000,1800,2010,0.35,5,MLS,47.6,-122.3
164 Pine Ct,4,3,370500,1900,2018,0.40,60,MLS,47.6,-122.3
171 Vacant Lot,0,0,95000,,,1.50,200,MLS,47.6,-122.3
";

fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

fn flagged_addresses(table: &rusty_realty::data::model::PropertyTable) -> Vec<String> {
    let flag = table.column_index(UNDERVALUED).unwrap();
    table
        .rows
        .iter()
        .filter(|r| r.cells[flag] == CellValue::Bool(true))
        .map(|r| r.cells[0].to_string())
        .collect()
}

#[test]
fn csv_file_end_to_end() {
    let file = write_temp(".csv", LISTINGS);
    let state = ListingState::new(load_file(file.path()).unwrap());

    assert!(!state.table.has_column("SOURCE"));
    assert!(state.table.has_column(AREA));

    let d = state.analyze().unwrap();
    assert_eq!(d.table.len(), 11);
    assert_eq!(d.valid_rows, 10);
    assert_eq!(flagged_addresses(&d.table), vec!["129 Pine Ct"]);

    // the vacant lot has no area: zero price per area, never flagged
    let lot = &d.table.rows[10];
    assert_eq!(d.table.cell(lot, PRICE_PER_AREA), Some(&CellValue::Float(0.0)));
    assert_eq!(d.table.cell(lot, UNDERVALUED), Some(&CellValue::Bool(false)));
}

#[test]
fn json_file_end_to_end() {
    let json = r#"[
        {"ADDRESS": "A", "PRICE": 300000, "SQUARE FEET": 1500, "FAVORITE": "Y"},
        {"ADDRESS": "B", "PRICE": "n/a", "SQUARE FEET": 1800}
    ]"#;
    let file = write_temp(".json", json);
    let state = ListingState::new(load_file(file.path()).unwrap());
    assert_eq!(state.table.columns, vec!["ADDRESS", "PRICE", AREA]);

    let d = state.analyze().unwrap();
    assert_eq!(d.valid_rows, 1);
    assert_eq!(d.fit, None);
    assert!(flagged_addresses(&d.table).is_empty());
}

#[test]
fn filtering_changes_the_fitted_population() {
    let file = write_temp(".csv", LISTINGS);
    let mut state = ListingState::new(load_file(file.path()).unwrap());

    let everything = state.analyze().unwrap();
    state.set_criteria(FilterCriteria {
        year_built: Some(Range::new(1990.0, 2020.0)),
        ..state.criteria.clone()
    });
    let recent = state.analyze().unwrap();

    assert_eq!(recent.table.len(), 5);
    assert_ne!(recent.fit, everything.fit);
    // ids survive filtering
    assert_eq!(recent.table.rows[0].id, 5);
}

#[test]
fn filtered_subset_keeps_pass_through_fields() {
    let file = write_temp(".csv", LISTINGS);
    let state = ListingState::new(load_file(file.path()).unwrap());
    let filtered = filter::apply(
        &state.table,
        &FilterCriteria {
            min_beds: 4.0,
            ..FilterCriteria::default()
        },
    );
    let d = detect(&filtered, DEFAULT_QUANTILE).unwrap();
    for (before, after) in filtered.rows.iter().zip(&d.table.rows) {
        assert_eq!(before.cells[..], after.cells[..before.cells.len()]);
    }
}

#[test]
fn table_without_area_stops_before_reporting() {
    let file = write_temp(".csv", "ADDRESS,PRICE\nA,100000\nB,200000\n");
    let state = ListingState::new(load_file(file.path()).unwrap());
    match state.analyze() {
        Err(AnalysisError::MissingRequiredFields { missing }) => {
            assert_eq!(missing, vec![AREA.to_string()])
        }
        other => panic!("expected missing-field error, got {other:?}"),
    }
}

#[test]
fn annotated_csv_round_trips_through_the_loader() {
    let file = write_temp(".csv", LISTINGS);
    let state = ListingState::new(load_file(file.path()).unwrap());
    let d = state.analyze().unwrap();

    let out = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    report::write_csv(&d.table, out.reopen().unwrap()).unwrap();

    let reloaded = load_file(out.path()).unwrap();
    assert_eq!(reloaded.columns, d.table.columns);
    assert_eq!(reloaded.len(), d.table.len());
    assert_eq!(flagged_addresses(&reloaded), vec!["129 Pine Ct"]);
}
