use kpi_dashboard::chart::NO_DATA_FOUND;
use kpi_dashboard::descriptions::DescriptionTable;
use kpi_dashboard::error::DashboardError;
use kpi_dashboard::grouping::GroupIndex;
use kpi_dashboard::loader::{table_from_frame, KpiTableLoader};
use kpi_dashboard::{ChartBuilder, KpiTable};
use polars::prelude::*;
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};

const KPI_CSV: &str = "\
Group,KPI,Baseline 2025,Baseline 2050,Strategy 1,Strategy 2,Strategy 3
Sustainability,Total CO2 emissions [tons],420000,510000,300000,\"280000,5\",abc
,Available seats [-],1000,1200,1100,,1150
Feasibility,Technical,7,6,8,5,9
,Safety,6,6,7,7,
Financial (quantitative),Total cost [€],\"1.234,56 €\",2000,3000,4000,5000
,Revenue [€] ,1,2,3,4,5
,Profit [% w.r.t. total cost],\"0,12\",-0.05,0,-0.1,0.3
";

fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn load_fixture() -> KpiTable {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "KPI_table.csv", KPI_CSV);
    KpiTableLoader::default().load(&path).unwrap()
}

#[test]
fn test_csv_groups_are_forward_filled() {
    let table = load_fixture();
    let groups: Vec<&str> = table.records().iter().map(|r| r.group.as_str()).collect();

    assert_eq!(
        groups,
        vec![
            "Sustainability",
            "Sustainability",
            "Feasibility",
            "Feasibility",
            "Financial (quantitative)",
            "Financial (quantitative)",
            "Financial (quantitative)",
        ]
    );
}

#[test]
fn test_csv_scenario_cleaning() {
    let table = load_fixture();

    let co2 = table.find("Total CO2 emissions [tons]").unwrap();
    assert_eq!(
        co2.values,
        [Some(420000.0), Some(510000.0), Some(300000.0), Some(280000.5), None]
    );

    let cost = table.find("Total cost [€]").unwrap();
    assert_eq!(cost.values[0], Some(1234.56));

    let profit = table.find("Profit [% w.r.t. total cost]").unwrap();
    assert_eq!(profit.values[0], Some(0.12));
    assert_eq!(profit.values[3], Some(-0.1));
}

#[test]
fn test_blank_cells_take_the_previous_row_value() {
    let table = load_fixture();

    let seats = table.find("Available seats [-]").unwrap();
    assert_eq!(seats.values[3], Some(280000.5));

    let safety = table.find("Safety").unwrap();
    assert_eq!(safety.values[4], Some(9.0));
}

#[test]
fn test_kpi_names_keep_whitespace() {
    let table = load_fixture();
    assert!(table.find("Revenue [€] ").is_some());
    assert!(table.find("Revenue [€]").is_none());
}

#[test]
fn test_group_index_from_csv() {
    let table = load_fixture();
    let index = GroupIndex::build(&table);

    assert_eq!(
        index.groups(),
        &["Sustainability", "Feasibility", "Financial (quantitative)"]
    );
    assert_eq!(index.kpis_in("Feasibility"), &["Technical", "Safety"]);
}

#[test]
fn test_charts_from_csv() {
    let table = load_fixture();
    let descriptions = DescriptionTable::builtin();
    let builder = ChartBuilder::new(&table, &descriptions);

    let co2 = builder.build(Some("Total CO2 emissions [tons]"));
    assert_eq!(co2.figure.reference_lines.len(), 1);
    assert_eq!(co2.figure.bars.unwrap().values[4], None);

    let revenue = builder.build(Some("Revenue [€] "));
    assert_eq!(revenue.description, "total revenue in euros per year");

    assert_eq!(builder.build(Some("nonexistent-kpi")).description, NO_DATA_FOUND);
}

#[test]
fn test_missing_scenario_column_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        dir.path(),
        "KPI_table.csv",
        "Group,KPI,Baseline 2025,Baseline 2050,Strategy 1,Strategy 2\nA,x,1,2,3,4\n",
    );

    match KpiTableLoader::default().load(&path) {
        Err(DashboardError::MissingColumn { column, .. }) => assert_eq!(column, "Strategy 3"),
        other => panic!("expected MissingColumn, got {:?}", other.map(|t| t.len())),
    }
}

#[test]
fn test_rows_before_first_group_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        dir.path(),
        "KPI_table.csv",
        "\
Group,KPI,Baseline 2025,Baseline 2050,Strategy 1,Strategy 2,Strategy 3
,Orphan,1,1,1,1,1
Feasibility,Technical,7,6,8,5,9
",
    );

    let table = KpiTableLoader::default().load(&path).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.records()[0].kpi_name, "Technical");
}

#[test]
fn test_missing_workbook_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = KpiTableLoader::default()
        .load(dir.path().join("KPI_table.xlsx"))
        .unwrap_err();
    assert!(matches!(err, DashboardError::MissingSource(_)));
}

#[test]
fn test_frame_with_numeric_columns() {
    let df = df![
        "Group" => [Some("Sustainability"), None],
        "KPI" => ["Total fuel (if any) [tons or kW]", "Available cargo [tons]"],
        "Baseline 2025" => [Some(1.5), None],
        "Baseline 2050" => [2.0, 3.0],
        "Strategy 1" => [4.0, 5.0],
        "Strategy 2" => [6.0, 7.0],
        "Strategy 3" => [-8.0, 9.0],
    ]
    .unwrap();

    let table = table_from_frame(df).unwrap();
    let cargo = table.find("Available cargo [tons]").unwrap();

    assert_eq!(cargo.group, "Sustainability");
    assert_eq!(cargo.values, [Some(1.5), Some(3.0), Some(5.0), Some(7.0), Some(9.0)]);
    assert_eq!(table.records()[0].values[4], Some(-8.0));
}

/// Writes a `KPI` sheet mixing numeric cells, text cells and a blank group cell
fn write_workbook(path: &Path, sheet_name: &str) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name).unwrap();

    let header = [
        "Group",
        "KPI",
        "Baseline 2025",
        "Baseline 2050",
        "Strategy 1",
        "Strategy 2",
        "Strategy 3",
    ];
    for (col, name) in header.iter().enumerate() {
        sheet.write(0, col as u16, *name).unwrap();
    }

    sheet.write(1, 0, "Financial (quantitative)").unwrap();
    sheet.write(1, 1, "Total cost [€]").unwrap();
    sheet.write(1, 2, "1.234,56 €").unwrap();
    sheet.write(1, 3, 2000.0).unwrap();
    sheet.write(1, 4, "€ 2.500.000").unwrap();
    sheet.write(1, 5, 4000.5).unwrap();
    sheet.write(1, 6, "n/a").unwrap();

    // group cell left blank
    sheet.write(2, 1, "Profit [% w.r.t. total cost]").unwrap();
    sheet.write(2, 2, 0.12).unwrap();
    sheet.write(2, 3, -0.05).unwrap();
    sheet.write(2, 4, 0.0).unwrap();
    sheet.write(2, 5, "-0,1").unwrap();
    sheet.write(2, 6, 0.3).unwrap();

    workbook.save(path).unwrap();
}

#[test]
fn test_xlsx_kpi_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("KPI_table.xlsx");
    write_workbook(&path, "KPI");

    let table = KpiTableLoader::default().load(&path).unwrap();
    assert_eq!(table.len(), 2);

    let cost = table.find("Total cost [€]").unwrap();
    assert_eq!(cost.group, "Financial (quantitative)");
    assert_eq!(
        cost.values,
        [Some(1234.56), Some(2000.0), Some(2500000.0), Some(4000.5), None]
    );

    let profit = table.find("Profit [% w.r.t. total cost]").unwrap();
    assert_eq!(profit.group, "Financial (quantitative)");
    assert_eq!(
        profit.values,
        [Some(0.12), Some(-0.05), Some(0.0), Some(-0.1), Some(0.3)]
    );
}

#[test]
fn test_xlsx_wrong_sheet_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("KPI_table.xlsx");
    write_workbook(&path, "Data");

    let err = KpiTableLoader::default().load(&path).unwrap_err();
    assert!(matches!(err, DashboardError::Spreadsheet(_)));
}
