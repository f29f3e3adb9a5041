use productible_core::model::{ExtractionWarning, Metric, MonthlySeries};
use productible_core::tables::ReportTable;
use productible_core::ReportOutcome;

pub fn print_series(metric: Metric, series: &MonthlySeries) {
    let unit = match metric {
        Metric::Energy => "kWh",
        Metric::Irradiation => "kWh/m²",
    };
    println!("  {:<10}  {} ({})", "Mois", metric, unit);
    for (month, value) in series.iter() {
        match value {
            Some(v) => println!("  {:<10}  {}", month.name(), v),
            None => println!("  {:<10}  -", month.name()),
        }
    }
    println!();
}

pub fn print_warnings(warnings: &[ExtractionWarning]) {
    if warnings.is_empty() {
        return;
    }
    println!("Warnings:");
    for w in warnings {
        println!("  {} {} {}: {}", w.document, w.metric, w.month, w.reason);
    }
    println!();
}

/// Print a report table with every column padded to its widest cell.
pub fn print_table(table: &ReportTable) {
    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect();

    let widths: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            cells
                .iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    println!("=== {} ===\n", table.title.trim_end_matches([' ', ':']));
    print_row(&table.headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    print_row(&rule, &widths);
    for row in &cells {
        print_row(row, &widths);
    }
    println!();
}

fn print_row(cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(c, w)| format!("{:<width$}", c, width = *w))
        .collect();
    println!("  {}", padded.join("  ").trim_end());
}

pub fn print_report(outcome: &ReportOutcome) {
    println!(
        "MET: {}  PVGIS: {}  uplift P50 -> P90: {}\n",
        outcome.met_format, outcome.pvgis_format, outcome.uplift
    );
    for table in outcome.tables.in_order() {
        print_table(table);
    }
    print_warnings(&outcome.warnings);
}
