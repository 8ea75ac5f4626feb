//! Helpers to convert backend data into table rows and chart models.

use egui::Color32;

use crate::api::{HistoryEntry, Summary, TypeDistribution};

/// Placeholder shown for absent numeric values.
pub const MISSING: &str = "N/A";

/// Pie slice colors, assigned cyclically.
pub const PIE_PALETTE: [Color32; 6] = [
    Color32::from_rgb(0xFF, 0x63, 0x84),
    Color32::from_rgb(0x36, 0xA2, 0xEB),
    Color32::from_rgb(0xFF, 0xCE, 0x56),
    Color32::from_rgb(0x4B, 0xC0, 0xC0),
    Color32::from_rgb(0x99, 0x66, 0xFF),
    Color32::from_rgb(0xFF, 0x9F, 0x40),
];

/// Fill of the dashboard averages chart.
pub const DASHBOARD_BAR_COLOR: Color32 = Color32::from_rgb(0x4A, 0x90, 0xE2);
/// Fill of the visualizations averages chart.
pub const VISUALIZATION_BAR_COLOR: Color32 = Color32::from_rgb(0x36, 0xA2, 0xEB);

/// Decimal places per measurement.
pub const FLOWRATE_DECIMALS: usize = 2;
pub const PRESSURE_DECIMALS: usize = 2;
pub const TEMPERATURE_DECIMALS: usize = 1;

pub const FETCH_SUMMARY_BUTTON: &str = "Fetch Summary";
pub const FETCH_HISTORY_BUTTON: &str = "Fetch History";
pub const GENERATE_VISUALIZATIONS_BUTTON: &str = "Generate Visualizations";

/// Placeholder shown on a page until its first fetch.
pub fn load_hint(button: &str) -> String {
    format!("Click \"{button}\" to load data.")
}

/// Format with fixed precision, or [`MISSING`] when absent or not finite.
pub fn format_measure(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(value) if value.is_finite() => format!("{value:.decimals$}"),
        _ => MISSING.to_string(),
    }
}

/// A value cell: plain text, or pre-formatted multi-line JSON.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CellValue {
    Text(String),
    Json(String),
}

impl CellValue {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(text) | Self::Json(text) => text,
        }
    }
}

/// One Metric/Value row of the dashboard table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryRow {
    pub metric: &'static str,
    pub value: CellValue,
}

pub fn summary_rows(summary: &Summary) -> Vec<SummaryRow> {
    vec![
        SummaryRow {
            metric: "Total Count",
            value: CellValue::Text(summary.total_count.to_string()),
        },
        SummaryRow {
            metric: "Average Flowrate",
            value: CellValue::Text(format_measure(summary.avg_flowrate, FLOWRATE_DECIMALS)),
        },
        SummaryRow {
            metric: "Average Pressure",
            value: CellValue::Text(format_measure(summary.avg_pressure, PRESSURE_DECIMALS)),
        },
        SummaryRow {
            metric: "Average Temperature",
            value: CellValue::Text(format_measure(
                summary.avg_temperature,
                TEMPERATURE_DECIMALS,
            )),
        },
        SummaryRow {
            metric: "Type Distribution",
            value: CellValue::Json(summary.type_distribution.to_pretty_json()),
        },
    ]
}

pub const HISTORY_COLUMNS: [&str; 7] = [
    "ID",
    "Upload Date",
    "Total Count",
    "Avg Flowrate",
    "Avg Pressure",
    "Avg Temperature",
    "Type Distribution",
];

/// One rendered history row, cells in [`HISTORY_COLUMNS`] order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRow {
    pub id: String,
    pub upload_date: String,
    pub total_count: String,
    pub avg_flowrate: String,
    pub avg_pressure: String,
    pub avg_temperature: String,
    pub type_distribution: String,
}

impl HistoryRow {
    pub fn cells(&self) -> [&str; 7] {
        [
            &self.id,
            &self.upload_date,
            &self.total_count,
            &self.avg_flowrate,
            &self.avg_pressure,
            &self.avg_temperature,
            &self.type_distribution,
        ]
    }
}

/// Map entries to rows one-to-one, preserving backend order.
pub fn history_rows(entries: &[HistoryEntry]) -> Vec<HistoryRow> {
    entries
        .iter()
        .map(|entry| HistoryRow {
            id: entry.id.to_string(),
            upload_date: if entry.upload_date.is_empty() {
                MISSING.to_string()
            } else {
                entry.upload_date.clone()
            },
            total_count: entry.summary.total_count.to_string(),
            avg_flowrate: format_measure(entry.summary.avg_flowrate, FLOWRATE_DECIMALS),
            avg_pressure: format_measure(entry.summary.avg_pressure, PRESSURE_DECIMALS),
            avg_temperature: format_measure(entry.summary.avg_temperature, TEMPERATURE_DECIMALS),
            type_distribution: entry.summary.type_distribution.to_pretty_json(),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub count: u64,
    /// Share of the total, 0.0..=1.0.
    pub fraction: f32,
    pub color: Color32,
}

impl PieSlice {
    /// Percentage label with one decimal, e.g. `"33.3%"`.
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.fraction * 100.0)
    }
}

/// One slice per distribution key, colors cycling through [`PIE_PALETTE`].
pub fn pie_slices(distribution: &TypeDistribution) -> Vec<PieSlice> {
    let total = distribution.total();
    distribution
        .entries()
        .iter()
        .enumerate()
        .map(|(index, (label, count))| PieSlice {
            label: label.clone(),
            count: *count,
            fraction: if total == 0 {
                0.0
            } else {
                *count as f32 / total as f32
            },
            color: PIE_PALETTE[index % PIE_PALETTE.len()],
        })
        .collect()
}

/// The pie has nothing to draw when every slice is empty.
pub fn pie_is_drawable(slices: &[PieSlice]) -> bool {
    slices.iter().any(|slice| slice.count > 0)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
    pub label: &'static str,
    /// `None` draws no bar and shows [`MISSING`] as the label.
    pub value: Option<f64>,
    pub value_label: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BarChart {
    pub title: &'static str,
    pub bars: Vec<Bar>,
    pub color: Color32,
}

impl BarChart {
    /// Top of the value axis: 15% headroom over the tallest bar, never below 1.
    pub fn axis_max(&self) -> f64 {
        let tallest = self
            .bars
            .iter()
            .filter_map(|bar| bar.value)
            .filter(|value| value.is_finite())
            .fold(0.0_f64, f64::max);
        (tallest * 1.15).max(1.0)
    }
}

fn averages_chart(
    summary: &Summary,
    title: &'static str,
    labels: [&'static str; 3],
    color: Color32,
) -> BarChart {
    let measures = [
        (summary.avg_flowrate, FLOWRATE_DECIMALS),
        (summary.avg_pressure, PRESSURE_DECIMALS),
        (summary.avg_temperature, TEMPERATURE_DECIMALS),
    ];
    let bars = labels
        .into_iter()
        .zip(measures)
        .map(|(label, (value, decimals))| Bar {
            label,
            value: value.filter(|value| value.is_finite()),
            value_label: format_measure(value, decimals),
        })
        .collect();
    BarChart { title, bars, color }
}

pub fn dashboard_averages_chart(summary: &Summary) -> BarChart {
    averages_chart(
        summary,
        "Averages Chart",
        ["Flowrate", "Pressure", "Temperature"],
        DASHBOARD_BAR_COLOR,
    )
}

pub fn visualization_averages_chart(summary: &Summary) -> BarChart {
    averages_chart(
        summary,
        "Averages",
        ["Avg Flowrate", "Avg Pressure", "Avg Temperature"],
        VISUALIZATION_BAR_COLOR,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_summary() -> Summary {
        Summary {
            total_count: 42,
            avg_flowrate: Some(3.14159),
            avg_pressure: None,
            avg_temperature: Some(98.76),
            type_distribution: TypeDistribution::new(vec![
                ("Pump".into(), 2),
                ("Valve".into(), 1),
            ]),
        }
    }

    fn history_entry(id: i64) -> HistoryEntry {
        HistoryEntry {
            id,
            upload_date: format!("2024-05-0{id}T08:00:00+00:00"),
            summary: Summary {
                total_count: id as u64 * 10,
                avg_flowrate: Some(id as f64 + 0.005),
                avg_pressure: Some(5.0),
                avg_temperature: None,
                type_distribution: TypeDistribution::default(),
            },
        }
    }

    #[test]
    fn dashboard_rows_apply_precision_and_missing_marker() {
        let rows = summary_rows(&sample_summary());
        let values: Vec<(&str, &str)> = rows
            .iter()
            .map(|row| (row.metric, row.value.as_str()))
            .collect();
        assert_eq!(values[0], ("Total Count", "42"));
        assert_eq!(values[1], ("Average Flowrate", "3.14"));
        assert_eq!(values[2], ("Average Pressure", "N/A"));
        assert_eq!(values[3], ("Average Temperature", "98.8"));
        assert!(matches!(rows[4].value, CellValue::Json(_)));
        assert!(rows[4].value.as_str().contains("\"Pump\": 2"));
    }

    #[test]
    fn load_hints_name_the_page_button() {
        assert_eq!(
            load_hint(FETCH_SUMMARY_BUTTON),
            "Click \"Fetch Summary\" to load data."
        );
        assert_eq!(
            load_hint(FETCH_HISTORY_BUTTON),
            "Click \"Fetch History\" to load data."
        );
        assert_eq!(
            load_hint(GENERATE_VISUALIZATIONS_BUTTON),
            "Click \"Generate Visualizations\" to load data."
        );
    }

    #[test]
    fn zero_is_a_value_not_missing() {
        assert_eq!(format_measure(Some(0.0), 2), "0.00");
        assert_eq!(format_measure(Some(f64::NAN), 2), "N/A");
        assert_eq!(format_measure(None, 1), "N/A");
    }

    #[test]
    fn history_rows_keep_backend_order() {
        let mut entries: Vec<HistoryEntry> =
            [5, 3, 4, 1, 2].into_iter().map(history_entry).collect();
        entries[1].summary.avg_temperature = Some(98.76);
        let rows = history_rows(&entries);
        assert_eq!(rows.len(), 5);
        let ids: Vec<&str> = rows.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, ["5", "3", "4", "1", "2"]);
        assert_eq!(rows[0].avg_pressure, "5.00");
        assert_eq!(rows[0].avg_temperature, "N/A");
        assert_eq!(rows[1].avg_temperature, "98.8");
        assert_eq!(rows[0].type_distribution, "{}");
        assert_eq!(rows[0].cells().len(), HISTORY_COLUMNS.len());
    }

    #[test]
    fn pie_has_one_slice_per_key_and_cycles_palette() {
        let distribution = TypeDistribution::new(
            (0..8).map(|i| (format!("Type{i}"), i as u64 + 1)).collect(),
        );
        let slices = pie_slices(&distribution);
        assert_eq!(slices.len(), 8);
        assert_eq!(slices[6].color, PIE_PALETTE[0]);
        assert_eq!(slices[7].color, PIE_PALETTE[1]);
        let total: f32 = slices.iter().map(|slice| slice.fraction).sum();
        assert!((total - 1.0).abs() < 1e-5);
    }

    #[test]
    fn empty_or_zero_distribution_is_not_drawable() {
        assert!(!pie_is_drawable(&pie_slices(&TypeDistribution::default())));
        let zeros = TypeDistribution::new(vec![("Pump".into(), 0)]);
        let slices = pie_slices(&zeros);
        assert_eq!(slices.len(), 1);
        assert!(!pie_is_drawable(&slices));
    }

    #[test]
    fn percent_label_has_one_decimal() {
        let slices = pie_slices(&TypeDistribution::new(vec![
            ("A".into(), 1),
            ("B".into(), 2),
        ]));
        assert_eq!(slices[0].percent_label(), "33.3%");
        assert_eq!(slices[1].percent_label(), "66.7%");
    }

    #[test]
    fn bar_charts_keep_numbers_and_format_labels() {
        let chart = visualization_averages_chart(&sample_summary());
        assert_eq!(chart.bars.len(), 3);
        assert_eq!(chart.bars[0].value, Some(3.14159));
        assert_eq!(chart.bars[0].value_label, "3.14");
        assert_eq!(chart.bars[1].value, None);
        assert_eq!(chart.bars[1].value_label, "N/A");
        assert_eq!(chart.bars[2].value_label, "98.8");
        assert!((chart.axis_max() - 98.76 * 1.15).abs() < 1e-9);

        let dashboard = dashboard_averages_chart(&Summary::default());
        assert_eq!(dashboard.axis_max(), 1.0);
        assert_eq!(dashboard.bars[2].label, "Temperature");
    }
}
