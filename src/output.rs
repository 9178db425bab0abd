//! Output formatting and persistence for analysis reports.
//!
//! Supports human-readable text, JSON, CSV summary append, and raw trip pages.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use tracing::debug;

use crate::analyzers::types::{FieldValue, ValueCount};
use crate::session::AnalysisReport;
use crate::trip::TripRecord;

const RULE: &str = "----------------------------------------";

/// Writes the report as readable sections.
pub fn render(report: &AnalysisReport, out: &mut impl Write) -> io::Result<()> {
    let s = &report.summary;

    writeln!(
        out,
        "{} | month: {} | day: {} | {} trips",
        report.city,
        report.criteria.month(),
        report.criteria.weekday(),
        report.matched
    )?;
    if report.load.excluded() > 0 {
        writeln!(
            out,
            "({} malformed rows excluded at load)",
            report.load.excluded()
        )?;
    }
    if report.load.malformed_birth_years > 0 {
        writeln!(
            out,
            "({} unreadable birth years ignored)",
            report.load.malformed_birth_years
        )?;
    }
    writeln!(out, "{RULE}")?;

    writeln!(out, "Most frequent times of travel")?;
    writeln!(out, "  month:      {}", s.time.mode_month)?;
    writeln!(out, "  day:        {}", s.time.mode_weekday)?;
    writeln!(out, "  start hour: {}", s.time.mode_start_hour)?;
    writeln!(out, "{RULE}")?;

    writeln!(out, "Most popular stations and trip")?;
    writeln!(
        out,
        "  start station: {} ({} trips)",
        s.stations.top_start_station, s.stations.top_start_count
    )?;
    writeln!(
        out,
        "  end station:   {} ({} trips)",
        s.stations.top_end_station, s.stations.top_end_count
    )?;
    writeln!(
        out,
        "  trip:          {} -> {} ({} trips)",
        s.stations.top_pair.start, s.stations.top_pair.end, s.stations.top_pair_count
    )?;
    writeln!(out, "{RULE}")?;

    writeln!(out, "Trip duration")?;
    writeln!(out, "  total: {} hours", s.durations.total_travel_hours)?;
    writeln!(out, "  mean:  {} minutes", s.durations.mean_travel_minutes)?;
    if s.durations.negative_trips > 0 {
        writeln!(
            out,
            "  ({} trips end before they start)",
            s.durations.negative_trips
        )?;
    }
    writeln!(out, "{RULE}")?;

    writeln!(out, "User stats")?;
    render_counts(out, "user type", &s.riders.user_types)?;
    render_counts(out, "gender", &s.riders.genders)?;
    render_year(out, "earliest year of birth", &s.riders.earliest_birth_year)?;
    render_year(out, "most recent year of birth", &s.riders.latest_birth_year)?;
    render_year(out, "most common year of birth", &s.riders.most_common_birth_year)?;
    writeln!(out, "{RULE}")?;

    Ok(())
}

fn render_counts(
    out: &mut impl Write,
    label: &str,
    counts: &FieldValue<Vec<ValueCount>>,
) -> io::Result<()> {
    match counts {
        FieldValue::Present(rows) => {
            writeln!(out, "  {label}:")?;
            for row in rows {
                writeln!(out, "    {:<12} {}", row.value, row.count)?;
            }
            Ok(())
        }
        FieldValue::Absent => writeln!(out, "  {label}: no {label} data in dataset"),
    }
}

fn render_year(out: &mut impl Write, label: &str, year: &FieldValue<i32>) -> io::Result<()> {
    match year {
        FieldValue::Present(y) => writeln!(out, "  {label}: {y}"),
        FieldValue::Absent => writeln!(out, "  {label}: no birth year data in dataset"),
    }
}

/// Prints the report to stdout.
pub fn print_pretty(report: &AnalysisReport) -> Result<()> {
    let stdout = io::stdout();
    render(report, &mut stdout.lock())?;
    Ok(())
}

/// Prints the report to stdout as pretty-printed JSON.
pub fn print_json(report: &AnalysisReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Writes a page of raw trips, numbering rows from `first_index`.
pub fn render_page(
    page: &[&TripRecord],
    first_index: usize,
    out: &mut impl Write,
) -> io::Result<()> {
    for (i, trip) in page.iter().enumerate() {
        writeln!(
            out,
            "{:>6}  {}  {}  {} -> {}  {}",
            first_index + i,
            trip.start_time().format("%Y-%m-%d %H:%M:%S"),
            trip.end_time().format("%Y-%m-%d %H:%M:%S"),
            trip.start_station(),
            trip.end_station(),
            trip.user_type().unwrap_or("-"),
        )?;
    }
    Ok(())
}

/// One flattened CSV row per report.
#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    generated_at: DateTime<Utc>,
    city: &'a str,
    month: &'a str,
    weekday: &'a str,
    matched: usize,
    excluded_rows: usize,
    mode_month: &'a str,
    mode_weekday: &'a str,
    mode_start_hour: u32,
    top_start_station: &'a str,
    top_start_count: usize,
    top_end_station: &'a str,
    top_end_count: usize,
    top_pair_start: &'a str,
    top_pair_end: &'a str,
    top_pair_count: usize,
    total_travel_hours: f64,
    mean_travel_minutes: f64,
    negative_trips: usize,
    top_user_type: Option<&'a str>,
    top_gender: Option<&'a str>,
    earliest_birth_year: Option<i32>,
    latest_birth_year: Option<i32>,
    most_common_birth_year: Option<i32>,
}

impl<'a> SummaryRow<'a> {
    fn from_report(report: &'a AnalysisReport) -> Self {
        let s = &report.summary;
        let top = |counts: &'a FieldValue<Vec<ValueCount>>| {
            counts
                .as_option()
                .and_then(|rows| rows.first())
                .map(|row| row.value.as_str())
        };

        SummaryRow {
            generated_at: Utc::now(),
            city: &report.city,
            month: report.criteria.month(),
            weekday: report.criteria.weekday(),
            matched: report.matched,
            excluded_rows: report.load.excluded(),
            mode_month: &s.time.mode_month,
            mode_weekday: &s.time.mode_weekday,
            mode_start_hour: s.time.mode_start_hour,
            top_start_station: &s.stations.top_start_station,
            top_start_count: s.stations.top_start_count,
            top_end_station: &s.stations.top_end_station,
            top_end_count: s.stations.top_end_count,
            top_pair_start: &s.stations.top_pair.start,
            top_pair_end: &s.stations.top_pair.end,
            top_pair_count: s.stations.top_pair_count,
            total_travel_hours: s.durations.total_travel_hours,
            mean_travel_minutes: s.durations.mean_travel_minutes,
            negative_trips: s.durations.negative_trips,
            top_user_type: top(&s.riders.user_types),
            top_gender: top(&s.riders.genders),
            earliest_birth_year: s.riders.earliest_birth_year.as_option().copied(),
            latest_birth_year: s.riders.latest_birth_year.as_option().copied(),
            most_common_birth_year: s.riders.most_common_birth_year.as_option().copied(),
        }
    }
}

/// Appends a report as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_summary(path: &Path, report: &AnalysisReport) -> Result<()> {
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending CSV summary");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    writer.serialize(SummaryRow::from_report(report))?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::fixtures::{trip, view};
    use crate::analyzers::types::{
        DurationStats, RiderStats, StationPair, StationStats, TimeStats,
    };
    use crate::filter::FilterCriteria;
    use crate::loader::LoadReport;
    use crate::session::TripSummary;
    use std::fs;

    fn report() -> AnalysisReport {
        AnalysisReport {
            city: "washington".into(),
            criteria: FilterCriteria::new("june", "all"),
            load: LoadReport {
                rows_read: 10,
                malformed_timestamps: 1,
                missing_stations: 0,
                malformed_birth_years: 2,
            },
            matched: 9,
            summary: TripSummary {
                time: TimeStats {
                    mode_month: "June".into(),
                    mode_weekday: "Wednesday".into(),
                    mode_start_hour: 17,
                },
                stations: StationStats {
                    top_start_station: "Union Station".into(),
                    top_start_count: 4,
                    top_end_station: "Lincoln Memorial".into(),
                    top_end_count: 3,
                    top_pair: StationPair {
                        start: "Union Station".into(),
                        end: "Lincoln Memorial".into(),
                    },
                    top_pair_count: 2,
                },
                durations: DurationStats {
                    total_travel_hours: 1.5,
                    mean_travel_minutes: 10.0,
                    trip_count: 9,
                    negative_trips: 0,
                },
                riders: RiderStats {
                    user_types: FieldValue::Present(vec![ValueCount {
                        value: "Subscriber".into(),
                        count: 9,
                    }]),
                    genders: FieldValue::Absent,
                    earliest_birth_year: FieldValue::Absent,
                    latest_birth_year: FieldValue::Absent,
                    most_common_birth_year: FieldValue::Absent,
                },
            },
        }
    }

    fn rendered() -> String {
        let mut buf = Vec::new();
        render(&report(), &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_render_sections() {
        let text = rendered();
        assert!(text.starts_with("washington | month: June | day: all | 9 trips"));
        assert!(text.contains("(1 malformed rows excluded at load)"));
        assert!(text.contains("(2 unreadable birth years ignored)"));
        assert!(text.contains("start hour: 17"));
        assert!(text.contains("Union Station -> Lincoln Memorial (2 trips)"));
        assert!(text.contains("total: 1.5 hours"));
        assert!(text.contains("Subscriber"));
    }

    #[test]
    fn test_render_absent_fields() {
        let text = rendered();
        assert!(text.contains("gender: no gender data in dataset"));
        assert!(text.contains("earliest year of birth: no birth year data in dataset"));
    }

    #[test]
    fn test_json_marks_absent_fields() {
        let json = serde_json::to_value(report()).unwrap();
        assert_eq!(json["summary"]["riders"]["genders"]["status"], "absent");
        assert_eq!(json["summary"]["riders"]["user_types"]["status"], "present");
        assert_eq!(
            json["summary"]["riders"]["user_types"]["value"][0]["count"],
            9
        );
        assert_eq!(json["criteria"]["month"], "June");
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&report()).unwrap();
    }

    #[test]
    fn test_render_page() {
        let records = vec![
            trip("2024-01-01T08:00", "2024-01-01T08:15", "A", "B"),
            trip("2024-01-02T08:00", "2024-01-02T08:05", "C", "D"),
        ];
        let mut buf = Vec::new();
        render_page(&view(&records), 5, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].trim_start().starts_with("5  2024-01-01 08:00:00"));
        assert!(lines[1].contains("C -> D"));
    }

    #[test]
    fn test_append_summary_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");

        append_summary(&path, &report()).unwrap();
        append_summary(&path, &report()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        // 1 header + 2 data rows
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("generated_at,city,month"));
        assert_eq!(
            content.lines().filter(|l| l.contains("generated_at")).count(),
            1
        );
        assert!(lines[1].contains("washington,June,all,9,1"));
        // absent fields serialize as empty cells
        assert!(lines[1].ends_with("Subscriber,,,,"));
    }
}
