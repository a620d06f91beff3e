//! Plain-text rendering of a pipeline result as a horizontal bar chart.

use crate::dataset::{Dataset, Metric};
use std::fmt::Write;

/// Message shown when a run produced no dataset.
pub const UNAVAILABLE_MESSAGE: &str = "Data cannot be retrieved";

/// Render a run result.
///
/// `None` renders as [`UNAVAILABLE_MESSAGE`]. A dataset renders as its title
/// lines, one bar per row scaled so the largest metric spans `bar_width`
/// characters, and a closing mean line. The mean is also marked across the
/// bars as a tick column (`:` past a bar's end, `+` inside it) with an
/// `Avg.` label underneath.
pub fn render_report(dataset: Option<&Dataset>, bar_width: usize) -> String {
    let Some(dataset) = dataset else {
        return format!("{}\n", UNAVAILABLE_MESSAGE);
    };

    let mut out = String::new();
    for line in dataset.summary().title.lines() {
        let _ = writeln!(out, "{}", line);
    }
    out.push('\n');

    let name_width = dataset.names().iter().map(|n| n.chars().count()).max().unwrap_or(0);
    let max = dataset.max_metric().unwrap_or(0);
    let mean = dataset.summary().mean;
    let tick = mean_column(mean, max, bar_width);

    for record in dataset.records() {
        let _ = writeln!(
            out,
            "{} {:<name_width$} |{}| {}",
            record.code,
            record.name,
            bar(bar_length(record.metric, max, bar_width), bar_width, tick),
            record.metric,
            name_width = name_width,
        );
    }

    if let Some(column) = tick {
        // Code, space, name, space and the opening frame precede the bars
        let indent = 2 + 1 + name_width + 2 + column;
        let _ = writeln!(out, "{:indent$}^ Avg.: {:.0}", "", mean.round(), indent = indent);
    }

    out.push('\n');
    let _ = writeln!(out, "Mean: {:.2}", mean);
    out
}

/// One bar cell of `bar_width` characters, with the mean tick drawn in.
fn bar(length: usize, bar_width: usize, tick: Option<usize>) -> String {
    (0..bar_width)
        .map(|i| match (i < length, tick == Some(i)) {
            (true, true) => '+',
            (true, false) => '#',
            (false, true) => ':',
            (false, false) => ' ',
        })
        .collect()
}

/// Bar length for `value`, rounded to the nearest character.
fn bar_length(value: Metric, max: Metric, bar_width: usize) -> usize {
    if max == 0 {
        return 0;
    }
    let scaled = u64::from(value) * bar_width as u64;
    ((scaled + u64::from(max) / 2) / u64::from(max)) as usize
}

/// Column of the mean tick, kept inside the bar cell. `None` when nothing
/// can be scaled.
fn mean_column(mean: f64, max: Metric, bar_width: usize) -> Option<usize> {
    if max == 0 || bar_width == 0 {
        return None;
    }
    let column = (mean * bar_width as f64 / f64::from(max)).round() as usize;
    Some(column.min(bar_width - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Columns;
    use crate::transform::{sort_descending, summarize};

    fn sample() -> Dataset {
        let columns = Columns::from_rows([
            ("AT".parse().unwrap(), "Austria", 50),
            ("BE".parse().unwrap(), "Belgium", 60),
            ("DE".parse().unwrap(), "Germany", 70),
        ]);
        summarize(sort_descending(&columns), "GDP per capita\nBased on Eurostat data")
    }

    #[test]
    fn test_unavailable() {
        assert_eq!(render_report(None, 40), "Data cannot be retrieved\n");
    }

    #[test]
    fn test_report_layout() {
        let report = render_report(Some(&sample()), 14);
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[0], "GDP per capita");
        assert_eq!(lines[1], "Based on Eurostat data");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "DE Germany |############+#| 70");
        assert_eq!(lines[4], "BE Belgium |############: | 60");
        assert_eq!(lines[5], "AT Austria |##########  : | 50");
        assert_eq!(lines[6], format!("{}^ Avg.: 60", " ".repeat(24)));
        assert_eq!(lines[7], "");
        assert_eq!(lines[8], "Mean: 60.00");
    }

    #[test]
    fn test_bar_length() {
        assert_eq!(bar_length(70, 70, 40), 40);
        assert_eq!(bar_length(35, 70, 40), 20);
        assert_eq!(bar_length(0, 70, 40), 0);
        assert_eq!(bar_length(0, 0, 40), 0);
        assert_eq!(bar_length(u32::MAX, u32::MAX, 40), 40);
    }

    #[test]
    fn test_mean_column() {
        assert_eq!(mean_column(60.0, 70, 14), Some(12));
        assert_eq!(mean_column(70.0, 70, 14), Some(13));
        assert_eq!(mean_column(0.0, 70, 14), Some(0));
        assert_eq!(mean_column(10.0, 0, 14), None);
        assert_eq!(mean_column(10.0, 10, 0), None);
    }

    #[test]
    fn test_avg_label_rounds_mean() {
        let columns = Columns::from_rows([
            ("AT".parse().unwrap(), "Austria", 1),
            ("BE".parse().unwrap(), "Belgium", 2),
        ]);
        let report = render_report(Some(&summarize(sort_descending(&columns), "T")), 10);
        assert!(report.contains("^ Avg.: 2\n"));
        assert!(report.contains("Mean: 1.50"));
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = summarize(Columns::default(), "Empty");
        let report = render_report(Some(&dataset), 10);
        assert_eq!(report, "Empty\n\n\nMean: 0.00\n");
    }
}
