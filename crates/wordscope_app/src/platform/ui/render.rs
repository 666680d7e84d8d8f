use std::fmt::Write;

use wordscope_core::{AppViewModel, ChartKind, RankedEntry, StatusView};

/// Text shown in the terminal for a view. The chart itself goes to an HTML page.
pub fn render(view: &AppViewModel, timestamp: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{timestamp}] {}", status_line(&view.status));

    if let Some(analysis) = &view.analysis {
        let _ = writeln!(out, "\nTop {} words by frequency:", analysis.top.len());
        out.push_str(&format_table(&analysis.top));
        match analysis.frequency_bounds {
            Some((low, high)) => {
                let _ = writeln!(
                    out,
                    "\nMinimum frequency: {} (range {low}..={high}), {} words charted",
                    analysis.min_frequency,
                    analysis.ranked.len()
                );
            }
            None => {
                let _ = writeln!(out, "\nNo words survived the length filter.");
            }
        }
        let _ = writeln!(out, "Chart: {}", view.chart);
    }
    out
}

fn status_line(status: &StatusView) -> String {
    match status {
        StatusView::Idle => "Enter a URL to analyse (:help for commands).".to_string(),
        StatusView::Loading { url } => format!("Fetching {url} ..."),
        StatusView::Failed { url, message } => {
            format!("Text fetch failed for {url}: {message}")
        }
        StatusView::Ready {
            url,
            title,
            token_count,
        } => match title {
            Some(title) => {
                format!("Text fetched successfully: \"{title}\" ({token_count} tokens) from {url}")
            }
            None => format!("Text fetched successfully ({token_count} tokens) from {url}"),
        },
    }
}

pub fn format_table(rows: &[RankedEntry]) -> String {
    let rank_width = rows.len().to_string().len().max(1);
    let word_width = rows
        .iter()
        .map(|row| row.token.chars().count())
        .chain(std::iter::once("word".len()))
        .max()
        .unwrap_or(4);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>rank_width$}  {:<word_width$}  count",
        "#", "word"
    );
    for (i, row) in rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>rank_width$}  {:<word_width$}  {}",
            i + 1,
            row.token,
            row.count
        );
    }
    out
}

pub fn chart_list(current: ChartKind) -> String {
    ChartKind::ALL
        .iter()
        .map(|kind| {
            if *kind == current {
                format!("* {kind}")
            } else {
                format!("  {kind}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
