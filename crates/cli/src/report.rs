use lookout_protocol::{HistoryRow, HistoryStats, HistoryView};

const QUERY_WIDTH: usize = 32;

pub fn render_stats(stats: &HistoryStats) -> String {
    let mut out = format!("Total searches: {}\nResults found: {}\n", stats.total, stats.found);
    for (kind, count) in &stats.by_type {
        out.push_str(&format!("  {kind}: {count}\n"));
    }
    out.truncate(out.trim_end().len());
    out
}

pub fn render_view(view: &HistoryView) -> String {
    let HistoryView::Rows {
        filter,
        sort,
        total_matches,
        rows,
    } = view
    else {
        return view.message().unwrap_or_default().to_string();
    };

    let mut out = String::new();
    for row in rows {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    if rows.len() < *total_matches {
        out.push_str(&format!("... {} more\n", total_matches - rows.len()));
    }
    out.push_str(&format!(
        "{} of {total_matches} (filter: {filter}, sort: {sort})",
        rows.len()
    ));
    out
}

fn render_row(row: &HistoryRow) -> String {
    let mut line = format!(
        "{:<18} {:<width$} {:<25} found={}",
        format!("[{}]", row.label),
        truncate_one_line(&row.query, QUERY_WIDTH),
        row.timestamp.as_deref().unwrap_or("-"),
        row.found,
        width = QUERY_WIDTH,
    );
    if let Some(error) = &row.error {
        line.push_str(&format!(" error: {}", truncate_one_line(error, QUERY_WIDTH)));
    }
    for link in &row.links {
        line.push_str(&format!("\n{:<18} {link}", ""));
    }
    line
}

fn truncate_one_line(text: &str, max_chars: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() <= max_chars {
        return line.to_string();
    }
    let mut out: String = line.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}
