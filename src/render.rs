//! Summary table markup.

use std::fmt::Write;

use crate::aggregate::{Aggregation, GroupSummary};
use crate::time_value::format_seconds_to_hours;

/// Element id of the rendered table; the reconciler measures content holding exactly one.
pub const REPORT_TABLE_ID: &str = "sprintOverview";

const HEADERS: [&str; 6] = ["Group", "Target", "Original estimate", "Logged", "Remaining", "Diff"];
const CELL: &str = "style='padding: 4px'";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStyle {
    Over,
    Under,
}

impl RowStyle {
    pub fn of(row: &GroupSummary) -> Self {
        if row.is_over_target() {
            RowStyle::Over
        } else {
            RowStyle::Under
        }
    }

    pub fn background(self) -> &'static str {
        match self {
            RowStyle::Over => "#FFB8C0",
            RowStyle::Under => "#B8E0C0",
        }
    }
}

pub fn render_aggregation(agg: &Aggregation, link_for: &dyn Fn(&str) -> String) -> String {
    render(&agg.rows, &agg.totals, link_for)
}

/// Render rows plus a totals row. `link_for` maps a group label to its query URL.
pub fn render(rows: &[GroupSummary], totals: &GroupSummary, link_for: &dyn Fn(&str) -> String) -> String {
    let mut html = format!("<table id=\"{}\" width=\"100%\">\n  <tr>\n", REPORT_TABLE_ID);
    for h in HEADERS {
        let _ = writeln!(html, "    <th>{}</th>", h);
    }
    html.push_str("  </tr>\n");

    for row in rows {
        let _ = write!(
            html,
            "  <tr style=\"background:{}; text-align: right;\">\n    <td {} align=\"center\"><a style=\"text-decoration:none\" href=\"{}\">{}</a></td>\n",
            RowStyle::of(row).background(),
            CELL,
            html_escape(&link_for(&row.label)),
            html_escape(&row.label),
        );
        push_cells(&mut html, "td", row, row.diff());
        html.push_str("  </tr>\n");
    }

    let _ = write!(
        html,
        "  <tr style=\"text-align: right;\">\n    <th {} align=\"center\">{}</th>\n",
        CELL,
        html_escape(&totals.label)
    );
    push_cells(&mut html, "th", totals, totals.diff());
    html.push_str("  </tr>\n</table>");
    html
}

fn push_cells(html: &mut String, tag: &str, row: &GroupSummary, diff: i64) {
    for secs in [row.target, row.original_estimate, row.logged, row.remaining_estimate, diff] {
        let _ = writeln!(html, "    <{tag} {CELL}>{}</{tag}>", format_seconds_to_hours(secs));
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::record::RawRecord;

    fn link(label: &str) -> String {
        format!("/issues/?jql=group={}", label)
    }

    fn rec(key: &str, target: &str, rem: i64, logged: i64) -> RawRecord {
        RawRecord {
            group_key: key.to_string(),
            target: Some(target.to_string()),
            original_estimate: 3600,
            remaining_estimate: rem,
            logged,
        }
    }

    #[test]
    fn header_and_table_id() {
        let agg = aggregate(&[]).unwrap();
        let html = render_aggregation(&agg, &link);
        assert!(html.starts_with("<table id=\"sprintOverview\""));
        for h in HEADERS {
            assert!(html.contains(&format!("<th>{}</th>", h)));
        }
        assert!(html.ends_with("</table>"));
    }

    #[test]
    fn rows_follow_label_order() {
        let agg = aggregate(&[rec("B", "1", 0, 0), rec("A", "1", 0, 0), rec("C", "1", 0, 0)]).unwrap();
        let html = render_aggregation(&agg, &link);
        let a = html.find(">A</a>").unwrap();
        let b = html.find(">B</a>").unwrap();
        let c = html.find(">C</a>").unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn under_target_row() {
        let agg = aggregate(&[rec("A1", "1,5", 1800, 1800)]).unwrap();
        let html = render_aggregation(&agg, &link);
        assert!(html.contains(RowStyle::Under.background()));
        assert!(!html.contains(RowStyle::Over.background()));
        // target 2, original 1, logged 1 (0.5 rounds up), remaining 1, diff 1
        let row_cells: Vec<&str> = html
            .lines()
            .skip_while(|l| !l.contains("href"))
            .skip(1)
            .take(5)
            .collect();
        let expected = ["2", "1", "1", "1", "1"];
        for (line, want) in row_cells.iter().zip(expected) {
            assert!(line.ends_with(&format!(">{}</td>", want)), "{} vs {}", line, want);
        }
    }

    #[test]
    fn over_target_row_has_negative_diff() {
        let agg = aggregate(&[rec("Z", "1", 7200, 3600)]).unwrap();
        let html = render_aggregation(&agg, &link);
        assert!(html.contains(RowStyle::Over.background()));
        assert!(html.contains(">-2</td>"));
        assert!(html.contains(">-2</th>"));
    }

    #[test]
    fn totals_row_sums_groups() {
        let agg = aggregate(&[rec("A", "2", 0, 3600), rec("B", "3", 3600, 0)]).unwrap();
        let html = render_aggregation(&agg, &link);
        assert!(html.contains("align=\"center\">Total</th>"));
        assert!(html.contains(">5</th>"));
    }

    #[test]
    fn labels_link_to_group_query_and_are_escaped() {
        let agg = aggregate(&[rec("<x", "1", 0, 0)]).unwrap();
        let html = render_aggregation(&agg, &link);
        assert!(html.contains("href=\"/issues/?jql=group=&lt;\""));
        assert!(html.contains(">&lt;</a>"));
    }
}
