//! Per-group time statistics over a batch of records.

use std::collections::HashMap;

use crate::error::{ReportError, Result};
use crate::record::RawRecord;
use crate::time_value::parse_decimal_hours_to_seconds;

pub const TOTAL_LABEL: &str = "Total";

/// Summed seconds for one group key (or for all groups, in `Aggregation::totals`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupSummary {
    pub group_key: String,
    pub label: String,
    pub target: i64,
    pub original_estimate: i64,
    pub remaining_estimate: i64,
    pub logged: i64,
}

impl GroupSummary {
    fn new(group_key: &str) -> Self {
        Self {
            group_key: group_key.to_string(),
            label: group_key.chars().next().map(String::from).unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn spent(&self) -> i64 {
        self.remaining_estimate.saturating_add(self.logged)
    }

    pub fn is_over_target(&self) -> bool {
        self.spent() > self.target
    }

    /// Target minus spent; negative when over target.
    pub fn diff(&self) -> i64 {
        self.target
            .saturating_sub(self.remaining_estimate)
            .saturating_sub(self.logged)
    }

    fn absorb(&mut self, target: i64, original: i64, remaining: i64, logged: i64) -> Result<()> {
        let sum = |a: i64, b: i64| {
            a.checked_add(b).ok_or_else(|| ReportError::Overflow {
                group: self.group_key.clone(),
            })
        };
        let next = (
            sum(self.target, target)?,
            sum(self.original_estimate, original)?,
            sum(self.remaining_estimate, remaining)?,
            sum(self.logged, logged)?,
        );
        (self.target, self.original_estimate, self.remaining_estimate, self.logged) = next;
        Ok(())
    }

    /// Spent and diff must be exact, not saturated.
    fn check_derived(&self) -> Result<()> {
        self.remaining_estimate
            .checked_add(self.logged)
            .and_then(|spent| self.target.checked_sub(spent))
            .map(|_| ())
            .ok_or_else(|| ReportError::Overflow {
                group: self.group_key.clone(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    /// Sorted by label, ties by group key.
    pub rows: Vec<GroupSummary>,
    pub totals: GroupSummary,
}

/// Fold records into one summary per group key.
///
/// A malformed target on any record, or a sum that leaves the `i64` range, fails the
/// whole batch; nothing partial is returned.
pub fn aggregate(records: &[RawRecord]) -> Result<Aggregation> {
    let mut groups: HashMap<&str, GroupSummary> = HashMap::new();
    for rec in records {
        let target = parse_decimal_hours_to_seconds(rec.target.as_deref())?;
        let entry = groups
            .entry(rec.group_key.as_str())
            .or_insert_with(|| GroupSummary::new(&rec.group_key));
        entry.absorb(target, rec.original_estimate, rec.remaining_estimate, rec.logged)?;
    }

    let mut rows: Vec<GroupSummary> = groups.into_values().collect();
    rows.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.group_key.cmp(&b.group_key)));

    let mut totals = GroupSummary {
        group_key: TOTAL_LABEL.to_string(),
        label: TOTAL_LABEL.to_string(),
        ..GroupSummary::default()
    };
    for row in &rows {
        row.check_derived()?;
        totals.absorb(row.target, row.original_estimate, row.remaining_estimate, row.logged)?;
    }
    totals.check_derived()?;
    Ok(Aggregation { rows, totals })
}
