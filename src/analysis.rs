// src/analysis.rs
//! Totals and period comparisons over `RegistrationRecord`s.
//!
//! Everything here is pure: records in, numbers out. Callers decide which
//! records (entity filter, month filter, which snapshot) go in.

use std::collections::HashMap;

use crate::data::RegistrationRecord;
use crate::portal::{Month, QUARTER_LABELS};

/// Shown where a change percent has no base.
pub const NO_PERCENT: &str = "—";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Totals {
    pub grand: u64,
    /// Descending by count, then by name.
    pub by_entity: Vec<(String, u64)>,
    /// In order of first appearance (month order for month-wise records).
    pub by_period: Vec<(String, u64)>,
}

impl Totals {
    pub fn entity_count(&self) -> usize {
        self.by_entity.len()
    }

    pub fn top(&self) -> Option<&(String, u64)> {
        self.by_entity.first()
    }
}

pub fn totals(records: &[RegistrationRecord]) -> Totals {
    let by_entity = sum_by(records, |r| &r.entity);
    let mut by_entity: Vec<(String, u64)> = by_entity.into_iter().collect();
    by_entity.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    Totals {
        grand: records.iter().fold(0u64, |acc, r| acc.saturating_add(r.count)),
        by_entity,
        by_period: sum_by(records, |r| &r.period),
    }
}

/// Sums per key, keeping first-appearance order.
fn sum_by<'a>(records: &'a [RegistrationRecord], key: impl Fn(&'a RegistrationRecord) -> &'a String) -> Vec<(String, u64)> {
    let mut order: Vec<(String, u64)> = Vec::new();
    let mut at: HashMap<&str, usize> = HashMap::new();
    for r in records {
        let k = key(r);
        match at.get(k.as_str()) {
            Some(&i) => order[i].1 = order[i].1.saturating_add(r.count),
            None => {
                at.insert(k.as_str(), order.len());
                order.push((k.clone(), r.count));
            }
        }
    }
    order
}

/// Percent change; `None` when the base is 0.
pub fn change_pct(current: u64, previous: u64) -> Option<f64> {
    if previous == 0 {
        return None;
    }
    Some((current as f64 - previous as f64) / previous as f64 * 100.0)
}

pub fn format_pct(pct: Option<f64>) -> String {
    match pct {
        Some(p) => format!("{p:+.2}%"),
        None => NO_PERCENT.to_string(),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Change {
    pub entity: String,
    pub current: u64,
    pub previous: u64,
}

impl Change {
    pub fn delta(&self) -> i64 {
        let cur = i64::try_from(self.current).unwrap_or(i64::MAX);
        let prev = i64::try_from(self.previous).unwrap_or(i64::MAX);
        cur.saturating_sub(prev)
    }

    pub fn pct(&self) -> Option<f64> {
        change_pct(self.current, self.previous)
    }
}

/// Two periods side by side, per entity and overall.
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    pub title: String,
    pub current_label: String,
    pub previous_label: String,
    /// Descending by current count.
    pub rows: Vec<Change>,
    pub overall: Change,
}

/// Outer join of two record sets by entity; a side without the entity counts 0.
pub fn compare(
    title: impl Into<String>,
    current_label: impl Into<String>,
    current: &[RegistrationRecord],
    previous_label: impl Into<String>,
    previous: &[RegistrationRecord],
) -> Comparison {
    let cur = sum_by(current, |r| &r.entity);
    let prev = sum_by(previous, |r| &r.entity);
    let prev_map: HashMap<&str, u64> = prev.iter().map(|(e, c)| (e.as_str(), *c)).collect();

    let mut rows: Vec<Change> = cur
        .iter()
        .map(|(e, c)| Change {
            entity: e.clone(),
            current: *c,
            previous: prev_map.get(e.as_str()).copied().unwrap_or(0),
        })
        .collect();
    for (e, c) in &prev {
        if !cur.iter().any(|(ce, _)| ce == e) {
            rows.push(Change { entity: e.clone(), current: 0, previous: *c });
        }
    }
    rows.sort_by(|a, b| b.current.cmp(&a.current).then_with(|| a.entity.cmp(&b.entity)));

    let overall = Change {
        entity: "Total".to_string(),
        current: rows.iter().fold(0u64, |acc, r| acc.saturating_add(r.current)),
        previous: rows.iter().fold(0u64, |acc, r| acc.saturating_add(r.previous)),
    };

    Comparison {
        title: title.into(),
        current_label: current_label.into(),
        previous_label: previous_label.into(),
        rows,
        overall,
    }
}

fn in_month(records: &[RegistrationRecord], month: Month) -> Vec<RegistrationRecord> {
    records.iter().filter(|r| r.period == month.label()).cloned().collect()
}

/// Selected month vs the month before, same snapshot. `None` for January.
pub fn month_over_month(records: &[RegistrationRecord], month: Month) -> Option<Comparison> {
    let prev = month.prev()?;
    Some(compare(
        "Month-over-Month",
        month.label(),
        &in_month(records, month),
        prev.label(),
        &in_month(records, prev),
    ))
}

/// January of `year` vs December of the year before.
pub fn year_over_month(
    year: i32,
    current: &[RegistrationRecord],
    previous_year: &[RegistrationRecord],
) -> Comparison {
    compare(
        "Year-over-Month",
        format!("Jan {year}"),
        &in_month(current, Month::Jan),
        format!("Dec {}", year - 1),
        &in_month(previous_year, Month::Dec),
    )
}

/// Same month (or whole-year totals when `month` is `None`) across two years.
pub fn year_over_year(
    year: i32,
    current: &[RegistrationRecord],
    previous_year: &[RegistrationRecord],
    month: Option<Month>,
) -> Comparison {
    match month {
        Some(m) => compare(
            "Year-over-Year",
            format!("{} {year}", m.label()),
            &in_month(current, m),
            format!("{} {}", m.label(), year - 1),
            &in_month(previous_year, m),
        ),
        None => compare(
            "Year-over-Year",
            year.to_string(),
            current,
            (year - 1).to_string(),
            previous_year,
        ),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuarterRow {
    pub label: &'static str,
    pub total: u64,
    /// Change vs the previous available quarter.
    pub qoq: Option<f64>,
}

/// Quarter sums from the months present in month-wise records.
/// A quarter appears once any of its months has a record.
pub fn quarters(records: &[RegistrationRecord]) -> Vec<QuarterRow> {
    let mut sums: [Option<u64>; 4] = [None; 4];
    for r in records {
        let Some(m) = Month::from_header(&r.period) else { continue };
        let q = &mut sums[m.quarter()];
        *q = Some(q.unwrap_or(0).saturating_add(r.count));
    }

    let mut out: Vec<QuarterRow> = Vec::new();
    for (i, s) in sums.iter().enumerate() {
        let Some(total) = *s else { continue };
        let qoq = out.last().and_then(|p| change_pct(total, p.total));
        out.push(QuarterRow { label: QUARTER_LABELS[i], total, qoq });
    }
    out
}
