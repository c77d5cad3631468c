// src/presenter.rs
//! Filter selection in, everything the dashboard draws out.
//!
//! `present` is re-run on every selection change. It reads the snapshot(s)
//! from disk each time; there is no cache. Nothing in here fails: a missing
//! or unreadable snapshot becomes an empty view with a notice.

use chrono::{DateTime, Datelike, Local, NaiveDate};

use crate::analysis::{self, Comparison, QuarterRow, Totals};
use crate::config::state::FilterSelection;
use crate::data::{parse_snapshot, Parsed, ParseWarning, RegistrationRecord, RegistrationTable};
use crate::portal::Month;
use crate::store::{SnapshotKey, SnapshotStore};

#[derive(Clone, Debug, Default)]
pub struct Comparisons {
    pub month_over_month: Option<Comparison>,
    pub year_over_month: Option<Comparison>,
    pub year_over_year: Option<Comparison>,
    pub quarters: Vec<QuarterRow>,
    /// Why a comparison is missing ("2023 not collected", ...).
    pub notes: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct PresenterView {
    pub key: Option<SnapshotKey>,
    pub retrieved_at: Option<DateTime<Local>>,
    /// Every entity in the snapshot, for the selector.
    pub all_entities: Vec<String>,
    /// After entity + month filters.
    pub table: RegistrationTable,
    pub records: Vec<RegistrationRecord>,
    pub totals: Totals,
    pub comparisons: Comparisons,
    pub warnings: Vec<ParseWarning>,
    /// Set when there is nothing to show.
    pub notice: Option<String>,
}

impl PresenterView {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.table.is_empty()
    }

    fn empty(key: SnapshotKey, notice: String) -> Self {
        PresenterView { key: Some(key), notice: Some(notice), ..Default::default() }
    }
}

/// Parsed snapshot, `Ok(None)` if never collected, `Err(msg)` if unreadable.
fn read(store: &SnapshotStore, key: &SnapshotKey) -> Result<Option<(Parsed, Option<DateTime<Local>>)>, String> {
    match store.load(key) {
        Ok(Some(snap)) => Ok(Some((parse_snapshot(&snap.markup, key), snap.retrieved_local()))),
        Ok(None) => Ok(None),
        Err(e) => Err(e.to_string()),
    }
}

fn keep_entities(records: Vec<RegistrationRecord>, selected: &[String]) -> Vec<RegistrationRecord> {
    if selected.is_empty() {
        return records;
    }
    records.into_iter().filter(|r| selected.iter().any(|s| s == &r.entity)).collect()
}

pub fn present(store: &SnapshotStore, sel: &FilterSelection) -> PresenterView {
    let key = sel.key();

    let (parsed, retrieved_at) = match read(store, &key) {
        Ok(Some(p)) => p,
        Ok(None) => {
            logd!("Presenter: no snapshot for {}", key);
            return PresenterView::empty(key, format!("No data for {key}. Run the collector for this year."));
        }
        Err(e) => {
            logw!("Presenter: {}: {}", key, e);
            return PresenterView::empty(key, format!("Could not read snapshot for {key}: {e}"));
        }
    };

    for w in &parsed.warnings {
        logw!("Parse warning in {}: {}", key, w);
    }

    let all_entities = parsed.table.entities();
    // Entity filter first; comparisons need every month.
    let by_entity = keep_entities(parsed.records, &sel.entities);
    let month = sel.effective_month();

    let mut table = parsed.table.filtered(&sel.entities);
    let records: Vec<RegistrationRecord> = match month {
        Some(m) => {
            if let Some(ci) = table.columns.iter().position(|c| c == m.label()) {
                table = table.project(&[ci]);
            }
            by_entity.iter().filter(|r| r.period == m.label()).cloned().collect()
        }
        None => by_entity.clone(),
    };

    let comparisons = compare_periods(store, sel, &by_entity, month);

    let notice = if records.is_empty() && table.is_empty() {
        Some(format!("{key}: no rows could be read from the snapshot."))
    } else {
        None
    };

    PresenterView {
        key: Some(key),
        retrieved_at,
        all_entities,
        totals: analysis::totals(&records),
        table,
        records,
        comparisons,
        warnings: parsed.warnings,
        notice,
    }
}

fn compare_periods(
    store: &SnapshotStore,
    sel: &FilterSelection,
    current: &[RegistrationRecord],
    month: Option<Month>,
) -> Comparisons {
    let mut out = Comparisons::default();
    let month_wise = sel.category.is_month_wise();

    if month_wise {
        out.quarters = analysis::quarters(current);
        if let Some(m) = month {
            out.month_over_month = analysis::month_over_month(current, m);
        }
    }

    let prev_key = sel.key().at_year(sel.year - 1);
    let previous = match read(store, &prev_key) {
        Ok(Some((p, _))) => Some(keep_entities(p.records, &sel.entities)),
        Ok(None) => {
            out.notes.push(format!("{} not collected; no year-over-year comparison.", prev_key.year));
            None
        }
        Err(e) => {
            out.notes.push(format!("{prev_key}: {e}"));
            None
        }
    };

    if let Some(prev) = previous {
        if month_wise && month == Some(Month::Jan) {
            out.year_over_month = Some(analysis::year_over_month(sel.year, current, &prev));
        }
        out.year_over_year = Some(analysis::year_over_year(sel.year, current, &prev, month));
    }
    out
}

/// Months offered by the month filter: all twelve, or up to `today` for the
/// current year.
pub fn month_choices(year: i32, today: NaiveDate) -> Vec<Month> {
    if year != today.year() {
        return Month::ALL.to_vec();
    }
    Month::ALL.into_iter().filter(|m| m.index() <= today.month0() as usize).collect()
}

/// Years for the selector, newest first.
pub fn year_choices(store: &SnapshotStore, sel: &FilterSelection) -> Vec<i32> {
    match store.list_group(sel.category, sel.group) {
        Ok(mut years) => {
            years.reverse();
            years
        }
        Err(e) => {
            logw!("Presenter: listing {}: {}", store.dir().display(), e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn months_capped_for_current_year() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert_eq!(month_choices(2025, today), vec![Month::Jan, Month::Feb, Month::Mar]);
        assert_eq!(month_choices(2024, today).len(), 12);
    }
}
