//! Weekly bucketing and delay detection. Everything here is a pure function
//! of (today, contracts, collaborators, filters).

mod filter;

pub use filter::ScheduleFilter;

use chrono::{Datelike, Duration, NaiveDate};

use crate::domain::{Activity, Collaborator, Contract};

/// The on-screen week runs Monday through Saturday.
pub const VISIBLE_DAYS: usize = 6;
/// Reports cover the full week, Monday through Sunday.
pub const REPORT_DAYS: usize = 7;

/// Monday of the week containing `date`.
pub fn week_monday(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// One activity as it shows up in a bucket or the backlog, annotated with
/// enough parent-contract context to render or report on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleEntry {
    pub activity: Activity,
    pub contract_number: String,
    pub contract_end: NaiveDate,
    pub collaborator_ids: Vec<String>,
}

impl ScheduleEntry {
    /// Late relative to a specific day, independent of bucket membership.
    pub fn is_overdue_on(&self, day: NaiveDate) -> bool {
        day > self.activity.end_date && !self.activity.progress.is_complete()
    }

    /// Resolve assigned collaborator names, skipping ids that no longer exist.
    pub fn team<'a>(&self, collaborators: &'a [Collaborator]) -> Vec<&'a Collaborator> {
        self.collaborator_ids
            .iter()
            .filter_map(|id| collaborators.iter().find(|c| &c.id == id))
            .collect()
    }

    pub fn team_names(&self, collaborators: &[Collaborator]) -> String {
        let names: Vec<&str> = self
            .team(collaborators)
            .into_iter()
            .map(|c| c.name.as_str())
            .collect();
        names.join(", ")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub entries: Vec<ScheduleEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekSchedule {
    pub monday: NaiveDate,
    pub days: Vec<DayBucket>,
    /// Activities whose window closed before this week began and are still
    /// unfinished: the carried-over backlog shown above the week grid.
    pub backlog: Vec<ScheduleEntry>,
}

impl WeekSchedule {
    pub fn build(
        today: NaiveDate,
        contracts: &[Contract],
        collaborators: &[Collaborator],
        filter: &ScheduleFilter,
    ) -> Self {
        let monday = week_monday(today);

        let days = (0..VISIBLE_DAYS as i64)
            .map(|offset| {
                let date = monday + Duration::days(offset);
                let entries = day_bucket(date, contracts)
                    .into_iter()
                    .filter(|entry| filter.matches(entry, collaborators))
                    .collect();
                DayBucket { date, entries }
            })
            .collect();

        let backlog = active_entries(contracts)
            .filter(|entry| {
                entry.activity.end_date < monday && !entry.activity.progress.is_complete()
            })
            .filter(|entry| filter.matches(entry, collaborators))
            .collect();

        WeekSchedule {
            monday,
            days,
            backlog,
        }
    }
}

/// Unfiltered membership for one day: finished activities never appear; an
/// unfinished one appears while the day is inside its window and on every day
/// after its end until completed, even past the contract's own end.
pub fn day_bucket(day: NaiveDate, contracts: &[Contract]) -> Vec<ScheduleEntry> {
    active_entries(contracts)
        .filter(|entry| {
            let act = &entry.activity;
            if act.progress.is_complete() {
                return false;
            }
            let within = day >= act.start_date && day <= act.end_date;
            within || day > act.end_date
        })
        .collect()
}

fn active_entries(contracts: &[Contract]) -> impl Iterator<Item = ScheduleEntry> + '_ {
    contracts
        .iter()
        .filter(|c| !c.is_archived)
        .flat_map(|contract| {
            contract.activities.iter().map(move |activity| ScheduleEntry {
                activity: activity.clone(),
                contract_number: contract.number.clone(),
                contract_end: contract.end_date,
                collaborator_ids: contract.collaborator_ids.clone(),
            })
        })
}

/// Plain-text digest of one day's pending work, used by the share/export
/// action in the shell.
pub fn day_digest(
    date: NaiveDate,
    entries: &[ScheduleEntry],
    collaborators: &[Collaborator],
) -> String {
    let mut out = format!("TOWING schedule for {}\n", date.format("%A, %d/%m"));
    for entry in entries {
        let marker = if entry.is_overdue_on(date) { "[OVERDUE] " } else { "" };
        let team = entry.team_names(collaborators);
        out.push_str(&format!(
            "- #{} {}{} ({}%) | team: {}\n",
            entry.contract_number,
            marker,
            entry.activity.description,
            entry.activity.progress.percent(),
            if team.is_empty() { "none assigned" } else { &team },
        ));
    }
    out
}
