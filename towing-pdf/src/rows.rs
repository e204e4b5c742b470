use chrono::{Duration, NaiveDate};

use towing_core::domain::{Collaborator, Contract};
use towing_core::schedule::{day_bucket, week_monday, ScheduleEntry, REPORT_DAYS};

pub const OVERDUE_MARKER: &str = "[OVERDUE] ";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub header: &'static str,
    /// Relative width weight passed through to the table layout.
    pub weight: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub cells: Vec<String>,
    /// Highlighted in the rendered table (late entry).
    pub overdue: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub heading: String,
    pub detail: Option<String>,
    pub rows: Vec<Row>,
}

/// A fully laid-out report: shared column set, one table per section.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDoc {
    pub title: String,
    pub subtitle: String,
    pub columns: Vec<Column>,
    pub sections: Vec<Section>,
    /// Shown in place of a table when a section has no rows.
    pub empty_note: &'static str,
}

fn team_names(ids: &[String], collaborators: &[Collaborator]) -> String {
    let names: Vec<&str> = ids
        .iter()
        .filter_map(|id| collaborators.iter().find(|c| &c.id == id))
        .map(|c| c.name.as_str())
        .collect();
    if names.is_empty() {
        "none assigned".to_string()
    } else {
        names.join(", ")
    }
}

/// One section per non-archived contract: header with number, vigency window
/// and team, then that contract's activities as table rows.
pub fn contracts_report(
    contracts: &[Contract],
    collaborators: &[Collaborator],
    issued: NaiveDate,
) -> ReportDoc {
    let sections = contracts
        .iter()
        .filter(|c| !c.is_archived)
        .map(|contract| Section {
            heading: format!("CONTRACT #{}", contract.number),
            detail: Some(format!(
                "Vigency: {} to {}  |  Team: {}",
                contract.start_date.format("%d/%m/%Y"),
                contract.end_date.format("%d/%m/%Y"),
                team_names(&contract.collaborator_ids, collaborators),
            )),
            rows: contract
                .activities
                .iter()
                .map(|act| Row {
                    cells: vec![
                        act.description.clone(),
                        format!(
                            "{} - {}",
                            act.start_date.format("%d/%m"),
                            act.end_date.format("%d/%m")
                        ),
                        format!("{}%", act.progress.percent()),
                        act.status.label().to_string(),
                        act.notes_text().unwrap_or_else(|| "-".to_string()),
                    ],
                    overdue: false,
                })
                .collect(),
        })
        .collect();

    ReportDoc {
        title: "TOWING - General Contracts Report".to_string(),
        subtitle: format!("Issued: {}", issued.format("%d/%m/%Y")),
        columns: vec![
            Column { header: "Activity", weight: 8 },
            Column { header: "Period", weight: 3 },
            Column { header: "Progress", weight: 2 },
            Column { header: "Status", weight: 3 },
            Column { header: "Notes", weight: 6 },
        ],
        sections,
        empty_note: "No activities recorded for this contract.",
    }
}

/// One section per day of the reference week, Monday through Sunday. Bucket
/// membership matches the weekly view; the report is always unfiltered, and
/// late entries get an inline marker instead of a colour.
pub fn weekly_report(
    contracts: &[Contract],
    collaborators: &[Collaborator],
    reference: NaiveDate,
) -> ReportDoc {
    let monday = week_monday(reference);
    let sunday = monday + Duration::days(REPORT_DAYS as i64 - 1);

    let sections = (0..REPORT_DAYS as i64)
        .map(|offset| {
            let day = monday + Duration::days(offset);
            let rows = day_bucket(day, contracts)
                .into_iter()
                .map(|entry| weekly_row(&entry, day, collaborators))
                .collect();
            Section {
                heading: format!("{} - {}", day.format("%A").to_string().to_uppercase(), day.format("%d/%m")),
                detail: None,
                rows,
            }
        })
        .collect();

    ReportDoc {
        title: "TOWING - Week Schedule".to_string(),
        subtitle: format!(
            "Period: {} to {}",
            monday.format("%d/%m/%Y"),
            sunday.format("%d/%m/%Y")
        ),
        columns: vec![
            Column { header: "Contract", weight: 2 },
            Column { header: "Activity", weight: 6 },
            Column { header: "Team", weight: 4 },
            Column { header: "Progress", weight: 2 },
            Column { header: "Status", weight: 2 },
            Column { header: "Notes", weight: 4 },
        ],
        sections,
        empty_note: "No activities scheduled.",
    }
}

fn weekly_row(entry: &ScheduleEntry, day: NaiveDate, collaborators: &[Collaborator]) -> Row {
    let overdue = entry.is_overdue_on(day);
    let description = if overdue {
        format!("{}{}", OVERDUE_MARKER, entry.activity.description)
    } else {
        entry.activity.description.clone()
    };
    Row {
        cells: vec![
            format!("#{}", entry.contract_number),
            description,
            entry.team_names(collaborators),
            format!("{}%", entry.activity.progress.percent()),
            entry.activity.status.label().to_string(),
            entry.activity.notes_text().unwrap_or_else(|| "-".to_string()),
        ],
        overdue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use towing_core::domain::{Activity, Note, Progress, Specialty};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_contract() -> (Contract, Vec<Collaborator>) {
        let ana = Collaborator::new("Ana", Specialty::Woodworking);
        let mut contract = Contract::new("010/2024", date(2024, 1, 1), date(2024, 1, 31));
        contract.collaborator_ids = vec![ana.id.clone()];
        let mut act = Activity::new("replace bow rail", date(2024, 1, 5), date(2024, 1, 10));
        act.progress = Progress::Half;
        act.notes.push(Note::new("awaiting parts"));
        contract.activities.push(act);
        (contract, vec![ana])
    }

    #[test]
    fn full_report_builds_one_section_per_active_contract() {
        let (contract, collaborators) = sample_contract();
        let mut archived = Contract::new("099/2023", date(2023, 1, 1), date(2023, 2, 1));
        archived.is_archived = true;

        let report = contracts_report(&[contract, archived], &collaborators, date(2024, 1, 15));
        assert_eq!(report.sections.len(), 1);

        let section = &report.sections[0];
        assert_eq!(section.heading, "CONTRACT #010/2024");
        assert!(section.detail.as_deref().unwrap().contains("Ana"));
        assert_eq!(section.rows.len(), 1);
        assert_eq!(section.rows[0].cells[2], "50%");
        assert_eq!(section.rows[0].cells[4], "awaiting parts");
    }

    #[test]
    fn full_report_uses_placeholders_for_missing_data() {
        let contract = Contract::new("011/2024", date(2024, 1, 1), date(2024, 1, 31));
        let report = contracts_report(&[contract], &[], date(2024, 1, 15));
        let detail = report.sections[0].detail.as_deref().unwrap();
        assert!(detail.contains("none assigned"));
        assert!(report.sections[0].rows.is_empty());
    }

    #[test]
    fn weekly_report_spans_seven_days() {
        let (contract, collaborators) = sample_contract();
        let report = weekly_report(&[contract], &collaborators, date(2024, 1, 15));
        assert_eq!(report.sections.len(), 7);
        assert!(report.sections[0].heading.starts_with("MONDAY"));
        assert!(report.sections[6].heading.starts_with("SUNDAY"));
        assert!(report.subtitle.contains("15/01/2024"));
        assert!(report.subtitle.contains("21/01/2024"));
    }

    #[test]
    fn weekly_report_marks_late_entries_inline() {
        // Activity ended 2024-01-10; the whole reference week is later.
        let (contract, collaborators) = sample_contract();
        let report = weekly_report(&[contract], &collaborators, date(2024, 1, 15));
        for section in &report.sections {
            assert_eq!(section.rows.len(), 1);
            let row = &section.rows[0];
            assert!(row.overdue);
            assert!(row.cells[1].starts_with(OVERDUE_MARKER));
        }
    }

    #[test]
    fn completed_activities_stay_out_of_the_weekly_report() {
        let (mut contract, collaborators) = sample_contract();
        contract.activities[0].progress = Progress::Complete;
        let report = weekly_report(&[contract], &collaborators, date(2024, 1, 15));
        assert!(report.sections.iter().all(|s| s.rows.is_empty()));
    }
}
