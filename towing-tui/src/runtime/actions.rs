use crate::app::App;

use super::action_queue::Action;

pub(super) fn run_action(action: Action, app: &mut App) {
    match action {
        Action::ScanFinished {
            contract_id,
            result,
        } => {
            app.scanning.remove(&contract_id);
            match result {
                Ok(activities) => {
                    let count = activities.len();
                    if let Err(e) = app.store.add_activities(&contract_id, activities) {
                        tracing::error!(error = %e, "failed to persist scanned activities");
                        app.set_status(format!("Save failed: {e}"));
                        return;
                    }
                    app.set_status(format!("Scan added {count} activities"));
                }
                Err(e) => {
                    // Failed scans add nothing; the log carries the detail.
                    tracing::error!(%contract_id, error = %e, "photo scan failed");
                    app.clear_status();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TowingConfig;
    use chrono::NaiveDate;
    use towing_core::domain::Activity;
    use towing_core::{JsonFilePersister, Store};

    fn test_app() -> App {
        let dir = std::env::temp_dir().join(format!(
            "towing-actions-{}",
            towing_core::domain::new_id()
        ));
        let store = Store::load(JsonFilePersister::new(dir));
        App::new(
            store,
            TowingConfig::default(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        )
    }

    #[test]
    fn failed_scan_stays_quiet_and_clears_busy_flag() {
        let mut app = test_app();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let id = app.store.add_contract("010/2024", start, end).unwrap();
        app.scanning.insert(id.clone());
        app.set_status("Scanning work order photo...");

        run_action(
            Action::ScanFinished {
                contract_id: id.clone(),
                result: Err("network unreachable".to_string()),
            },
            &mut app,
        );

        assert!(!app.scanning.contains(&id));
        assert!(app.status.is_none());
        assert!(app.store.contract(&id).unwrap().activities.is_empty());
    }

    #[test]
    fn successful_scan_appends_activities() {
        let mut app = test_app();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let id = app.store.add_contract("010/2024", start, end).unwrap();
        app.scanning.insert(id.clone());

        run_action(
            Action::ScanFinished {
                contract_id: id.clone(),
                result: Ok(vec![Activity::new("Sand hull", start, end)]),
            },
            &mut app,
        );

        assert!(!app.scanning.contains(&id));
        assert_eq!(app.store.contract(&id).unwrap().activities.len(), 1);
    }
}
