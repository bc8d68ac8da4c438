//! Catalog aggregation.
//!
//! Thin orchestration over the store and the delivery-status functions:
//! joins each report with its schedule, alert lead and resources, then
//! sorts by the fixed delivery-state precedence. Also produces the
//! dashboard summary counts.

use std::cmp::Reverse;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use vigia_core::{
    DeliveryState, Frequency, Report, ReportCriticality, ReportSummary, ResourceKind, VigiaResult,
};
use vigia_storage::{CatalogFilter, ReportStore};

use crate::clock::Clock;
use crate::delivery::{classify, time_remaining, DeliveryInputs};

/// One row of the catalog view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub report: Report,
    pub frequency: Option<Frequency>,
    pub status: DeliveryState,
    pub time_remaining: String,
    pub has_repo: bool,
    pub repo_url: Option<String>,
    pub has_template: bool,
}

/// Dashboard summary counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_reports: usize,
    /// Counts per report criticality, most severe first.
    pub by_criticality: Vec<(ReportCriticality, usize)>,
    /// Counts per schedule frequency, largest first.
    pub by_frequency: Vec<(Frequency, usize)>,
    /// Five most recently created reports.
    pub recent: Vec<ReportSummary>,
}

/// Read-side aggregator over a report store.
pub struct CatalogService<'a> {
    store: &'a dyn ReportStore,
    clock: &'a dyn Clock,
}

impl<'a> CatalogService<'a> {
    pub fn new(store: &'a dyn ReportStore, clock: &'a dyn Clock) -> Self {
        Self { store, clock }
    }

    /// Build the filtered, classified and annotated catalog view.
    ///
    /// Sorted by delivery-state precedence (overdue first, unscheduled
    /// last), then next run ascending with unscheduled reports after any
    /// scheduled one, then creation time descending.
    pub fn build_catalog(&self, filter: &CatalogFilter) -> VigiaResult<Vec<CatalogEntry>> {
        let now = self.clock.now();
        let mut entries = Vec::new();

        for report in self.store.report_list(filter)? {
            let frequency = self
                .store
                .schedule_get(report.report_id)?
                .map(|s| s.frequency);
            let lead_hours = match frequency {
                Some(f) => self.store.alert_lead_hours(f)?,
                None => None,
            };
            let status = classify(
                now,
                &DeliveryInputs {
                    next_run: report.next_run,
                    lead_hours,
                    last_delivered: report.last_delivered,
                    frequency,
                },
            );
            let remaining = time_remaining(now, report.next_run);

            let resources = self.store.resources_for(report.report_id)?;
            let repo_url = resources
                .iter()
                .find(|r| r.kind == ResourceKind::Repo)
                .and_then(|r| r.url.clone());
            let has_template = resources.iter().any(|r| r.kind == ResourceKind::Template);

            entries.push(CatalogEntry {
                has_repo: repo_url.is_some(),
                repo_url,
                has_template,
                frequency,
                status,
                time_remaining: remaining,
                report,
            });
        }

        entries.sort_by(|a, b| {
            a.status
                .sort_rank()
                .cmp(&b.status.sort_rank())
                .then_with(|| match (a.report.next_run, b.report.next_run) {
                    (Some(x), Some(y)) => x.cmp(&y),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                })
                .then_with(|| b.report.created_at.cmp(&a.report.created_at))
        });

        tracing::debug!(rows = entries.len(), "catalog built");
        Ok(entries)
    }

    /// Dashboard summary: totals by criticality and frequency plus the
    /// most recent reports.
    pub fn dashboard(&self) -> VigiaResult<DashboardStats> {
        let reports = self.store.report_list(&CatalogFilter::default())?;
        let total_reports = reports.len();

        let severities = [
            ReportCriticality::Critical,
            ReportCriticality::High,
            ReportCriticality::Medium,
            ReportCriticality::Low,
        ];
        let by_criticality = severities
            .into_iter()
            .map(|level| {
                let count = reports.iter().filter(|r| r.criticality == level).count();
                (level, count)
            })
            .collect();

        let mut frequency_counts: HashMap<Frequency, usize> = HashMap::new();
        for report in &reports {
            if let Some(spec) = self.store.schedule_get(report.report_id)? {
                *frequency_counts.entry(spec.frequency).or_default() += 1;
            }
        }
        let mut by_frequency: Vec<(Frequency, usize)> = frequency_counts.into_iter().collect();
        by_frequency.sort_by_key(|(frequency, count)| (Reverse(*count), frequency.to_string()));

        let recent = self.store.report_recent(5)?;

        Ok(DashboardStats {
            total_reports,
            by_criticality,
            by_frequency,
            recent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{Duration, Utc};
    use vigia_core::{Report, ReportState, ScheduleSpec, Timestamp};
    use vigia_storage::MemoryStore;

    fn report(code: &str, criticality: ReportCriticality) -> Report {
        let mut report = Report::new(
            code,
            format!("Report {code}"),
            "Regulatory",
            criticality,
            "tester",
        );
        report.state = ReportState::Approved;
        report
    }

    fn scheduled(store: &MemoryStore, code: &str, next_run: Option<Timestamp>) -> Report {
        let mut r = report(code, ReportCriticality::Medium);
        r.next_run = next_run;
        store.report_insert(&r).unwrap();
        store
            .schedule_insert(&ScheduleSpec::new(
                r.report_id,
                Frequency::Monthly,
                serde_json::json!({}),
            ))
            .unwrap();
        r
    }

    #[test]
    fn test_catalog_sorts_by_state_precedence() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(Utc::now());
        let now = clock.now();

        scheduled(&store, "ONTIME", Some(now + Duration::days(10)));
        scheduled(&store, "OVERDUE", Some(now - Duration::hours(30)));
        scheduled(&store, "DUESOON", Some(now + Duration::hours(10)));
        let mut unscheduled = report("NOSCHED", ReportCriticality::Low);
        unscheduled.next_run = None;
        store.report_insert(&unscheduled).unwrap();

        let svc = CatalogService::new(&store, &clock);
        let entries = svc.build_catalog(&CatalogFilter::default()).unwrap();

        let codes: Vec<&str> = entries.iter().map(|e| e.report.code.as_str()).collect();
        assert_eq!(codes, vec!["OVERDUE", "DUESOON", "ONTIME", "NOSCHED"]);

        assert_eq!(entries[0].status, DeliveryState::Overdue);
        assert_eq!(entries[0].time_remaining, "1d 6h de retraso");
        assert_eq!(entries[3].status, DeliveryState::Unscheduled);
        assert_eq!(entries[3].time_remaining, "N/A");
    }

    #[test]
    fn test_catalog_ties_break_on_next_run_then_created() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(Utc::now());
        let now = clock.now();

        scheduled(&store, "LATER", Some(now + Duration::days(20)));
        scheduled(&store, "SOONER", Some(now + Duration::days(5)));

        let svc = CatalogService::new(&store, &clock);
        let entries = svc.build_catalog(&CatalogFilter::default()).unwrap();
        let codes: Vec<&str> = entries.iter().map(|e| e.report.code.as_str()).collect();
        assert_eq!(codes, vec!["SOONER", "LATER"]);
    }

    #[test]
    fn test_catalog_annotates_resources_and_delivered() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(Utc::now());
        let now = clock.now();

        let mut r = scheduled(&store, "DONE", Some(now + Duration::days(20)));
        r.last_delivered = Some(now - Duration::days(5));
        store
            .report_update(
                r.report_id,
                vigia_storage::ReportUpdate {
                    last_delivered: r.last_delivered,
                    ..Default::default()
                },
            )
            .unwrap();
        store
            .resource_insert(
                r.report_id,
                &vigia_core::Resource::repo("repo", "https://git.example/x", "tester"),
            )
            .unwrap();

        let svc = CatalogService::new(&store, &clock);
        let entries = svc.build_catalog(&CatalogFilter::default()).unwrap();

        assert_eq!(entries.len(), 1);
        // Delivered 5 days into a 30-day cycle whose next run is 20 days
        // out: inside the current cycle.
        assert_eq!(entries[0].status, DeliveryState::Delivered);
        assert!(entries[0].has_repo);
        assert_eq!(
            entries[0].repo_url.as_deref(),
            Some("https://git.example/x")
        );
        assert!(!entries[0].has_template);
    }

    #[test]
    fn test_catalog_applies_filter() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(Utc::now());

        store
            .report_insert(&report("FIN-1", ReportCriticality::Critical))
            .unwrap();
        store
            .report_insert(&report("RSK-1", ReportCriticality::Low))
            .unwrap();

        let svc = CatalogService::new(&store, &clock);
        let entries = svc
            .build_catalog(&CatalogFilter {
                criticality: Some(ReportCriticality::Critical),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].report.code, "FIN-1");
    }

    #[test]
    fn test_dashboard_counts() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(Utc::now());

        store
            .report_insert(&report("A", ReportCriticality::Critical))
            .unwrap();
        store
            .report_insert(&report("B", ReportCriticality::Critical))
            .unwrap();
        let c = report("C", ReportCriticality::Low);
        store.report_insert(&c).unwrap();
        store
            .schedule_insert(&ScheduleSpec::new(
                c.report_id,
                Frequency::Daily,
                serde_json::json!({}),
            ))
            .unwrap();

        let svc = CatalogService::new(&store, &clock);
        let stats = svc.dashboard().unwrap();

        assert_eq!(stats.total_reports, 3);
        assert_eq!(stats.by_criticality[0], (ReportCriticality::Critical, 2));
        assert_eq!(stats.by_criticality[3], (ReportCriticality::Low, 1));
        assert_eq!(stats.by_frequency, vec![(Frequency::Daily, 1)]);
        assert_eq!(stats.recent.len(), 3);
    }
}
