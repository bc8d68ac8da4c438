//! VIGIA Test Utilities
//!
//! Shared fixtures for the workspace test suites: report builders, graph
//! seeding helpers and a re-exported in-memory store. Everything here
//! panics on store failure; these helpers are for test setup only.

pub use vigia_storage::MemoryStore;

pub use vigia_core::{
    AlertPolicy, Audience, DeliveryState, DependencyCriticality, DependencyEdge, DependencyKind,
    Frequency, Report, ReportCriticality, ReportId, ReportState, ScheduleSpec,
};

use vigia_storage::ReportStore;

/// Build an approved report with sensible defaults.
pub fn approved_report(code: &str) -> Report {
    let mut report = Report::new(
        code,
        format!("Report {code}"),
        "Regulatory",
        ReportCriticality::Medium,
        "fixtures",
    );
    report.state = ReportState::Approved;
    report
}

/// Build a report still pending review.
pub fn pending_report(code: &str) -> Report {
    Report::new(
        code,
        format!("Report {code}"),
        "Regulatory",
        ReportCriticality::Medium,
        "fixtures",
    )
}

/// Insert reports into a fresh store.
pub fn store_with(reports: &[&Report]) -> MemoryStore {
    let store = MemoryStore::new();
    for report in reports {
        store.report_insert(report).expect("fixture insert");
    }
    store
}

/// Insert a validated Data/Medium edge between two seeded reports.
pub fn link(store: &MemoryStore, origin: &Report, dependent: &Report) {
    let edge = DependencyEdge::new(
        origin.report_id,
        dependent.report_id,
        DependencyKind::Data,
        DependencyCriticality::Medium,
        "fixtures",
    );
    store.edge_insert(&edge).expect("fixture edge");
}

/// Seed a linear production chain: each report depends on the previous
/// one. Returns the reports in chain order.
pub fn seed_chain(store: &MemoryStore, codes: &[&str]) -> Vec<Report> {
    let reports: Vec<Report> = codes.iter().map(|code| approved_report(code)).collect();
    for report in &reports {
        store.report_insert(report).expect("fixture insert");
    }
    for pair in reports.windows(2) {
        link(store, &pair[0], &pair[1]);
    }
    reports
}

/// Seed a two-report cycle: each depends on the other.
pub fn seed_cycle(store: &MemoryStore, code_a: &str, code_b: &str) -> (Report, Report) {
    let a = approved_report(code_a);
    let b = approved_report(code_b);
    store.report_insert(&a).expect("fixture insert");
    store.report_insert(&b).expect("fixture insert");
    link(store, &a, &b);
    link(store, &b, &a);
    (a, b)
}

/// Seed a diamond: `src` feeds two middle reports which both feed `sink`.
/// Returns (src, left, right, sink).
pub fn seed_diamond(store: &MemoryStore) -> (Report, Report, Report, Report) {
    let src = approved_report("DIA-SRC");
    let left = approved_report("DIA-L");
    let right = approved_report("DIA-R");
    let sink = approved_report("DIA-SINK");
    for report in [&src, &left, &right, &sink] {
        store.report_insert(report).expect("fixture insert");
    }
    link(store, &src, &left);
    link(store, &src, &right);
    link(store, &left, &sink);
    link(store, &right, &sink);
    (src, left, right, sink)
}

/// Attach a monthly schedule to a seeded report.
pub fn monthly_schedule(store: &MemoryStore, report: &Report) {
    store
        .schedule_insert(&ScheduleSpec::new(
            report.report_id,
            Frequency::Monthly,
            serde_json::json!({"day": 1}),
        ))
        .expect("fixture schedule");
}
