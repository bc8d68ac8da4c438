//! VIGIA Storage - Store Trait and In-Memory Implementation
//!
//! Defines the storage abstraction layer for VIGIA entities. Relational
//! persistence lives behind this boundary; the engines only ever see
//! strongly-typed records constructed here.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vigia_core::{
    AlertPolicy, AuditEntry, DeliveryRecord, DeliveryState, DependencyEdge, Direction, EdgeId,
    EntityType, Frequency, NeighborSummary, Report, ReportCriticality, ReportId, ReportState,
    ReportSummary, Resource, ScheduleSpec, StoreError, Timestamp, VigiaError, VigiaResult,
};

// ============================================================================
// UPDATE & FILTER TYPES
// ============================================================================

/// Update payload for reports. Unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportUpdate {
    /// New lifecycle state
    pub state: Option<ReportState>,
    /// New next scheduled run
    pub next_run: Option<Timestamp>,
    /// New last-delivered timestamp
    pub last_delivered: Option<Timestamp>,
    /// Refreshed delivery-status cache
    pub delivery_status: Option<DeliveryState>,
}

/// Filter for catalog listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFilter {
    /// Case-insensitive substring match over code, name and type.
    pub search: Option<String>,
    pub state: Option<ReportState>,
    pub criticality: Option<ReportCriticality>,
}

impl CatalogFilter {
    fn matches(&self, report: &Report) -> bool {
        if let Some(ref term) = self.search {
            let term = term.to_lowercase();
            let hit = report.code.to_lowercase().contains(&term)
                || report.name.to_lowercase().contains(&term)
                || report.report_type.to_lowercase().contains(&term);
            if !hit {
                return false;
            }
        }
        if let Some(state) = self.state {
            if report.state != state {
                return false;
            }
        }
        if let Some(criticality) = self.criticality {
            if report.criticality != criticality {
                return false;
            }
        }
        true
    }
}

// ============================================================================
// STORE TRAIT
// ============================================================================

/// Store boundary for VIGIA entities.
///
/// Every operation is atomic on its own: implementations must not expose
/// partially-applied writes. In particular `edge_insert` owns the
/// endpoint-existence and duplicate-pair checks, so two concurrent inserts
/// of the same ordered pair can never both succeed.
pub trait ReportStore: Send + Sync {
    // === Report Operations ===

    /// Insert a new report. Fails `Conflict` on duplicate id or code.
    fn report_insert(&self, report: &Report) -> VigiaResult<()>;

    /// Get a report by id.
    fn report_get(&self, id: ReportId) -> VigiaResult<Option<Report>>;

    /// Apply an update to a report. Fails `NotFound` if absent.
    fn report_update(&self, id: ReportId, update: ReportUpdate) -> VigiaResult<()>;

    /// List reports matching a catalog filter, ordered by code.
    fn report_list(&self, filter: &CatalogFilter) -> VigiaResult<Vec<Report>>;

    /// Most recently created reports, newest first.
    fn report_recent(&self, limit: usize) -> VigiaResult<Vec<ReportSummary>>;

    // === Schedule Operations ===

    /// Insert a schedule spec. Fails `Conflict` if the report already has
    /// one (every report has at most one schedule).
    fn schedule_insert(&self, spec: &ScheduleSpec) -> VigiaResult<()>;

    /// Get the schedule spec for a report.
    fn schedule_get(&self, report_id: ReportId) -> VigiaResult<Option<ScheduleSpec>>;

    // === Edge Operations ===

    /// Insert a dependency edge, atomically checking that both endpoints
    /// exist (`NotFound`) and that the ordered pair is new (`Conflict`).
    fn edge_insert(&self, edge: &DependencyEdge) -> VigiaResult<EdgeId>;

    /// Get an edge by id.
    fn edge_get(&self, id: EdgeId) -> VigiaResult<Option<DependencyEdge>>;

    /// Whether an edge exists for the ordered pair.
    fn edge_exists(&self, origin_id: ReportId, dependent_id: ReportId) -> VigiaResult<bool>;

    /// All edges where the report participates on either side.
    fn edges_touching(&self, report_id: ReportId) -> VigiaResult<Vec<DependencyEdge>>;

    /// Count direct edges of a report in one direction.
    fn edge_count(&self, report_id: ReportId, direction: Direction) -> VigiaResult<usize>;

    /// One relational hop from the frontier: direct neighbors in the given
    /// direction, excluding `exclude` ids, restricted to `Approved`
    /// reports, de-duplicated per report, ordered by edge criticality
    /// descending then code ascending.
    fn neighbors_of(
        &self,
        frontier: &BTreeSet<ReportId>,
        direction: Direction,
        exclude: &BTreeSet<ReportId>,
    ) -> VigiaResult<Vec<NeighborSummary>>;

    // === Unit-of-Work Operations ===

    /// Insert a report together with its audit entry; both are recorded
    /// or neither is.
    fn report_insert_audited(&self, report: &Report, audit: &AuditEntry) -> VigiaResult<()>;

    /// Insert a dependency edge together with its audit entry; both are
    /// recorded or neither is. Same checks as `edge_insert`.
    fn edge_insert_audited(
        &self,
        edge: &DependencyEdge,
        audit: &AuditEntry,
    ) -> VigiaResult<EdgeId>;

    /// Approve a pending report as one unit: set its state to
    /// `Approved`, mark every unvalidated edge touching it (either
    /// direction) validated, and record the audit entry. Fails
    /// `NotFound` when the report is absent and `Conflict` when it is
    /// not pending review. Returns the number of edges validated.
    fn report_approve(&self, id: ReportId, audit: &AuditEntry) -> VigiaResult<u32>;

    // === Alert Policy Operations ===

    /// Configured lead hours for a frequency, if any.
    fn alert_lead_hours(&self, frequency: Frequency) -> VigiaResult<Option<i64>>;

    /// Insert or replace an alert policy.
    fn alert_policy_upsert(&self, policy: &AlertPolicy) -> VigiaResult<()>;

    // === Resource Operations ===

    /// Attach a resource to a report. Fails `NotFound` if the report is
    /// absent.
    fn resource_insert(&self, report_id: ReportId, resource: &Resource) -> VigiaResult<()>;

    /// Resources attached to a report.
    fn resources_for(&self, report_id: ReportId) -> VigiaResult<Vec<Resource>>;

    // === Delivery History Operations ===

    /// Append a delivery record. Fails `NotFound` if the report is absent.
    fn delivery_append(&self, record: &DeliveryRecord) -> VigiaResult<()>;

    /// Delivery history for a report, newest first.
    fn deliveries_for(&self, report_id: ReportId, limit: usize) -> VigiaResult<Vec<DeliveryRecord>>;

    // === Audit Operations ===

    /// Append an audit entry.
    fn audit_append(&self, entry: &AuditEntry) -> VigiaResult<()>;

    /// Audit entries for an entity, oldest first.
    fn audit_for(&self, entity: EntityType, entity_id: Uuid) -> VigiaResult<Vec<AuditEntry>>;
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

/// In-memory store for tests and development.
///
/// Operations touching several tables take their locks in one fixed
/// order: reports, schedules, edges, resources, deliveries, alerts,
/// audits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    reports: Arc<RwLock<HashMap<ReportId, Report>>>,
    schedules: Arc<RwLock<HashMap<ReportId, ScheduleSpec>>>,
    edges: Arc<RwLock<HashMap<EdgeId, DependencyEdge>>>,
    resources: Arc<RwLock<HashMap<ReportId, Vec<Resource>>>>,
    deliveries: Arc<RwLock<HashMap<ReportId, Vec<DeliveryRecord>>>>,
    alerts: Arc<RwLock<HashMap<Frequency, i64>>>,
    audits: Arc<RwLock<Vec<AuditEntry>>>,
}

fn read_guard<T>(lock: &RwLock<T>) -> VigiaResult<RwLockReadGuard<'_, T>> {
    lock.read().map_err(|_| {
        VigiaError::Store(StoreError::Unavailable {
            reason: "storage lock poisoned".to_string(),
        })
    })
}

fn write_guard<T>(lock: &RwLock<T>) -> VigiaResult<RwLockWriteGuard<'_, T>> {
    lock.write().map_err(|_| {
        VigiaError::Store(StoreError::Unavailable {
            reason: "storage lock poisoned".to_string(),
        })
    })
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored data.
    pub fn clear(&self) {
        if let Ok(mut t) = self.reports.write() {
            t.clear();
        }
        if let Ok(mut t) = self.schedules.write() {
            t.clear();
        }
        if let Ok(mut t) = self.edges.write() {
            t.clear();
        }
        if let Ok(mut t) = self.resources.write() {
            t.clear();
        }
        if let Ok(mut t) = self.deliveries.write() {
            t.clear();
        }
        if let Ok(mut t) = self.alerts.write() {
            t.clear();
        }
        if let Ok(mut t) = self.audits.write() {
            t.clear();
        }
    }

    /// Number of stored reports.
    pub fn report_count(&self) -> VigiaResult<usize> {
        Ok(read_guard(&self.reports)?.len())
    }

    /// Number of stored edges.
    pub fn total_edge_count(&self) -> VigiaResult<usize> {
        Ok(read_guard(&self.edges)?.len())
    }

    /// Number of audit entries.
    pub fn audit_count(&self) -> VigiaResult<usize> {
        Ok(read_guard(&self.audits)?.len())
    }

    fn insert_report_locked(
        reports: &mut HashMap<ReportId, Report>,
        report: &Report,
    ) -> VigiaResult<()> {
        if reports.contains_key(&report.report_id) {
            return Err(VigiaError::Store(StoreError::Conflict {
                reason: format!("report {} already exists", report.report_id),
            }));
        }
        if reports.values().any(|r| r.code == report.code) {
            return Err(VigiaError::Store(StoreError::Conflict {
                reason: format!("report code {} already in use", report.code),
            }));
        }
        reports.insert(report.report_id, report.clone());
        Ok(())
    }

    fn insert_edge_locked(
        reports: &HashMap<ReportId, Report>,
        edges: &mut HashMap<EdgeId, DependencyEdge>,
        edge: &DependencyEdge,
    ) -> VigiaResult<EdgeId> {
        for endpoint in [edge.origin_id, edge.dependent_id] {
            if !reports.contains_key(&endpoint) {
                return Err(VigiaError::Store(StoreError::NotFound {
                    entity_type: EntityType::Report,
                    id: endpoint,
                }));
            }
        }
        let duplicate = edges
            .values()
            .any(|e| e.origin_id == edge.origin_id && e.dependent_id == edge.dependent_id);
        if duplicate {
            return Err(VigiaError::Store(StoreError::Conflict {
                reason: format!(
                    "dependency {} -> {} already exists",
                    edge.origin_id, edge.dependent_id
                ),
            }));
        }
        edges.insert(edge.edge_id, edge.clone());
        Ok(edge.edge_id)
    }
}

impl ReportStore for MemoryStore {
    // === Report Operations ===

    fn report_insert(&self, report: &Report) -> VigiaResult<()> {
        let mut reports = write_guard(&self.reports)?;
        Self::insert_report_locked(&mut reports, report)
    }

    fn report_get(&self, id: ReportId) -> VigiaResult<Option<Report>> {
        Ok(read_guard(&self.reports)?.get(&id).cloned())
    }

    fn report_update(&self, id: ReportId, update: ReportUpdate) -> VigiaResult<()> {
        let mut reports = write_guard(&self.reports)?;
        let report = reports.get_mut(&id).ok_or(VigiaError::Store(StoreError::NotFound {
            entity_type: EntityType::Report,
            id,
        }))?;

        if let Some(state) = update.state {
            report.state = state;
        }
        if let Some(next_run) = update.next_run {
            report.next_run = Some(next_run);
        }
        if let Some(last_delivered) = update.last_delivered {
            report.last_delivered = Some(last_delivered);
        }
        if let Some(status) = update.delivery_status {
            report.delivery_status = Some(status);
        }
        report.updated_at = chrono::Utc::now();

        Ok(())
    }

    fn report_list(&self, filter: &CatalogFilter) -> VigiaResult<Vec<Report>> {
        let reports = read_guard(&self.reports)?;
        let mut result: Vec<Report> = reports
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        result.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(result)
    }

    fn report_recent(&self, limit: usize) -> VigiaResult<Vec<ReportSummary>> {
        let reports = read_guard(&self.reports)?;
        let mut rows: Vec<&Report> = reports.values().collect();
        rows.sort_by_key(|r| Reverse(r.created_at));
        Ok(rows.into_iter().take(limit).map(ReportSummary::of).collect())
    }

    // === Schedule Operations ===

    fn schedule_insert(&self, spec: &ScheduleSpec) -> VigiaResult<()> {
        let reports = read_guard(&self.reports)?;
        if !reports.contains_key(&spec.report_id) {
            return Err(VigiaError::Store(StoreError::NotFound {
                entity_type: EntityType::Report,
                id: spec.report_id,
            }));
        }
        drop(reports);

        let mut schedules = write_guard(&self.schedules)?;
        if schedules.contains_key(&spec.report_id) {
            return Err(VigiaError::Store(StoreError::Conflict {
                reason: format!("report {} already has a schedule", spec.report_id),
            }));
        }
        schedules.insert(spec.report_id, spec.clone());
        Ok(())
    }

    fn schedule_get(&self, report_id: ReportId) -> VigiaResult<Option<ScheduleSpec>> {
        Ok(read_guard(&self.schedules)?.get(&report_id).cloned())
    }

    // === Edge Operations ===

    fn edge_insert(&self, edge: &DependencyEdge) -> VigiaResult<EdgeId> {
        // Uniqueness of the ordered pair is enforced under the write lock;
        // this is the mutual-exclusion scope for check-then-insert.
        let reports = read_guard(&self.reports)?;
        let mut edges = write_guard(&self.edges)?;
        Self::insert_edge_locked(&reports, &mut edges, edge)
    }

    fn edge_get(&self, id: EdgeId) -> VigiaResult<Option<DependencyEdge>> {
        Ok(read_guard(&self.edges)?.get(&id).cloned())
    }

    fn edge_exists(&self, origin_id: ReportId, dependent_id: ReportId) -> VigiaResult<bool> {
        let edges = read_guard(&self.edges)?;
        Ok(edges
            .values()
            .any(|e| e.origin_id == origin_id && e.dependent_id == dependent_id))
    }

    fn edges_touching(&self, report_id: ReportId) -> VigiaResult<Vec<DependencyEdge>> {
        let edges = read_guard(&self.edges)?;
        Ok(edges
            .values()
            .filter(|e| e.origin_id == report_id || e.dependent_id == report_id)
            .cloned()
            .collect())
    }

    fn edge_count(&self, report_id: ReportId, direction: Direction) -> VigiaResult<usize> {
        let edges = read_guard(&self.edges)?;
        Ok(edges
            .values()
            .filter(|e| match direction {
                Direction::Upstream => e.dependent_id == report_id,
                Direction::Downstream => e.origin_id == report_id,
            })
            .count())
    }

    fn neighbors_of(
        &self,
        frontier: &BTreeSet<ReportId>,
        direction: Direction,
        exclude: &BTreeSet<ReportId>,
    ) -> VigiaResult<Vec<NeighborSummary>> {
        if frontier.is_empty() {
            return Ok(Vec::new());
        }

        // Fixed lock order: reports before edges, matching edge_insert.
        let reports = read_guard(&self.reports)?;
        let edges = read_guard(&self.edges)?;

        let mut rows: Vec<NeighborSummary> = Vec::new();
        for edge in edges.values() {
            let neighbor_id = match direction {
                Direction::Upstream if frontier.contains(&edge.dependent_id) => edge.origin_id,
                Direction::Downstream if frontier.contains(&edge.origin_id) => edge.dependent_id,
                _ => continue,
            };
            if exclude.contains(&neighbor_id) {
                continue;
            }
            let Some(report) = reports.get(&neighbor_id) else {
                continue;
            };
            // Only validated graph members participate in lineage views.
            if report.state != ReportState::Approved {
                continue;
            }
            rows.push(NeighborSummary {
                report: ReportSummary::of(report),
                edge_kind: edge.kind,
                edge_criticality: edge.criticality,
            });
        }

        // Presentation contract: criticality descending, code ascending.
        rows.sort_by(|a, b| {
            Reverse(a.edge_criticality)
                .cmp(&Reverse(b.edge_criticality))
                .then_with(|| a.report.code.cmp(&b.report.code))
        });

        // A neighbor reachable through several frontier members appears
        // once, keeping the highest-criticality edge (first after sort).
        let mut seen: BTreeSet<ReportId> = BTreeSet::new();
        rows.retain(|row| seen.insert(row.report_id()));

        Ok(rows)
    }

    // === Unit-of-Work Operations ===

    fn report_insert_audited(&self, report: &Report, audit: &AuditEntry) -> VigiaResult<()> {
        let mut reports = write_guard(&self.reports)?;
        let mut audits = write_guard(&self.audits)?;
        Self::insert_report_locked(&mut reports, report)?;
        audits.push(audit.clone());
        Ok(())
    }

    fn edge_insert_audited(
        &self,
        edge: &DependencyEdge,
        audit: &AuditEntry,
    ) -> VigiaResult<EdgeId> {
        let reports = read_guard(&self.reports)?;
        let mut edges = write_guard(&self.edges)?;
        let mut audits = write_guard(&self.audits)?;
        let edge_id = Self::insert_edge_locked(&reports, &mut edges, edge)?;
        audits.push(audit.clone());
        Ok(edge_id)
    }

    fn report_approve(&self, id: ReportId, audit: &AuditEntry) -> VigiaResult<u32> {
        let mut reports = write_guard(&self.reports)?;
        let mut edges = write_guard(&self.edges)?;
        let mut audits = write_guard(&self.audits)?;

        let report = reports.get_mut(&id).ok_or(VigiaError::Store(StoreError::NotFound {
            entity_type: EntityType::Report,
            id,
        }))?;
        if report.state != ReportState::PendingReview {
            return Err(VigiaError::Store(StoreError::Conflict {
                reason: format!("report {} is not pending review", report.code),
            }));
        }
        report.state = ReportState::Approved;
        report.updated_at = chrono::Utc::now();

        let mut validated = 0;
        for edge in edges.values_mut() {
            let touches = edge.origin_id == id || edge.dependent_id == id;
            if touches && !edge.validated {
                edge.validated = true;
                validated += 1;
            }
        }
        audits.push(audit.clone());
        Ok(validated)
    }

    // === Alert Policy Operations ===

    fn alert_lead_hours(&self, frequency: Frequency) -> VigiaResult<Option<i64>> {
        Ok(read_guard(&self.alerts)?.get(&frequency).copied())
    }

    fn alert_policy_upsert(&self, policy: &AlertPolicy) -> VigiaResult<()> {
        write_guard(&self.alerts)?.insert(policy.frequency, policy.lead_hours);
        Ok(())
    }

    // === Resource Operations ===

    fn resource_insert(&self, report_id: ReportId, resource: &Resource) -> VigiaResult<()> {
        let reports = read_guard(&self.reports)?;
        if !reports.contains_key(&report_id) {
            return Err(VigiaError::Store(StoreError::NotFound {
                entity_type: EntityType::Report,
                id: report_id,
            }));
        }
        drop(reports);

        write_guard(&self.resources)?
            .entry(report_id)
            .or_default()
            .push(resource.clone());
        Ok(())
    }

    fn resources_for(&self, report_id: ReportId) -> VigiaResult<Vec<Resource>> {
        Ok(read_guard(&self.resources)?
            .get(&report_id)
            .cloned()
            .unwrap_or_default())
    }

    // === Delivery History Operations ===

    fn delivery_append(&self, record: &DeliveryRecord) -> VigiaResult<()> {
        let reports = read_guard(&self.reports)?;
        if !reports.contains_key(&record.report_id) {
            return Err(VigiaError::Store(StoreError::NotFound {
                entity_type: EntityType::Report,
                id: record.report_id,
            }));
        }
        drop(reports);

        write_guard(&self.deliveries)?
            .entry(record.report_id)
            .or_default()
            .push(record.clone());
        Ok(())
    }

    fn deliveries_for(&self, report_id: ReportId, limit: usize) -> VigiaResult<Vec<DeliveryRecord>> {
        let deliveries = read_guard(&self.deliveries)?;
        let mut rows = deliveries.get(&report_id).cloned().unwrap_or_default();
        rows.sort_by_key(|d| Reverse(d.delivered_at));
        rows.truncate(limit);
        Ok(rows)
    }

    // === Audit Operations ===

    fn audit_append(&self, entry: &AuditEntry) -> VigiaResult<()> {
        write_guard(&self.audits)?.push(entry.clone());
        Ok(())
    }

    fn audit_for(&self, entity: EntityType, entity_id: Uuid) -> VigiaResult<Vec<AuditEntry>> {
        let audits = read_guard(&self.audits)?;
        Ok(audits
            .iter()
            .filter(|a| a.entity == entity && a.entity_id == entity_id)
            .cloned()
            .collect())
    }
}

// ============================================================================
// TESTS
// ============================================================================


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;
    use vigia_core::{DependencyCriticality, DependencyKind};

    fn approved_report(code: String) -> Report {
        let mut report = Report::new(code.clone(), code, "Type", ReportCriticality::Medium, "gen");
        report.state = ReportState::Approved;
        report
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Getting a non-existent entity returns Ok(None), never an error.
        #[test]
        fn prop_get_not_found_returns_none(_dummy in any::<u8>()) {
            let store = MemoryStore::new();
            let id = Uuid::now_v7();
            prop_assert!(store.report_get(id).unwrap().is_none());
            prop_assert!(store.schedule_get(id).unwrap().is_none());
            prop_assert!(store.edge_get(id).unwrap().is_none());
        }

        /// The ordered-pair uniqueness holds for any kind/criticality of
        /// the second insert.
        #[test]
        fn prop_duplicate_pair_rejected(
            kind in prop_oneof![
                Just(DependencyKind::Data),
                Just(DependencyKind::Calculation),
                Just(DependencyKind::Consolidation),
                Just(DependencyKind::Validation),
            ],
            criticality in prop_oneof![
                Just(DependencyCriticality::Low),
                Just(DependencyCriticality::Medium),
                Just(DependencyCriticality::High),
            ],
        ) {
            let store = MemoryStore::new();
            let a = approved_report("A".to_string());
            let b = approved_report("B".to_string());
            store.report_insert(&a).unwrap();
            store.report_insert(&b).unwrap();

            let first = DependencyEdge::new(
                a.report_id, b.report_id,
                DependencyKind::Data, DependencyCriticality::Medium, "gen",
            );
            store.edge_insert(&first).unwrap();

            let second = DependencyEdge::new(a.report_id, b.report_id, kind, criticality, "gen");
            let result = store.edge_insert(&second);
            let conflicted = matches!(result, Err(VigiaError::Store(StoreError::Conflict { .. })));
            prop_assert!(conflicted);
        }

        /// Neighbor rows never contain excluded ids and are unique per
        /// report.
        #[test]
        fn prop_neighbors_respect_exclusion(n in 2usize..8) {
            let store = MemoryStore::new();
            let reports: Vec<Report> = (0..n)
                .map(|i| approved_report(format!("R-{i}")))
                .collect();
            for r in &reports {
                store.report_insert(r).unwrap();
            }
            // star: every other report feeds report 0
            for r in &reports[1..] {
                let edge = DependencyEdge::new(
                    r.report_id, reports[0].report_id,
                    DependencyKind::Data, DependencyCriticality::Medium, "gen",
                );
                store.edge_insert(&edge).unwrap();
            }

            let frontier = BTreeSet::from([reports[0].report_id]);
            let mut exclude = BTreeSet::from([reports[0].report_id]);
            exclude.insert(reports[1].report_id);

            let rows = store.neighbors_of(&frontier, Direction::Upstream, &exclude).unwrap();
            prop_assert_eq!(rows.len(), n - 2);

            let mut seen = BTreeSet::new();
            for row in &rows {
                prop_assert!(!exclude.contains(&row.report_id()));
                prop_assert!(seen.insert(row.report_id()));
            }
        }
    }
}
