//! Dependency registrar.
//!
//! The only writer of dependency edges, and the owner of the report
//! approval action. Validation is a short-circuit pipeline: the first
//! failing step reports its error and nothing later runs, so callers get
//! one precise error instead of a bag of them.

use vigia_core::{
    AuditEntry, DependencyCriticality, DependencyEdge, DependencyKind, EdgeId, EntityType, Report,
    ReportId, ReportState, StoreError, ValidationError, VigiaError, VigiaResult,
};
use vigia_storage::ReportStore;

use crate::clock::Clock;

/// Where a dependency creation request comes from.
///
/// During initial submission the dependent report is still pending
/// review; the approval check exempts it and the edge is persisted
/// unvalidated until the report is approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOrigin {
    /// Regular edge creation between existing reports.
    Standard,
    /// Edge created as part of submitting the named dependent report.
    InitialSubmission { dependent: ReportId },
}

/// Raw dependency creation request. Kind and criticality arrive as wire
/// tokens and are parsed inside the pipeline.
#[derive(Debug, Clone)]
pub struct CreateDependencyInput {
    pub origin_id: ReportId,
    pub dependent_id: ReportId,
    pub kind: String,
    pub criticality: String,
    pub note: Option<String>,
    pub created_by: String,
}

/// Result of approving a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalOutcome {
    pub report_id: ReportId,
    pub code: String,
    /// Edges flipped from preliminary to validated by this approval.
    pub validated_edges: u32,
}

/// Write-path engine for dependency edges and report approval.
pub struct DependencyRegistrar<'a> {
    store: &'a dyn ReportStore,
    clock: &'a dyn Clock,
}

impl<'a> DependencyRegistrar<'a> {
    pub fn new(store: &'a dyn ReportStore, clock: &'a dyn Clock) -> Self {
        Self { store, clock }
    }

    /// Create a directed dependency edge.
    ///
    /// Pipeline: endpoint existence, self-loop, kind token, criticality
    /// token, endpoint approval (with the initial-submission exemption),
    /// duplicate pair. The store's `edge_insert` re-checks the pair under
    /// its own lock, so a concurrent identical create loses with
    /// `Conflict` rather than producing a second edge.
    pub fn create_dependency(
        &self,
        input: &CreateDependencyInput,
        origin: EdgeOrigin,
    ) -> VigiaResult<EdgeId> {
        let origin_report = self.fetch(input.origin_id)?;
        let dependent_report = self.fetch(input.dependent_id)?;

        if input.origin_id == input.dependent_id {
            return Err(ValidationError::SelfDependency {
                id: input.origin_id,
            }
            .into());
        }

        let kind: DependencyKind = input.kind.parse()?;
        let criticality: DependencyCriticality = input.criticality.parse()?;

        let exempt_dependent = matches!(
            origin,
            EdgeOrigin::InitialSubmission { dependent } if dependent == input.dependent_id
        );
        self.require_approved(&origin_report)?;
        if !exempt_dependent {
            self.require_approved(&dependent_report)?;
        }

        if self.store.edge_exists(input.origin_id, input.dependent_id)? {
            return Err(ValidationError::DuplicateDependency {
                origin_id: input.origin_id,
                dependent_id: input.dependent_id,
            }
            .into());
        }

        let mut edge = DependencyEdge::new(
            input.origin_id,
            input.dependent_id,
            kind,
            criticality,
            input.created_by.clone(),
        );
        if let Some(note) = &input.note {
            edge = edge.with_note(note.clone());
        }
        if exempt_dependent {
            edge = edge.unvalidated();
        }

        let audit = AuditEntry::new(
            EntityType::Edge,
            edge.edge_id,
            "CREATE",
            format!(
                "Dependency {} -> {} ({kind}, {criticality})",
                origin_report.code, dependent_report.code
            ),
            input.created_by.clone(),
            self.clock.now(),
        )
        .with_context(serde_json::json!({
            "origin_id": input.origin_id,
            "dependent_id": input.dependent_id,
            "validated": edge.validated,
        }));
        // The edge and its audit entry land together or not at all.
        let edge_id = self.store.edge_insert_audited(&edge, &audit)?;

        tracing::info!(
            origin = %origin_report.code,
            dependent = %dependent_report.code,
            kind = %kind,
            criticality = %criticality,
            validated = edge.validated,
            "dependency created"
        );

        Ok(edge_id)
    }

    /// Approve a pending report and validate its preliminary edges in
    /// both directions.
    pub fn approve_report(&self, id: ReportId, actor: &str) -> VigiaResult<ApprovalOutcome> {
        let report = self.fetch(id)?;

        match report.state {
            ReportState::PendingReview => {}
            ReportState::Approved => {
                return Err(ValidationError::AlreadyApproved {
                    id,
                    code: report.code,
                }
                .into());
            }
            ReportState::Retired => {
                return Err(VigiaError::Store(StoreError::Conflict {
                    reason: format!("report {} is retired", report.code),
                }));
            }
        }

        let audit = AuditEntry::new(
            EntityType::Report,
            id,
            "APPROVE",
            format!("Report {} approved", report.code),
            actor,
            self.clock.now(),
        );
        // State change, edge validation and audit form one unit.
        let validated_edges = self.store.report_approve(id, &audit)?;

        tracing::info!(
            report = %report.code,
            validated_edges,
            "report approved"
        );

        Ok(ApprovalOutcome {
            report_id: id,
            code: report.code,
            validated_edges,
        })
    }

    fn fetch(&self, id: ReportId) -> VigiaResult<Report> {
        self.store
            .report_get(id)?
            .ok_or(VigiaError::Store(StoreError::NotFound {
                entity_type: EntityType::Report,
                id,
            }))
    }

    fn require_approved(&self, report: &Report) -> VigiaResult<()> {
        if report.state != ReportState::Approved {
            return Err(ValidationError::EndpointNotApproved {
                id: report.report_id,
                code: report.code.clone(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::Utc;
    use vigia_core::{ErrorKind, ReportCriticality};
    use vigia_storage::MemoryStore;

    fn approved(code: &str) -> Report {
        let mut report = Report::new(
            code,
            format!("Report {code}"),
            "Regulatory",
            ReportCriticality::Medium,
            "tester",
        );
        report.state = ReportState::Approved;
        report
    }

    fn pending(code: &str) -> Report {
        Report::new(
            code,
            format!("Report {code}"),
            "Regulatory",
            ReportCriticality::Medium,
            "tester",
        )
    }

    fn input(origin: &Report, dependent: &Report) -> CreateDependencyInput {
        CreateDependencyInput {
            origin_id: origin.report_id,
            dependent_id: dependent.report_id,
            kind: "DATA".to_string(),
            criticality: "MEDIUM".to_string(),
            note: None,
            created_by: "tester".to_string(),
        }
    }

    fn setup(reports: &[&Report]) -> MemoryStore {
        let store = MemoryStore::new();
        for report in reports {
            store.report_insert(report).unwrap();
        }
        store
    }

    #[test]
    fn test_create_dependency_happy_path() {
        let a = approved("A");
        let b = approved("B");
        let store = setup(&[&a, &b]);
        let clock = FixedClock::new(Utc::now());
        let registrar = DependencyRegistrar::new(&store, &clock);

        let edge_id = registrar
            .create_dependency(&input(&a, &b), EdgeOrigin::Standard)
            .unwrap();

        let edge = store.edge_get(edge_id).unwrap().unwrap();
        assert!(edge.validated);
        assert_eq!(edge.kind, DependencyKind::Data);

        let audit = store.audit_for(EntityType::Edge, edge_id).unwrap();
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].action, "CREATE");
    }

    #[test]
    fn test_self_dependency_is_invalid_input() {
        let a = approved("A");
        let store = setup(&[&a]);
        let clock = FixedClock::new(Utc::now());
        let registrar = DependencyRegistrar::new(&store, &clock);

        let err = registrar
            .create_dependency(&input(&a, &a), EdgeOrigin::Standard)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_unknown_kind_rejected_before_state_checks() {
        let a = approved("A");
        let b = pending("B");
        let store = setup(&[&a, &b]);
        let clock = FixedClock::new(Utc::now());
        let registrar = DependencyRegistrar::new(&store, &clock);

        let mut req = input(&a, &b);
        req.kind = "TRANSFER".to_string();
        let err = registrar
            .create_dependency(&req, EdgeOrigin::Standard)
            .unwrap_err();
        // The kind step fires before the approval step sees pending B.
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_unapproved_endpoint_is_precondition_failed() {
        let a = approved("A");
        let b = pending("B");
        let store = setup(&[&a, &b]);
        let clock = FixedClock::new(Utc::now());
        let registrar = DependencyRegistrar::new(&store, &clock);

        let err = registrar
            .create_dependency(&input(&a, &b), EdgeOrigin::Standard)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PreconditionFailed);
    }

    #[test]
    fn test_initial_submission_exempts_dependent_only() {
        let origin = approved("A");
        let dependent = pending("B");
        let store = setup(&[&origin, &dependent]);
        let clock = FixedClock::new(Utc::now());
        let registrar = DependencyRegistrar::new(&store, &clock);

        let edge_id = registrar
            .create_dependency(
                &input(&origin, &dependent),
                EdgeOrigin::InitialSubmission {
                    dependent: dependent.report_id,
                },
            )
            .unwrap();
        let edge = store.edge_get(edge_id).unwrap().unwrap();
        assert!(!edge.validated);

        // The exemption never covers a pending origin.
        let pending_origin = pending("C");
        store.report_insert(&pending_origin).unwrap();
        let err = registrar
            .create_dependency(
                &input(&pending_origin, &dependent),
                EdgeOrigin::InitialSubmission {
                    dependent: dependent.report_id,
                },
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PreconditionFailed);
    }

    #[test]
    fn test_duplicate_pair_is_conflict() {
        let a = approved("A");
        let b = approved("B");
        let store = setup(&[&a, &b]);
        let clock = FixedClock::new(Utc::now());
        let registrar = DependencyRegistrar::new(&store, &clock);

        registrar
            .create_dependency(&input(&a, &b), EdgeOrigin::Standard)
            .unwrap();
        let err = registrar
            .create_dependency(&input(&a, &b), EdgeOrigin::Standard)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        // Opposite direction is a distinct pair.
        registrar
            .create_dependency(&input(&b, &a), EdgeOrigin::Standard)
            .unwrap();
    }

    #[test]
    fn test_rejected_create_leaves_no_edge_and_no_audit() {
        let a = approved("A");
        let b = approved("B");
        let store = setup(&[&a, &b]);
        let clock = FixedClock::new(Utc::now());
        let registrar = DependencyRegistrar::new(&store, &clock);

        registrar
            .create_dependency(&input(&a, &b), EdgeOrigin::Standard)
            .unwrap();
        assert_eq!(store.total_edge_count().unwrap(), 1);
        assert_eq!(store.audit_count().unwrap(), 1);

        let err = registrar
            .create_dependency(&input(&a, &b), EdgeOrigin::Standard)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        // Nothing from the failed attempt persists.
        assert_eq!(store.total_edge_count().unwrap(), 1);
        assert_eq!(store.audit_count().unwrap(), 1);
    }

    #[test]
    fn test_missing_endpoint_is_not_found() {
        let a = approved("A");
        let store = setup(&[&a]);
        let clock = FixedClock::new(Utc::now());
        let registrar = DependencyRegistrar::new(&store, &clock);

        let ghost = approved("GHOST");
        let err = registrar
            .create_dependency(&input(&a, &ghost), EdgeOrigin::Standard)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_approve_validates_edges_both_directions() {
        let origin = approved("A");
        let target = pending("B");
        let dependent = approved("C");
        let store = setup(&[&origin, &target, &dependent]);
        let clock = FixedClock::new(Utc::now());
        let registrar = DependencyRegistrar::new(&store, &clock);

        // B depends on A (preliminary via submission); C's edge from B is
        // seeded directly as preliminary.
        registrar
            .create_dependency(
                &input(&origin, &target),
                EdgeOrigin::InitialSubmission {
                    dependent: target.report_id,
                },
            )
            .unwrap();
        let seeded = DependencyEdge::new(
            target.report_id,
            dependent.report_id,
            DependencyKind::Consolidation,
            DependencyCriticality::High,
            "tester",
        )
        .unvalidated();
        store.edge_insert(&seeded).unwrap();

        let outcome = registrar.approve_report(target.report_id, "reviewer").unwrap();
        assert_eq!(outcome.validated_edges, 2);
        assert_eq!(outcome.code, "B");

        let updated = store.report_get(target.report_id).unwrap().unwrap();
        assert_eq!(updated.state, ReportState::Approved);
        for edge in store.edges_touching(target.report_id).unwrap() {
            assert!(edge.validated);
        }
    }

    #[test]
    fn test_approve_twice_is_conflict() {
        let report = pending("A");
        let store = setup(&[&report]);
        let clock = FixedClock::new(Utc::now());
        let registrar = DependencyRegistrar::new(&store, &clock);

        registrar.approve_report(report.report_id, "reviewer").unwrap();
        let err = registrar
            .approve_report(report.report_id, "reviewer")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_approve_missing_report_is_not_found() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(Utc::now());
        let registrar = DependencyRegistrar::new(&store, &clock);

        let err = registrar
            .approve_report(uuid::Uuid::now_v7(), "reviewer")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
