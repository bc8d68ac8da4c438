//! Report intake and delivery recording.
//!
//! Orchestrates the full submission flow: code assignment, report and
//! schedule creation, the initial delivery-status cache, preliminary
//! dependencies and attached resources. Code assignment and schedule-rule
//! evaluation are external services behind narrow traits.

use serde::{Deserialize, Serialize};
use vigia_core::{
    AuditEntry, Audience, DeliveryRecord, EdgeId, EntityType, Frequency, Report,
    ReportCriticality, ReportId, Resource, ScheduleSpec, StoreError, Timestamp, VigiaError,
    VigiaResult,
};
use vigia_storage::{ReportStore, ReportUpdate};

use crate::clock::Clock;
use crate::delivery::{classify, DeliveryInputs};
use crate::registrar::{CreateDependencyInput, DependencyRegistrar, EdgeOrigin};

/// Assigns the human-facing internal code for a new report.
pub trait CodeGenerator: Send + Sync {
    fn next_code(&self, report_type: &str) -> String;
}

/// Interprets a schedule's opaque rule payload into the next concrete run
/// after a given instant. Returns `None` for schedules with no upcoming
/// run (ad hoc).
pub trait ScheduleEvaluator: Send + Sync {
    fn next_run(
        &self,
        frequency: Frequency,
        rules: &serde_json::Value,
        after: Timestamp,
    ) -> Option<Timestamp>;
}

/// Dependency declared as part of a submission. The new report is always
/// the dependent side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDependency {
    pub origin_id: ReportId,
    pub kind: String,
    pub criticality: String,
    pub note: Option<String>,
}

/// Template file already staged on the file server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateUpload {
    pub name: String,
    pub server_path: String,
    pub size_bytes: i64,
}

/// Full submission payload for a new report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReport {
    pub name: String,
    pub report_type: String,
    pub purpose: Option<String>,
    pub description: Option<String>,
    pub audience: Audience,
    pub external_recipient: Option<String>,
    pub criticality: String,
    pub frequency: String,
    pub schedule_rules: serde_json::Value,
    pub delivery_format: Option<String>,
    pub report_format: Option<String>,
    pub delivery_path: Option<String>,
    pub repo_url: Option<String>,
    pub template: Option<TemplateUpload>,
    pub dependencies: Vec<NewDependency>,
    pub created_by: String,
}

/// A dependency that could not be created during submission.
#[derive(Debug)]
pub struct DependencyFailure {
    pub origin_id: ReportId,
    pub error: VigiaError,
}

/// Result of a submission. Dependency failures are recorded here rather
/// than failing the whole submission.
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub report: Report,
    pub edges_created: Vec<EdgeId>,
    pub dependency_failures: Vec<DependencyFailure>,
}

/// Intake orchestrator.
pub struct SubmissionService<'a> {
    store: &'a dyn ReportStore,
    clock: &'a dyn Clock,
    codes: &'a dyn CodeGenerator,
    schedule: &'a dyn ScheduleEvaluator,
}

impl<'a> SubmissionService<'a> {
    pub fn new(
        store: &'a dyn ReportStore,
        clock: &'a dyn Clock,
        codes: &'a dyn CodeGenerator,
        schedule: &'a dyn ScheduleEvaluator,
    ) -> Self {
        Self {
            store,
            clock,
            codes,
            schedule,
        }
    }

    /// Submit a new report.
    ///
    /// The report is created in `PendingReview` with its schedule, the
    /// delivery-status cache primed, declared dependencies registered as
    /// preliminary edges, and any resources attached. A dependency that
    /// fails validation is reported in the outcome without aborting the
    /// rest of the submission.
    pub fn submit_report(&self, new: &NewReport) -> VigiaResult<SubmissionOutcome> {
        let criticality: ReportCriticality = new.criticality.parse()?;
        let frequency: Frequency = new.frequency.parse()?;
        let now = self.clock.now();

        let code = self.codes.next_code(&new.report_type);
        let mut report = Report::new(
            code.clone(),
            new.name.clone(),
            new.report_type.clone(),
            criticality,
            new.created_by.clone(),
        )
        .with_audience(new.audience, new.external_recipient.clone());
        if let Some(purpose) = &new.purpose {
            report = report.with_purpose(purpose.clone());
        }
        if let Some(description) = &new.description {
            report = report.with_description(description.clone());
        }
        if let (Some(delivery), Some(format)) = (&new.delivery_format, &new.report_format) {
            report = report.with_formats(delivery.clone(), format.clone());
        }
        if let Some(path) = &new.delivery_path {
            report = report.with_delivery_path(path.clone());
        }
        let report_id = report.report_id;
        let audit = AuditEntry::new(
            EntityType::Report,
            report_id,
            "CREATE",
            format!("Report {code} submitted for review"),
            new.created_by.clone(),
            now,
        );
        self.store.report_insert_audited(&report, &audit)?;

        let spec = ScheduleSpec::new(report_id, frequency, new.schedule_rules.clone());
        self.store.schedule_insert(&spec)?;

        let next_run = self.schedule.next_run(frequency, &new.schedule_rules, now);
        let status = classify(
            now,
            &DeliveryInputs {
                next_run,
                lead_hours: self.store.alert_lead_hours(frequency)?,
                last_delivered: None,
                frequency: Some(frequency),
            },
        );
        self.store.report_update(
            report_id,
            ReportUpdate {
                next_run,
                delivery_status: Some(status),
                ..Default::default()
            },
        )?;

        let registrar = DependencyRegistrar::new(self.store, self.clock);
        let mut edges_created = Vec::new();
        let mut dependency_failures = Vec::new();
        for dependency in &new.dependencies {
            let input = CreateDependencyInput {
                origin_id: dependency.origin_id,
                dependent_id: report_id,
                kind: dependency.kind.clone(),
                criticality: dependency.criticality.clone(),
                note: dependency.note.clone(),
                created_by: new.created_by.clone(),
            };
            match registrar.create_dependency(
                &input,
                EdgeOrigin::InitialSubmission {
                    dependent: report_id,
                },
            ) {
                Ok(edge_id) => edges_created.push(edge_id),
                Err(error) => {
                    tracing::warn!(
                        report = %code,
                        origin_id = %dependency.origin_id,
                        error = %error,
                        "dependency skipped during submission"
                    );
                    dependency_failures.push(DependencyFailure {
                        origin_id: dependency.origin_id,
                        error,
                    });
                }
            }
        }

        if let Some(url) = &new.repo_url {
            let resource = Resource::repo("Source repository", url.clone(), new.created_by.clone());
            self.store.resource_insert(report_id, &resource)?;
        }
        if let Some(template) = &new.template {
            let resource = Resource::template(
                template.name.clone(),
                template.server_path.clone(),
                template.size_bytes,
                new.created_by.clone(),
            );
            self.store.resource_insert(report_id, &resource)?;
        }

        tracing::info!(
            report = %code,
            frequency = %frequency,
            dependencies = edges_created.len(),
            failures = dependency_failures.len(),
            "report submitted"
        );

        let report = self.refetch(report_id)?;
        Ok(SubmissionOutcome {
            report,
            edges_created,
            dependency_failures,
        })
    }

    /// Record a delivery of the report at the current instant.
    ///
    /// Appends to the delivery history, advances the schedule, and
    /// refreshes the delivery-status cache.
    pub fn mark_delivered(&self, report_id: ReportId, actor: &str) -> VigiaResult<Report> {
        let report = self.refetch(report_id)?;
        let now = self.clock.now();

        self.store
            .delivery_append(&DeliveryRecord::new(report_id, now, actor))?;

        let spec = self.store.schedule_get(report_id)?;
        let frequency = spec.as_ref().map(|s| s.frequency);
        let evaluated = spec
            .as_ref()
            .and_then(|s| self.schedule.next_run(s.frequency, &s.rules, now));
        // When the evaluator yields nothing the current next_run stands.
        let effective_next_run = evaluated.or(report.next_run);

        let lead_hours = match frequency {
            Some(f) => self.store.alert_lead_hours(f)?,
            None => None,
        };
        let status = classify(
            now,
            &DeliveryInputs {
                next_run: effective_next_run,
                lead_hours,
                last_delivered: Some(now),
                frequency,
            },
        );
        self.store.report_update(
            report_id,
            ReportUpdate {
                next_run: evaluated,
                last_delivered: Some(now),
                delivery_status: Some(status),
                ..Default::default()
            },
        )?;

        self.store.audit_append(&AuditEntry::new(
            EntityType::Delivery,
            report_id,
            "DELIVER",
            format!("Report {} marked delivered", report.code),
            actor,
            now,
        ))?;

        tracing::info!(report = %report.code, status = %status, "delivery recorded");

        self.refetch(report_id)
    }

    fn refetch(&self, report_id: ReportId) -> VigiaResult<Report> {
        self.store
            .report_get(report_id)?
            .ok_or(VigiaError::Store(StoreError::NotFound {
                entity_type: EntityType::Report,
                id: report_id,
            }))
    }
}
