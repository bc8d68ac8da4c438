//! VIGIA Core - Entity Types
//!
//! Pure data structures with no behavior. All other crates depend on this.
//! This crate contains ONLY data types - no business logic.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// Report identifier using UUIDv7 for timestamp-sortable IDs.
pub type ReportId = Uuid;

/// Dependency edge identifier.
pub type EdgeId = Uuid;

/// Attached resource identifier.
pub type ResourceId = Uuid;

/// Delivery history record identifier.
pub type DeliveryId = Uuid;

/// Audit log entry identifier.
pub type AuditId = Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Generate a new UUIDv7 identifier (timestamp-sortable).
pub fn new_entity_id() -> Uuid {
    Uuid::now_v7()
}

// ============================================================================
// ENUMS
// ============================================================================

/// Entity type discriminator for error payloads and audit entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Report,
    Schedule,
    Edge,
    Resource,
    Delivery,
    AlertPolicy,
}

/// Lifecycle state of a report. Forward-only: a report is created in
/// `PendingReview` and never transitions backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportState {
    PendingReview,
    Approved,
    Retired,
}

impl fmt::Display for ReportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReportState::PendingReview => "PENDING_REVIEW",
            ReportState::Approved => "APPROVED",
            ReportState::Retired => "RETIRED",
        };
        f.write_str(s)
    }
}

impl FromStr for ReportState {
    type Err = VigiaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING_REVIEW" => Ok(ReportState::PendingReview),
            "APPROVED" => Ok(ReportState::Approved),
            "RETIRED" => Ok(ReportState::Retired),
            other => Err(invalid_value("report state", other)),
        }
    }
}

/// Criticality of a report. Ordering is ascending severity so that
/// `Critical` sorts last with derived `Ord` and first with `Reverse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReportCriticality {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for ReportCriticality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReportCriticality::Low => "LOW",
            ReportCriticality::Medium => "MEDIUM",
            ReportCriticality::High => "HIGH",
            ReportCriticality::Critical => "CRITICAL",
        };
        f.write_str(s)
    }
}

impl FromStr for ReportCriticality {
    type Err = VigiaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(ReportCriticality::Low),
            "MEDIUM" => Ok(ReportCriticality::Medium),
            "HIGH" => Ok(ReportCriticality::High),
            "CRITICAL" => Ok(ReportCriticality::Critical),
            other => Err(invalid_value("report criticality", other)),
        }
    }
}

/// Kind of dependency between two reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyKind {
    /// Dependent consumes the origin's data output.
    Data,
    /// Dependent recomputes figures from the origin.
    Calculation,
    /// Dependent consolidates the origin into a wider view.
    Consolidation,
    /// Dependent cross-checks the origin.
    Validation,
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DependencyKind::Data => "DATA",
            DependencyKind::Calculation => "CALCULATION",
            DependencyKind::Consolidation => "CONSOLIDATION",
            DependencyKind::Validation => "VALIDATION",
        };
        f.write_str(s)
    }
}

impl FromStr for DependencyKind {
    type Err = VigiaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DATA" => Ok(DependencyKind::Data),
            "CALCULATION" => Ok(DependencyKind::Calculation),
            "CONSOLIDATION" => Ok(DependencyKind::Consolidation),
            "VALIDATION" => Ok(DependencyKind::Validation),
            other => Err(invalid_value("dependency kind", other)),
        }
    }
}

/// Criticality carried by a dependency edge. Ascending severity ordering;
/// lineage levels sort these descending (High first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DependencyCriticality {
    Low,
    Medium,
    High,
}

impl fmt::Display for DependencyCriticality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DependencyCriticality::Low => "LOW",
            DependencyCriticality::Medium => "MEDIUM",
            DependencyCriticality::High => "HIGH",
        };
        f.write_str(s)
    }
}

impl FromStr for DependencyCriticality {
    type Err = VigiaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(DependencyCriticality::Low),
            "MEDIUM" => Ok(DependencyCriticality::Medium),
            "HIGH" => Ok(DependencyCriticality::High),
            other => Err(invalid_value("dependency criticality", other)),
        }
    }
}

/// Delivery frequency of a scheduled report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Semiannual,
    Annual,
    AdHoc,
}

impl Frequency {
    /// Nominal length of one scheduling cycle. Used to derive the start of
    /// the current cycle when deciding whether a report was already
    /// delivered for it. `AdHoc` has no cycle.
    pub fn nominal_cycle(&self) -> Option<Duration> {
        match self {
            Frequency::Daily => Some(Duration::days(1)),
            Frequency::Weekly => Some(Duration::weeks(1)),
            Frequency::Monthly => Some(Duration::days(30)),
            Frequency::Quarterly => Some(Duration::days(91)),
            Frequency::Semiannual => Some(Duration::days(182)),
            Frequency::Annual => Some(Duration::days(365)),
            Frequency::AdHoc => None,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Quarterly => "QUARTERLY",
            Frequency::Semiannual => "SEMIANNUAL",
            Frequency::Annual => "ANNUAL",
            Frequency::AdHoc => "AD_HOC",
        };
        f.write_str(s)
    }
}

impl FromStr for Frequency {
    type Err = VigiaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DAILY" => Ok(Frequency::Daily),
            "WEEKLY" => Ok(Frequency::Weekly),
            "MONTHLY" => Ok(Frequency::Monthly),
            "QUARTERLY" => Ok(Frequency::Quarterly),
            "SEMIANNUAL" => Ok(Frequency::Semiannual),
            "ANNUAL" => Ok(Frequency::Annual),
            "AD_HOC" => Ok(Frequency::AdHoc),
            other => Err(invalid_value("frequency", other)),
        }
    }
}

/// Derived delivery lifecycle state of a report at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryState {
    /// Scheduled run is in the past.
    Overdue,
    /// Within the alert lead window before the scheduled run.
    DueSoon,
    /// Scheduled and comfortably ahead of the lead window.
    OnTime,
    /// Already delivered for the current scheduling cycle.
    Delivered,
    /// No scheduled run.
    Unscheduled,
}

impl DeliveryState {
    /// Fixed catalog sort precedence: OVERDUE first, UNSCHEDULED last.
    pub fn sort_rank(&self) -> u8 {
        match self {
            DeliveryState::Overdue => 1,
            DeliveryState::DueSoon => 2,
            DeliveryState::OnTime => 3,
            DeliveryState::Delivered => 4,
            DeliveryState::Unscheduled => 5,
        }
    }
}

impl fmt::Display for DeliveryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeliveryState::Overdue => "OVERDUE",
            DeliveryState::DueSoon => "DUE_SOON",
            DeliveryState::OnTime => "ON_TIME",
            DeliveryState::Delivered => "DELIVERED",
            DeliveryState::Unscheduled => "UNSCHEDULED",
        };
        f.write_str(s)
    }
}

/// Intended audience of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Audience {
    Internal,
    External,
}

/// Kind of resource attached to a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Link to the source repository producing the report.
    Repo,
    /// Stored template/format document.
    Template,
}

/// Traversal direction over the dependency graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward origins: reports the focal report depends on.
    Upstream,
    /// Toward dependents: reports that depend on the focal report.
    Downstream,
}

// ============================================================================
// REFERENCE CONFIG
// ============================================================================

/// Lead hours applied when no alert policy exists for a frequency.
pub const DEFAULT_ALERT_LEAD_HOURS: i64 = 24;

/// Hard circuit-breaker on lineage depth.
pub const DEFAULT_MAX_LEVELS: usize = 10;

/// Alert policy: hours before the scheduled run at which a report of the
/// given frequency enters the "due soon" state. Static reference data,
/// read-only to the engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertPolicy {
    pub frequency: Frequency,
    pub lead_hours: i64,
}

/// Options for a lineage traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageOptions {
    /// Maximum number of levels expanded per direction.
    pub max_levels: usize,
}

impl Default for LineageOptions {
    fn default() -> Self {
        Self {
            max_levels: DEFAULT_MAX_LEVELS,
        }
    }
}

// ============================================================================
// CORE ENTITY STRUCTS
// ============================================================================

/// Report - a recurring organizational deliverable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub report_id: ReportId,
    /// Unique human-assigned internal code (generated per report type).
    pub code: String,
    pub name: String,
    pub report_type: String,
    pub purpose: Option<String>,
    pub description: Option<String>,
    pub audience: Audience,
    pub external_recipient: Option<String>,
    pub criticality: ReportCriticality,
    pub state: ReportState,
    pub delivery_format: Option<String>,
    pub report_format: Option<String>,
    pub delivery_path: Option<String>,
    /// Next scheduled run, absent for unscheduled reports.
    pub next_run: Option<Timestamp>,
    pub last_delivered: Option<Timestamp>,
    /// Derived delivery state, persisted as a cache and recomputed on
    /// schedule changes and deliveries.
    pub delivery_status: Option<DeliveryState>,
    pub created_by: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Report {
    /// Create a new report in `PendingReview` state.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        report_type: impl Into<String>,
        criticality: ReportCriticality,
        created_by: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            report_id: Uuid::now_v7(),
            code: code.into(),
            name: name.into(),
            report_type: report_type.into(),
            purpose: None,
            description: None,
            audience: Audience::Internal,
            external_recipient: None,
            criticality,
            state: ReportState::PendingReview,
            delivery_format: None,
            report_format: None,
            delivery_path: None,
            next_run: None,
            last_delivered: None,
            delivery_status: None,
            created_by: created_by.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the purpose.
    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the audience, with the external recipient when applicable.
    pub fn with_audience(mut self, audience: Audience, recipient: Option<String>) -> Self {
        self.audience = audience;
        self.external_recipient = recipient;
        self
    }

    /// Set delivery and report formats.
    pub fn with_formats(
        mut self,
        delivery_format: impl Into<String>,
        report_format: impl Into<String>,
    ) -> Self {
        self.delivery_format = Some(delivery_format.into());
        self.report_format = Some(report_format.into());
        self
    }

    /// Set the delivery path.
    pub fn with_delivery_path(mut self, path: impl Into<String>) -> Self {
        self.delivery_path = Some(path.into());
        self
    }
}

/// Schedule specification - belongs to exactly one report (1:1).
/// The rule payload is opaque to the core; an external evaluator turns it
/// into concrete run timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSpec {
    pub report_id: ReportId,
    pub frequency: Frequency,
    pub rules: serde_json::Value,
    pub created_at: Timestamp,
}

impl ScheduleSpec {
    pub fn new(report_id: ReportId, frequency: Frequency, rules: serde_json::Value) -> Self {
        Self {
            report_id,
            frequency,
            rules,
            created_at: Utc::now(),
        }
    }
}

/// Directed dependency edge: `dependent_id`'s production depends on
/// `origin_id`'s output. At most one edge per ordered pair; no self-loops.
/// The edge set is NOT guaranteed acyclic at the data layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub edge_id: EdgeId,
    pub origin_id: ReportId,
    pub dependent_id: ReportId,
    pub kind: DependencyKind,
    pub criticality: DependencyCriticality,
    pub note: Option<String>,
    /// False while the dependent report awaits approval; flipped to true
    /// when that report is approved.
    pub validated: bool,
    pub created_by: String,
    pub created_at: Timestamp,
}

impl DependencyEdge {
    pub fn new(
        origin_id: ReportId,
        dependent_id: ReportId,
        kind: DependencyKind,
        criticality: DependencyCriticality,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            edge_id: Uuid::now_v7(),
            origin_id,
            dependent_id,
            kind,
            criticality,
            note: None,
            validated: true,
            created_by: created_by.into(),
            created_at: Utc::now(),
        }
    }

    /// Attach a free-text note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Mark the edge as preliminary (dependent report not yet approved).
    pub fn unvalidated(mut self) -> Self {
        self.validated = false;
        self
    }
}

/// Resource attached to a report (source repository link, template file).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub resource_id: ResourceId,
    pub kind: ResourceKind,
    pub name: String,
    pub url: Option<String>,
    pub server_path: Option<String>,
    pub size_bytes: Option<i64>,
    pub created_by: String,
    pub created_at: Timestamp,
}

impl Resource {
    pub fn repo(name: impl Into<String>, url: impl Into<String>, created_by: impl Into<String>) -> Self {
        Self {
            resource_id: Uuid::now_v7(),
            kind: ResourceKind::Repo,
            name: name.into(),
            url: Some(url.into()),
            server_path: None,
            size_bytes: None,
            created_by: created_by.into(),
            created_at: Utc::now(),
        }
    }

    pub fn template(
        name: impl Into<String>,
        server_path: impl Into<String>,
        size_bytes: i64,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            resource_id: Uuid::now_v7(),
            kind: ResourceKind::Template,
            name: name.into(),
            url: None,
            server_path: Some(server_path.into()),
            size_bytes: Some(size_bytes),
            created_by: created_by.into(),
            created_at: Utc::now(),
        }
    }
}

/// One recorded delivery of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    pub delivery_id: DeliveryId,
    pub report_id: ReportId,
    pub delivered_at: Timestamp,
    pub recorded_by: String,
    pub note: Option<String>,
}

impl DeliveryRecord {
    pub fn new(report_id: ReportId, delivered_at: Timestamp, recorded_by: impl Into<String>) -> Self {
        Self {
            delivery_id: Uuid::now_v7(),
            report_id,
            delivered_at,
            recorded_by: recorded_by.into(),
            note: None,
        }
    }
}

/// Audit log entry. Written in the same unit of work as the change it
/// describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub audit_id: AuditId,
    pub entity: EntityType,
    pub entity_id: Uuid,
    pub action: String,
    pub detail: String,
    pub actor: String,
    pub context: Option<serde_json::Value>,
    pub at: Timestamp,
}

impl AuditEntry {
    pub fn new(
        entity: EntityType,
        entity_id: Uuid,
        action: impl Into<String>,
        detail: impl Into<String>,
        actor: impl Into<String>,
        at: Timestamp,
    ) -> Self {
        Self {
            audit_id: Uuid::now_v7(),
            entity,
            entity_id,
            action: action.into(),
            detail: detail.into(),
            actor: actor.into(),
            context: None,
            at,
        }
    }

    /// Attach structured context.
    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = Some(context);
        self
    }
}

// ============================================================================
// SUMMARY ROWS
// ============================================================================

/// Slim report row used by list views and lineage levels. Constructed once
/// at the store boundary - never by positional column access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub report_id: ReportId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub audience: Audience,
    pub state: ReportState,
    pub report_type: String,
}

impl ReportSummary {
    pub fn of(report: &Report) -> Self {
        Self {
            report_id: report.report_id,
            code: report.code.clone(),
            name: report.name.clone(),
            description: report.description.clone(),
            audience: report.audience,
            state: report.state,
            report_type: report.report_type.clone(),
        }
    }
}

/// A neighbor discovered during lineage traversal: the report summary plus
/// the attributes of the edge that reached it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborSummary {
    pub report: ReportSummary,
    pub edge_kind: DependencyKind,
    pub edge_criticality: DependencyCriticality,
}

impl NeighborSummary {
    pub fn report_id(&self) -> ReportId {
        self.report.report_id
    }
}

/// Focal report header for a lineage view, including direct edge counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocalReport {
    pub report: ReportSummary,
    pub frequency: Option<Frequency>,
    pub external_recipient: Option<String>,
    /// Direct upstream edges (reports this one depends on).
    pub dependency_count: usize,
    /// Direct downstream edges (reports depending on this one).
    pub dependent_count: usize,
}

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Machine-readable error taxonomy surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    Conflict,
    PreconditionFailed,
    StoreUnavailable,
}

/// Storage layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Entity not found: {entity_type:?} with id {id}")]
    NotFound { entity_type: EntityType, id: Uuid },

    #[error("Conflict: {reason}")]
    Conflict { reason: String },

    #[error("Store unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Validation errors raised by the write-path engines.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("A report cannot depend on itself: {id}")]
    SelfDependency { id: ReportId },

    #[error("Report {code} is not approved")]
    EndpointNotApproved { id: ReportId, code: String },

    #[error("Dependency already exists: {origin_id} -> {dependent_id}")]
    DuplicateDependency {
        origin_id: ReportId,
        dependent_id: ReportId,
    },

    #[error("Report {code} is already approved")]
    AlreadyApproved { id: ReportId, code: String },
}

/// Master error type for all VIGIA operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VigiaError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl VigiaError {
    /// Map onto the fixed taxonomy consumed by API layers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            VigiaError::Store(StoreError::NotFound { .. }) => ErrorKind::NotFound,
            VigiaError::Store(StoreError::Conflict { .. }) => ErrorKind::Conflict,
            VigiaError::Store(StoreError::Unavailable { .. }) => ErrorKind::StoreUnavailable,
            VigiaError::Validation(ValidationError::InvalidValue { .. }) => ErrorKind::InvalidInput,
            VigiaError::Validation(ValidationError::SelfDependency { .. }) => {
                ErrorKind::InvalidInput
            }
            VigiaError::Validation(ValidationError::EndpointNotApproved { .. }) => {
                ErrorKind::PreconditionFailed
            }
            VigiaError::Validation(ValidationError::DuplicateDependency { .. }) => {
                ErrorKind::Conflict
            }
            VigiaError::Validation(ValidationError::AlreadyApproved { .. }) => ErrorKind::Conflict,
        }
    }
}

/// Result type alias for VIGIA operations.
pub type VigiaResult<T> = Result<T, VigiaError>;

fn invalid_value(field: &str, value: &str) -> VigiaError {
    VigiaError::Validation(ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: "not a recognized value".to_string(),
    })
}

// =============================================================================
// TESTS
// =============================================================================


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    fn any_delivery_state() -> impl Strategy<Value = DeliveryState> {
        prop_oneof![
            Just(DeliveryState::Overdue),
            Just(DeliveryState::DueSoon),
            Just(DeliveryState::OnTime),
            Just(DeliveryState::Delivered),
            Just(DeliveryState::Unscheduled),
        ]
    }

    fn any_frequency() -> impl Strategy<Value = Frequency> {
        prop_oneof![
            Just(Frequency::Daily),
            Just(Frequency::Weekly),
            Just(Frequency::Monthly),
            Just(Frequency::Quarterly),
            Just(Frequency::Semiannual),
            Just(Frequency::Annual),
            Just(Frequency::AdHoc),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Sort ranks are distinct and stay within the documented 1..=5 band.
        #[test]
        fn prop_sort_rank_in_band(state in any_delivery_state()) {
            let rank = state.sort_rank();
            prop_assert!((1..=5).contains(&rank));
        }

        /// Display and FromStr agree for every frequency token.
        #[test]
        fn prop_frequency_display_parse_roundtrip(freq in any_frequency()) {
            let token = freq.to_string();
            let parsed: Frequency = token.parse().unwrap();
            prop_assert_eq!(parsed, freq);
        }

        /// Unknown enum tokens always map to InvalidInput, never panic.
        #[test]
        fn prop_unknown_tokens_are_invalid_input(token in "[a-z]{1,12}") {
            if let Err(err) = token.parse::<DependencyKind>() {
                prop_assert_eq!(err.kind(), ErrorKind::InvalidInput);
            }
        }
    }
}
