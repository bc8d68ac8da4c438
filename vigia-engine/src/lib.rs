//! VIGIA Engine - Report Tracking Subsystems
//!
//! The behavioral core of VIGIA: lineage traversal over the dependency
//! graph, the dependency registrar and report approval, pure
//! delivery-status classification, report intake and the catalog
//! aggregator. All subsystems run against the `ReportStore` boundary with
//! an injected clock; nothing here performs I/O of its own.

pub mod catalog;
pub mod clock;
pub mod delivery;
pub mod lineage;
pub mod registrar;
pub mod submission;

pub use catalog::{CatalogEntry, CatalogService, DashboardStats};
pub use clock::{Clock, FixedClock, SystemClock};
pub use delivery::{classify, hours_until, time_remaining, DeliveryInputs};
pub use lineage::{LineageEngine, LineageTree};
pub use registrar::{
    ApprovalOutcome, CreateDependencyInput, DependencyRegistrar, EdgeOrigin,
};
pub use submission::{
    CodeGenerator, DependencyFailure, NewDependency, NewReport, ScheduleEvaluator,
    SubmissionOutcome, SubmissionService, TemplateUpload,
};
