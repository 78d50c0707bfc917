//! # driftkit
//!
//! Infrastructure drift detection.
//!
//! This crate compares a declared infrastructure state (a Terraform state
//! document) with an observed actual state (live resource descriptions) and
//! reports, per resource, whether the two agree.
//!
//! ## Core Concepts
//!
//! - **Declared state**: what the Terraform state says should exist
//! - **Actual state**: what is really provisioned
//! - **Composite key**: `"<type>.<name>"`, joins the two documents
//! - **Drift status**: `synced`, `modified`, `missing` or `added`
//! - **Drift score**: weighted 0-100 health metric over a resource set
//!
//! ## Example
//!
//! ```
//! use driftkit::{DriftStatus, ReconcileOptions, compare_documents};
//!
//! let declared = r#"{
//!     "version": 4,
//!     "resources": [{
//!         "type": "aws_instance",
//!         "name": "web",
//!         "instances": [{ "attributes": { "instance_type": "t3.micro" } }]
//!     }]
//! }"#;
//! let actual = r#"[{
//!     "type": "aws_instance",
//!     "name": "web",
//!     "config": { "instance_type": "t3.large" }
//! }]"#;
//!
//! let report = compare_documents(declared, actual, &ReconcileOptions::default())?;
//! assert_eq!(report.resources[0].status, DriftStatus::Modified);
//! assert_eq!(report.summary.score, 50);
//! # Ok::<(), driftkit::Error>(())
//! ```
//!
//! The lower-level pieces are usable on their own: [`parse_declared_state`]
//! and [`parse_actual_state`] produce typed documents, [`compare_states`]
//! reconciles them and [`calculate_summary`] scores the result.
//!
//! ## Errors
//!
//! Only parsing can fail, with [`Error::InvalidDeclaredState`] or
//! [`Error::InvalidActualState`]. Everything else is total: unknown resource
//! types map to `unknown`, unrecognized references pass through, and missing
//! fields take documented defaults.

pub mod diff;
pub mod document;
pub mod error;
pub mod mapper;
pub mod reconcile;
pub mod report;
pub mod summary;
pub mod types;

pub use diff::{configs_equal, diff_configs, values_equal};
pub use document::{
    ActualState, DeclaredInstance, DeclaredResource, DeclaredState, ObservedResource,
    parse_actual_state, parse_declared_state,
};
pub use error::{DocumentKind, Error, Result};
pub use mapper::{map_resource_type, normalize_dependency, resource_id};
pub use reconcile::{DEFAULT_REGION, ReconcileOptions, compare_states, compare_states_with};
pub use report::compare_documents;
pub use summary::{calculate_drift_score, calculate_summary, drift_severity};
pub use types::{
    ConfigDiff, ConfigMap, DriftReport, DriftStatus, DriftSummary, Resource, ResourceType,
    Severity,
};
