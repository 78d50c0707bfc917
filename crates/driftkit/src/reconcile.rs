//! Reconciliation of declared and observed state.
//!
//! Both documents are keyed by `"<type>.<name>"`. Every key present in
//! either document yields exactly one [`Resource`], classified as:
//!
//! | declared | observed | status                          |
//! |----------|----------|---------------------------------|
//! | yes      | yes      | `synced` or `modified` (diff)   |
//! | yes      | no       | `missing`                       |
//! | no       | yes      | `added`                         |
//!
//! Output order is first-occurrence order: declared keys in document order,
//! then observed-only keys in document order. Duplicate keys within one
//! document are resolved last-write-wins.

use crate::diff::configs_equal;
use crate::document::{ActualState, DeclaredResource, DeclaredState, ObservedResource};
use crate::mapper::{map_resource_type, normalize_dependency, resource_id};
use crate::types::{ConfigMap, DriftStatus, Resource};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Region reported for resources whose observation carries none.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Options for a reconciliation run
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Region used when an observed resource has none
    pub default_region: String,
    /// Timestamp stamped on every resource; `None` means "now"
    pub checked_at: Option<DateTime<Utc>>,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            default_region: DEFAULT_REGION.to_string(),
            checked_at: None,
        }
    }
}

impl ReconcileOptions {
    /// Use a different fallback region
    pub fn with_default_region(mut self, region: impl Into<String>) -> Self {
        self.default_region = region.into();
        self
    }

    /// Pin the comparison timestamp
    pub fn with_checked_at(mut self, checked_at: DateTime<Utc>) -> Self {
        self.checked_at = Some(checked_at);
        self
    }
}

/// Which documents a composite key was found in.
#[derive(Debug, Clone, Copy)]
enum Pairing<'a> {
    Declared(&'a DeclaredResource),
    Observed(&'a ObservedResource),
    Both(&'a DeclaredResource, &'a ObservedResource),
}

impl<'a> Pairing<'a> {
    fn declared(&self) -> Option<&'a DeclaredResource> {
        match *self {
            Self::Declared(d) | Self::Both(d, _) => Some(d),
            Self::Observed(_) => None,
        }
    }

    fn observed(&self) -> Option<&'a ObservedResource> {
        match *self {
            Self::Observed(o) | Self::Both(_, o) => Some(o),
            Self::Declared(_) => None,
        }
    }

    fn with_declared(self, declared: &'a DeclaredResource) -> Self {
        match self {
            Self::Declared(_) => Self::Declared(declared),
            Self::Observed(o) | Self::Both(_, o) => Self::Both(declared, o),
        }
    }

    fn with_observed(self, observed: &'a ObservedResource) -> Self {
        match self {
            Self::Observed(_) => Self::Observed(observed),
            Self::Declared(d) | Self::Both(d, _) => Self::Both(d, observed),
        }
    }
}

/// Insertion-ordered key index with last-write-wins values.
#[derive(Default)]
struct KeyIndex<'a> {
    slots: Vec<(String, Pairing<'a>)>,
    positions: HashMap<String, usize>,
}

impl<'a> KeyIndex<'a> {
    fn insert_declared(&mut self, resource: &'a DeclaredResource) {
        let key = resource.key();
        match self.positions.get(&key).copied() {
            Some(pos) => self.slots[pos].1 = self.slots[pos].1.with_declared(resource),
            None => self.push(key, Pairing::Declared(resource)),
        }
    }

    fn insert_observed(&mut self, resource: &'a ObservedResource) {
        let key = resource.key();
        match self.positions.get(&key).copied() {
            Some(pos) => self.slots[pos].1 = self.slots[pos].1.with_observed(resource),
            None => self.push(key, Pairing::Observed(resource)),
        }
    }

    fn push(&mut self, key: String, pairing: Pairing<'a>) {
        self.positions.insert(key.clone(), self.slots.len());
        self.slots.push((key, pairing));
    }
}

/// Reconcile declared and observed state with default options.
pub fn compare_states(declared: &DeclaredState, actual: &ActualState) -> Vec<Resource> {
    compare_states_with(declared, actual, &ReconcileOptions::default())
}

/// Reconcile declared and observed state.
pub fn compare_states_with(
    declared: &DeclaredState,
    actual: &ActualState,
    options: &ReconcileOptions,
) -> Vec<Resource> {
    let checked_at = options.checked_at.unwrap_or_else(Utc::now);

    let mut index = KeyIndex::default();
    for resource in &declared.resources {
        index.insert_declared(resource);
    }
    for resource in &actual.resources {
        index.insert_observed(resource);
    }

    let resources: Vec<Resource> = index
        .slots
        .iter()
        .map(|(key, pairing)| reconcile_one(key, *pairing, options, checked_at))
        .collect();

    log::debug!(
        "Reconciled {} declared and {} observed resources into {} keys",
        declared.resources.len(),
        actual.resources.len(),
        resources.len()
    );

    resources
}

fn reconcile_one(
    key: &str,
    pairing: Pairing<'_>,
    options: &ReconcileOptions,
    checked_at: DateTime<Utc>,
) -> Resource {
    let declared = pairing.declared();
    let observed = pairing.observed();

    if let Some(d) = declared
        && d.instances.len() > 1
    {
        log::warn!(
            "{key} has {} instances; comparing the first and ignoring {}",
            d.instances.len(),
            d.instances.len() - 1
        );
    }

    let (status, terraform_config, actual_config) = match pairing {
        Pairing::Both(d, o) => {
            let attributes = declared_attributes(d);
            let status = if configs_equal(&attributes, &o.config) {
                DriftStatus::Synced
            } else {
                DriftStatus::Modified
            };
            (status, attributes, o.config.clone())
        }
        Pairing::Declared(d) => (DriftStatus::Missing, declared_attributes(d), ConfigMap::new()),
        Pairing::Observed(o) => (DriftStatus::Added, ConfigMap::new(), o.config.clone()),
    };

    let raw_type = first_non_empty([
        declared.map(|d| d.resource_type.as_str()),
        observed.map(|o| o.resource_type.as_str()),
    ])
    .unwrap_or("unknown");
    let resource_type = map_resource_type(raw_type);

    let name = first_non_empty([
        declared.map(|d| d.name.as_str()),
        observed.map(|o| o.name.as_str()),
    ])
    .unwrap_or(key)
    .to_string();

    let dependencies: Vec<String> = declared
        .and_then(DeclaredResource::first_instance)
        .and_then(|i| i.depends_on.as_ref())
        .or(observed.map(|o| &o.depends_on))
        .map(|deps| deps.iter().map(|d| normalize_dependency(d)).collect())
        .unwrap_or_default();

    let region = first_non_empty([observed.and_then(|o| o.region.as_deref())])
        .unwrap_or(options.default_region.as_str())
        .to_string();

    Resource {
        id: resource_id(resource_type, &name),
        name,
        resource_type,
        status,
        terraform_config,
        actual_config,
        dependencies,
        last_checked: checked_at,
        region,
    }
}

/// Attributes of the first instance, or `{}` when there are none.
fn declared_attributes(resource: &DeclaredResource) -> ConfigMap {
    resource
        .first_instance()
        .map(|i| i.attributes.clone())
        .unwrap_or_default()
}

fn first_non_empty<'s, const N: usize>(candidates: [Option<&'s str>; N]) -> Option<&'s str> {
    candidates.into_iter().flatten().find(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DeclaredInstance;
    use crate::types::ResourceType;
    use serde_json::{Value, json};
    use std::collections::HashSet;

    fn attrs(value: Value) -> ConfigMap {
        value.as_object().cloned().unwrap_or_default()
    }

    fn declared(ty: &str, name: &str, attributes: Value) -> DeclaredResource {
        DeclaredResource {
            resource_type: ty.to_string(),
            name: name.to_string(),
            provider_name: Some("aws".to_string()),
            mode: Some("managed".to_string()),
            instances: vec![DeclaredInstance {
                attributes: attrs(attributes),
                depends_on: Some(vec![]),
                index_key: None,
            }],
        }
    }

    fn observed(ty: &str, name: &str, config: Value) -> ObservedResource {
        ObservedResource {
            id: format!("{ty}.{name}"),
            resource_type: ty.to_string(),
            name: name.to_string(),
            config: attrs(config),
            depends_on: vec![],
            region: None,
        }
    }

    fn declared_state(resources: Vec<DeclaredResource>) -> DeclaredState {
        DeclaredState {
            resources,
            ..DeclaredState::default()
        }
    }

    #[test]
    fn test_synced_resource() {
        let planned = declared_state(vec![declared(
            "aws_instance",
            "web",
            json!({"id": "i-123", "instance_type": "t3.micro"}),
        )]);
        let actual = ActualState {
            resources: vec![observed(
                "aws_instance",
                "web",
                json!({"id": "i-123", "instance_type": "t3.micro"}),
            )],
        };

        let result = compare_states(&planned, &actual);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].status, DriftStatus::Synced);
        assert_eq!(result[0].resource_type, ResourceType::Ec2);
        assert_eq!(result[0].id, "ec2-web");
        assert_eq!(result[0].name, "web");
    }

    #[test]
    fn test_modified_resource() {
        let planned = declared_state(vec![declared(
            "aws_instance",
            "web",
            json!({"id": "i-123", "instance_type": "t3.micro"}),
        )]);
        let actual = ActualState {
            resources: vec![observed("aws_instance", "web", json!({"instance_type": "t3.large"}))],
        };

        let result = compare_states(&planned, &actual);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].status, DriftStatus::Modified);
        assert_eq!(result[0].terraform_config["instance_type"], "t3.micro");
        assert_eq!(result[0].actual_config["instance_type"], "t3.large");
        assert_eq!(result[0].changes().len(), 2);
    }

    #[test]
    fn test_missing_resource() {
        let planned = declared_state(vec![declared(
            "aws_instance",
            "deleted-server",
            json!({"id": "i-deleted", "instance_type": "t3.micro"}),
        )]);

        let result = compare_states(&planned, &ActualState::default());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].status, DriftStatus::Missing);
        assert!(result[0].actual_config.is_empty());
        assert_eq!(result[0].terraform_config["id"], "i-deleted");
    }

    #[test]
    fn test_added_resource() {
        let actual = ActualState {
            resources: vec![observed(
                "aws_instance",
                "untracked-server",
                json!({"instance_type": "t3.micro"}),
            )],
        };

        let result = compare_states(&DeclaredState::default(), &actual);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].status, DriftStatus::Added);
        assert!(result[0].terraform_config.is_empty());
        assert_eq!(result[0].actual_config["instance_type"], "t3.micro");
    }

    #[test]
    fn test_mixed_statuses_keep_first_occurrence_order() {
        let planned = declared_state(vec![
            declared("aws_instance", "synced-server", json!({"id": "i-1"})),
            declared("aws_instance", "modified-server", json!({"id": "i-2"})),
            declared("aws_instance", "deleted-server", json!({"id": "i-3"})),
        ]);
        let actual = ActualState {
            resources: vec![
                observed("aws_instance", "new-server", json!({"id": "i-4"})),
                observed("aws_instance", "modified-server", json!({"id": "i-2b"})),
                observed("aws_instance", "synced-server", json!({"id": "i-1"})),
            ],
        };

        let result = compare_states(&planned, &actual);
        let summary: Vec<(&str, DriftStatus)> =
            result.iter().map(|r| (r.name.as_str(), r.status)).collect();
        assert_eq!(
            summary,
            vec![
                ("synced-server", DriftStatus::Synced),
                ("modified-server", DriftStatus::Modified),
                ("deleted-server", DriftStatus::Missing),
                ("new-server", DriftStatus::Added),
            ]
        );
    }

    #[test]
    fn test_keys_are_union_without_duplicates() {
        let planned = declared_state(vec![
            declared("aws_vpc", "main", json!({})),
            declared("aws_subnet", "a", json!({})),
            declared("aws_vpc", "main", json!({"cidr_block": "10.0.0.0/16"})),
        ]);
        let actual = ActualState {
            resources: vec![
                observed("aws_subnet", "a", json!({})),
                observed("aws_s3_bucket", "logs", json!({})),
                observed("aws_s3_bucket", "logs", json!({})),
            ],
        };

        let result = compare_states(&planned, &actual);
        let keys: HashSet<String> = result
            .iter()
            .map(|r| format!("{}.{}", r.resource_type, r.name))
            .collect();
        assert_eq!(result.len(), 3);
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn test_duplicate_keys_last_write_wins() {
        let planned = declared_state(vec![
            declared("aws_vpc", "main", json!({"cidr_block": "10.0.0.0/16"})),
            declared("aws_vpc", "main", json!({"cidr_block": "10.1.0.0/16"})),
        ]);
        let actual = ActualState {
            resources: vec![observed("aws_vpc", "main", json!({"cidr_block": "10.1.0.0/16"}))],
        };

        let result = compare_states(&planned, &actual);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].status, DriftStatus::Synced);
    }

    #[test]
    fn test_observed_duplicates_last_write_wins_in_first_slot() {
        let planned = declared_state(vec![declared("aws_vpc", "main", json!({"cidr_block": "10.1.0.0/16"}))]);
        let actual = ActualState {
            resources: vec![
                observed("aws_s3_bucket", "logs", json!({"acl": "private"})),
                observed("aws_sqs_queue", "jobs", json!({})),
                observed("aws_vpc", "main", json!({"cidr_block": "10.0.0.0/16"})),
                observed("aws_s3_bucket", "logs", json!({"acl": "public-read"})),
                observed("aws_vpc", "main", json!({"cidr_block": "10.1.0.0/16"})),
            ],
        };

        let result = compare_states(&planned, &actual);
        let names: Vec<&str> = result.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["main", "logs", "jobs"]);

        assert_eq!(result[0].status, DriftStatus::Synced);
        assert_eq!(result[1].status, DriftStatus::Added);
        assert_eq!(result[1].actual_config["acl"], "public-read");
    }

    #[test]
    fn test_declared_without_instances() {
        let mut empty = declared("aws_vpc", "main", json!({}));
        empty.instances.clear();
        let planned = declared_state(vec![empty]);

        let bare = ActualState {
            resources: vec![observed("aws_vpc", "main", json!({}))],
        };
        assert_eq!(compare_states(&planned, &bare)[0].status, DriftStatus::Synced);

        let configured = ActualState {
            resources: vec![observed("aws_vpc", "main", json!({"cidr_block": "10.0.0.0/16"}))],
        };
        assert_eq!(compare_states(&planned, &configured)[0].status, DriftStatus::Modified);
    }

    #[test]
    fn test_only_first_instance_is_compared() {
        let mut multi = declared("aws_instance", "web", json!({"instance_type": "t3.micro"}));
        multi.instances.push(DeclaredInstance {
            attributes: attrs(json!({"instance_type": "t3.large"})),
            depends_on: None,
            index_key: Some(json!(1)),
        });
        let planned = declared_state(vec![multi]);
        let actual = ActualState {
            resources: vec![observed("aws_instance", "web", json!({"instance_type": "t3.micro"}))],
        };

        assert_eq!(compare_states(&planned, &actual)[0].status, DriftStatus::Synced);
    }

    #[test]
    fn test_dependencies_prefer_declared_instance() {
        let mut web = declared("aws_instance", "web", json!({}));
        web.instances[0].depends_on = Some(vec![
            "aws_subnet.public".to_string(),
            "aws_security_group.web".to_string(),
            "aws_iam_role.app".to_string(),
        ]);
        let planned = declared_state(vec![web]);
        let mut seen = observed("aws_instance", "web", json!({}));
        seen.depends_on = vec!["aws_vpc.other".to_string()];
        let actual = ActualState { resources: vec![seen] };

        let result = compare_states(&planned, &actual);
        assert_eq!(
            result[0].dependencies,
            vec!["aws-subnet", "aws-security-group", "aws_iam_role.app"]
        );
    }

    #[test]
    fn test_dependencies_fall_back_to_observed() {
        let mut web = declared("aws_instance", "web", json!({}));
        web.instances[0].depends_on = None;
        let planned = declared_state(vec![web]);
        let mut seen = observed("aws_instance", "web", json!({}));
        seen.depends_on = vec!["aws_vpc.main".to_string()];
        let actual = ActualState { resources: vec![seen] };

        assert_eq!(compare_states(&planned, &actual)[0].dependencies, vec!["aws-vpc"]);
    }

    #[test]
    fn test_region_defaults_and_passthrough() {
        let mut eu = observed("aws_s3_bucket", "eu", json!({}));
        eu.region = Some("eu-west-1".to_string());
        let mut blank = observed("aws_s3_bucket", "blank", json!({}));
        blank.region = Some(String::new());
        let actual = ActualState {
            resources: vec![eu, blank, observed("aws_s3_bucket", "none", json!({}))],
        };

        let result = compare_states(&DeclaredState::default(), &actual);
        assert_eq!(result[0].region, "eu-west-1");
        assert_eq!(result[1].region, DEFAULT_REGION);
        assert_eq!(result[2].region, DEFAULT_REGION);

        let options = ReconcileOptions::default().with_default_region("ap-south-1");
        let result = compare_states_with(&DeclaredState::default(), &actual, &options);
        assert_eq!(result[2].region, "ap-south-1");
    }

    #[test]
    fn test_name_and_type_fallbacks() {
        let actual = ActualState {
            resources: vec![observed("", "", json!({"a": 1}))],
        };
        let result = compare_states(&DeclaredState::default(), &actual);
        assert_eq!(result[0].name, ".");
        assert_eq!(result[0].resource_type, ResourceType::Unknown);
        assert_eq!(result[0].id, "unknown--");
    }

    #[test]
    fn test_checked_at_is_pinned() {
        let at = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let actual = ActualState {
            resources: vec![observed("aws_vpc", "main", json!({}))],
        };
        let options = ReconcileOptions::default().with_checked_at(at);
        let result = compare_states_with(&DeclaredState::default(), &actual, &options);
        assert_eq!(result[0].last_checked, at);
    }
}
