//! Core types produced by the drift engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Attribute/config mapping of a resource (string key to arbitrary JSON).
pub type ConfigMap = serde_json::Map<String, Value>;

/// Drift status of a reconciled resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftStatus {
    /// Declared and observed configs agree
    Synced,
    /// Declared and observed configs differ in at least one field
    Modified,
    /// Declared but not observed
    Missing,
    /// Observed but not declared
    Added,
}

impl DriftStatus {
    /// All statuses, in reporting order
    pub const ALL: [DriftStatus; 4] = [Self::Synced, Self::Modified, Self::Missing, Self::Added];

    /// Lowercase tag used in serialized output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Synced => "synced",
            Self::Modified => "modified",
            Self::Missing => "missing",
            Self::Added => "added",
        }
    }

    /// Parse a lowercase status tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == tag)
    }

    /// Check if this status represents drift
    pub fn is_drift(&self) -> bool {
        !matches!(self, Self::Synced)
    }
}

impl fmt::Display for DriftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! resource_types {
    ($($variant:ident => $tag:literal),+ $(,)?) => {
        /// Normalized resource-type tag
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum ResourceType {
            $(
                #[doc = concat!("`", $tag, "`")]
                #[serde(rename = $tag)]
                $variant,
            )+
        }

        impl ResourceType {
            /// Every known tag
            pub const ALL: &'static [ResourceType] = &[$(ResourceType::$variant),+];

            /// Tag used in serialized output and resource ids
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(ResourceType::$variant => $tag,)+
                }
            }

            /// Look up a tag exactly as serialized
            pub fn from_tag(tag: &str) -> Option<Self> {
                match tag {
                    $($tag => Some(ResourceType::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

resource_types! {
    Ec2 => "ec2",
    S3 => "s3",
    Rds => "rds",
    Vpc => "vpc",
    Subnet => "subnet",
    SecurityGroup => "security_group",
    IamRole => "iam_role",
    IamUser => "iam_user",
    IamPolicy => "iam_policy",
    Lambda => "lambda",
    ApiGateway => "api_gateway",
    ApiGatewayV2 => "api_gateway_v2",
    Cloudfront => "cloudfront",
    Route53 => "route53",
    Route53Zone => "route53_zone",
    Elb => "elb",
    Alb => "alb",
    Nlb => "nlb",
    Ecs => "ecs",
    Eks => "eks",
    Fargate => "fargate",
    Autoscaling => "autoscaling",
    Cloudwatch => "cloudwatch",
    Logs => "logs",
    Sqs => "sqs",
    Sns => "sns",
    Kinesis => "kinesis",
    Dynamodb => "dynamodb",
    Documentdb => "documentdb",
    Neptune => "neptune",
    Redshift => "redshift",
    Elasticache => "elasticache",
    ElasticacheReplicationGroup => "elasticache_replication_group",
    Mq => "mq",
    MqBroker => "mq_broker",
    Efs => "efs",
    Fsx => "fsx",
    Glacier => "glacier",
    S3ObjectLambda => "s3_object_lambda",
    Dms => "dms",
    DmsReplicationTask => "dms_replication_task",
    Transfer => "transfer",
    Directconnect => "directconnect",
    Vpn => "vpn",
    VpcPeering => "vpc_peering",
    VpcEndpoint => "vpc_endpoint",
    VpcFlowLog => "vpc_flow_log",
    NatGateway => "nat_gateway",
    InternetGateway => "internet_gateway",
    EgressOnlyGateway => "egress_only_gateway",
    CustomerGateway => "customer_gateway",
    LaunchTemplate => "launch_template",
    PlacementGroup => "placement_group",
    KeyPair => "key_pair",
    SpotFleet => "spot_fleet",
    DedicatedHost => "dedicated_host",
    VpcDhcpOptions => "vpc_dhcp_options",
    VpcDhcpOptionsAssociation => "vpc_dhcp_options_association",
    VpcAddress => "vpc_address",
    VpcIpam => "vpc_ipam",
    VpcIpamPool => "vpc_ipam_pool",
    VpcIpamAllocation => "vpc_ipam_allocation",
    VpcIpamPreview => "vpc_ipam_preview",
    VpcIpamScope => "vpc_ipam_scope",
    Kms => "kms",
    Secretsmanager => "secretsmanager",
    Ssm => "ssm",
    ElasticBeanstalk => "elastic_beanstalk",
    Glue => "glue",
    Athena => "athena",
    Quicksight => "quicksight",
    Macie => "macie",
    Guardduty => "guardduty",
    Securityhub => "securityhub",
    Config => "config",
    Waf => "waf",
    Shield => "shield",
    Detective => "detective",
    Inspector => "inspector",
    Unknown => "unknown",
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unified record of one resource after reconciliation.
///
/// Not `PartialEq`: `last_checked` is metadata and never takes part in
/// comparisons.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Stable slug built from type tag and name
    pub id: String,
    /// Declared name, observed name, or composite key
    pub name: String,
    /// Normalized resource type
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    /// Drift classification
    pub status: DriftStatus,
    /// Declared attributes (empty if not declared)
    pub terraform_config: ConfigMap,
    /// Observed config (empty if not observed)
    pub actual_config: ConfigMap,
    /// Normalized dependency references
    pub dependencies: Vec<String>,
    /// When the comparison happened
    pub last_checked: DateTime<Utc>,
    /// Observed region or the configured default
    pub region: String,
}

impl Resource {
    /// Field-level differences between declared and observed config.
    pub fn changes(&self) -> Vec<ConfigDiff> {
        crate::diff::diff_configs(&self.terraform_config, &self.actual_config)
    }
}

/// One differing field between declared and observed config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDiff {
    /// Attribute name
    pub field: String,
    /// Declared value, if the field is declared
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terraform_value: Option<Value>,
    /// Observed value, if the field is observed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_value: Option<Value>,
}

/// Aggregate counts and weighted health score over a resource set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftSummary {
    /// Number of resources
    pub total: usize,
    /// Resources with no drift
    pub synced: usize,
    /// Resources whose config differs
    pub modified: usize,
    /// Declared resources not observed
    pub missing: usize,
    /// Observed resources not declared
    pub added: usize,
    /// Weighted health score, 0-100
    pub score: u8,
}

impl DriftSummary {
    /// Number of resources in a given status
    pub fn count(&self, status: DriftStatus) -> usize {
        match status {
            DriftStatus::Synced => self.synced,
            DriftStatus::Modified => self.modified,
            DriftStatus::Missing => self.missing,
            DriftStatus::Added => self.added,
        }
    }

    /// Number of resources that drifted in any way
    pub fn drifted(&self) -> usize {
        self.modified + self.missing + self.added
    }

    /// Severity band of the score
    pub fn severity(&self) -> Severity {
        Severity::from_score(self.score)
    }
}

/// Severity band derived from a drift score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Score below 50
    Critical,
    /// Score from 50 up to 79
    Warning,
    /// Score 80 and above
    Healthy,
}

impl Severity {
    /// Classify a score
    pub fn from_score(score: u8) -> Self {
        if score < 50 {
            Self::Critical
        } else if score < 80 {
            Self::Warning
        } else {
            Self::Healthy
        }
    }

    /// Lowercase tag used in serialized output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Healthy => "healthy",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full result of comparing two documents
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftReport {
    /// When the comparison happened
    pub last_sync: DateTime<Utc>,
    /// Reconciled resources, in first-occurrence order
    pub resources: Vec<Resource>,
    /// Aggregate over `resources`
    pub summary: DriftSummary,
}

impl DriftReport {
    /// Resources in a given status
    pub fn with_status(&self, status: DriftStatus) -> impl Iterator<Item = &Resource> {
        self.resources.iter().filter(move |r| r.status == status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_tags() {
        for status in DriftStatus::ALL {
            assert_eq!(DriftStatus::from_tag(status.as_str()), Some(status));
        }
        assert_eq!(DriftStatus::from_tag("drifted"), None);
        assert!(!DriftStatus::Synced.is_drift());
        assert!(DriftStatus::Added.is_drift());
    }

    #[test]
    fn test_resource_type_serde_matches_tag() {
        for ty in ResourceType::ALL {
            let json = serde_json::to_string(ty).unwrap();
            assert_eq!(json, format!("\"{}\"", ty.as_str()));
            assert_eq!(ResourceType::from_tag(ty.as_str()), Some(*ty));
        }
    }

    #[test]
    fn test_severity_thresholds() {
        assert_eq!(Severity::from_score(0), Severity::Critical);
        assert_eq!(Severity::from_score(49), Severity::Critical);
        assert_eq!(Severity::from_score(50), Severity::Warning);
        assert_eq!(Severity::from_score(79), Severity::Warning);
        assert_eq!(Severity::from_score(80), Severity::Healthy);
        assert_eq!(Severity::from_score(100), Severity::Healthy);
    }

    fn resource(name: &str, status: DriftStatus) -> Resource {
        Resource {
            id: format!("ec2-{name}"),
            name: name.to_string(),
            resource_type: ResourceType::Ec2,
            status,
            terraform_config: ConfigMap::new(),
            actual_config: ConfigMap::new(),
            dependencies: vec![],
            last_checked: Utc::now(),
            region: "us-east-1".to_string(),
        }
    }

    #[test]
    fn test_report_with_status_keeps_order() {
        let report = DriftReport {
            last_sync: Utc::now(),
            resources: vec![
                resource("a", DriftStatus::Missing),
                resource("b", DriftStatus::Synced),
                resource("c", DriftStatus::Missing),
            ],
            summary: DriftSummary {
                total: 3,
                synced: 1,
                modified: 0,
                missing: 2,
                added: 0,
                score: 33,
            },
        };
        let missing: Vec<&str> = report
            .with_status(DriftStatus::Missing)
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(missing, vec!["a", "c"]);
        assert_eq!(report.with_status(DriftStatus::Added).count(), 0);
    }

    #[test]
    fn test_resource_serializes_camel_case() {
        let resource = resource("web", DriftStatus::Synced);
        let value = serde_json::to_value(&resource).unwrap();
        assert_eq!(value["type"], "ec2");
        assert_eq!(value["status"], "synced");
        assert!(value.get("terraformConfig").is_some());
        assert!(value.get("actualConfig").is_some());
        assert!(value.get("lastChecked").is_some());
    }
}
