//! Resource type mapping and reference normalization.
//!
//! Maps provider-specific type strings (`aws_instance`) to normalized
//! [`ResourceType`] tags (`ec2`). The mapper is a static lookup and never
//! fails: anything it doesn't recognize becomes [`ResourceType::Unknown`].

use crate::types::ResourceType;
use regex::Regex;
use std::sync::LazyLock;

/// Provider type string to normalized tag.
const TERRAFORM_TYPES: &[(&str, ResourceType)] = &[
    ("aws_instance", ResourceType::Ec2),
    ("aws_s3_bucket", ResourceType::S3),
    ("aws_db_instance", ResourceType::Rds),
    ("aws_rds_cluster", ResourceType::Rds),
    ("aws_vpc", ResourceType::Vpc),
    ("aws_subnet", ResourceType::Subnet),
    ("aws_security_group", ResourceType::SecurityGroup),
    ("aws_iam_role", ResourceType::IamRole),
    ("aws_iam_user", ResourceType::IamUser),
    ("aws_iam_policy", ResourceType::IamPolicy),
    ("aws_lambda_function", ResourceType::Lambda),
    ("aws_api_gateway_rest_api", ResourceType::ApiGateway),
    ("aws_apigatewayv2_api", ResourceType::ApiGatewayV2),
    ("aws_cloudfront_distribution", ResourceType::Cloudfront),
    ("aws_route53_record", ResourceType::Route53),
    ("aws_route53_zone", ResourceType::Route53Zone),
    ("aws_elb", ResourceType::Elb),
    ("aws_lb", ResourceType::Alb),
    ("aws_alb", ResourceType::Alb),
    ("aws_ecs_cluster", ResourceType::Ecs),
    ("aws_ecs_service", ResourceType::Ecs),
    ("aws_ecs_task_definition", ResourceType::Fargate),
    ("aws_eks_cluster", ResourceType::Eks),
    ("aws_eks_fargate_profile", ResourceType::Fargate),
    ("aws_autoscaling_group", ResourceType::Autoscaling),
    ("aws_cloudwatch_metric_alarm", ResourceType::Cloudwatch),
    ("aws_cloudwatch_dashboard", ResourceType::Cloudwatch),
    ("aws_cloudwatch_log_group", ResourceType::Logs),
    ("aws_sqs_queue", ResourceType::Sqs),
    ("aws_sns_topic", ResourceType::Sns),
    ("aws_kinesis_stream", ResourceType::Kinesis),
    ("aws_dynamodb_table", ResourceType::Dynamodb),
    ("aws_docdb_cluster", ResourceType::Documentdb),
    ("aws_neptune_cluster", ResourceType::Neptune),
    ("aws_redshift_cluster", ResourceType::Redshift),
    ("aws_elasticache_cluster", ResourceType::Elasticache),
    ("aws_elasticache_replication_group", ResourceType::ElasticacheReplicationGroup),
    ("aws_mq_configuration", ResourceType::Mq),
    ("aws_mq_broker", ResourceType::MqBroker),
    ("aws_efs_file_system", ResourceType::Efs),
    ("aws_fsx_lustre_file_system", ResourceType::Fsx),
    ("aws_fsx_windows_file_system", ResourceType::Fsx),
    ("aws_glacier_vault", ResourceType::Glacier),
    ("aws_s3control_object_lambda_access_point", ResourceType::S3ObjectLambda),
    ("aws_dms_replication_instance", ResourceType::Dms),
    ("aws_dms_replication_task", ResourceType::DmsReplicationTask),
    ("aws_transfer_server", ResourceType::Transfer),
    ("aws_dx_connection", ResourceType::Directconnect),
    ("aws_vpn_connection", ResourceType::Vpn),
    ("aws_vpn_gateway", ResourceType::Vpn),
    ("aws_vpc_peering_connection", ResourceType::VpcPeering),
    ("aws_vpc_endpoint", ResourceType::VpcEndpoint),
    ("aws_flow_log", ResourceType::VpcFlowLog),
    ("aws_nat_gateway", ResourceType::NatGateway),
    ("aws_internet_gateway", ResourceType::InternetGateway),
    ("aws_egress_only_internet_gateway", ResourceType::EgressOnlyGateway),
    ("aws_customer_gateway", ResourceType::CustomerGateway),
    ("aws_launch_template", ResourceType::LaunchTemplate),
    ("aws_placement_group", ResourceType::PlacementGroup),
    ("aws_key_pair", ResourceType::KeyPair),
    ("aws_spot_fleet_request", ResourceType::SpotFleet),
    ("aws_ec2_host", ResourceType::DedicatedHost),
    ("aws_vpc_dhcp_options", ResourceType::VpcDhcpOptions),
    ("aws_vpc_dhcp_options_association", ResourceType::VpcDhcpOptionsAssociation),
    ("aws_eip", ResourceType::VpcAddress),
    ("aws_vpc_ipam", ResourceType::VpcIpam),
    ("aws_vpc_ipam_pool", ResourceType::VpcIpamPool),
    ("aws_vpc_ipam_pool_cidr_allocation", ResourceType::VpcIpamAllocation),
    ("aws_vpc_ipam_preview_next_cidr", ResourceType::VpcIpamPreview),
    ("aws_vpc_ipam_scope", ResourceType::VpcIpamScope),
    ("aws_kms_key", ResourceType::Kms),
    ("aws_secretsmanager_secret", ResourceType::Secretsmanager),
    ("aws_ssm_parameter", ResourceType::Ssm),
    ("aws_elastic_beanstalk_environment", ResourceType::ElasticBeanstalk),
    ("aws_glue_job", ResourceType::Glue),
    ("aws_glue_catalog_database", ResourceType::Glue),
    ("aws_athena_workgroup", ResourceType::Athena),
    ("aws_quicksight_data_source", ResourceType::Quicksight),
    ("aws_macie2_account", ResourceType::Macie),
    ("aws_guardduty_detector", ResourceType::Guardduty),
    ("aws_securityhub_account", ResourceType::Securityhub),
    ("aws_config_config_rule", ResourceType::Config),
    ("aws_wafv2_web_acl", ResourceType::Waf),
    ("aws_waf_web_acl", ResourceType::Waf),
    ("aws_shield_protection", ResourceType::Shield),
    ("aws_detective_graph", ResourceType::Detective),
    ("aws_inspector2_enabler", ResourceType::Inspector),
];

static DEPENDENCY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(aws_(?:vpc|subnet|security_group|instance|db_instance|s3_bucket|lambda_function|alb)).*",
    )
    .expect("dependency pattern is a valid regex")
});

static NON_SLUG_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9-]+").expect("slug pattern is a valid regex"));

/// Map a provider type string to a normalized tag.
///
/// Lookup is case-insensitive. A string that is already a normalized tag
/// (e.g. an actual-state document using `ec2`) maps to itself.
pub fn map_resource_type(provider_type: &str) -> ResourceType {
    let lowered = provider_type.trim().to_lowercase();

    TERRAFORM_TYPES
        .iter()
        .find(|(tf_type, _)| *tf_type == lowered)
        .map(|(_, ty)| *ty)
        .or_else(|| ResourceType::from_tag(&lowered))
        .unwrap_or_else(|| {
            log::trace!("No resource type mapping for {provider_type:?}");
            ResourceType::Unknown
        })
}

/// Normalize a raw `"<type>.<name>"` dependency reference.
///
/// References to a handful of well-known resource types collapse to a short
/// hyphenated tag (`aws_instance.web` becomes `aws-instance`); anything else
/// passes through verbatim.
pub fn normalize_dependency(reference: &str) -> String {
    match DEPENDENCY_PATTERN.captures(reference).and_then(|c| c.get(1)) {
        Some(prefix) => prefix.as_str().to_lowercase().replace('_', "-"),
        None => reference.to_string(),
    }
}

/// Build the stable output id `"<type>-<name>"`.
///
/// The result is lowercase and every run of characters outside `[a-z0-9-]`
/// is collapsed to a single hyphen.
pub fn resource_id(resource_type: ResourceType, name: &str) -> String {
    let raw = format!("{}-{}", resource_type.as_str(), name).to_lowercase();
    NON_SLUG_RUN.replace_all(&raw, "-").into_owned()
}
