//! Parsers for declared and actual state documents.
//!
//! Both parsers are tolerant: every optional field gets its default here, at
//! the parse boundary, so downstream code never has to deal with absent
//! values. The only hard failure is text that is not a JSON document.
//!
//! Defaults follow JavaScript "falsy" semantics: `0`, `""`, `false` and
//! `null` are treated the same as an absent field.
//!
//! ```text
//! declared: { version, terraform_version, serial, lineage, outputs, resources: [...] }
//! actual:   [ {type, name, id, config, depends_on, region}, ... ]
//!       or  { resources: [ ... ] }
//! ```

use crate::error::{DocumentKind, Error, Result};
use crate::types::ConfigMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// State format version the parser expects.
pub const EXPECTED_STATE_VERSION: i64 = 4;

/// Terraform version reported when the document doesn't carry one.
pub const UNKNOWN_TERRAFORM_VERSION: &str = "unknown";

/// A normalized declared (Terraform) state document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclaredState {
    pub version: i64,
    pub terraform_version: String,
    pub serial: i64,
    pub lineage: String,
    pub outputs: ConfigMap,
    pub resources: Vec<DeclaredResource>,
}

impl Default for DeclaredState {
    fn default() -> Self {
        Self {
            version: EXPECTED_STATE_VERSION,
            terraform_version: UNKNOWN_TERRAFORM_VERSION.to_string(),
            serial: 0,
            lineage: String::new(),
            outputs: ConfigMap::new(),
            resources: Vec::new(),
        }
    }
}

/// A resource block from the declared state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeclaredResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    pub instances: Vec<DeclaredInstance>,
}

impl DeclaredResource {
    /// Composite key `"<type>.<name>"`
    pub fn key(&self) -> String {
        composite_key(&self.resource_type, &self.name)
    }

    /// The instance used for comparison, if any
    pub fn first_instance(&self) -> Option<&DeclaredInstance> {
        self.instances.first()
    }
}

/// One instance of a declared resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeclaredInstance {
    pub attributes: ConfigMap,
    /// `None` when the instance has no `depends_on` field at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_key: Option<Value>,
}

/// A normalized actual (observed) state document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActualState {
    pub resources: Vec<ObservedResource>,
}

/// A resource as observed in the live environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservedResource {
    pub id: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    pub config: ConfigMap,
    pub depends_on: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl ObservedResource {
    /// Composite key `"<type>.<name>"`
    pub fn key(&self) -> String {
        composite_key(&self.resource_type, &self.name)
    }
}

/// Build the composite key shared by both documents.
pub fn composite_key(resource_type: &str, name: &str) -> String {
    format!("{resource_type}.{name}")
}

/// Parse a declared state document.
pub fn parse_declared_state(content: &str) -> Result<DeclaredState> {
    let parsed = parse_json(content, DocumentKind::Declared)?;

    let raw_version = parsed.get("version");
    if raw_version.and_then(Value::as_f64) != Some(EXPECTED_STATE_VERSION as f64) {
        log::warn!(
            "Unexpected Terraform state version: {}",
            raw_version.map_or_else(|| "undefined".to_string(), Value::to_string)
        );
    }

    let version = raw_version
        .and_then(Value::as_i64)
        .filter(|v| *v != 0)
        .unwrap_or(EXPECTED_STATE_VERSION);
    let terraform_version = non_empty_str(parsed.get("terraform_version"))
        .unwrap_or(UNKNOWN_TERRAFORM_VERSION)
        .to_string();
    let serial = parsed.get("serial").and_then(Value::as_i64).unwrap_or(0);
    let lineage = non_empty_str(parsed.get("lineage")).unwrap_or_default().to_string();
    let outputs = parsed
        .get("outputs")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    let resources = match parsed.get("resources") {
        Some(Value::Array(entries)) => entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| declared_resource(index, entry))
            .collect(),
        Some(other) if is_truthy(other) => {
            log::warn!("Ignoring non-array `resources` field in Terraform state");
            Vec::new()
        }
        _ => Vec::new(),
    };

    Ok(DeclaredState {
        version,
        terraform_version,
        serial,
        lineage,
        outputs,
        resources,
    })
}

fn declared_resource(index: usize, entry: &Value) -> Option<DeclaredResource> {
    let Value::Object(fields) = entry else {
        log::warn!("Skipping malformed Terraform resource at index {index}: not an object");
        return None;
    };

    let resource_type = coerce_string(fields.get("type"));
    let name = coerce_string(fields.get("name"));

    let instances = match fields.get("instances") {
        Some(Value::Array(items)) => items.iter().map(declared_instance).collect(),
        Some(other) if is_truthy(other) => {
            log::warn!("Ignoring non-array instances for {resource_type}.{name}");
            Vec::new()
        }
        _ => Vec::new(),
    };

    Some(DeclaredResource {
        provider_name: non_empty_str(fields.get("provider_name")).map(str::to_string),
        mode: non_empty_str(fields.get("mode")).map(str::to_string),
        resource_type,
        name,
        instances,
    })
}

/// Non-object attributes become `{}`; a non-array `depends_on` counts as absent.
fn declared_instance(entry: &Value) -> DeclaredInstance {
    DeclaredInstance {
        attributes: entry
            .get("attributes")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default(),
        depends_on: entry.get("depends_on").and_then(Value::as_array).map(|deps| string_members(deps)),
        index_key: entry.get("index_key").filter(|v| !v.is_null()).cloned(),
    }
}

/// Parse an actual state document.
pub fn parse_actual_state(content: &str) -> Result<ActualState> {
    let parsed = parse_json(content, DocumentKind::Actual)?;

    let entries: &[Value] = match &parsed {
        Value::Array(entries) => entries.as_slice(),
        other => match other.get("resources") {
            Some(Value::Array(entries)) => entries.as_slice(),
            Some(value) if is_truthy(value) => {
                log::debug!("actual state `resources` is not an array");
                return Err(Error::InvalidActualState);
            }
            _ => &[],
        },
    };

    let resources = entries
        .iter()
        .map(normalize_observed)
        .collect::<Result<Vec<_>>>()?;

    Ok(ActualState { resources })
}

fn normalize_observed(entry: &Value) -> Result<ObservedResource> {
    if entry.is_null() {
        return Err(Error::InvalidActualState);
    }

    let resource_type = coerce_string(entry.get("type"));
    let name = coerce_string(entry.get("name"));

    let config = match entry.get("config") {
        Some(Value::Object(map)) => map.clone(),
        Some(other) if is_truthy(other) => {
            log::warn!("Ignoring non-object config for {resource_type}.{name}");
            ConfigMap::new()
        }
        _ => ConfigMap::new(),
    };

    let depends_on = entry
        .get("depends_on")
        .and_then(Value::as_array)
        .map(|deps| string_members(deps))
        .unwrap_or_default();

    let id = match coerce_string(entry.get("id")) {
        id if id.is_empty() => composite_key(&resource_type, &name),
        id => id,
    };

    let region = entry.get("region").and_then(Value::as_str).map(str::to_string);

    Ok(ObservedResource {
        id,
        resource_type,
        name,
        config,
        depends_on,
        region,
    })
}

fn parse_json(content: &str, kind: DocumentKind) -> Result<Value> {
    let parsed: Value = serde_json::from_str(content).map_err(|e| {
        log::debug!("{} is not valid JSON: {e}", kind.label());
        Error::invalid(kind)
    })?;

    if parsed.is_null() {
        log::debug!("{} is a bare `null`", kind.label());
        return Err(Error::invalid(kind));
    }

    Ok(parsed)
}

fn string_members(values: &[Value]) -> Vec<String> {
    values.iter().filter_map(Value::as_str).map(str::to_string).collect()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Coerce a field to a string; falsy values become `""`.
fn coerce_string(value: Option<&Value>) -> String {
    match value {
        Some(v) if !is_truthy(v) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
