//! Field mapping from a loosely-typed `Configuration` into a kind payload
//!
//! Only declared fields are carried over; anything else in the configuration
//! is dropped. Defaults fill omitted optional scalars, required fields must be
//! present, and each unordered group is mapped member by member, keyed with
//! the canonical hasher, and emitted in key order. Structurally equal members
//! collapse; distinct members that share a hash are both kept.

use crate::error::{Error, Result};
use crate::hash::{hash_record, member_identity, GroupHash};
use crate::types::{join_path, Configuration, FieldDef, FieldType, Presence, Scalar};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Map a configuration onto the declared fields
pub fn map_fields(fields: &[FieldDef], config: &Configuration) -> Result<Map<String, Value>> {
    map_record(fields, config, "")
}

fn map_record(fields: &[FieldDef], config: &Configuration, path: &str) -> Result<Map<String, Value>> {
    let mut record = Map::new();

    for field in fields {
        let field_path = join_path(path, field.name);
        match field.ty {
            FieldType::Group(nested) => {
                if config.scalar(field.name).is_some() {
                    return Err(Error::schema_violation(
                        field_path,
                        "expected a group, found a scalar",
                    ));
                }
                let members = config.group(field.name).unwrap_or_default();
                if members.is_empty() {
                    if field.presence == Presence::Required {
                        return Err(Error::schema_violation(
                            field_path,
                            "required group is missing",
                        ));
                    }
                    continue;
                }
                let mapped = map_group(nested, members, &field_path)?;
                record.insert(field.name.to_string(), Value::Array(mapped));
            }
            scalar_type => {
                if config.group(field.name).is_some() {
                    return Err(Error::schema_violation(
                        field_path,
                        "expected a scalar, found a group",
                    ));
                }
                match (config.scalar(field.name), field.presence) {
                    (Some(value), _) => {
                        let value = convert_scalar(scalar_type, value, &field_path)?;
                        record.insert(field.name.to_string(), value);
                    }
                    (None, Presence::Default(default)) => {
                        record.insert(field.name.to_string(), default.to_json());
                    }
                    (None, Presence::Required) => {
                        return Err(Error::schema_violation(
                            field_path,
                            "required field is missing",
                        ));
                    }
                    (None, Presence::Optional) => {}
                }
            }
        }
    }

    let dropped: Vec<&str> = config
        .names()
        .filter(|name| !fields.iter().any(|f| f.name == *name))
        .collect();
    if !dropped.is_empty() {
        debug!(
            "Dropping undeclared fields at {}: {}",
            if path.is_empty() { "<root>" } else { path },
            dropped.join(", ")
        );
    }

    Ok(record)
}

fn map_group(fields: &[FieldDef], members: &[Configuration], path: &str) -> Result<Vec<Value>> {
    let mut keyed: BTreeMap<(GroupHash, String), Map<String, Value>> = BTreeMap::new();
    for (i, member) in members.iter().enumerate() {
        let record = map_record(fields, member, &format!("{}[{}]", path, i))?;
        let key = (hash_record(fields, &record), member_identity(&record));
        keyed.insert(key, record);
    }
    Ok(keyed.into_values().map(Value::Object).collect())
}

fn convert_scalar(ty: FieldType, value: &Scalar, path: &str) -> Result<Value> {
    match (ty, value) {
        (FieldType::String, Scalar::String(v)) => Ok(Value::from(v.as_str())),
        (FieldType::Int, Scalar::Int(v)) => Ok(Value::from(*v)),
        (FieldType::Bool, Scalar::Bool(v)) => Ok(Value::from(*v)),
        (expected, found) => Err(Error::schema_violation(
            path,
            format!(
                "expected {}, found {} '{}'",
                type_name(expected),
                found.type_name(),
                found
            ),
        )),
    }
}

fn type_name(ty: FieldType) -> &'static str {
    match ty {
        FieldType::String => "string",
        FieldType::Int => "integer",
        FieldType::Bool => "bool",
        FieldType::Group(_) => "group",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BUCKET: &[FieldDef] = &[
        FieldDef::required_string("bucket_name"),
        FieldDef::default_string("cloud_name", "AWS"),
        FieldDef::required_string("aws_region"),
    ];

    const STORAGE: &[FieldDef] = &[
        FieldDef::default_string("storage_type", "AWS - S3 Bucket"),
        FieldDef::required_group("s3_bucket_configuration", BUCKET),
    ];

    const ROOT: &[FieldDef] = &[
        FieldDef::required_string("display_name"),
        FieldDef::default_string("status", "N/A"),
        FieldDef::optional_string("last_status_update"),
        FieldDef::required_int("port"),
        FieldDef::default_bool("is_load_balancer", false),
        FieldDef::optional_group("storage_details", STORAGE),
    ];

    fn bucket(name: &str, region: &str) -> Configuration {
        Configuration::new()
            .with("bucket_name", name)
            .with("aws_region", region)
    }

    fn base() -> Configuration {
        Configuration::new()
            .with("display_name", "hub")
            .with("port", 443)
    }

    #[test]
    fn test_defaults_applied_and_optionals_omitted() {
        let mapped = map_fields(ROOT, &base()).unwrap();
        assert_eq!(
            Value::Object(mapped),
            json!({
                "display_name": "hub",
                "status": "N/A",
                "port": 443,
                "is_load_balancer": false
            })
        );
    }

    #[test]
    fn test_unknown_fields_dropped() {
        let config = base().with("unexpected", "x").with_group("other", [Configuration::new()]);
        let mapped = map_fields(ROOT, &config).unwrap();
        assert!(!mapped.contains_key("unexpected"));
        assert!(!mapped.contains_key("other"));
    }

    #[test]
    fn test_missing_required_field() {
        let config = Configuration::new().with("port", 443);
        let err = map_fields(ROOT, &config).unwrap_err();
        match err {
            Error::SchemaViolation { field, .. } => assert_eq!(field, "display_name"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_wrong_type_is_schema_violation() {
        let config = base().with("port", "443");
        let err = map_fields(ROOT, &config).unwrap_err().to_string();
        assert!(err.contains("port"), "{err}");
        assert!(err.contains("expected integer"), "{err}");
    }

    #[test]
    fn test_missing_required_nested_field_reports_path() {
        let config = base().with_group(
            "storage_details",
            [Configuration::new().with_group(
                "s3_bucket_configuration",
                [Configuration::new().with("bucket_name", "b1")],
            )],
        );
        let err = map_fields(ROOT, &config).unwrap_err();
        match err {
            Error::SchemaViolation { field, .. } => assert_eq!(
                field,
                "storage_details[0].s3_bucket_configuration[0].aws_region"
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_required_group_rejected() {
        let config = base().with_group(
            "storage_details",
            [Configuration::new().with_group("s3_bucket_configuration", [])],
        );
        assert!(matches!(
            map_fields(ROOT, &config),
            Err(Error::SchemaViolation { .. })
        ));
    }

    #[test]
    fn test_group_output_independent_of_member_order() {
        let forward = base().with_group(
            "storage_details",
            [Configuration::new().with_group(
                "s3_bucket_configuration",
                [bucket("b1", "us-east-1"), bucket("b2", "eu-west-1")],
            )],
        );
        let reverse = base().with_group(
            "storage_details",
            [Configuration::new().with_group(
                "s3_bucket_configuration",
                [bucket("b2", "eu-west-1"), bucket("b1", "us-east-1")],
            )],
        );
        assert_eq!(
            map_fields(ROOT, &forward).unwrap(),
            map_fields(ROOT, &reverse).unwrap()
        );
    }

    #[test]
    fn test_duplicate_members_collapse() {
        let config = base().with_group(
            "storage_details",
            [Configuration::new().with_group(
                "s3_bucket_configuration",
                [bucket("b1", "us-east-1"), bucket("b1", "us-east-1")],
            )],
        );
        let mapped = map_fields(ROOT, &config).unwrap();
        assert_eq!(
            mapped["storage_details"][0]["s3_bucket_configuration"]
                .as_array()
                .map(Vec::len),
            Some(1)
        );
    }

    #[test]
    fn test_members_differing_around_separator_are_both_kept() {
        let config = base().with_group(
            "storage_details",
            [Configuration::new().with_group(
                "s3_bucket_configuration",
                [
                    bucket("logs-prod", "us-east-1").with("cloud_name", "AWS"),
                    bucket("logs", "us-east-1").with("cloud_name", "prod-AWS"),
                ],
            )],
        );
        let mapped = map_fields(ROOT, &config).unwrap();
        let buckets = mapped["storage_details"][0]["s3_bucket_configuration"]
            .as_array()
            .unwrap();
        assert_eq!(buckets.len(), 2);
        let mut names: Vec<_> = buckets.iter().map(|b| b["bucket_name"].clone()).collect();
        names.sort_by_key(|v| v.to_string());
        assert_eq!(names, vec![json!("logs"), json!("logs-prod")]);
    }

    #[test]
    fn test_scalar_where_group_expected() {
        let config = base().with("storage_details", "nope");
        assert!(matches!(
            map_fields(ROOT, &config),
            Err(Error::SchemaViolation { .. })
        ));
    }
}
