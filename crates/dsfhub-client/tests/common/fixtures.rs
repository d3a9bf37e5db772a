//! Configuration and envelope fixtures

use dsfhub_core::Configuration;
use serde_json::{json, Value};

/// Minimal valid CipherTrust configuration
pub fn ciphertrust_config() -> Configuration {
    Configuration::new()
        .with("display_name", "ciphertrust-lab")
        .with("hostname", "ct.example.com")
        .with("port", 443)
        .with("cm_name", "cm-lab")
        .with("auth_method", "password")
        .with("username", "admin")
        .with("password", "hunter2")
}

pub fn bucket(name: &str, region: &str) -> Configuration {
    Configuration::new()
        .with("bucket_name", name)
        .with("aws_region", region)
}

/// Classification configuration with one storage group holding `buckets`
pub fn classification_config(buckets: impl IntoIterator<Item = Configuration>) -> Configuration {
    Configuration::new()
        .with("type", "AWS S3")
        .with("display_name", "classifier")
        .with_group(
            "storage_details",
            [Configuration::new().with_group("s3_bucket_configuration", buckets)],
        )
}

/// CipherTrust resource as the hub returns it
pub fn ciphertrust_resource(id: &str) -> Value {
    json!({
        "id": id,
        "type": "CipherTrust Manager",
        "description": "Used for integrating with Thales CipherTrust Manager capabilities.",
        "display_name": "ciphertrust-lab",
        "status": "N/A",
        "hostname": "ct.example.com",
        "port": 443,
        "username": "admin",
        "cm_name": "cm-lab",
        "is_load_balancer": false,
        "auth_method": "password"
    })
}

/// Classification resource as the hub returns it
pub fn classification_resource(id: &str) -> Value {
    json!({
        "id": id,
        "type": "AWS S3",
        "display_name": "classifier",
        "description": "Data discovery and classification service, used to classify all data within your organization.",
        "status": "N/A",
        "storage_details": [{
            "storage_type": "AWS - S3 Bucket",
            "s3_bucket_configuration": [
                {"bucket_name": "b1", "cloud_name": "AWS", "aws_region": "us-east-1"}
            ]
        }]
    })
}

pub fn coded_ok(data: Value) -> Value {
    json!({"data": data, "error": {"code": 200, "message": "OK"}})
}

pub fn coded_error(code: i64, message: &str) -> Value {
    json!({"data": null, "error": {"code": code, "message": message}})
}

pub fn nullable_error(status: u16, detail: &str) -> Value {
    json!({"data": null, "errors": [{"status": status, "detail": detail}]})
}
