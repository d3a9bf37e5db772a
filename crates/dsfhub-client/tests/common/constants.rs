//! Shared constants for test infrastructure

pub const TEST_TOKEN: &str = "test-token";
pub const BEARER_TEST_TOKEN: &str = "Bearer test-token";

pub const API_BASE: &str = "/dsf/api/v2";
pub const CIPHERTRUST_PATH: &str = "/dsf/api/v2/ciphertrust";
pub const CLASSIFICATION_PATH: &str = "/dsf/api/v2/classification";
pub const LISTING_PATH: &str = "/dsf/api/v2/get-config";
pub const GATEWAYS_PATH: &str = "/dsf/api/v2/gateways";

pub const CIPHERTRUST_ID: &str = "ct-0001";
pub const CLASSIFICATION_ID: &str = "cls-0001";

/// Identifier that needs escaping to stay one path segment
pub const AWKWARD_ID: &str = "team a/b?x";
pub const AWKWARD_ID_ESCAPED: &str = "team%20a%2Fb%3Fx";
