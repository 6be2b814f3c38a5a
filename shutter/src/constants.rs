//! Central repository for endpoints, API versions, region names and exit codes
//!
//! Constants are grouped by category so the values shared between the
//! metadata client, the EC2 client and the binary live in one place.

use std::time::Duration;

/// Instance metadata service
pub mod metadata {
    use super::Duration;

    /// Base URL of the link-local metadata service
    pub const BASE_URL: &str = "http://169.254.169.254";

    /// IMDSv2 session token path
    pub const TOKEN_PATH: &str = "/latest/api/token";

    /// Availability zone of the running instance, e.g. `us-east-1a`
    pub const AVAILABILITY_ZONE_PATH: &str = "/latest/meta-data/placement/availability-zone";

    /// Listing of the instance role name(s)
    pub const SECURITY_CREDENTIALS_PATH: &str = "/latest/meta-data/iam/security-credentials/";

    pub const TOKEN_HEADER: &str = "X-aws-ec2-metadata-token";
    pub const TOKEN_TTL_HEADER: &str = "X-aws-ec2-metadata-token-ttl-seconds";
    pub const TOKEN_TTL_SECONDS: u32 = 60;

    /// Off-instance the service is unreachable; fail fast
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);
}

/// EC2 API
pub mod ec2 {
    pub const API_VERSION: &str = "2016-11-15";
    pub const SERVICE: &str = "ec2";
    pub const CREATE_SNAPSHOT_ACTION: &str = "CreateSnapshot";
    pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";
}

/// AWS regions accepted by `--region`
pub mod regions {
    pub const KNOWN: &[&str] = &[
        "us-east-1",
        "us-east-2",
        "us-west-1",
        "us-west-2",
        "af-south-1",
        "ap-east-1",
        "ap-south-1",
        "ap-south-2",
        "ap-southeast-1",
        "ap-southeast-2",
        "ap-southeast-3",
        "ap-southeast-4",
        "ap-northeast-1",
        "ap-northeast-2",
        "ap-northeast-3",
        "ca-central-1",
        "ca-west-1",
        "eu-central-1",
        "eu-central-2",
        "eu-west-1",
        "eu-west-2",
        "eu-west-3",
        "eu-south-1",
        "eu-south-2",
        "eu-north-1",
        "il-central-1",
        "me-south-1",
        "me-central-1",
        "sa-east-1",
        "us-gov-east-1",
        "us-gov-west-1",
        "cn-north-1",
        "cn-northwest-1",
    ];

    pub fn is_known(region: &str) -> bool {
        KNOWN.contains(&region)
    }

    /// China partition regions use a different endpoint suffix
    pub fn endpoint_suffix(region: &str) -> &'static str {
        if region.starts_with("cn-") {
            "amazonaws.com.cn"
        } else {
            "amazonaws.com"
        }
    }
}

/// Environment variables read for credentials
pub mod env {
    pub const ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
    pub const SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
    pub const SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";
}

/// Process exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;

    /// Validation or configuration failure, nothing was frozen
    pub const PREFLIGHT_FAILURE: i32 = 1;

    /// `--strict` run where at least one snapshot request failed
    pub const SNAPSHOT_FAILURES: i32 = 2;
}
