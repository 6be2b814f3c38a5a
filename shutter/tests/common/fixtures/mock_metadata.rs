//! Mock EC2 instance metadata service (IMDSv1 only)

use shutter::constants::metadata;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

pub struct MockMetadataServer {
    pub server: MockServer,
    pub base_url: String,
}

impl MockMetadataServer {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();
        Self { server, base_url }
    }

    pub async fn mock_availability_zone(&self, zone: &str) {
        Mock::given(method("GET"))
            .and(path(metadata::AVAILABILITY_ZONE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string(zone))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_role_credentials(&self, role: &str, access_key_id: &str) {
        Mock::given(method("GET"))
            .and(path(metadata::SECURITY_CREDENTIALS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string(role))
            .mount(&self.server)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("{}{}", metadata::SECURITY_CREDENTIALS_PATH, role)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Code": "Success",
                "Type": "AWS-HMAC",
                "AccessKeyId": access_key_id,
                "SecretAccessKey": "role-secret",
                "Token": "role-session-token",
                "Expiration": "2030-01-01T00:00:00Z"
            })))
            .mount(&self.server)
            .await;
    }
}
