//! Mock EC2 Query API server for testing
//!
//! Answers `CreateSnapshot` calls with canned XML so the real client can be
//! exercised without AWS.

use wiremock::{
    matchers::{body_string_contains, header_exists, method, path},
    Mock, MockServer, ResponseTemplate,
};

pub struct MockEc2Server {
    pub server: MockServer,
    pub base_url: String,
}

impl MockEc2Server {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();
        Self { server, base_url }
    }

    /// Successful snapshot for a signed request naming `volume_id`
    pub async fn mock_create_snapshot_success(&self, volume_id: &str, snapshot_id: &str) {
        let body = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<CreateSnapshotResponse xmlns="http://ec2.amazonaws.com/doc/2016-11-15/">
    <requestId>59dbff89-35bd-4eac-99ed-be587EXAMPLE</requestId>
    <snapshotId>{}</snapshotId>
    <volumeId>{}</volumeId>
    <status>pending</status>
    <startTime>2025-01-01T00:00:00.000Z</startTime>
    <progress>60%</progress>
    <ownerId>111122223333</ownerId>
    <volumeSize>30</volumeSize>
    <description>Daily Backup</description>
    <encrypted>false</encrypted>
</CreateSnapshotResponse>"#,
            snapshot_id, volume_id
        );

        Mock::given(method("POST"))
            .and(path("/"))
            .and(header_exists("authorization"))
            .and(header_exists("x-amz-date"))
            .and(body_string_contains("Action=CreateSnapshot"))
            .and(body_string_contains(format!("VolumeId={}", volume_id)))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(body.into_bytes(), "text/xml;charset=UTF-8"),
            )
            .mount(&self.server)
            .await;
    }

    /// API error for `volume_id`
    pub async fn mock_create_snapshot_error(&self, volume_id: &str, status: u16, code: &str, message: &str) {
        let body = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Response><Errors><Error><Code>{}</Code><Message>{}</Message></Error></Errors><RequestID>ea966190-f9aa-478e-9ede-example</RequestID></Response>"#,
            code, message
        );

        Mock::given(method("POST"))
            .and(path("/"))
            .and(body_string_contains(format!("VolumeId={}", volume_id)))
            .respond_with(
                ResponseTemplate::new(status).set_body_raw(body.into_bytes(), "text/xml;charset=UTF-8"),
            )
            .mount(&self.server)
            .await;
    }

    /// Non-XML garbage, e.g. from a proxy in front of the endpoint
    pub async fn mock_garbage(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(status).set_body_string("<html>Bad Gateway</html>"))
            .mount(&self.server)
            .await;
    }

    pub async fn received_bodies(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| String::from_utf8_lossy(&r.body).to_string())
            .collect()
    }
}
