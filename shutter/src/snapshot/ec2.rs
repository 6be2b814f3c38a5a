use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Url};
use std::collections::BTreeMap;
use tracing::debug;

use super::backend::{SnapshotBackend, SnapshotId};
use super::credentials::Credentials;
use super::sigv4::{self, CanonicalRequest};
use crate::constants::{ec2, regions};
use crate::errors::{ConfigError, SnapshotRequestError};

/// `CreateSnapshot` through the EC2 Query API.
///
/// One signed `POST` per call, no retries and no client-side timeout.
pub struct Ec2SnapshotClient {
    client: Client,
    url: Url,
    host: String,
    region: String,
    credentials: Credentials,
}

impl Ec2SnapshotClient {
    /// Client for the public regional endpoint
    pub fn new(region: &str, credentials: Credentials) -> Result<Self, ConfigError> {
        let endpoint = format!("https://ec2.{}.{}/", region, regions::endpoint_suffix(region));
        Self::with_endpoint(&endpoint, region, credentials)
    }

    pub fn with_endpoint(
        endpoint: &str,
        region: &str,
        credentials: Credentials,
    ) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidValue {
            field: "endpoint".to_string(),
            reason,
        };

        let url = Url::parse(endpoint).map_err(|e| invalid(format!("{}: {}", endpoint, e)))?;
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => return Err(invalid(format!("{} has no host", endpoint))),
        };

        Ok(Self {
            client: Client::new(),
            url,
            host,
            region: region.to_string(),
            credentials,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.url.as_str()
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

#[async_trait]
impl SnapshotBackend for Ec2SnapshotClient {
    async fn create_snapshot(
        &self,
        volume_id: &str,
        description: &str,
    ) -> Result<SnapshotId, SnapshotRequestError> {
        let body = encode_form(&[
            ("Action", ec2::CREATE_SNAPSHOT_ACTION),
            ("Version", ec2::API_VERSION),
            ("VolumeId", volume_id),
            ("Description", description),
        ]);

        let timestamp = Utc::now();
        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_string(), ec2::FORM_CONTENT_TYPE.to_string());
        headers.insert("host".to_string(), self.host.clone());
        headers.insert("x-amz-date".to_string(), sigv4::amz_date(&timestamp));
        if let Some(token) = &self.credentials.session_token {
            headers.insert("x-amz-security-token".to_string(), token.clone());
        }

        let authorization = sigv4::authorization_header(
            &CanonicalRequest {
                method: "POST",
                path: self.url.path(),
                query: "",
                headers: &headers,
                payload: body.as_bytes(),
            },
            &self.credentials,
            &self.region,
            ec2::SERVICE,
            &timestamp,
        );

        // reqwest derives Host from the URL, which is what was signed
        let mut request = self
            .client
            .post(self.url.clone())
            .header(reqwest::header::AUTHORIZATION, authorization);
        for (name, value) in headers.iter().filter(|(name, _)| name.as_str() != "host") {
            request = request.header(name.as_str(), value.as_str());
        }

        debug!("POST {} CreateSnapshot {}", self.url, volume_id);

        let response = request
            .body(body)
            .send()
            .await
            .map_err(|e| SnapshotRequestError::Transport {
                endpoint: self.url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SnapshotRequestError::Transport {
                endpoint: self.url.to_string(),
                reason: format!("failed to read response body: {}", e),
            })?;

        if status.is_success() {
            return xml_tag(&text, "snapshotId").map(SnapshotId::new).ok_or_else(|| {
                SnapshotRequestError::InvalidResponse {
                    status: status.as_u16(),
                    reason: "no snapshotId in response".to_string(),
                }
            });
        }

        match xml_tag(&text, "Code") {
            Some(code) => Err(SnapshotRequestError::Api {
                code,
                message: xml_tag(&text, "Message").unwrap_or_default(),
            }),
            None => Err(SnapshotRequestError::InvalidResponse {
                status: status.as_u16(),
                reason: text.chars().take(200).collect(),
            }),
        }
    }
}

fn encode_form(params: &[(&str, &str)]) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", sigv4::uri_encode(key), sigv4::uri_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Text of the first `<tag>…</tag>` element, entity-decoded
fn xml_tag(document: &str, tag: &str) -> Option<String> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);

    let start = document.find(&open)? + open.len();
    let end = start + document[start..].find(&close)?;

    Some(
        document[start..end]
            .trim()
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&apos;", "'")
            .replace("&amp;", "&"),
    )
}
