use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::config::TwilioCredentials;
use crate::models::job_posting::JobPosting;

pub const WHATSAPP_PREFIX: &str = "whatsapp:";
pub const DIGEST_CHAR_BUDGET: usize = 1500;
pub const DIGEST_MAX_POSTINGS: usize = 5;
pub const DESCRIPTION_PREVIEW_CHARS: usize = 100;
pub const CONTINUATION_MARKER: &str = "...and more jobs available. Check the app for details.";
pub const TEST_MESSAGE: &str = "🚀 Test notification from your job agent!\n\nThis is a test message to verify WhatsApp notifications are working properly.";

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01/Accounts";

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gateway rejected message (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid destination address: {0}")]
    InvalidAddress(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    /// Returns the gateway's delivery id.
    async fn send(&self, address: &str, body: &str) -> Result<String, GatewayError>;
}

pub fn normalize_address(address: &str) -> String {
    let address = address.trim();
    if address.starts_with(WHATSAPP_PREFIX) {
        address.to_string()
    } else {
        format!("{}{}", WHATSAPP_PREFIX, address)
    }
}

#[derive(Clone)]
pub struct TwilioGateway {
    client: Client,
    credentials: TwilioCredentials,
}

impl TwilioGateway {
    pub fn new(credentials: TwilioCredentials, client: Client) -> Self {
        Self {
            client,
            credentials,
        }
    }
}

#[async_trait]
impl NotificationGateway for TwilioGateway {
    #[tracing::instrument(skip(self, body), fields(body_len = body.chars().count()))]
    async fn send(&self, address: &str, body: &str) -> Result<String, GatewayError> {
        let url = format!(
            "{}/{}/Messages.json",
            TWILIO_API_BASE, self.credentials.account_sid
        );
        let form = [
            ("From", self.credentials.whatsapp_from.as_str()),
            ("To", address),
            ("Body", body),
        ];

        let res = self
            .client
            .post(&url)
            .basic_auth(
                &self.credentials.account_sid,
                Some(&self.credentials.auth_token),
            )
            .form(&form)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let message = res.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: JsonValue = res.json().await?;
        Ok(body
            .get("sid")
            .and_then(|s| s.as_str())
            .unwrap_or_default()
            .to_string())
    }
}

/// Stand-in gateway for environments without messaging credentials. The
/// message is written to the log and a local id is returned.
#[derive(Clone, Default)]
pub struct LogGateway;

#[async_trait]
impl NotificationGateway for LogGateway {
    async fn send(&self, address: &str, body: &str) -> Result<String, GatewayError> {
        if address.len() <= WHATSAPP_PREFIX.len() {
            return Err(GatewayError::InvalidAddress(address.to_string()));
        }
        tracing::info!(to = %address, body = %body, "WhatsApp gateway not configured, logging message");
        Ok(format!("local-{}", Uuid::new_v4()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered { id: String },
    Failed { reason: String },
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }
}

/// A bounded-length message body ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub body: String,
    pub included: usize,
    pub truncated: bool,
}

pub struct DigestContext<'a> {
    pub recipient_name: &'a str,
    pub job_title: &'a str,
    pub location: &'a str,
    pub total_jobs: usize,
}

fn preview(description: &str) -> String {
    if description.chars().count() > DESCRIPTION_PREVIEW_CHARS {
        let cut: String = description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
        format!("{}...", cut)
    } else {
        description.to_string()
    }
}

fn render_posting(posting: &JobPosting) -> String {
    format!(
        "🔹 {} at {}\n📍 Location: {}\n📝 {}\n🔗 Apply: {}\n\n",
        posting.title,
        posting.company,
        posting.location,
        preview(&posting.description),
        posting.application_url
    )
}

/// Renders the first postings into a digest of at most
/// [`DIGEST_CHAR_BUDGET`] characters. Room for the continuation marker is
/// reserved on every step so the marker always fits when rendering stops
/// early.
pub fn build_digest(ctx: &DigestContext<'_>, postings: &[JobPosting]) -> Digest {
    let mut body = format!(
        "👋 Hello {}! Welcome to your job alerts.\n\nWe found {} jobs for '{}' in {}:\n\n",
        ctx.recipient_name, ctx.total_jobs, ctx.job_title, ctx.location
    );
    let mut length = body.chars().count();
    let marker_len = CONTINUATION_MARKER.chars().count();
    let mut included = 0;
    let mut truncated = false;

    for posting in postings.iter().take(DIGEST_MAX_POSTINGS) {
        let line = render_posting(posting);
        let line_len = line.chars().count();
        if length + line_len + marker_len >= DIGEST_CHAR_BUDGET {
            truncated = true;
            break;
        }
        body.push_str(&line);
        length += line_len;
        included += 1;
    }

    if truncated {
        body.push_str(CONTINUATION_MARKER);
    }

    Digest {
        body,
        included,
        truncated,
    }
}

/// Delivery front for the search pipeline. Gateway errors are logged and
/// reported as `DeliveryOutcome::Failed`, never propagated.
#[derive(Clone)]
pub struct Notifier {
    gateway: Arc<dyn NotificationGateway>,
}

impl Notifier {
    pub fn new(gateway: Arc<dyn NotificationGateway>) -> Self {
        Self { gateway }
    }

    pub async fn deliver(&self, address: &str, body: &str) -> DeliveryOutcome {
        let to = normalize_address(address);
        match self.gateway.send(&to, body).await {
            Ok(id) => {
                tracing::info!(to = %to, message_id = %id, "Notification delivered");
                DeliveryOutcome::Delivered { id }
            }
            Err(e) => {
                tracing::error!(to = %to, error = %e, "Failed to send notification");
                DeliveryOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn posting(i: i64, description: &str) -> JobPosting {
        JobPosting {
            id: i,
            title: format!("Engineer {i}"),
            company: "Acme".into(),
            location: "Remote".into(),
            description: description.into(),
            url: "https://acme.example/job".into(),
            application_url: format!("https://acme.example/apply/{i}"),
            salary_range: "Not specified".into(),
            job_type: "Full-time".into(),
            experience_level: "Senior".into(),
            posted_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            created_at: Utc::now(),
        }
    }

    fn ctx(total: usize) -> DigestContext<'static> {
        DigestContext {
            recipient_name: "Ana",
            job_title: "Engineer",
            location: "Remote",
            total_jobs: total,
        }
    }

    #[test]
    fn address_gets_channel_prefix_once() {
        assert_eq!(normalize_address("+15550001111"), "whatsapp:+15550001111");
        assert_eq!(normalize_address("whatsapp:+15550001111"), "whatsapp:+15550001111");
        assert_eq!(normalize_address(" +1555 "), "whatsapp:+1555");
    }

    #[test]
    fn short_digest_includes_everything_without_marker() {
        let postings: Vec<JobPosting> = (1..=3).map(|i| posting(i, "Short")).collect();
        let digest = build_digest(&ctx(3), &postings);

        assert_eq!(digest.included, 3);
        assert!(!digest.truncated);
        assert!(!digest.body.contains(CONTINUATION_MARKER));
        assert!(digest.body.contains("🔹 Engineer 2 at Acme"));
        assert!(digest.body.contains("🔗 Apply: https://acme.example/apply/3"));
        assert!(digest.body.contains("We found 3 jobs for 'Engineer' in Remote"));
    }

    #[test]
    fn considers_at_most_five_postings() {
        let postings: Vec<JobPosting> = (1..=12).map(|i| posting(i, "Short")).collect();
        let digest = build_digest(&ctx(12), &postings);

        assert_eq!(digest.included, 5);
        assert!(!digest.body.contains("Engineer 6 "));
    }

    #[test]
    fn long_descriptions_are_cut_to_preview() {
        let long = "é".repeat(150);
        let digest = build_digest(&ctx(1), &[posting(1, &long)]);

        let expected = format!("📝 {}...\n", "é".repeat(100));
        assert!(digest.body.contains(&expected));
        assert!(!digest.body.contains(&"é".repeat(101)));
    }

    #[test]
    fn budget_truncation_appends_marker_and_stays_within_limit() {
        let huge = posting(1, "short");
        let mut wide = Vec::new();
        for i in 0..5 {
            let mut p = huge.clone();
            p.id = i;
            p.title = "T".repeat(350);
            wide.push(p);
        }
        let digest = build_digest(&ctx(5), &wide);

        assert!(digest.truncated);
        assert!(digest.included < 5);
        assert!(digest.body.ends_with(CONTINUATION_MARKER));
        assert!(digest.body.chars().count() <= DIGEST_CHAR_BUDGET);
    }

    #[test]
    fn posting_that_would_reach_budget_exactly_is_cut() {
        let header = build_digest(&ctx(1), &[]).body.chars().count();
        let marker = CONTINUATION_MARKER.chars().count();
        let mut p = posting(1, "short");
        let base = render_posting(&p).chars().count();
        let room = DIGEST_CHAR_BUDGET - header - marker;

        p.title = "T".repeat(p.title.chars().count() + room - base);
        assert_eq!(render_posting(&p).chars().count(), room);
        let digest = build_digest(&ctx(1), &[p.clone()]);
        assert!(digest.truncated);
        assert_eq!(digest.included, 0);

        p.title.pop();
        let digest = build_digest(&ctx(1), &[p]);
        assert!(!digest.truncated);
        assert_eq!(digest.included, 1);
        assert!(digest.body.chars().count() < DIGEST_CHAR_BUDGET);
    }

    #[tokio::test]
    async fn delivery_failure_is_reported_not_raised() {
        let mut gateway = MockNotificationGateway::new();
        gateway
            .expect_send()
            .withf(|to, _| to.to_string() == "whatsapp:+15550001111")
            .times(1)
            .returning(|to, _| Err(GatewayError::InvalidAddress(to.to_string())));
        let notifier = Notifier::new(Arc::new(gateway));

        let outcome = notifier.deliver("+15550001111", "hi").await;
        assert!(matches!(outcome, DeliveryOutcome::Failed { .. }));
    }

    #[tokio::test]
    async fn log_gateway_returns_local_id() {
        let outcome = Notifier::new(Arc::new(LogGateway))
            .deliver("+15550001111", "hi")
            .await;
        match outcome {
            DeliveryOutcome::Delivered { id } => assert!(id.starts_with("local-")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
