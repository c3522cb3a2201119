//! Order reminder job
//!
//! A one-shot client of the GraphQL API: it asks for the orders placed
//! within the look-back window and appends a report block to the reminder
//! log. Every outcome, including transport failures, is written to the log
//! and summarized in a status line; the job itself never fails.
//!
//! A successful block looks like:
//!
//! ```text
//!
//! 15/03/2024-09:00:00 - Order Reminders Processed:
//!   Order #1: Alice Johnson (alice@example.com) - Amount: $1029.98 - Date: 2024-03-14T10:00:00+00:00
//! ```

use crate::config::ReminderConfig;
use chrono::{DateTime, Duration, Local, SecondsFormat};
use serde_json::{Value, json};
use std::time::Duration as StdDuration;
use tokio::io::AsyncWriteExt;

/// GraphQL query sent by the job; `since` is the RFC 3339 threshold
pub const REMINDER_QUERY: &str = r#"query {
  allOrders(filter: { orderDateGte: "{{ since }}" }) {
    edges {
      node {
        id
        customer {
          name
          email
        }
        totalAmount
        orderDate
      }
    }
  }
}"#;

/// Timestamp format of the log block headers
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y-%H:%M:%S";

#[derive(Debug, thiserror::Error)]
pub enum ReminderError {
    /// The endpoint could not be reached, or answered with something that is
    /// not a JSON document
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Template(#[from] tera::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The response was JSON but not shaped like the requested data
    #[error("{0}")]
    Malformed(String),
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderOutcome {
    OrdersFound(usize),
    NoPendingOrders,
    /// The response carried no order data
    DataUnavailable,
    ConnectionError(String),
    Failed(String),
}

impl ReminderOutcome {
    /// One-line summary printed at the end of a run
    pub fn status_line(&self) -> String {
        match self {
            ReminderOutcome::OrdersFound(n) => {
                format!("Order reminders processed! ({} orders found)", n)
            }
            ReminderOutcome::NoPendingOrders => {
                "Order reminders processed! (No pending orders)".to_string()
            }
            ReminderOutcome::DataUnavailable => {
                "Order reminders processed! (Error retrieving data)".to_string()
            }
            ReminderOutcome::ConnectionError(e) => {
                format!("Order reminders processed! (Connection error: {})", e)
            }
            ReminderOutcome::Failed(e) => format!("Order reminders processed! (Error: {})", e),
        }
    }
}

/// Render the reminder query for orders placed at or after `since`
pub fn render_query(since: DateTime<Local>) -> Result<String, ReminderError> {
    let mut context = tera::Context::new();
    context.insert("since", &since.to_rfc3339_opts(SecondsFormat::Secs, false));
    Ok(tera::Tera::one_off(REMINDER_QUERY, &context, false)?)
}

/// A string field of a JSON object, or the JSON text of a non-string value
fn field(value: &Value, path: &[&str]) -> Result<String, ReminderError> {
    let mut current = value;
    for key in path {
        current = current
            .get(key)
            .ok_or_else(|| ReminderError::Malformed(format!("missing field '{}'", key)))?;
    }
    Ok(match current {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Turn a GraphQL response body into the report lines and the outcome
fn report(body: &Value) -> Result<(Vec<String>, ReminderOutcome), ReminderError> {
    let edges = body
        .get("data")
        .and_then(|data| data.get("allOrders"))
        .and_then(|orders| orders.get("edges"))
        .and_then(Value::as_array);

    let Some(edges) = edges else {
        let mut lines = vec!["  Error: Could not retrieve orders from GraphQL".to_string()];
        if let Some(errors) = body.get("errors") {
            lines.push(format!("  GraphQL Errors: {}", errors));
        }
        return Ok((lines, ReminderOutcome::DataUnavailable));
    };

    if edges.is_empty() {
        return Ok((
            vec!["  No pending orders found.".to_string()],
            ReminderOutcome::NoPendingOrders,
        ));
    }

    let lines = edges
        .iter()
        .map(|edge| {
            Ok(format!(
                "  Order #{}: {} ({}) - Amount: ${} - Date: {}",
                field(edge, &["node", "id"])?,
                field(edge, &["node", "customer", "name"])?,
                field(edge, &["node", "customer", "email"])?,
                field(edge, &["node", "totalAmount"])?,
                field(edge, &["node", "orderDate"])?,
            ))
        })
        .collect::<Result<Vec<_>, ReminderError>>()?;

    Ok((lines, ReminderOutcome::OrdersFound(edges.len())))
}

/// Queries the CRM for recent orders and logs reminders
pub struct OrderReminderJob {
    config: ReminderConfig,
    client: reqwest::Client,
}

impl OrderReminderJob {
    pub fn new(config: ReminderConfig) -> Result<Self, ReminderError> {
        let client = reqwest::Client::builder()
            .timeout(StdDuration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ReminderConfig {
        &self.config
    }

    /// Run once, now
    pub async fn run(&self) -> ReminderOutcome {
        self.run_at(Local::now()).await
    }

    /// Run once as if the current time were `now`
    pub async fn run_at(&self, now: DateTime<Local>) -> ReminderOutcome {
        let timestamp = now.format(TIMESTAMP_FORMAT).to_string();

        let (block, outcome) = match self.fetch(now - Duration::days(self.config.lookback_days)).await {
            Ok(body) => match report(&body) {
                Ok((lines, outcome)) => {
                    let mut block = format!("\n{} - Order Reminders Processed:\n", timestamp);
                    for line in lines {
                        block.push_str(&line);
                        block.push('\n');
                    }
                    (block, outcome)
                }
                Err(e) => unexpected(&timestamp, e),
            },
            Err(ReminderError::Transport(e)) => (
                format!(
                    "\n{} - Error connecting to GraphQL endpoint: {}\n",
                    timestamp, e
                ),
                ReminderOutcome::ConnectionError(e.to_string()),
            ),
            Err(e) => unexpected(&timestamp, e),
        };

        if let Err(e) = self.append(&block).await {
            tracing::error!(path = %self.config.log_path.display(), "cannot write reminder log: {}", e);
            return ReminderOutcome::Failed(e.to_string());
        }

        tracing::info!(?outcome, "order reminders processed");
        outcome
    }

    async fn fetch(&self, since: DateTime<Local>) -> Result<Value, ReminderError> {
        let query = render_query(since)?;
        tracing::debug!(endpoint = %self.config.endpoint, %since, "querying recent orders");

        let body = self
            .client
            .post(&self.config.endpoint)
            .json(&json!({ "query": query }))
            .send()
            .await?
            .json::<Value>()
            .await?;
        Ok(body)
    }

    async fn append(&self, block: &str) -> Result<(), ReminderError> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.config.log_path)
            .await?;
        file.write_all(block.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

fn unexpected(timestamp: &str, error: ReminderError) -> (String, ReminderOutcome) {
    (
        format!("\n{} - Unexpected error: {}\n", timestamp, error),
        ReminderOutcome::Failed(error.to_string()),
    )
}
