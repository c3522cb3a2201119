//! Log reminders for the orders placed within the look-back window
//!
//! Meant to be run from a scheduler. Always exits successfully; the outcome
//! is appended to the reminder log and summarized on stdout.

use anyhow::Result;
use crm::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = CrmConfig::from_env()?;
    init_tracing(&config.logging);

    let outcome = match OrderReminderJob::new(config.reminders) {
        Ok(job) => job.run().await,
        Err(e) => {
            tracing::error!("cannot build HTTP client: {}", e);
            ReminderOutcome::Failed(e.to_string())
        }
    };

    println!("{}", outcome.status_line());
    Ok(())
}
