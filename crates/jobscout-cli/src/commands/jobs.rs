//! One-shot applied/rejected snapshot dump.

use anyhow::Result;
use serde_json::Value;

use jobscout_core::jobs::JobRecord;
use jobscout_core::transport::SnapshotFeed;
use jobscout_transport::ChatClient;

use super::chat::resolve_config;

pub async fn run(backend: Option<String>, user: String) -> Result<()> {
    let config = resolve_config(backend)?;
    let client = ChatClient::new(&config);
    let snapshot = client.fetch_jobs(&user).await?;

    println!("applied ({}):", snapshot.applied.len());
    for record in &snapshot.applied {
        println!("  {}", summarize(record));
    }
    println!("rejected ({}):", snapshot.rejected.len());
    for record in &snapshot.rejected {
        println!("  {}", summarize(record));
    }
    Ok(())
}

/// One line per record: company and title when the payload has them,
/// compact JSON otherwise.
fn summarize(record: &JobRecord) -> String {
    let job = record.0.get("job").unwrap_or(&record.0);
    let company = job
        .get("company")
        .or_else(|| job.get("company_name"))
        .and_then(Value::as_str);
    let title = job
        .get("title")
        .or_else(|| job.get("position"))
        .and_then(Value::as_str);

    match (company, title) {
        (Some(company), Some(title)) => format!("{company} - {title}"),
        (Some(company), None) => company.to_string(),
        _ => record.0.to_string(),
    }
}
