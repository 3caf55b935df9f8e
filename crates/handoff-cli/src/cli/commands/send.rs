//! `handoff send <url>` – hand one download job to the companion.

use anyhow::{Context, Result};
use clap::Args;
use handoff_core::config::HandoffConfig;
use handoff_core::{DeliveryOutcome, Handoff, HandoffError, JobPayload};

#[derive(Debug, Args)]
pub struct SendArgs {
    /// HTTP/HTTPS URL to download.
    pub url: String,

    /// Cookie to forward, repeatable.
    #[arg(long = "cookie", value_name = "NAME=VALUE", value_parser = parse_cookie)]
    pub cookies: Vec<(String, String)>,

    /// Page the link was found on (preferred referrer).
    #[arg(long, value_name = "URL")]
    pub page_url: Option<String>,

    /// Referrer to use when no page URL is given.
    #[arg(long, value_name = "URL")]
    pub referrer: Option<String>,

    /// User agent the companion should present.
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Mark the target as a media stream (HLS/DASH manifest, video, audio).
    #[arg(long)]
    pub stream: bool,
}

pub(crate) fn parse_cookie(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got {:?}", s)),
    }
}

impl SendArgs {
    pub(crate) fn payload(&self) -> JobPayload {
        let mut payload = JobPayload::new(self.url.clone())
            .with_cookies(self.cookies.iter().map(|(n, v)| (n.as_str(), v.as_str())))
            .with_referrer(self.page_url.as_deref(), self.referrer.as_deref())
            .with_stream(self.stream);
        if let Some(ua) = &self.user_agent {
            payload = payload.with_user_agent(ua.clone());
        }
        payload
    }
}

/// Context line for a failed hand-off; says whether running the command again may help.
pub(crate) fn failure_context(url: &str, err: &HandoffError) -> String {
    if err.is_retryable() {
        format!("could not hand off {} (safe to retry)", url)
    } else {
        format!("companion refused {}; retrying will not help", url)
    }
}

pub async fn run_send(cfg: &HandoffConfig, args: SendArgs) -> Result<()> {
    let payload = args.payload();
    let handoff = Handoff::from_config(cfg);

    let outcome = handoff
        .submit(&payload)
        .await
        .with_context(|| format!("invalid job for {}", args.url))?;
    tracing::debug!(%outcome, url = %args.url, "send finished");

    if let DeliveryOutcome::Success = outcome {
        println!("Sent to companion: {}", args.url);
        return Ok(());
    }
    outcome.into_result().map_err(|err| {
        let context = failure_context(&args.url, &err);
        anyhow::Error::new(err).context(context)
    })
}
