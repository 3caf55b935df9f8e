//! Tests for the send subcommand.

use super::parse;
use crate::cli::commands::SendArgs;
use crate::cli::{Cli, CliCommand};
use clap::Parser;

fn send_args(args: &[&str]) -> SendArgs {
    match parse(args) {
        CliCommand::Send(args) => args,
        _ => panic!("expected Send"),
    }
}

#[test]
fn cli_parse_send_minimal() {
    let args = send_args(&["handoff", "send", "https://example.com/file.iso"]);
    assert_eq!(args.url, "https://example.com/file.iso");
    assert!(args.cookies.is_empty());
    assert!(args.page_url.is_none());
    assert!(args.referrer.is_none());
    assert!(args.user_agent.is_none());
    assert!(!args.stream);
}

#[test]
fn cli_parse_send_full() {
    let args = send_args(&[
        "handoff",
        "send",
        "https://cdn.example.com/live.m3u8",
        "--cookie",
        "sid=abc",
        "--cookie",
        "token=x=y",
        "--page-url",
        "https://example.com/watch",
        "--referrer",
        "https://frame.example.com/",
        "--user-agent",
        "Mozilla/5.0",
        "--stream",
    ]);
    assert_eq!(
        args.cookies,
        vec![
            ("sid".to_string(), "abc".to_string()),
            ("token".to_string(), "x=y".to_string())
        ]
    );
    assert!(args.stream);

    let payload = args.payload();
    assert_eq!(payload.target_url, "https://cdn.example.com/live.m3u8");
    assert_eq!(payload.cookie_header, "sid=abc; token=x=y");
    assert_eq!(payload.referrer, "https://example.com/watch");
    assert_eq!(payload.user_agent, "Mozilla/5.0");
    assert!(payload.is_stream);
}

#[test]
fn cli_send_referrer_fallback_and_default_user_agent() {
    let args = send_args(&[
        "handoff",
        "send",
        "https://example.com/a.zip",
        "--referrer",
        "https://frame.example.com/",
    ]);
    let payload = args.payload();
    assert_eq!(payload.referrer, "https://frame.example.com/");
    assert!(payload.user_agent.starts_with("handoff/"));
}

#[test]
fn cli_parse_send_rejects_malformed_cookie() {
    assert!(Cli::try_parse_from(["handoff", "send", "https://example.com/", "--cookie", "novalue"]).is_err());
    assert!(Cli::try_parse_from(["handoff", "send", "https://example.com/", "--cookie", "=v"]).is_err());
}

#[test]
fn cli_parse_send_requires_url() {
    assert!(Cli::try_parse_from(["handoff", "send"]).is_err());
}

#[test]
fn cli_send_failure_context_reflects_retryability() {
    use crate::cli::commands::failure_context;
    use handoff_core::transport::FailureKind;
    use handoff_core::HandoffError;

    let url = "https://example.com/a.zip";
    let not_found = failure_context(url, &HandoffError::CompanionNotFound);
    assert!(not_found.contains("safe to retry"), "{}", not_found);
    let timed_out = failure_context(url, &HandoffError::Unreachable(FailureKind::Timeout));
    assert!(timed_out.contains("safe to retry"), "{}", timed_out);
    let refused = failure_context(url, &HandoffError::Rejected(500));
    assert!(refused.contains("will not help"), "{}", refused);
    assert!(refused.contains(url));
}
