//! Stdin source — one JSON-encoded `RequestStatsReport` per line.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use revstats_core::RequestStatsReport;

/// Parse one input line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<serde_json::Result<RequestStatsReport>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(serde_json::from_str(line))
}

/// Forward every parsable line from `input` to `tx` until EOF or until the
/// receiver goes away. Malformed lines are logged and dropped.
pub async fn forward_lines<R>(input: R, tx: mpsc::Sender<RequestStatsReport>) -> anyhow::Result<u64>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut forwarded = 0;

    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            None => continue,
            Some(Ok(report)) => {
                if tx.send(report).await.is_err() {
                    debug!("report loop gone, stopping input");
                    break;
                }
                forwarded += 1;
            }
            Some(Err(e)) => warn!(error = %e, "ignoring malformed stats line"),
        }
    }
    Ok(forwarded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_blank_line() {
        assert!(parse_line("   ").is_none());
    }

    #[test]
    fn parse_valid_line() {
        let report = parse_line(r#"{"requestCount": 39, "averageConcurrency": 3}"#)
            .unwrap()
            .unwrap();
        assert_eq!(report.request_count, 39.0);
        assert_eq!(report.average_concurrency, 3.0);
    }

    #[test]
    fn parse_malformed_line() {
        assert!(parse_line("not json").unwrap().is_err());
    }

    #[tokio::test]
    async fn forward_skips_bad_lines() {
        let input: &[u8] = b"{\"requestCount\": 1}\n\ngarbage\n{\"requestCount\": 2}\n";
        let (tx, mut rx) = mpsc::channel(8);

        let forwarded = forward_lines(input, tx).await.unwrap();
        assert_eq!(forwarded, 2);
        assert_eq!(rx.recv().await.unwrap().request_count, 1.0);
        assert_eq!(rx.recv().await.unwrap().request_count, 2.0);
        assert!(rx.recv().await.is_none());
    }
}
