use anyhow::{Context, Result, bail};
use chrono::{DateTime, Duration, Utc};
use hackqr_sdk::{
    HackQrClient, IssueTokenRequest, Purpose, ScanAnalytics, ScanLogItem, ScanResult, TokenItem,
};

/// 未给出 `--from`/`--to` 时从现在开始，持续 `minutes` 分钟
pub fn issue_window(
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
    minutes: i64,
    now: DateTime<Utc>,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let valid_from = from.unwrap_or(now);
    let valid_to = to.unwrap_or(valid_from + Duration::minutes(minutes));
    if valid_from > valid_to {
        bail!("--from must not be after --to");
    }
    Ok((valid_from, valid_to))
}

pub fn format_token(token: &TokenItem) -> String {
    format!(
        "{} [{} / {}] user #{} hackathon #{} valid {} .. {}",
        token.token,
        token.purpose,
        token.status,
        token.user_id,
        token.hackathon_id,
        token.valid_from.format("%Y-%m-%d %H:%M"),
        token.valid_to.format("%Y-%m-%d %H:%M"),
    )
}

pub fn format_scan(result: &ScanResult) -> String {
    let mark = if result.success { "✅" } else { "⛔" };
    format!("{mark} {} ({})", result.message, result.purpose)
}

pub fn format_log(log: &ScanLogItem) -> String {
    format!(
        "{} scanner #{} {} {}",
        log.scanned_at.format("%Y-%m-%d %H:%M:%S"),
        log.scanner_id,
        if log.success { "ok  " } else { "fail" },
        log.message
    )
}

pub fn format_analytics(stats: &ScanAnalytics) -> Vec<String> {
    let mut lines = vec![
        format!("Total scans: {}", stats.total_scans),
        format!("Successful scans: {}", stats.successful_scans),
    ];
    for purpose in Purpose::ALL {
        lines.push(format!("  {:<10}{}", purpose.as_str(), stats.successful_for(purpose)));
    }
    lines
}

pub async fn issue(
    client: &HackQrClient,
    user_id: i32,
    hackathon_id: i32,
    purpose: Purpose,
    window: (DateTime<Utc>, DateTime<Utc>),
) -> Result<()> {
    let (valid_from, valid_to) = window;
    let request = IssueTokenRequest {
        user_id,
        hackathon_id,
        purpose,
        valid_from,
        valid_to,
    };
    let token = client
        .issue_token(&request)
        .await
        .context("failed to issue QR token")?;
    println!("🎟️  QR token issued");
    println!("   {}", format_token(&token));
    Ok(())
}

pub async fn scan(client: &HackQrClient, token: &str, scanner_id: i32) -> Result<bool> {
    let result = client.scan(token, scanner_id).await.context("scan failed")?;
    println!("{}", format_scan(&result));
    Ok(result.success)
}

pub async fn show(client: &HackQrClient, token: &str) -> Result<()> {
    let token = client.get_token(token).await.context("failed to load token")?;
    println!("🎟️  {}", format_token(&token));
    Ok(())
}

pub async fn history(client: &HackQrClient, token: &str) -> Result<()> {
    let logs = client
        .scan_history(token)
        .await
        .context("failed to load scan history")?;
    println!("📜 Scan history ({} total):", logs.len());
    for log in &logs {
        println!("  {}", format_log(log));
    }
    Ok(())
}

pub async fn analytics(client: &HackQrClient, hackathon_id: i32) -> Result<()> {
    let stats = client
        .get_analytics(hackathon_id)
        .await
        .context("failed to load analytics")?;
    println!("📊 Hackathon #{hackathon_id}");
    for line in format_analytics(&stats) {
        println!("  {line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_issue_window_defaults_to_now() {
        let (from, to) = issue_window(None, None, 90, at(12)).unwrap();
        assert_eq!(from, at(12));
        assert_eq!(to, at(12) + Duration::minutes(90));
    }

    #[test]
    fn test_issue_window_explicit_bounds() {
        let (from, to) = issue_window(Some(at(12)), Some(at(14)), 5, at(8)).unwrap();
        assert_eq!((from, to), (at(12), at(14)));
    }

    #[test]
    fn test_issue_window_rejects_inverted() {
        assert!(issue_window(Some(at(14)), Some(at(12)), 5, at(8)).is_err());
    }

    #[test]
    fn test_format_scan() {
        let ok = ScanResult {
            success: true,
            message: "Scan successful".to_string(),
            purpose: Purpose::Lunch,
        };
        assert_eq!(format_scan(&ok), "✅ Scan successful (LUNCH)");

        let rejected = ScanResult {
            success: false,
            message: "Token already consumed".to_string(),
            purpose: Purpose::Dinner,
        };
        assert_eq!(format_scan(&rejected), "⛔ Token already consumed (DINNER)");
    }

    #[test]
    fn test_format_analytics_lists_every_purpose() {
        let stats = ScanAnalytics {
            total_scans: 3,
            successful_scans: 2,
            by_purpose: BTreeMap::from([(Purpose::Lunch, 2)]),
        };
        let lines = format_analytics(&stats);

        assert_eq!(lines[0], "Total scans: 3");
        assert_eq!(lines[1], "Successful scans: 2");
        assert_eq!(lines.len(), 2 + Purpose::ALL.len());
        assert!(lines.iter().any(|line| line.trim() == "LUNCH     2"));
        assert!(lines.iter().any(|line| line.trim() == "ENTRY     0"));
    }
}
