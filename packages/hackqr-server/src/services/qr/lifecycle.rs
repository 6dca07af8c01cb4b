//! 扫码判定。所有用途一律单次核销，状态迁移只经由 `TokenStatus::consume` / `expire`。

use chrono::{DateTime, Utc};

use crate::db::qr_tokens::{IllegalTransition, Model as QrTokenModel, TokenStatus};

pub(crate) const SCAN_SUCCESSFUL: &str = "Scan successful";
pub(crate) const OUT_OF_WINDOW: &str = "Token expired or not yet active";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Verdict {
    pub success: bool,
    pub message: String,
    /// 需要写回的新状态；None 表示状态保持不变
    pub next: Option<TokenStatus>,
}

pub(crate) fn evaluate(token: &QrTokenModel, now: DateTime<Utc>) -> Verdict {
    let transition = if token.in_window(now) {
        token.status.consume()
    } else {
        token.status.expire()
    };

    match transition {
        Ok(TokenStatus::Consumed) => Verdict {
            success: true,
            message: SCAN_SUCCESSFUL.to_string(),
            next: Some(TokenStatus::Consumed),
        },
        Ok(next) => Verdict {
            success: false,
            message: OUT_OF_WINDOW.to_string(),
            next: Some(next),
        },
        Err(IllegalTransition { from, .. }) => Verdict {
            success: false,
            message: format!("Token already {}", from.label()),
            next: None,
        },
    }
}
