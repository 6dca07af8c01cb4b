use chrono::{DateTime, Utc};
use hackqr_core::ScanResult;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use tracing::{info, warn};

use crate::db::qr_tokens::Model as QrTokenModel;
use crate::db::scan_logs::{self, Model as ScanLogModel};
use crate::db::token_ops;
use crate::error::AppError;
use crate::services::directory::{self, Capability};
use crate::services::qr::gate::ScanGate;
use crate::services::qr::lifecycle;

/// compare-and-set 失败后最多重读的次数
const MAX_SCAN_ATTEMPTS: usize = 3;

pub(crate) async fn scan(
    db: &DatabaseConnection,
    gate: &ScanGate,
    token: &str,
    scanner_id: i32,
) -> Result<ScanResult, AppError> {
    scan_at(db, gate, token, scanner_id, Utc::now).await
}

/// 读取、判定、写状态、写日志在同一个事务里完成；找不到 token 时不留日志。
/// `clock` 在拿到 token 闸门之后才读取，排队的扫码按实际处理时刻判定
pub(crate) async fn scan_at<F>(
    db: &DatabaseConnection,
    gate: &ScanGate,
    token: &str,
    scanner_id: i32,
    clock: F,
) -> Result<ScanResult, AppError>
where
    F: FnOnce() -> DateTime<Utc>,
{
    let scanner = directory::require(db, scanner_id, Capability::Scan).await?;

    let _pass = gate.enter(token).await;
    let now = clock();
    let txn = db.begin().await?;

    let qr = find_token(&txn, token).await?;
    let (token_id, result) = settle(&txn, qr, scanner.id, now).await?;
    txn.commit().await?;

    if result.success {
        info!(token_id, scanner_id = scanner.id, purpose = %result.purpose, "scan accepted");
    } else {
        warn!(
            token_id,
            scanner_id = scanner.id,
            reason = %result.message,
            "scan rejected"
        );
    }
    Ok(result)
}

/// 从已读到的行出发判定并落库。compare-and-set 落空说明行已被别人改过，重读后再判定
async fn settle<C: ConnectionTrait>(
    db: &C,
    mut qr: QrTokenModel,
    scanner_id: i32,
    now: DateTime<Utc>,
) -> Result<(i32, ScanResult), AppError> {
    for _ in 0..MAX_SCAN_ATTEMPTS {
        let verdict = lifecycle::evaluate(&qr, now);
        if let Some(next) = verdict.next {
            let moved = token_ops::compare_and_set_status(db, qr.id, qr.status, next).await?;
            if !moved {
                warn!(token_id = qr.id, "token status changed underneath scan, re-reading");
                qr = find_token(db, &qr.token).await?;
                continue;
            }
        }

        scan_logs::append(db, qr.id, scanner_id, now, verdict.success, &verdict.message).await?;
        return Ok((
            qr.id,
            ScanResult {
                success: verdict.success,
                message: verdict.message,
                purpose: qr.purpose.into(),
            },
        ));
    }

    Err(AppError::Conflict(
        "Token state kept changing during scan".to_string(),
    ))
}

async fn find_token<C: ConnectionTrait>(db: &C, token: &str) -> Result<QrTokenModel, AppError> {
    token_ops::find_by_token(db, token)
        .await?
        .ok_or_else(|| AppError::NotFound("QR token not found".to_string()))
}

pub(crate) async fn get_token(db: &DatabaseConnection, token: &str) -> Result<QrTokenModel, AppError> {
    find_token(db, token).await
}

pub(crate) async fn scan_history(
    db: &DatabaseConnection,
    token: &str,
) -> Result<Vec<ScanLogModel>, AppError> {
    let qr = get_token(db, token).await?;
    Ok(scan_logs::list_for_token(db, qr.id).await?)
}
