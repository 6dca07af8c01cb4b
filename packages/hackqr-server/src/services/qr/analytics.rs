use hackqr_core::ScanAnalytics;
use sea_orm::sea_query::{Query, SelectStatement};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, Iterable, PaginatorTrait, QueryFilter,
    TransactionTrait,
};
use std::collections::BTreeMap;
use tracing::debug;

use crate::db::qr_tokens::{self, QrPurpose};
use crate::db::scan_logs;
use crate::db::{QrTokens, ScanLogs};
use crate::error::AppError;

/// 某场黑客松（可选再限定用途）下所有 token 的 id
fn tokens_of(hackathon_id: i32, purpose: Option<QrPurpose>) -> SelectStatement {
    let mut query = Query::select();
    query
        .column(qr_tokens::Column::Id)
        .from(QrTokens)
        .and_where(qr_tokens::Column::HackathonId.eq(hackathon_id));
    if let Some(purpose) = purpose {
        query.and_where(qr_tokens::Column::Purpose.eq(purpose));
    }
    query
}

/// 所有计数在同一个事务里读取，成功次数与分用途之和一致
pub(crate) async fn analytics(
    db: &DatabaseConnection,
    hackathon_id: i32,
) -> Result<ScanAnalytics, AppError> {
    let txn = db.begin().await?;

    let scoped = Condition::all()
        .add(scan_logs::Column::QrTokenId.in_subquery(tokens_of(hackathon_id, None)));

    let total_scans = ScanLogs::find().filter(scoped.clone()).count(&txn).await?;
    let successful_scans = ScanLogs::find()
        .filter(scoped)
        .filter(scan_logs::Column::Success.eq(true))
        .count(&txn)
        .await?;

    let mut by_purpose = BTreeMap::new();
    for purpose in QrPurpose::iter() {
        let successful = ScanLogs::find()
            .filter(
                scan_logs::Column::QrTokenId.in_subquery(tokens_of(hackathon_id, Some(purpose))),
            )
            .filter(scan_logs::Column::Success.eq(true))
            .count(&txn)
            .await?;
        if successful > 0 {
            by_purpose.insert(purpose.into(), successful);
        }
    }

    txn.commit().await?;

    debug!(hackathon_id, total_scans, successful_scans, "scan analytics computed");
    Ok(ScanAnalytics {
        total_scans,
        successful_scans,
        by_purpose,
    })
}
