use chrono::Utc;
use hackqr_core::ScanLogItem;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, QueryOrder};

/// 扫码审计日志，只追加，不修改也不删除
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "scan_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment_flag)]
    pub id: i32,
    pub qr_token_id: i32,
    pub scanner_id: i32,
    pub scanned_at: chrono::DateTime<Utc>,
    pub success: bool,
    pub message: String,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ScanLogItem {
    fn from(log: Model) -> Self {
        ScanLogItem {
            id: log.id,
            scanner_id: log.scanner_id,
            scanned_at: log.scanned_at,
            success: log.success,
            message: log.message,
        }
    }
}

pub(crate) async fn append<C: ConnectionTrait>(
    db: &C,
    qr_token_id: i32,
    scanner_id: i32,
    scanned_at: chrono::DateTime<Utc>,
    success: bool,
    message: &str,
) -> Result<Model, DbErr> {
    ActiveModel {
        id: ActiveValue::NotSet,
        qr_token_id: ActiveValue::Set(qr_token_id),
        scanner_id: ActiveValue::Set(scanner_id),
        scanned_at: ActiveValue::Set(scanned_at),
        success: ActiveValue::Set(success),
        message: ActiveValue::Set(message.to_string()),
    }
    .insert(db)
    .await
}

pub(crate) async fn list_for_token<C: ConnectionTrait>(
    db: &C,
    qr_token_id: i32,
) -> Result<Vec<Model>, DbErr> {
    Entity::find()
        .filter(Column::QrTokenId.eq(qr_token_id))
        .order_by_asc(Column::ScannedAt)
        .order_by_asc(Column::Id)
        .all(db)
        .await
}
