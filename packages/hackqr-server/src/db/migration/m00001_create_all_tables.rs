use crate::db;
use sea_orm::sea_query::{ForeignKey, Index, Table};
use sea_orm::{DbErr, DeriveMigrationName};
use sea_orm_migration::{MigrationTrait, SchemaManager, schema};

#[derive(DeriveMigrationName)]
pub(crate) struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 用户表
        let users_table = Table::create()
            .table(db::Users)
            .if_not_exists()
            .col(schema::pk_auto(db::Users::COLUMN.id))
            .col(schema::string(db::Users::COLUMN.name))
            .col(schema::string_uniq(db::Users::COLUMN.email))
            .col(schema::string_uniq(db::Users::COLUMN.phone))
            .col(schema::string(db::Users::COLUMN.role).default("STUDENT"))
            .col(schema::string(db::Users::COLUMN.verification_status).default("PENDING"))
            .col(schema::timestamp_with_time_zone(db::Users::COLUMN.created_at))
            .to_owned();

        // 二维码表，token 唯一约束兜底随机串碰撞；hackathon_id 来自外部目录，不建外键
        let qr_tokens_table = Table::create()
            .table(db::QrTokens)
            .if_not_exists()
            .col(schema::pk_auto(db::QrTokens::COLUMN.id))
            .col(schema::string_uniq(db::QrTokens::COLUMN.token))
            .col(schema::integer(db::QrTokens::COLUMN.user_id))
            .col(schema::integer(db::QrTokens::COLUMN.hackathon_id))
            .col(schema::string(db::QrTokens::COLUMN.purpose))
            .col(schema::timestamp_with_time_zone(db::QrTokens::COLUMN.valid_from))
            .col(schema::timestamp_with_time_zone(db::QrTokens::COLUMN.valid_to))
            .col(schema::string(db::QrTokens::COLUMN.status).default("ACTIVE"))
            .col(schema::timestamp_with_time_zone(db::QrTokens::COLUMN.created_at))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_qr_tokens_user")
                    .from(db::QrTokens, db::QrTokens::COLUMN.user_id)
                    .to(db::Users, db::Users::COLUMN.id),
            )
            .to_owned();

        // 扫码日志表
        let scan_logs_table = Table::create()
            .table(db::ScanLogs)
            .if_not_exists()
            .col(schema::pk_auto(db::ScanLogs::COLUMN.id))
            .col(schema::integer(db::ScanLogs::COLUMN.qr_token_id))
            .col(schema::integer(db::ScanLogs::COLUMN.scanner_id))
            .col(schema::timestamp_with_time_zone(db::ScanLogs::COLUMN.scanned_at))
            .col(schema::boolean(db::ScanLogs::COLUMN.success))
            .col(schema::string(db::ScanLogs::COLUMN.message))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_scan_logs_qr_token")
                    .from(db::ScanLogs, db::ScanLogs::COLUMN.qr_token_id)
                    .to(db::QrTokens, db::QrTokens::COLUMN.id),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_scan_logs_scanner")
                    .from(db::ScanLogs, db::ScanLogs::COLUMN.scanner_id)
                    .to(db::Users, db::Users::COLUMN.id),
            )
            .to_owned();

        manager.create_table(users_table).await?;
        manager.create_table(qr_tokens_table).await?;
        manager.create_table(scan_logs_table).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_qr_tokens_hackathon")
                    .table(db::QrTokens)
                    .col(db::QrTokens::COLUMN.hackathon_id)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_scan_logs_qr_token")
                    .table(db::ScanLogs)
                    .col(db::ScanLogs::COLUMN.qr_token_id)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(db::ScanLogs).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(db::QrTokens).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(db::Users).if_exists().to_owned())
            .await
    }
}
