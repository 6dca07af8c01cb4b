use crate::db::qr_tokens::{self, Entity as QrTokens, Model as QrTokenModel, QrPurpose, TokenStatus};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set};

pub(crate) struct NewQrToken {
    pub token: String,
    pub user_id: i32,
    pub hackathon_id: i32,
    pub purpose: QrPurpose,
    pub valid_from: chrono::DateTime<Utc>,
    pub valid_to: chrono::DateTime<Utc>,
}

/// 新签发的二维码总是 ACTIVE
pub(crate) async fn insert_token<C: ConnectionTrait>(
    db: &C,
    new_token: NewQrToken,
) -> Result<QrTokenModel, DbErr> {
    qr_tokens::ActiveModel {
        token: Set(new_token.token),
        user_id: Set(new_token.user_id),
        hackathon_id: Set(new_token.hackathon_id),
        purpose: Set(new_token.purpose),
        valid_from: Set(new_token.valid_from),
        valid_to: Set(new_token.valid_to),
        status: Set(TokenStatus::Active),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub(crate) async fn find_by_token<C: ConnectionTrait>(
    db: &C,
    token: &str,
) -> Result<Option<QrTokenModel>, DbErr> {
    QrTokens::find()
        .filter(qr_tokens::Column::Token.eq(token))
        .one(db)
        .await
}

/// 仅当行仍处于 `from` 状态时写入 `to`，返回是否真正更新了一行
pub(crate) async fn compare_and_set_status<C: ConnectionTrait>(
    db: &C,
    token_id: i32,
    from: TokenStatus,
    to: TokenStatus,
) -> Result<bool, DbErr> {
    let result = QrTokens::update_many()
        .col_expr(qr_tokens::Column::Status, Expr::value(to))
        .filter(qr_tokens::Column::Id.eq(token_id))
        .filter(qr_tokens::Column::Status.eq(from))
        .exec(db)
        .await?;

    Ok(result.rows_affected == 1)
}
