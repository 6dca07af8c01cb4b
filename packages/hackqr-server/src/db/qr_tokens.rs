use chrono::Utc;
use hackqr_core::TokenItem;
use sea_orm::entity::prelude::*;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum QrPurpose {
    #[sea_orm(string_value = "ENTRY")]
    Entry,
    #[sea_orm(string_value = "BREAKFAST")]
    Breakfast,
    #[sea_orm(string_value = "LUNCH")]
    Lunch,
    #[sea_orm(string_value = "DINNER")]
    Dinner,
}

/// ACTIVE 是唯一的非终态；CONSUMED 与 EXPIRED 一旦写入便不再改变
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum TokenStatus {
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "CONSUMED")]
    Consumed,
    #[sea_orm(string_value = "EXPIRED")]
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IllegalTransition {
    pub from: TokenStatus,
    pub to: TokenStatus,
}

impl fmt::Display for IllegalTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "illegal token transition {} -> {}",
            self.from.label(),
            self.to.label()
        )
    }
}

impl std::error::Error for IllegalTransition {}

impl TokenStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, TokenStatus::Active)
    }

    /// 小写名称，用于拒绝消息 "Token already consumed"
    pub fn label(self) -> &'static str {
        match self {
            TokenStatus::Active => "active",
            TokenStatus::Consumed => "consumed",
            TokenStatus::Expired => "expired",
        }
    }

    pub fn consume(self) -> Result<TokenStatus, IllegalTransition> {
        self.advance(TokenStatus::Consumed)
    }

    pub fn expire(self) -> Result<TokenStatus, IllegalTransition> {
        self.advance(TokenStatus::Expired)
    }

    fn advance(self, to: TokenStatus) -> Result<TokenStatus, IllegalTransition> {
        if self.is_terminal() {
            return Err(IllegalTransition { from: self, to });
        }
        Ok(to)
    }
}

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "qr_tokens")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment_flag)]
    pub id: i32,
    #[sea_orm(unique)]
    pub token: String,
    pub user_id: i32,
    pub hackathon_id: i32,
    pub purpose: QrPurpose,
    pub valid_from: chrono::DateTime<Utc>,
    pub valid_to: chrono::DateTime<Utc>,
    pub status: TokenStatus,
    pub created_at: chrono::DateTime<Utc>,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 有效期两端均为闭区间
    pub fn in_window(&self, now: chrono::DateTime<Utc>) -> bool {
        self.valid_from <= now && now <= self.valid_to
    }
}

impl From<hackqr_core::Purpose> for QrPurpose {
    fn from(purpose: hackqr_core::Purpose) -> Self {
        match purpose {
            hackqr_core::Purpose::Entry => QrPurpose::Entry,
            hackqr_core::Purpose::Breakfast => QrPurpose::Breakfast,
            hackqr_core::Purpose::Lunch => QrPurpose::Lunch,
            hackqr_core::Purpose::Dinner => QrPurpose::Dinner,
        }
    }
}

impl From<QrPurpose> for hackqr_core::Purpose {
    fn from(purpose: QrPurpose) -> Self {
        match purpose {
            QrPurpose::Entry => hackqr_core::Purpose::Entry,
            QrPurpose::Breakfast => hackqr_core::Purpose::Breakfast,
            QrPurpose::Lunch => hackqr_core::Purpose::Lunch,
            QrPurpose::Dinner => hackqr_core::Purpose::Dinner,
        }
    }
}

impl From<TokenStatus> for hackqr_core::TokenState {
    fn from(status: TokenStatus) -> Self {
        match status {
            TokenStatus::Active => hackqr_core::TokenState::Active,
            TokenStatus::Consumed => hackqr_core::TokenState::Consumed,
            TokenStatus::Expired => hackqr_core::TokenState::Expired,
        }
    }
}

impl From<Model> for TokenItem {
    fn from(token: Model) -> Self {
        TokenItem {
            token: token.token,
            user_id: token.user_id,
            hackathon_id: token.hackathon_id,
            purpose: token.purpose.into(),
            valid_from: token.valid_from,
            valid_to: token.valid_to,
            status: token.status.into(),
        }
    }
}
