use chrono::Utc;
use hackqr_core::{RegisterUserRequest, UserItem};
use sea_orm::{ActiveValue, Condition};
use sea_orm::entity::prelude::*;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment_flag)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub phone: String,
    pub role: UserRole,
    pub verification_status: VerificationStatus,
    pub created_at: chrono::DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum UserRole {
    #[sea_orm(string_value = "STUDENT")]
    Student,
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    #[sea_orm(string_value = "JUDGE")]
    Judge,
    #[sea_orm(string_value = "SCANNER")]
    Scanner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum VerificationStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<hackqr_core::Role> for UserRole {
    fn from(role: hackqr_core::Role) -> Self {
        match role {
            hackqr_core::Role::Student => UserRole::Student,
            hackqr_core::Role::Admin => UserRole::Admin,
            hackqr_core::Role::Judge => UserRole::Judge,
            hackqr_core::Role::Scanner => UserRole::Scanner,
        }
    }
}

impl From<UserRole> for hackqr_core::Role {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Student => hackqr_core::Role::Student,
            UserRole::Admin => hackqr_core::Role::Admin,
            UserRole::Judge => hackqr_core::Role::Judge,
            UserRole::Scanner => hackqr_core::Role::Scanner,
        }
    }
}

impl From<hackqr_core::VerificationStatus> for VerificationStatus {
    fn from(status: hackqr_core::VerificationStatus) -> Self {
        match status {
            hackqr_core::VerificationStatus::Pending => VerificationStatus::Pending,
            hackqr_core::VerificationStatus::Approved => VerificationStatus::Approved,
            hackqr_core::VerificationStatus::Rejected => VerificationStatus::Rejected,
        }
    }
}

impl From<VerificationStatus> for hackqr_core::VerificationStatus {
    fn from(status: VerificationStatus) -> Self {
        match status {
            VerificationStatus::Pending => hackqr_core::VerificationStatus::Pending,
            VerificationStatus::Approved => hackqr_core::VerificationStatus::Approved,
            VerificationStatus::Rejected => hackqr_core::VerificationStatus::Rejected,
        }
    }
}

impl From<Model> for UserItem {
    fn from(user: Model) -> Self {
        UserItem {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: user.role.into(),
            verification_status: user.verification_status.into(),
            created_at: user.created_at,
        }
    }
}

pub(crate) async fn insert_new_user<C: ConnectionTrait>(
    db: &C,
    request: RegisterUserRequest,
) -> Result<Model, DbErr> {
    ActiveModel {
        id: ActiveValue::NotSet,
        name: ActiveValue::Set(request.name),
        email: ActiveValue::Set(request.email),
        phone: ActiveValue::Set(request.phone),
        role: ActiveValue::Set(request.role.into()),
        verification_status: ActiveValue::Set(VerificationStatus::Pending),
        created_at: ActiveValue::Set(Utc::now()),
    }
    .insert(db)
    .await
}

pub(crate) async fn find_by_email_or_phone<C: ConnectionTrait>(
    db: &C,
    email: &str,
    phone: &str,
) -> Result<Option<Model>, DbErr> {
    Entity::find()
        .filter(
            Condition::any()
                .add(Column::Email.eq(email))
                .add(Column::Phone.eq(phone)),
        )
        .one(db)
        .await
}

pub(crate) async fn update_verification<C: ConnectionTrait>(
    db: &C,
    user: Model,
    status: VerificationStatus,
) -> Result<Model, DbErr> {
    let mut active_model: ActiveModel = user.into();
    active_model.verification_status = ActiveValue::Set(status);
    active_model.update(db).await
}
