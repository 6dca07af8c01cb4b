//! 用户目录与权限检查。签发与扫码共用同一个 `require` 入口。

use async_trait::async_trait;
use hackqr_core::RegisterUserRequest;
use sea_orm::{DatabaseConnection, EntityTrait, SqlErr};
use tracing::{info, warn};

use crate::db::users::{self, Entity as Users, Model as UserModel, UserRole, VerificationStatus};
use crate::error::AppError;

/// 权限检查只关心的用户字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Actor {
    pub id: i32,
    pub role: UserRole,
    pub verification_status: VerificationStatus,
}

impl From<&UserModel> for Actor {
    fn from(user: &UserModel) -> Self {
        Actor {
            id: user.id,
            role: user.role,
            verification_status: user.verification_status,
        }
    }
}

#[async_trait]
pub(crate) trait UserDirectory: Send + Sync {
    /// 用户不存在时返回 `AppError::NotFound`；`require` 会把它转成 `PermissionDenied`
    async fn get_user(&self, user_id: i32) -> Result<Actor, AppError>;
}

#[async_trait]
impl UserDirectory for DatabaseConnection {
    async fn get_user(&self, user_id: i32) -> Result<Actor, AppError> {
        let user = find_user(self, user_id).await?;
        Ok(Actor::from(&user))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Capability {
    /// 领取二维码：实名审核已通过
    ReceiveQr,
    /// 扫码核销：扫码员，或管理员
    Scan,
}

impl Capability {
    pub(crate) fn granted_to(self, actor: &Actor) -> bool {
        match self {
            Capability::ReceiveQr => actor.verification_status == VerificationStatus::Approved,
            Capability::Scan => matches!(actor.role, UserRole::Scanner | UserRole::Admin),
        }
    }

    fn denial_message(self) -> &'static str {
        match self {
            Capability::ReceiveQr => "Only verified users can receive QR",
            Capability::Scan => "Scanner role required",
        }
    }
}

pub(crate) async fn require<D>(
    directory: &D,
    actor_id: i32,
    capability: Capability,
) -> Result<Actor, AppError>
where
    D: UserDirectory + ?Sized,
{
    let denied = || AppError::PermissionDenied(capability.denial_message().to_string());

    // 不存在的用户与无权限的用户同样处理
    let actor = match directory.get_user(actor_id).await {
        Ok(actor) => actor,
        Err(AppError::NotFound(_)) => {
            warn!(actor_id, ?capability, "capability check failed: unknown actor");
            return Err(denied());
        }
        Err(err) => return Err(err),
    };
    if !capability.granted_to(&actor) {
        warn!(actor_id, ?capability, "capability check failed");
        return Err(denied());
    }
    Ok(actor)
}

pub(crate) async fn find_user(db: &DatabaseConnection, user_id: i32) -> Result<UserModel, AppError> {
    Users::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
}

pub(crate) async fn register_user(
    db: &DatabaseConnection,
    request: RegisterUserRequest,
) -> Result<UserModel, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("Name must not be empty".to_string()));
    }
    if !request.email.contains('@') {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }
    if request.phone.trim().is_empty() {
        return Err(AppError::Validation("Phone must not be empty".to_string()));
    }

    if users::find_by_email_or_phone(db, &request.email, &request.phone)
        .await?
        .is_some()
    {
        return Err(duplicate_user());
    }

    let user = users::insert_new_user(db, request)
        .await
        .map_err(|err| match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => duplicate_user(),
            _ => AppError::Db(err),
        })?;

    info!(user_id = user.id, role = ?user.role, "user registered");
    Ok(user)
}

pub(crate) async fn set_verification(
    db: &DatabaseConnection,
    user_id: i32,
    status: VerificationStatus,
) -> Result<UserModel, AppError> {
    let user = find_user(db, user_id).await?;
    let user = users::update_verification(db, user, status).await?;

    info!(user_id, status = ?status, "verification status updated");
    Ok(user)
}

fn duplicate_user() -> AppError {
    AppError::Conflict("User with email/phone already exists".to_string())
}
