use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hackqr_core::{IssueTokenRequest, Purpose};
use rand::RngCore;
use rand::rngs::OsRng;
use sea_orm::{DatabaseConnection, SqlErr};
use tracing::{info, warn};

use crate::db::qr_tokens::Model as QrTokenModel;
use crate::db::token_ops::{self, NewQrToken};
use crate::error::AppError;
use crate::services::directory::{self, Capability};

/// 随机部分的字节数
pub(crate) const TOKEN_ENTROPY_BYTES: usize = 16;

/// 首次生成加一次碰撞重试
const ISSUE_ATTEMPTS: usize = 2;

pub(crate) trait TokenGenerator: Send + Sync {
    fn generate(&self, purpose: Purpose) -> String;
}

/// `LUNCH-<base64url>` 形式，随机数来自操作系统 CSPRNG
pub(crate) struct RandomTokenGenerator;

impl TokenGenerator for RandomTokenGenerator {
    fn generate(&self, purpose: Purpose) -> String {
        let mut random_bytes = [0u8; TOKEN_ENTROPY_BYTES];
        OsRng.fill_bytes(&mut random_bytes);
        format!("{}-{}", purpose, URL_SAFE_NO_PAD.encode(random_bytes))
    }
}

pub(crate) async fn issue_token(
    db: &DatabaseConnection,
    generator: &dyn TokenGenerator,
    request: IssueTokenRequest,
) -> Result<QrTokenModel, AppError> {
    let owner = directory::require(db, request.user_id, Capability::ReceiveQr).await?;

    if request.valid_from > request.valid_to {
        return Err(AppError::Validation(
            "valid_from must not be after valid_to".to_string(),
        ));
    }

    for attempt in 1..=ISSUE_ATTEMPTS {
        let new_token = NewQrToken {
            token: generator.generate(request.purpose),
            user_id: owner.id,
            hackathon_id: request.hackathon_id,
            purpose: request.purpose.into(),
            valid_from: request.valid_from,
            valid_to: request.valid_to,
        };

        match token_ops::insert_token(db, new_token).await {
            Ok(token) => {
                info!(
                    token_id = token.id,
                    user_id = token.user_id,
                    hackathon_id = token.hackathon_id,
                    purpose = %request.purpose,
                    "qr token issued"
                );
                return Ok(token);
            }
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                warn!(attempt, user_id = owner.id, "qr token string collision");
            }
            Err(err) => return Err(err.into()),
        }
    }

    Err(AppError::Conflict(
        "Token string collision persisted after regeneration".to_string(),
    ))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::initialize::test_support::memory_db;
    use crate::db::qr_tokens::{QrPurpose, TokenStatus};
    use crate::db::users::VerificationStatus;
    use crate::services::directory::{register_user, set_verification};
    use chrono::{Duration, Utc};
    use hackqr_core::{RegisterUserRequest, Role};
    use sea_orm::{EntityTrait, PaginatorTrait};
    use std::sync::Mutex;

    /// 按顺序吐出预设的 token 串，用来制造碰撞
    pub(crate) struct ScriptedGenerator(pub Mutex<Vec<String>>);

    impl TokenGenerator for ScriptedGenerator {
        fn generate(&self, _purpose: Purpose) -> String {
            self.0.lock().unwrap().remove(0)
        }
    }

    pub(crate) async fn seed_user(
        db: &DatabaseConnection,
        tag: &str,
        role: Role,
        approved: bool,
    ) -> i32 {
        let user = register_user(
            db,
            RegisterUserRequest {
                name: tag.to_string(),
                email: format!("{tag}@example.com"),
                phone: format!("phone-{tag}"),
                role,
            },
        )
        .await
        .unwrap();
        if approved {
            set_verification(db, user.id, VerificationStatus::Approved)
                .await
                .unwrap();
        }
        user.id
    }

    pub(crate) fn lunch_request(user_id: i32, hackathon_id: i32) -> IssueTokenRequest {
        let now = Utc::now();
        IssueTokenRequest {
            user_id,
            hackathon_id,
            purpose: Purpose::Lunch,
            valid_from: now - Duration::minutes(5),
            valid_to: now + Duration::minutes(30),
        }
    }

    #[test]
    fn test_random_token_format() {
        let token = RandomTokenGenerator.generate(Purpose::Breakfast);
        let (prefix, random) = token.split_once('-').unwrap();

        assert_eq!(prefix, "BREAKFAST");
        let decoded = URL_SAFE_NO_PAD.decode(random).unwrap();
        assert_eq!(decoded.len(), TOKEN_ENTROPY_BYTES);
        assert_ne!(token, RandomTokenGenerator.generate(Purpose::Breakfast));
    }

    #[tokio::test]
    async fn test_issue_token_for_verified_user() {
        let db = memory_db().await;
        let user_id = seed_user(&db, "alice", Role::Student, true).await;

        let token = issue_token(&db, &RandomTokenGenerator, lunch_request(user_id, 7))
            .await
            .unwrap();

        assert!(token.token.starts_with("LUNCH-"));
        assert_eq!(token.status, TokenStatus::Active);
        assert_eq!(token.purpose, QrPurpose::Lunch);
        assert_eq!(token.hackathon_id, 7);
        assert_eq!(token.user_id, user_id);
    }

    #[tokio::test]
    async fn test_issue_token_rejects_unverified_user() {
        let db = memory_db().await;
        let user_id = seed_user(&db, "bob", Role::Student, false).await;

        let result = issue_token(&db, &RandomTokenGenerator, lunch_request(user_id, 1)).await;
        assert!(matches!(result, Err(AppError::PermissionDenied(_))));
        let issued = crate::db::QrTokens::find().count(&db).await.unwrap();
        assert_eq!(issued, 0);
    }

    #[tokio::test]
    async fn test_issue_token_unknown_user_is_denied() {
        let db = memory_db().await;
        let result = issue_token(&db, &RandomTokenGenerator, lunch_request(4242, 1)).await;
        assert!(matches!(result, Err(AppError::PermissionDenied(_))));
        let issued = crate::db::QrTokens::find().count(&db).await.unwrap();
        assert_eq!(issued, 0);
    }

    #[tokio::test]
    async fn test_issue_token_rejects_inverted_window() {
        let db = memory_db().await;
        let user_id = seed_user(&db, "carol", Role::Student, true).await;

        let mut request = lunch_request(user_id, 1);
        std::mem::swap(&mut request.valid_from, &mut request.valid_to);

        let result = issue_token(&db, &RandomTokenGenerator, request).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_issue_token_regenerates_once_on_collision() {
        let db = memory_db().await;
        let user_id = seed_user(&db, "dave", Role::Student, true).await;

        let generator = ScriptedGenerator(Mutex::new(vec![
            "LUNCH-fixed".to_string(),
            "LUNCH-fixed".to_string(),
            "LUNCH-fresh".to_string(),
        ]));

        let first = issue_token(&db, &generator, lunch_request(user_id, 1)).await.unwrap();
        assert_eq!(first.token, "LUNCH-fixed");

        let second = issue_token(&db, &generator, lunch_request(user_id, 1)).await.unwrap();
        assert_eq!(second.token, "LUNCH-fresh");
    }

    #[tokio::test]
    async fn test_issue_token_fails_when_collision_recurs() {
        let db = memory_db().await;
        let user_id = seed_user(&db, "erin", Role::Student, true).await;

        let generator = ScriptedGenerator(Mutex::new(vec!["DINNER-same".to_string(); 3]));

        issue_token(&db, &generator, lunch_request(user_id, 1)).await.unwrap();
        let result = issue_token(&db, &generator, lunch_request(user_id, 1)).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }
}
