use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// 枚举值解析失败
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} value: {}", self.kind, self.value)
    }
}

impl std::error::Error for ParseEnumError {}

// 线上统一使用大写字符串；解析时忽略大小写，方便命令行输入
macro_rules! wire_enum_str {
    ($ty:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_uppercase().as_str() {
                    $($text => Ok($ty::$variant),)+
                    _ => Err(ParseEnumError {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

/// 二维码用途
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Purpose {
    Entry,
    Breakfast,
    Lunch,
    Dinner,
}

impl Purpose {
    pub const ALL: [Purpose; 4] = [
        Purpose::Entry,
        Purpose::Breakfast,
        Purpose::Lunch,
        Purpose::Dinner,
    ];
}

wire_enum_str!(Purpose, "purpose", {
    Entry => "ENTRY",
    Breakfast => "BREAKFAST",
    Lunch => "LUNCH",
    Dinner => "DINNER",
});

/// 二维码状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenState {
    Active,
    Consumed,
    Expired,
}

wire_enum_str!(TokenState, "token state", {
    Active => "ACTIVE",
    Consumed => "CONSUMED",
    Expired => "EXPIRED",
});

/// 用户角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    Student,
    Admin,
    Judge,
    Scanner,
}

wire_enum_str!(Role, "role", {
    Student => "STUDENT",
    Admin => "ADMIN",
    Judge => "JUDGE",
    Scanner => "SCANNER",
});

/// 实名审核状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerificationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

wire_enum_str!(VerificationStatus, "verification status", {
    Pending => "PENDING",
    Approved => "APPROVED",
    Rejected => "REJECTED",
});

/// 签发二维码请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueTokenRequest {
    pub user_id: i32,
    pub hackathon_id: i32,
    pub purpose: Purpose,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
}

/// 二维码信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenItem {
    pub token: String,
    pub user_id: i32,
    pub hackathon_id: i32,
    pub purpose: Purpose,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    pub status: TokenState,
}

/// 扫码请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRequest {
    pub token: String,
    pub scanner_id: i32,
}

/// 扫码结果；被拒绝的扫码同样是正常返回，success 为 false
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub success: bool,
    pub message: String,
    pub purpose: Purpose,
}

/// 单条扫码审计记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanLogItem {
    pub id: i32,
    pub scanner_id: i32,
    pub scanned_at: DateTime<Utc>,
    pub success: bool,
    pub message: String,
}

/// 扫码统计。by_purpose 只包含成功次数大于零的用途
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanAnalytics {
    pub total_scans: u64,
    pub successful_scans: u64,
    pub by_purpose: BTreeMap<Purpose, u64>,
}

impl ScanAnalytics {
    pub fn successful_for(&self, purpose: Purpose) -> u64 {
        self.by_purpose.get(&purpose).copied().unwrap_or(0)
    }
}

/// 统计查询参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsQuery {
    pub hackathon_id: i32,
}

/// 用户注册请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub role: Role,
}

/// 审核结果更新
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationUpdate {
    pub status: VerificationStatus,
}

/// 用户信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserItem {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub verification_status: VerificationStatus,
    pub created_at: DateTime<Utc>,
}

/// API 响应结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: "ok".to_string(),
            data,
        }
    }
}

/// 错误响应结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
