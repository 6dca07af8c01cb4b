pub use hackqr_core::{
    AnalyticsQuery, ApiResponse, ErrorBody, IssueTokenRequest, Purpose, RegisterUserRequest, Role,
    ScanAnalytics, ScanLogItem, ScanRequest, ScanResult, TokenItem, TokenState, UserItem,
    VerificationStatus, VerificationUpdate,
};
