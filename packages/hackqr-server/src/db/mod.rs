pub(crate) mod qr_tokens;
pub(crate) mod scan_logs;
pub(crate) mod users;
pub(crate) mod token_ops;
pub(crate) mod initialize;
pub(crate) mod migration;

pub(crate) use qr_tokens::Entity as QrTokens;
pub(crate) use scan_logs::Entity as ScanLogs;
pub(crate) use users::Entity as Users;
