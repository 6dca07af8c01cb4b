//! 二维码生命周期：签发、扫码核销、统计。

pub(crate) mod analytics;
pub(crate) mod gate;
pub(crate) mod issuer;
pub(crate) mod lifecycle;
pub(crate) mod validator;
