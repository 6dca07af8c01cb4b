pub(crate) mod admin;
pub(crate) mod index;
pub(crate) mod monitor;
pub(crate) mod qr;
pub(crate) mod scan;
pub(crate) mod users;
