//! Build-time configuration.
//!
//! Table sizes are fixed at compile time. The constants here are the defaults of the const generic
//! capacity parameters of [`Service`] and [`ScanResponse`]; pick a different capacity per instance by
//! naming it in the type, eg. `Service<'_, 32>`.
//!
//! [`Service`]: ../gatt/struct.Service.html
//! [`ScanResponse`]: ../adv/struct.ScanResponse.html

/// Default maximum number of attributes in one service, including the service declaration.
pub const MAX_ATTR: usize = 16;

/// Default maximum number of service UUIDs carried in a scan response.
pub const MAX_SCAN_RSP_SERVICES: usize = 5;

/// Number of attributes a service needs for its own declaration.
pub const SVC_ATTR_SIZE: usize = 1;
