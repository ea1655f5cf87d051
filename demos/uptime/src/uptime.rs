//! The uptime service.
//!
//! Exposes the seconds since startup as a readable value and pushes every update to subscribed
//! peers.

use ble_utils::{
    att::{gatt_err, ErrorCode, Permissions},
    gatt::{
        CccHandler, CccValue, Characteristic, Indicate, IndicateHandler, Notify, Properties,
        Service, ValueHandler, ATTR_SIZE, CCC_ATTR_SIZE,
    },
    host::Host,
    uuid::Uuid128,
};
use log::{debug, info};
use std::cell::Cell;

/// Base UUID of the service. Characteristic UUIDs are derived from it.
pub const SERVICE_UUID: Uuid128 =
    Uuid128::from_fields(0xABCD0000, 0x1234, 0x5678, 0x9ABC, 0xDEF012345678);
pub const BASIC_UUID: Uuid128 = SERVICE_UUID.derive(0x0001);
pub const NOTIFY_UUID: Uuid128 = SERVICE_UUID.derive(0x0002);
pub const INDICATE_UUID: Uuid128 = SERVICE_UUID.derive(0x0003);

/// Service declaration plus one plain and two subscribable characteristics.
pub const ATTR_COUNT: usize = 1 + ATTR_SIZE + 2 * CCC_ATTR_SIZE;

pub type UptimeService<'a> = Service<'a, ATTR_COUNT>;

/// Readable uptime value.
#[derive(Default)]
pub struct Uptime {
    seconds: Cell<u32>,
}

impl Uptime {
    fn update(&self, seconds: u32) {
        self.seconds.set(seconds);
    }
}

impl ValueHandler for Uptime {
    fn read_cb(&self, buf: &mut [u8]) -> isize {
        let bytes = self.seconds.get().to_le_bytes();
        if buf.len() < bytes.len() {
            return gatt_err(ErrorCode::InvalidAttributeValueLength);
        }
        buf[..bytes.len()].copy_from_slice(&bytes);
        bytes.len() as isize
    }
}

pub struct NotifyLogger;

impl ValueHandler for NotifyLogger {}

impl CccHandler for NotifyLogger {
    fn ccc_changed(&self, value: CccValue) {
        info!("Characteristic Notify Uptime CCC changed {:?}", value);
    }
}

pub struct IndicateLogger;

impl ValueHandler for IndicateLogger {}

impl CccHandler for IndicateLogger {
    fn ccc_changed(&self, value: CccValue) {
        info!("Characteristic Indicate Uptime CCC changed {:?}", value);
    }
}

impl IndicateHandler for IndicateLogger {
    fn indicate_rsp(&self) {
        info!("Characteristic Indicate Uptime Completed");
    }
}

/// The characteristics of the uptime service.
///
/// They live outside of the [`UptimeService`] that refers to them, so that the service can borrow
/// them for as long as it is published.
pub struct Characteristics {
    basic: Characteristic<Uptime>,
    notify: Characteristic<NotifyLogger, Notify>,
    indicate: Characteristic<IndicateLogger, Indicate>,
}

impl Characteristics {
    pub fn new() -> Self {
        Self {
            basic: Characteristic::new(
                BASIC_UUID,
                Properties::READ,
                Permissions::READ,
                Uptime::default(),
            ),
            notify: Characteristic::notify_only(NOTIFY_UUID, NotifyLogger),
            indicate: Characteristic::indicate_only(INDICATE_UUID, IndicateLogger),
        }
    }

    /// Composes the service table from the characteristics.
    pub fn service(&self) -> UptimeService<'_> {
        let mut service = Service::new(SERVICE_UUID);
        service.register_char(&self.basic);
        service.register_char(&self.notify);
        service.register_char(&self.indicate);
        service
    }

    /// Stores the new uptime and pushes it to subscribers.
    pub fn update<'a, H: Host<'a>>(&'a self, host: &mut H, seconds: u32) {
        self.basic.handler().update(seconds);

        let data = seconds.to_le_bytes();
        let ret = self.notify.notify(host, &data);
        if ret < 0 {
            debug!("uptime not notified: {}", ret);
        }

        if self.indicate.indication_pending() {
            debug!("previous indication still in flight, skipping");
            return;
        }
        let ret = self.indicate.indicate(host, &data);
        if ret < 0 {
            debug!("uptime not indicated: {}", ret);
        }
    }
}
