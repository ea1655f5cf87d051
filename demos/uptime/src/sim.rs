//! A simulated host stack with a single connected peer.
//!
//! Publishes attribute tables by numbering them consecutively, tracks the peer's subscriptions
//! through the CCC descriptors in the table and prints whatever would go over the air.

use ble_utils::{
    att::{att_error, AttHandle, AttUuid, CCC_UUID16},
    bytes::{ByteReader, FromBytes},
    gatt::{dispatch, Access, Attribute, CccRecord, Properties},
    host::{Host, Indication},
};
use log::{debug, info, warn};
use std::cmp;

/// No published value attribute has the requested UUID.
pub const ENOENT: i32 = 2;
/// The peer has not subscribed.
pub const ENOTCONN: i32 = 128;
/// An indication is already waiting for confirmation.
pub const EBUSY: i32 = 16;

pub struct SimHost<'a> {
    services: Vec<&'a [Attribute<'a>]>,
    next_handle: u16,
    pending: Option<Indication<'a>>,
}

impl<'a> SimHost<'a> {
    pub fn new() -> Self {
        Self {
            services: Vec::new(),
            next_handle: 1,
            pending: None,
        }
    }

    fn attributes(&self) -> impl Iterator<Item = &'a Attribute<'a>> + '_ {
        self.services.iter().flat_map(|&attrs| attrs.iter())
    }

    fn value(&self, uuid: &AttUuid) -> Option<&'a Attribute<'a>> {
        self.attributes()
            .find(|attr| matches!(attr.access(), Access::Value(_)) && attr.uuid() == *uuid)
    }

    /// The CCC descriptor following the value attribute with type `uuid`.
    fn ccc(&self, uuid: &AttUuid) -> Option<&'a Attribute<'a>> {
        let value = self.value(uuid)?.handle();
        let next = value.next()?;
        self.attributes()
            .find(|attr| attr.handle() == next && attr.uuid() == CCC_UUID16)
    }

    fn subscribed(&self, uuid: &AttUuid, enabled: fn(&CccRecord) -> bool) -> Result<(), i32> {
        let record = match self.ccc(uuid).map(Attribute::access) {
            Some(Access::Ccc(owner)) => owner.ccc(),
            _ => None,
        };
        match record {
            Some(record) if enabled(record) => Ok(()),
            Some(_) => Err(-ENOTCONN),
            None => Err(-ENOENT),
        }
    }

    /// Simulates the peer writing `raw` to the CCC descriptor of `uuid`.
    pub fn peer_subscribe(&self, uuid: impl Into<AttUuid>, raw: u16) {
        let uuid = uuid.into();
        match self.ccc(&uuid) {
            Some(ccc) => {
                let ret = dispatch::write(ccc, &raw.to_le_bytes(), 0);
                info!("peer wrote {:#06x} to CCC of {:?} -> {}", raw, uuid, ret);
            }
            None => warn!("peer cannot subscribe to {:?}: no CCC", uuid),
        }
    }

    /// Simulates the peer reading the value of `uuid`.
    pub fn peer_read(&self, uuid: impl Into<AttUuid>) {
        let uuid = uuid.into();
        let attr = match self.value(&uuid) {
            Some(attr) => attr,
            None => {
                warn!("peer cannot read {:?}: not published", uuid);
                return;
            }
        };

        let mut buf = [0; 23];
        let ret = dispatch::read(attr, &mut buf, 0);
        if ret < 0 {
            match att_error(ret) {
                Some(code) => info!("peer read {:?}: error {:?}", uuid, code),
                None => info!("peer read {:?}: failed ({})", uuid, ret),
            }
            return;
        }
        let len = cmp::min(ret as usize, buf.len());
        info!("peer read {:?}: {:02x?}", uuid, &buf[..len]);
    }

    /// Simulates the peer confirming the pending indication.
    pub fn peer_confirm(&mut self) {
        if let Some(indication) = self.pending.take() {
            debug!("peer confirmed {:?}", indication);
            indication.complete();
        }
    }

    fn log_attribute(&self, attr: &Attribute<'_>) {
        if let Access::Declaration(_) = attr.access() {
            let mut buf = [0; 19];
            let ret = dispatch::read(attr, &mut buf, 0);
            if ret > 0 {
                let mut bytes = ByteReader::new(&buf[..ret as usize]);
                let decoded = bytes.read_u8().and_then(|props| {
                    let handle = AttHandle::from_bytes(&mut bytes)?;
                    let uuid = AttUuid::from_bytes(&mut bytes)?;
                    Ok((Properties::from_bits_truncate(props), handle, uuid))
                });
                if let Ok((props, handle, uuid)) = decoded {
                    info!(
                        "{:?} characteristic {:?} -> {:?} {:?}",
                        attr.handle(),
                        uuid,
                        handle,
                        props
                    );
                    return;
                }
            }
        }
        info!(
            "{:?} {:?} {:?}",
            attr.handle(),
            attr.uuid(),
            attr.permissions()
        );
    }
}

impl<'a> Host<'a> for SimHost<'a> {
    fn register_service(&mut self, attrs: &'a [Attribute<'a>]) -> i32 {
        for attr in attrs {
            attr.set_handle(AttHandle::from_raw(self.next_handle));
            self.next_handle += 1;
            self.log_attribute(attr);
        }
        self.services.push(attrs);
        0
    }

    fn notify(&mut self, uuid: &AttUuid, data: &[u8]) -> i32 {
        if let Err(e) = self.subscribed(uuid, CccRecord::notify_enabled) {
            return e;
        }
        info!("notification {:?}: {:02x?}", uuid, data);
        0
    }

    fn indicate(&mut self, indication: Indication<'a>, data: &[u8]) -> i32 {
        if self.pending.is_some() {
            return -EBUSY;
        }
        if let Err(e) = self.subscribed(&indication.uuid(), CccRecord::indicate_enabled) {
            return e;
        }
        info!("indication {:?}: {:02x?}", indication.uuid(), data);
        self.pending = Some(indication);
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uptime::{Characteristics, BASIC_UUID, INDICATE_UUID, NOTIFY_UUID};
    use crate::uptime::SERVICE_UUID;
    use ble_utils::{
        att::Permissions,
        gatt::{Characteristic, Service, ValueHandler, CCC_INDICATE, CCC_NOTIFY},
    };

    /// Reports a fixed result from every read.
    struct Fixed(isize);

    impl ValueHandler for Fixed {
        fn read_cb(&self, _buf: &mut [u8]) -> isize {
            self.0
        }
    }

    #[test]
    fn subscriptions_gate_pushes() {
        let characteristics = Characteristics::new();
        let service = characteristics.service();
        let mut host = SimHost::new();
        assert_eq!(service.init(&mut host), 0);

        assert_eq!(host.notify(&BASIC_UUID.into(), &[1]), -ENOENT);
        assert_eq!(host.notify(&NOTIFY_UUID.into(), &[1]), -ENOTCONN);
        host.peer_subscribe(NOTIFY_UUID, CCC_NOTIFY);
        assert_eq!(host.notify(&NOTIFY_UUID.into(), &[1]), 0);
        assert_eq!(host.notify(&INDICATE_UUID.into(), &[1]), -ENOTCONN);

        characteristics.update(&mut host, 7);
        assert!(host.pending.is_none());

        host.peer_subscribe(INDICATE_UUID, CCC_INDICATE);
        characteristics.update(&mut host, 8);
        assert_eq!(host.pending.as_ref().map(|ind| ind.uuid()), Some(INDICATE_UUID.into()));

        // Skipped while the previous indication is unconfirmed
        characteristics.update(&mut host, 9);
        host.peer_confirm();
        assert!(host.pending.is_none());
    }

    #[test]
    fn out_of_range_read_results_are_tolerated() {
        let oversized = Characteristic::new(
            SERVICE_UUID.derive(0x10),
            Properties::READ,
            Permissions::READ,
            Fixed(100),
        );
        let unknown_error = Characteristic::new(
            SERVICE_UUID.derive(0x11),
            Properties::READ,
            Permissions::READ,
            Fixed(-300),
        );

        let mut service: Service<'_, 5> = Service::new(SERVICE_UUID);
        service.register_char(&oversized);
        service.register_char(&unknown_error);
        let mut host = SimHost::new();
        assert_eq!(service.init(&mut host), 0);

        host.peer_read(SERVICE_UUID.derive(0x10));
        host.peer_read(SERVICE_UUID.derive(0x11));
    }
}
