//! Entry points the host calls when a peer accesses an attribute.
//!
//! The host only ever sees [`Attribute`]s. These free functions look at the attribute's [`Access`]
//! to find out what backs it, and route the access to the owning characteristic through the
//! type-erased [`Dispatch`] interface.
//!
//! Return values follow the host's callback convention: a non-negative number of bytes on
//! success, or a negative ATT error produced by [`gatt_err`]. Values returned by application
//! callbacks are passed through untouched.
//!
//! [`Attribute`]: ../struct.Attribute.html
//! [`Access`]: ../enum.Access.html
//! [`Dispatch`]: trait.Dispatch.html
//! [`gatt_err`]: ../../att/fn.gatt_err.html

use super::{
    attribute::{Access, Attribute, Declaration},
    ccc::{CccRecord, CccValue},
};
use crate::{
    att::{gatt_err, AttHandle, ErrorCode},
    bytes::{self, ByteWriter, ToBytes},
    host::Indication,
    uuid::UUID128_SIZE,
    Error,
};
use core::cmp;

/// Largest value produced for a declaration: properties, value handle and a 128-bit UUID.
const MAX_DECL_VALUE: usize = 1 + 2 + UUID128_SIZE;

/// Type-erased view of a registered characteristic.
///
/// Implemented by every characteristic flavor; attributes keep a `&dyn Dispatch` back-reference
/// to their owner.
pub trait Dispatch {
    /// Reads the characteristic value into `buf`.
    fn read(&self, buf: &mut [u8]) -> isize;

    /// Writes `data` to the characteristic value.
    fn write(&self, data: &[u8]) -> isize;

    /// The CCC state, if the characteristic has a CCC descriptor.
    fn ccc(&self) -> Option<&CccRecord> {
        None
    }

    /// Called after the CCC value has changed.
    fn ccc_changed(&self, _value: CccValue) {}

    /// Called when an indication has been confirmed by the peer or has failed.
    fn indicate_complete(&self) {}
}

/// Reads the value of `attr`, starting at `offset`, into `buf`.
///
/// Declaration and CCC values are produced here and truncated to `buf`. Characteristic values are
/// read through the owner's `read_cb`, which is responsible for its own offset handling.
pub fn read(attr: &Attribute<'_>, buf: &mut [u8], offset: u16) -> isize {
    let mut scratch = [0; MAX_DECL_VALUE];
    let value = match attr.access() {
        Access::Value(owner) => return owner.read(buf),
        Access::Ccc(owner) => match owner.ccc() {
            Some(ccc) => return read_value(buf, offset, &ccc.raw().to_le_bytes()),
            None => return gatt_err(ErrorCode::UnlikelyError),
        },
        Access::Service(uuid) => bytes::encode(&uuid, &mut scratch),
        Access::Declaration(decl) => {
            let value = DeclarationValue {
                decl,
                value_handle: value_handle(attr, decl),
            };
            bytes::encode(&value, &mut scratch)
        }
    };

    match value {
        Ok(value) => read_value(buf, offset, value),
        Err(e) => {
            warn!("cannot encode {:?}: {}", attr, e);
            gatt_err(ErrorCode::UnlikelyError)
        }
    }
}

/// Writes `data` at `offset` to the value of `attr`.
pub fn write(attr: &Attribute<'_>, data: &[u8], offset: u16) -> isize {
    match attr.access() {
        Access::Value(owner) => owner.write(data),
        Access::Ccc(owner) => write_ccc(owner, data, offset),
        Access::Service(_) | Access::Declaration(_) => gatt_err(ErrorCode::WriteNotPermitted),
    }
}

/// Reports a CCC change for hosts that keep the per-peer configuration themselves.
///
/// `attr` must be a CCC attribute; other attributes are ignored.
pub fn ccc_changed(attr: &Attribute<'_>, raw: u16) {
    match attr.access() {
        Access::Ccc(owner) => {
            if let Some(ccc) = owner.ccc() {
                ccc.update(raw);
            }
            fire_ccc_changed(owner, raw);
        }
        _ => warn!("CCC change reported on non-CCC attribute {:?}", attr),
    }
}

/// Completes an indication previously handed to `Host::indicate`.
pub fn indicate_complete(indication: Indication<'_>) {
    trace!("indication on {:?} completed", indication.uuid());
    indication.params().finish();
    indication.owner().indicate_complete();
}

fn write_ccc(owner: &dyn Dispatch, data: &[u8], offset: u16) -> isize {
    let ccc = match owner.ccc() {
        Some(ccc) => ccc,
        None => return gatt_err(ErrorCode::UnlikelyError),
    };
    if offset != 0 {
        return gatt_err(ErrorCode::InvalidOffset);
    }
    let raw = match *data {
        [lo] => u16::from(lo),
        [lo, hi] => u16::from_le_bytes([lo, hi]),
        _ => return gatt_err(ErrorCode::InvalidAttributeValueLength),
    };

    if ccc.update(raw) {
        fire_ccc_changed(owner, raw);
    }
    data.len() as isize
}

fn fire_ccc_changed(owner: &dyn Dispatch, raw: u16) {
    let value = CccValue::from_raw(raw);
    debug!("CCC changed to {:#06x} ({:?})", raw, value);
    owner.ccc_changed(value);
}

fn value_handle(attr: &Attribute<'_>, decl: &Declaration) -> AttHandle {
    if decl.value_handle().is_assigned() {
        decl.value_handle()
    } else if attr.handle().is_assigned() {
        attr.handle().next().unwrap_or(AttHandle::NULL)
    } else {
        AttHandle::NULL
    }
}

fn read_value(buf: &mut [u8], offset: u16, value: &[u8]) -> isize {
    let offset = usize::from(offset);
    if offset > value.len() {
        return gatt_err(ErrorCode::InvalidOffset);
    }
    let len = cmp::min(buf.len(), value.len() - offset);
    buf[..len].copy_from_slice(&value[offset..offset + len]);
    len as isize
}

/// Characteristic declaration value: properties, value handle, value UUID.
struct DeclarationValue<'a> {
    decl: &'a Declaration,
    value_handle: AttHandle,
}

impl ToBytes for DeclarationValue<'_> {
    fn to_bytes(&self, writer: &mut ByteWriter<'_>) -> Result<(), Error> {
        writer.write_u8(self.decl.properties().bits())?;
        self.value_handle.to_bytes(writer)?;
        self.decl.uuid().to_bytes(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        att::{AttHandle, Permissions},
        gatt::{CccHandler, Characteristic, Properties, ValueHandler, CCC_INDICATE, CCC_NOTIFY},
        uuid::{Uuid128, Uuid16},
    };
    use core::cell::Cell;

    const BASE: Uuid128 = Uuid128::from_fields(0xABCD0000, 0x1234, 0x5678, 0x9ABC, 0xDEF012345678);

    #[derive(Default)]
    struct Recorder {
        changes: Cell<usize>,
        last: Cell<Option<CccValue>>,
        written: Cell<usize>,
    }

    impl ValueHandler for Recorder {
        fn write_cb(&self, data: &[u8]) -> isize {
            self.written.set(data.len());
            data.len() as isize
        }
    }

    impl CccHandler for Recorder {
        fn ccc_changed(&self, value: CccValue) {
            self.changes.set(self.changes.get() + 1);
            self.last.set(Some(value));
        }
    }

    #[test]
    fn service_declaration() {
        let attr = Attribute::new(
            crate::att::PRIMARY_SERVICE_UUID16.into(),
            Permissions::READ,
            Access::Service(Uuid16(0x180F).into()),
        );
        let mut buf = [0; 4];
        assert_eq!(read(&attr, &mut buf, 0), 2);
        assert_eq!(&buf[..2], &[0x0F, 0x18]);
        assert_eq!(read(&attr, &mut buf, 1), 1);
        assert_eq!(buf[0], 0x18);
        assert_eq!(read(&attr, &mut buf, 2), 0);
        assert_eq!(read(&attr, &mut buf, 3), gatt_err(ErrorCode::InvalidOffset));
        assert_eq!(write(&attr, &[0], 0), gatt_err(ErrorCode::WriteNotPermitted));
    }

    #[test]
    fn characteristic_declaration() {
        let chrc = Characteristic::new(BASE.derive(1), Properties::READ, Permissions::READ, ());
        let attrs = chrc.attributes();
        let mut buf = [0; 32];

        // Unpublished: no value handle yet
        assert_eq!(read(&attrs[0], &mut buf, 0), 19);
        assert_eq!(&buf[..3], &[0x02, 0x00, 0x00]);
        assert_eq!(&buf[3..19], BASE.derive(1).as_bytes());

        attrs[0].set_handle(AttHandle::from_raw(0x0010));
        assert_eq!(read(&attrs[0], &mut buf, 0), 19);
        assert_eq!(&buf[..3], &[0x02, 0x11, 0x00]);

        // Truncated to the buffer, and continued with an offset
        assert_eq!(read(&attrs[0], &mut buf[..5], 0), 5);
        assert_eq!(read(&attrs[0], &mut buf, 5), 14);
        assert_eq!(&buf[..14], &BASE.derive(1).as_bytes()[2..]);

        assert_eq!(write(&attrs[0], &[1], 0), gatt_err(ErrorCode::WriteNotPermitted));
    }

    #[test]
    fn value_goes_to_handler() {
        let chrc = Characteristic::notify_only(BASE.derive(2), Recorder::default());
        let attrs = chrc.attributes();
        let mut buf = [0; 8];

        assert_eq!(read(&attrs[1], &mut buf, 0), 0);
        assert_eq!(write(&attrs[1], &[1, 2, 3], 0), 3);
        assert_eq!(chrc.handler().written.get(), 3);
    }

    #[test]
    fn ccc_write_and_read() {
        let chrc = Characteristic::notify_only(BASE.derive(2), Recorder::default());
        let attrs = chrc.attributes();
        let ccc = &attrs[2];
        let mut buf = [0; 4];

        assert_eq!(read(ccc, &mut buf, 0), 2);
        assert_eq!(&buf[..2], &[0, 0]);

        assert_eq!(write(ccc, &CCC_NOTIFY.to_le_bytes(), 0), 2);
        assert_eq!(chrc.handler().last.get(), Some(CccValue::Notify));
        assert_eq!(read(ccc, &mut buf, 0), 2);
        assert_eq!(&buf[..2], &[0x01, 0x00]);

        // Unchanged value does not fire the callback again
        assert_eq!(write(ccc, &[0x01], 0), 1);
        assert_eq!(chrc.handler().changes.get(), 1);

        assert_eq!(write(ccc, &[CCC_INDICATE as u8, 0], 0), 2);
        assert_eq!(chrc.handler().last.get(), Some(CccValue::Indicate));
        assert_eq!(write(ccc, &[0x03, 0x00], 0), 2);
        assert_eq!(chrc.handler().last.get(), Some(CccValue::NotApplicable));
        assert_eq!(write(ccc, &[0xFF, 0xFF], 0), 2);
        assert_eq!(chrc.handler().last.get(), Some(CccValue::NotApplicable));
        assert_eq!(write(ccc, &[0, 0], 0), 2);
        assert_eq!(chrc.handler().last.get(), Some(CccValue::Disabled));
        assert_eq!(chrc.handler().changes.get(), 5);
    }

    #[test]
    fn malformed_ccc_writes() {
        let chrc = Characteristic::notify_only(BASE.derive(2), Recorder::default());
        let attrs = chrc.attributes();
        let ccc = &attrs[2];

        assert_eq!(write(ccc, &[0x01, 0x00], 1), gatt_err(ErrorCode::InvalidOffset));
        assert_eq!(
            write(ccc, &[], 0),
            gatt_err(ErrorCode::InvalidAttributeValueLength)
        );
        assert_eq!(
            write(ccc, &[1, 0, 0], 0),
            gatt_err(ErrorCode::InvalidAttributeValueLength)
        );
        assert_eq!(chrc.handler().changes.get(), 0);
        assert_eq!(chrc.ccc_value(), Some(CccValue::Disabled));
    }

    #[test]
    fn externally_managed_ccc() {
        let chrc = Characteristic::notify_only(BASE.derive(2), Recorder::default());
        let attrs = chrc.attributes();

        ccc_changed(&attrs[2], CCC_NOTIFY);
        assert_eq!(chrc.handler().last.get(), Some(CccValue::Notify));
        assert_eq!(chrc.ccc_value(), Some(CccValue::Notify));

        // Non-CCC attributes are ignored
        ccc_changed(&attrs[1], CCC_INDICATE);
        assert_eq!(chrc.handler().changes.get(), 1);
    }
}
