//! Attribute Protocol (ATT) vocabulary.
//!
//! The host stack's ATT server hosts a flat list of *Attributes*. Each one consists of:
//!
//! * A 16-bit *Attribute Handle* ([`AttHandle`]), assigned by the host when the table is
//!   published.
//! * A 16- or 128-bit UUID ([`AttUuid`]) identifying the attribute type.
//! * A value, which this crate produces on demand when the host asks for it.
//! * A set of [`Permissions`] restricting the operations a peer may perform.
//!
//! This module only defines the types shared with the host. The protocol itself (PDU parsing,
//! request dispatch, MTU handling) is the host's business.
//!
//! [`AttHandle`]: struct.AttHandle.html
//! [`AttUuid`]: enum.AttUuid.html
//! [`Permissions`]: struct.Permissions.html

mod handle;
mod uuid;

use crate::uuid::Uuid16;
use bitflags::bitflags;

pub use self::handle::AttHandle;
pub use self::uuid::AttUuid;

/// Attribute type of a primary service declaration.
pub const PRIMARY_SERVICE_UUID16: Uuid16 = Uuid16(0x2800);
/// Attribute type of a characteristic declaration.
pub const CHARACTERISTIC_UUID16: Uuid16 = Uuid16(0x2803);
/// Attribute type of a Client Characteristic Configuration descriptor.
pub const CCC_UUID16: Uuid16 = Uuid16(0x2902);

bitflags! {
    /// Access permissions of an attribute.
    ///
    /// The bit values match the permission field the host stack expects in its attribute table.
    pub struct Permissions: u16 {
        const READ = 0x0001;
        const WRITE = 0x0002;
        /// Reading requires an encrypted link.
        const READ_ENCRYPT = 0x0004;
        /// Writing requires an encrypted link.
        const WRITE_ENCRYPT = 0x0008;
        /// Reading requires an authenticated (MITM protected) link.
        const READ_AUTHEN = 0x0010;
        /// Writing requires an authenticated (MITM protected) link.
        const WRITE_AUTHEN = 0x0020;
        /// The attribute supports prepared (long) writes.
        const PREPARE_WRITE = 0x0040;
        /// Reading requires LE Secure Connections.
        const READ_LESC = 0x0080;
        /// Writing requires LE Secure Connections.
        const WRITE_LESC = 0x0100;
    }
}

enum_with_unknown! {
    /// Error codes of the Attribute Protocol.
    ///
    /// Read and write callbacks report these to the host through [`gatt_err`].
    ///
    /// [`gatt_err`]: fn.gatt_err.html
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub enum ErrorCode(u8) {
        /// Attempted to use an `AttHandle` that isn't valid on this server.
        InvalidHandle = 0x01,
        /// Attribute isn't readable.
        ReadNotPermitted = 0x02,
        /// Attribute isn't writable.
        WriteNotPermitted = 0x03,
        /// Attribute PDU is invalid.
        InvalidPdu = 0x04,
        /// Authentication needed before attribute can be read/written.
        InsufficientAuthentication = 0x05,
        /// Server doesn't support this operation.
        RequestNotSupported = 0x06,
        /// Offset was past the end of the attribute.
        InvalidOffset = 0x07,
        /// Authorization needed before attribute can be read/written.
        InsufficientAuthorization = 0x08,
        /// Too many "prepare write" requests have been queued.
        PrepareQueueFull = 0x09,
        /// No attribute found within the specified attribute handle range.
        AttributeNotFound = 0x0A,
        /// Attribute can't be read/written using *Read Key Blob* request.
        AttributeNotLong = 0x0B,
        /// The encryption key in use is too weak to access an attribute.
        InsufficientEncryptionKeySize = 0x0C,
        /// Attribute value has an incorrect length for the operation.
        InvalidAttributeValueLength = 0x0D,
        /// Request has encountered an "unlikely" error and could not be completed.
        UnlikelyError = 0x0E,
        /// Attribute cannot be read/written without an encrypted connection.
        InsufficientEncryption = 0x0F,
        /// Attribute type is an invalid grouping attribute according to a higher-layer profile.
        UnsupportedGroupType = 0x10,
        /// Server didn't have enough resources to complete a request.
        InsufficientResources = 0x11,
    }
}

/// Encodes an ATT error as the negative return value of a read or write callback.
pub fn gatt_err(code: ErrorCode) -> isize {
    -isize::from(u8::from(code))
}

/// Decodes a negative callback return value back into the ATT error it carries.
///
/// Returns `None` for non-negative values (byte counts) and values outside the `u8` range.
pub fn att_error(ret: isize) -> Option<ErrorCode> {
    if ret >= 0 {
        return None;
    }
    let code = ret.checked_neg()?;
    if code > isize::from(u8::max_value()) {
        None
    } else {
        Some(ErrorCode::from(code as u8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uuid::{Uuid128, Uuid32};

    #[test]
    fn gatt_err_round_trips_codes() {
        assert_eq!(gatt_err(ErrorCode::InvalidOffset), -7);
        assert_eq!(att_error(-7), Some(ErrorCode::InvalidOffset));
        assert_eq!(att_error(-0x80), Some(ErrorCode::Unknown(0x80)));
        assert_eq!(att_error(4), None);
        assert_eq!(att_error(0), None);
        assert_eq!(att_error(-300), None);
    }

    #[test]
    fn uuid_equality_across_widths() {
        let short = AttUuid::from(CCC_UUID16);
        let long = AttUuid::from(Uuid128::from(CCC_UUID16));
        assert_eq!(short, long);
        assert_eq!(long, CCC_UUID16);
        assert_eq!(AttUuid::from(Uuid32(0x2902)), short);
        assert_ne!(short, AttUuid::from(CHARACTERISTIC_UUID16));
    }

    #[test]
    fn handles() {
        assert!(!AttHandle::NULL.is_assigned());
        assert_eq!(AttHandle::from_raw(4).next(), Some(AttHandle::from_raw(5)));
        assert_eq!(AttHandle::from_raw(0xFFFF).next(), None);
        assert_eq!(format!("{:?}", AttHandle::from_raw(0x1A)), "0x001A");
    }
}
