//! BLE UUIDs (16, 32 or 128 bits).
//!
//! Bluetooth assigns UUIDs to identify services and characteristics. Many common UUIDs can be
//! represented as 16- or 32-bit aliases of a full 128-bit UUID built on the Bluetooth Base UUID,
//! `00000000-0000-1000-8000-00805F9B34FB`.
//!
//! Vendor-specific services usually pick one random 128-bit *base* UUID and then number their
//! characteristics by overwriting a 16-bit field of that base. [`derive_uuid`] implements this
//! scheme:
//!
//! ```notrust
//! Base UUID    6E400000-B5A3-F393-E0A9-E50E24DCCA9E
//! Derived UUID 6E40xxxx-B5A3-F393-E0A9-E50E24DCCA9E
//! ```
//!
//! [`Uuid128`] stores its bytes in little-endian (over-the-air) order, so the replaced field is at
//! byte index 12 (low byte) and 13 (high byte).
//!
//! [`derive_uuid`]: fn.derive_uuid.html
//! [`Uuid128`]: struct.Uuid128.html

use crate::{bytes::*, Error};
use core::fmt;

/// Number of bytes in a full UUID.
pub const UUID128_SIZE: usize = 16;

/// Index of the high byte of the 16-bit field replaced by `derive_uuid`.
const SHORT_MSB: usize = UUID128_SIZE - 3;
/// Index of the low byte of the 16-bit field replaced by `derive_uuid`.
const SHORT_LSB: usize = UUID128_SIZE - 4;

/// The Bluetooth Base UUID in little-endian byte order. Aliases go into bytes 12..16.
const BASE_UUID: [u8; 16] = [
    0xFB, 0x34, 0x9B, 0x5F, 0x80, 0x00, /*-*/ 0x00, 0x80, /*-*/ 0x00, 0x10, /*-*/ 0x00, 0x00,
    /*-*/ 0x00, 0x00, 0x00, 0x00,
];

/// A 16-bit UUID alias.
///
/// Can be converted to its 32- and 128-bit equivalents via `.into()`.
#[derive(PartialEq, Eq, Copy, Clone)]
pub struct Uuid16(pub u16);

/// A 32-bit UUID alias.
///
/// Can be converted to its 128-bit equivalent via `.into()`.
#[derive(PartialEq, Eq, Copy, Clone)]
pub struct Uuid32(pub u32);

/// A full 128-bit UUID.
#[derive(PartialEq, Eq, Copy, Clone, Hash)]
pub struct Uuid128([u8; 16]);

impl Uuid128 {
    /// Creates a 128-bit UUID from 16 raw bytes in little-endian order.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Creates a 128-bit UUID from the fields of its textual form `w32-w1-w2-w3-w48`.
    ///
    /// Only the low 48 bits of `w48` are used.
    pub const fn from_fields(w32: u32, w1: u16, w2: u16, w3: u16, w48: u64) -> Self {
        let w48 = w48.to_le_bytes();
        let w3 = w3.to_le_bytes();
        let w2 = w2.to_le_bytes();
        let w1 = w1.to_le_bytes();
        let w32 = w32.to_le_bytes();
        Self([
            w48[0], w48[1], w48[2], w48[3], w48[4], w48[5], w3[0], w3[1], w2[0], w2[1], w1[0],
            w1[1], w32[0], w32[1], w32[2], w32[3],
        ])
    }

    /// Returns the raw bytes of this UUID in little-endian order.
    ///
    /// This is the layout expected in advertising data.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Returns a copy of `self` with the 16-bit short field replaced by `short`.
    pub const fn derive(self, short: u16) -> Self {
        derive_uuid(self, short)
    }
}

/// Creates a UUID derived from a 128-bit `base` by replacing its 16-bit short field.
///
/// All bytes except index 12 and 13 are copied from `base` unchanged.
pub const fn derive_uuid(base: Uuid128, short: u16) -> Uuid128 {
    let mut bytes = base.0;
    bytes[SHORT_MSB] = (short >> 8) as u8;
    bytes[SHORT_LSB] = (short & 0xFF) as u8;
    Uuid128(bytes)
}

impl From<Uuid16> for Uuid32 {
    fn from(smol: Uuid16) -> Self {
        Uuid32(smol.0.into())
    }
}

impl From<Uuid16> for Uuid128 {
    fn from(uuid: Uuid16) -> Self {
        Uuid32::from(uuid).into()
    }
}

impl From<Uuid32> for Uuid128 {
    fn from(uuid: Uuid32) -> Self {
        let mut buf = BASE_UUID;
        buf[12..].copy_from_slice(&uuid.0.to_le_bytes());
        Uuid128(buf)
    }
}

impl From<::uuid::Uuid> for Uuid128 {
    fn from(uuid: ::uuid::Uuid) -> Self {
        let mut bytes = *uuid.as_bytes();
        bytes.reverse();
        Uuid128(bytes)
    }
}

impl From<Uuid128> for ::uuid::Uuid {
    fn from(uuid: Uuid128) -> Self {
        let mut bytes = uuid.0;
        bytes.reverse();
        ::uuid::Uuid::from_bytes(bytes)
    }
}

impl ToBytes for Uuid16 {
    fn to_bytes(&self, buffer: &mut ByteWriter<'_>) -> Result<(), Error> {
        buffer.write_u16_le(self.0)
    }
}

impl ToBytes for Uuid128 {
    fn to_bytes(&self, buffer: &mut ByteWriter<'_>) -> Result<(), Error> {
        buffer.write_slice(&self.0)
    }
}

impl FromBytes<'_> for Uuid16 {
    fn from_bytes(bytes: &mut ByteReader<'_>) -> Result<Self, Error> {
        Ok(Uuid16(bytes.read_u16_le()?))
    }
}

impl FromBytes<'_> for Uuid128 {
    fn from_bytes(bytes: &mut ByteReader<'_>) -> Result<Self, Error> {
        Ok(Uuid128(bytes.read_array()?))
    }
}

impl fmt::Debug for Uuid16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uuid16({:04x})", self.0)
    }
}

impl fmt::Debug for Uuid32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uuid32({:08x})", self.0)
    }
}

impl fmt::Debug for Uuid128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [_0, _1, _2, _3, _4, _5, _6, _7, _8, _9, _10, _11, _12, _13, _14, _15] = self.0;
        let a = u32::from_le_bytes([_12, _13, _14, _15]);
        let b = u16::from_le_bytes([_10, _11]);
        let c = u16::from_le_bytes([_8, _9]);
        let d = u16::from_le_bytes([_6, _7]);
        let e = u64::from_le_bytes([_0, _1, _2, _3, _4, _5, 0, 0]);
        write!(f, "{:08x}-{:04x}-{:04x}-{:04x}-{:012x}", a, b, c, d, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: Uuid128 = Uuid128::from_fields(0xABCD0000, 0x1234, 0x5678, 0x9ABC, 0xDEF012345678);

    #[test]
    fn from_fields_layout() {
        assert_eq!(
            BASE.as_bytes(),
            &[
                0x78, 0x56, 0x34, 0x12, 0xF0, 0xDE, 0xBC, 0x9A, 0x78, 0x56, 0x34, 0x12, 0x00, 0x00,
                0xCD, 0xAB
            ]
        );
        assert_eq!(
            format!("{:?}", BASE),
            "abcd0000-1234-5678-9abc-def012345678"
        );
    }

    #[test]
    fn derive_touches_only_short_field() {
        let derived = derive_uuid(BASE, 0xBEEF);
        assert_eq!(format!("{:?}", derived), "abcdbeef-1234-5678-9abc-def012345678");
        for (i, (a, b)) in BASE.as_bytes().iter().zip(derived.as_bytes()).enumerate() {
            if i == 12 || i == 13 {
                continue;
            }
            assert_eq!(a, b, "byte {} changed", i);
        }
        assert_eq!(derived.as_bytes()[12], 0xEF);
        assert_eq!(derived.as_bytes()[13], 0xBE);
    }

    #[test]
    fn derive_is_deterministic_and_pure() {
        let base = BASE;
        let a = base.derive(0x0001);
        let b = base.derive(0x0001);
        assert_eq!(a, b);
        assert_eq!(base, BASE);
    }

    #[test]
    fn distinct_shorts_do_not_collide() {
        let one = derive_uuid(BASE, 0x0001);
        let two = derive_uuid(BASE, 0x0002);
        assert_ne!(one, two);
        let differing = one
            .as_bytes()
            .iter()
            .zip(two.as_bytes())
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(i, _)| i)
            .collect::<Vec<_>>();
        // 0x0001 and 0x0002 only differ in their low byte
        assert_eq!(differing, vec![12]);
        assert_eq!(one.as_bytes()[13], two.as_bytes()[13]);
    }

    #[test]
    fn alias_widening() {
        let uuid: Uuid128 = Uuid16(0x2902).into();
        assert_eq!(format!("{:?}", uuid), "00002902-0000-1000-8000-00805f9b34fb");
    }

    #[test]
    fn uuid_crate_interop() {
        let parsed = ::uuid::Uuid::parse_str("abcd0000-1234-5678-9abc-def012345678").unwrap();
        assert_eq!(Uuid128::from(parsed), BASE);
        assert_eq!(::uuid::Uuid::from(BASE), parsed);
    }
}
