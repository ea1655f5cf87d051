use crate::{
    bytes::{ByteReader, ByteWriter, FromBytes, ToBytes},
    uuid::{Uuid128, Uuid16, Uuid32, UUID128_SIZE},
    Error,
};
use core::fmt;

/// Attribute type: a 16-bit alias or a full 128-bit UUID.
///
/// ATT has no 32-bit form; `Uuid32` values are widened to 128 bits on conversion. Comparisons
/// see through aliases, so `Uuid16(0x2902)` equals its widened 128-bit form.
#[derive(Copy, Clone, Eq)]
pub enum AttUuid {
    Uuid16(Uuid16),
    Uuid128(Uuid128),
}

impl AttUuid {
    /// Number of bytes this UUID occupies in an attribute value.
    pub fn encoded_len(&self) -> usize {
        match self {
            AttUuid::Uuid16(_) => 2,
            AttUuid::Uuid128(_) => UUID128_SIZE,
        }
    }
}

/// Takes the rest of the input, which must be exactly 2 or 16 bytes.
impl FromBytes<'_> for AttUuid {
    fn from_bytes(bytes: &mut ByteReader<'_>) -> Result<Self, Error> {
        if bytes.bytes_left() == 2 {
            <Uuid16 as FromBytes<'_>>::from_bytes(bytes).map(AttUuid::Uuid16)
        } else if bytes.bytes_left() == UUID128_SIZE {
            <Uuid128 as FromBytes<'_>>::from_bytes(bytes).map(AttUuid::Uuid128)
        } else {
            Err(Error::InvalidLength)
        }
    }
}

impl ToBytes for AttUuid {
    fn to_bytes(&self, writer: &mut ByteWriter<'_>) -> Result<(), Error> {
        match self {
            AttUuid::Uuid16(short) => short.to_bytes(writer),
            AttUuid::Uuid128(full) => full.to_bytes(writer),
        }
    }
}

impl PartialEq for AttUuid {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (AttUuid::Uuid16(a), AttUuid::Uuid16(b)) => a == b,
            (a, b) => Uuid128::from(a) == Uuid128::from(b),
        }
    }
}

impl PartialEq<Uuid16> for AttUuid {
    fn eq(&self, other: &Uuid16) -> bool {
        *self == AttUuid::Uuid16(*other)
    }
}

impl PartialEq<Uuid128> for AttUuid {
    fn eq(&self, other: &Uuid128) -> bool {
        *self == AttUuid::Uuid128(*other)
    }
}

impl From<Uuid16> for AttUuid {
    fn from(short: Uuid16) -> Self {
        AttUuid::Uuid16(short)
    }
}

impl From<Uuid32> for AttUuid {
    fn from(alias: Uuid32) -> Self {
        AttUuid::Uuid128(alias.into())
    }
}

impl From<Uuid128> for AttUuid {
    fn from(full: Uuid128) -> Self {
        AttUuid::Uuid128(full)
    }
}

impl From<AttUuid> for Uuid128 {
    fn from(uuid: AttUuid) -> Self {
        match uuid {
            AttUuid::Uuid16(short) => short.into(),
            AttUuid::Uuid128(full) => full,
        }
    }
}

impl fmt::Debug for AttUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttUuid::Uuid16(short) => fmt::Debug::fmt(short, f),
            AttUuid::Uuid128(full) => fmt::Debug::fmt(full, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_by_length() {
        let mut short = ByteReader::new(&[0x02, 0x29]);
        assert_eq!(AttUuid::from_bytes(&mut short), Ok(AttUuid::Uuid16(Uuid16(0x2902))));

        let raw = [0xAB; 16];
        let mut full = ByteReader::new(&raw);
        assert_eq!(
            AttUuid::from_bytes(&mut full),
            Ok(AttUuid::Uuid128(Uuid128::from_bytes(raw)))
        );

        let mut odd = ByteReader::new(&[1, 2, 3]);
        assert_eq!(AttUuid::from_bytes(&mut odd), Err(Error::InvalidLength));
        assert_eq!(odd.bytes_left(), 3);
    }

    #[test]
    fn encoded_len() {
        assert_eq!(AttUuid::from(Uuid16(0x2800)).encoded_len(), 2);
        assert_eq!(AttUuid::from(Uuid32(0x2800)).encoded_len(), 16);
    }
}
