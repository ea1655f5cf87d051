//! Advertising and scan response data.
//!
//! A peripheral makes its services discoverable by listing their UUIDs in the scan response.
//! [`ScanResponse`] is an owned, fixed-capacity table of those UUIDs that the application fills
//! in while setting up its services and hands to the host when advertising starts.
//!
//! [`ScanResponse`]: struct.ScanResponse.html

use crate::{
    bytes::*,
    config::MAX_SCAN_RSP_SERVICES,
    uuid::{Uuid128, UUID128_SIZE},
    Error,
};
use bitflags::bitflags;
use core::slice;
use heapless::Vec;

/// Maximum payload of legacy advertising and scan response PDUs.
pub const LEGACY_PAYLOAD_LEN: usize = 31;

/// An AD structure, one length-prefixed element of advertising or scan response data.
#[derive(Debug, Copy, Clone)]
pub enum AdStructure<'a> {
    /// Device flags and baseband capabilities.
    ///
    /// Must not be used in scan response data.
    Flags(Flags),

    /// Complete list of 128-bit service UUIDs.
    ServiceUuids128(&'a [Uuid128]),

    /// The full device name.
    CompleteLocalName(&'a str),

    /// Any other AD structure, as raw bytes.
    Unknown {
        /// Type byte.
        ty: u8,
        /// Raw data transmitted after the type.
        data: &'a [u8],
    },
}

impl ToBytes for AdStructure<'_> {
    fn to_bytes(&self, buf: &mut ByteWriter<'_>) -> Result<(), Error> {
        // Length of the record goes first, but is only known after writing the rest
        let first = buf.split_next_mut().ok_or(Error::Eof)?;

        let left_before = buf.space_left();
        match self {
            AdStructure::Flags(flags) => {
                buf.write_u8(Type::FLAGS)?;
                buf.write_u8(flags.bits())?;
            }
            AdStructure::ServiceUuids128(uuids) => {
                buf.write_u8(Type::COMPLETE_LIST_OF_128BIT_SERVICE_UUIDS)?;
                uuids.to_bytes(buf)?;
            }
            AdStructure::CompleteLocalName(name) => {
                buf.write_u8(Type::COMPLETE_LOCAL_NAME)?;
                buf.write_slice(name.as_bytes())?;
            }
            AdStructure::Unknown { ty, data } => {
                buf.write_u8(*ty)?;
                buf.write_slice(data)?;
            }
        }
        let len = left_before - buf.space_left();
        if len > usize::from(u8::max_value()) {
            return Err(Error::InvalidLength);
        }

        *first = len as u8;
        Ok(())
    }
}

impl From<Flags> for AdStructure<'_> {
    fn from(flags: Flags) -> Self {
        AdStructure::Flags(flags)
    }
}

bitflags! {
    /// BR/EDR and LE compatibility flags.
    pub struct Flags: u8 {
        const LE_LIMITED_DISCOVERABLE = 0b00000001;
        const LE_GENERAL_DISCOVERABLE = 0b00000010;
        const BR_EDR_NOT_SUPPORTED    = 0b00000100;
    }
}

impl Flags {
    /// Flags of a connectable LE-only device in General Discoverable mode.
    pub fn discoverable() -> Flags {
        Self::BR_EDR_NOT_SUPPORTED | Self::LE_GENERAL_DISCOVERABLE
    }
}

/// Data Type constants.
enum Type {}

impl Type {
    const FLAGS: u8 = 0x01;
    const COMPLETE_LIST_OF_128BIT_SERVICE_UUIDS: u8 = 0x07;
    const COMPLETE_LOCAL_NAME: u8 = 0x09;
}

/// Service UUIDs announced in the scan response.
///
/// Holds up to `N` UUIDs, each sent as its own AD structure.
#[derive(Debug, Default)]
pub struct ScanResponse<const N: usize = MAX_SCAN_RSP_SERVICES> {
    uuids: Vec<Uuid128, N>,
}

impl<const N: usize> ScanResponse<N> {
    /// Encoded size of one announced service.
    pub const ENTRY_LEN: usize = 2 + UUID128_SIZE;

    pub const fn new() -> Self {
        Self { uuids: Vec::new() }
    }

    /// Adds a service UUID to the scan response.
    ///
    /// Returns `Error::CapacityExceeded` when `N` services are already registered.
    pub fn register_service(&mut self, uuid: Uuid128) -> Result<(), Error> {
        self.uuids.push(uuid).map_err(|_| {
            warn!("scan response full, dropping {:?}", uuid);
            Error::CapacityExceeded
        })?;
        debug!("scan response announces {:?}", uuid);
        Ok(())
    }

    pub fn uuids(&self) -> &[Uuid128] {
        &self.uuids
    }

    pub fn len(&self) -> usize {
        self.uuids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uuids.is_empty()
    }

    /// The AD structures to pass to the host, one per service.
    pub fn ad_structures(&self) -> impl Iterator<Item = AdStructure<'_>> + '_ {
        self.uuids
            .iter()
            .map(|uuid| AdStructure::ServiceUuids128(slice::from_ref(uuid)))
    }
}

impl<const N: usize> ToBytes for ScanResponse<N> {
    fn to_bytes(&self, writer: &mut ByteWriter<'_>) -> Result<(), Error> {
        for ad in self.ad_structures() {
            ad.to_bytes(writer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: Uuid128 = Uuid128::from_fields(0xABCD0000, 0x1234, 0x5678, 0x9ABC, 0xDEF012345678);

    #[test]
    fn flags() {
        let mut buf = [0; 3];
        let bytes = encode(&AdStructure::from(Flags::discoverable()), &mut buf).unwrap();
        assert_eq!(bytes, &[0x02, 0x01, 0x06]);
    }

    #[test]
    fn name_and_unknown() {
        let mut buf = [0; 16];
        let bytes = encode(&AdStructure::CompleteLocalName("uptime"), &mut buf).unwrap();
        assert_eq!(bytes, b"\x07\x09uptime");

        let unknown = AdStructure::Unknown {
            ty: 0xFF,
            data: &[0x59, 0x00],
        };
        let bytes = encode(&unknown, &mut buf).unwrap();
        assert_eq!(bytes, &[0x03, 0xFF, 0x59, 0x00]);
    }

    #[test]
    fn scan_response_capacity() {
        let mut rsp = ScanResponse::<2>::new();
        assert!(rsp.is_empty());
        assert_eq!(rsp.register_service(BASE), Ok(()));
        assert_eq!(rsp.register_service(BASE.derive(1)), Ok(()));
        assert_eq!(
            rsp.register_service(BASE.derive(2)),
            Err(Error::CapacityExceeded)
        );
        assert_eq!(rsp.uuids(), &[BASE, BASE.derive(1)]);
    }

    #[test]
    fn default_capacity() {
        let mut rsp: ScanResponse = ScanResponse::new();
        for short in 0..MAX_SCAN_RSP_SERVICES as u16 {
            rsp.register_service(BASE.derive(short)).unwrap();
        }
        assert_eq!(rsp.len(), MAX_SCAN_RSP_SERVICES);
        assert!(rsp.register_service(BASE).is_err());
    }

    #[test]
    fn one_structure_per_service() {
        let mut rsp = ScanResponse::<3>::new();
        rsp.register_service(BASE).unwrap();
        assert_eq!(rsp.ad_structures().count(), 1);

        let mut buf = [0; LEGACY_PAYLOAD_LEN];
        let bytes = encode(&rsp, &mut buf).unwrap();
        assert_eq!(bytes.len(), ScanResponse::<3>::ENTRY_LEN);
        assert_eq!(bytes[0], 17);
        assert_eq!(bytes[1], 0x07);
        assert_eq!(&bytes[2..], BASE.as_bytes());

        // A second 128-bit UUID no longer fits into a legacy PDU
        rsp.register_service(BASE.derive(1)).unwrap();
        assert_eq!(rsp.ad_structures().count(), 2);
        assert_eq!(encode(&rsp, &mut buf), Err(Error::Eof));

        let mut buf = [0; 2 * ScanResponse::<3>::ENTRY_LEN];
        let bytes = encode(&rsp, &mut buf).unwrap();
        assert_eq!(&bytes[20..], BASE.derive(1).as_bytes());
    }
}
