//! Attribute handles.

use crate::{
    bytes::{ByteReader, ByteWriter, FromBytes, ToBytes},
    Error,
};
use core::fmt;

/// Position of an attribute in the host's ATT database.
///
/// The host hands these out when a service is published; before that, attributes hold `NULL`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AttHandle(u16);

impl AttHandle {
    /// The unassigned handle, `0x0000`.
    pub const NULL: Self = AttHandle(0);

    pub const fn from_raw(raw: u16) -> Self {
        AttHandle(raw)
    }

    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    pub fn is_assigned(&self) -> bool {
        self.0 != 0
    }

    /// The following handle. `None` past `0xFFFF`.
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(AttHandle)
    }
}

impl fmt::Debug for AttHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06X}", self.0)
    }
}

impl ToBytes for AttHandle {
    fn to_bytes(&self, writer: &mut ByteWriter<'_>) -> Result<(), Error> {
        writer.write_u16_le(self.0)
    }
}

impl FromBytes<'_> for AttHandle {
    fn from_bytes(bytes: &mut ByteReader<'_>) -> Result<Self, Error> {
        bytes.read_u16_le().map(AttHandle)
    }
}
