//! Attribute descriptors handed to the host.

use super::{characteristic::Properties, dispatch::Dispatch};
use crate::att::{AttHandle, AttUuid, Permissions};
use core::{cell::Cell, fmt};

/// Value backing a characteristic declaration attribute.
///
/// Owned by the characteristic and referenced from its declaration attribute, so it lives exactly
/// as long as the characteristic does.
#[derive(Debug, Copy, Clone)]
pub struct Declaration {
    pub(crate) uuid: AttUuid,
    pub(crate) value_handle: AttHandle,
    pub(crate) properties: Properties,
}

impl Declaration {
    /// UUID of the characteristic value.
    pub fn uuid(&self) -> AttUuid {
        self.uuid
    }

    /// Value handle recorded in the declaration.
    ///
    /// This is a placeholder that stays `NULL`; the host places the value attribute directly after
    /// the declaration, so its handle is the declaration's handle plus one.
    pub fn value_handle(&self) -> AttHandle {
        self.value_handle
    }

    pub fn properties(&self) -> Properties {
        self.properties
    }
}

/// Where the host should route accesses to an attribute.
#[derive(Copy, Clone)]
pub enum Access<'a> {
    /// Primary service declaration; its value is the service UUID.
    Service(AttUuid),
    /// Characteristic declaration; its value is encoded from the referenced record.
    Declaration(&'a Declaration),
    /// Characteristic value, read and written through the owning characteristic's callbacks.
    Value(&'a dyn Dispatch),
    /// CCC descriptor of the owning characteristic.
    Ccc(&'a dyn Dispatch),
}

impl PartialEq for Access<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Access::Service(a), Access::Service(b)) => a == b,
            (Access::Declaration(a), Access::Declaration(b)) => core::ptr::eq(*a, *b),
            (Access::Value(a), Access::Value(b)) | (Access::Ccc(a), Access::Ccc(b)) => {
                same_owner(*a, *b)
            }
            _ => false,
        }
    }
}

/// Compares the data pointers only; vtable pointers are not guaranteed to be unique.
fn same_owner(a: &dyn Dispatch, b: &dyn Dispatch) -> bool {
    a as *const _ as *const () == b as *const _ as *const ()
}

impl fmt::Debug for Access<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Service(uuid) => f.debug_tuple("Service").field(uuid).finish(),
            Access::Declaration(decl) => f.debug_tuple("Declaration").field(decl).finish(),
            Access::Value(owner) => write!(f, "Value({:p})", *owner),
            Access::Ccc(owner) => write!(f, "Ccc({:p})", *owner),
        }
    }
}

/// One slot of a GATT attribute table.
///
/// Attributes are plain values: registering a characteristic copies its attributes into the
/// service table. The only state that changes afterwards is the handle, which the host writes
/// when it publishes the table.
#[derive(Clone, PartialEq)]
pub struct Attribute<'a> {
    uuid: AttUuid,
    permissions: Permissions,
    access: Access<'a>,
    handle: Cell<AttHandle>,
}

impl<'a> Attribute<'a> {
    pub(crate) fn new(uuid: AttUuid, permissions: Permissions, access: Access<'a>) -> Self {
        Self {
            uuid,
            permissions,
            access,
            handle: Cell::new(AttHandle::NULL),
        }
    }

    /// The attribute type.
    pub fn uuid(&self) -> AttUuid {
        self.uuid
    }

    pub fn permissions(&self) -> Permissions {
        self.permissions
    }

    pub fn access(&self) -> Access<'a> {
        self.access
    }

    /// The handle assigned by the host, or `AttHandle::NULL` before publication.
    pub fn handle(&self) -> AttHandle {
        self.handle.get()
    }

    /// Records the handle the host assigned to this attribute.
    ///
    /// Only the host calls this, once, while publishing the table.
    pub fn set_handle(&self, handle: AttHandle) {
        self.handle.set(handle);
    }
}

impl fmt::Debug for Attribute<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("handle", &self.handle())
            .field("uuid", &self.uuid)
            .field("permissions", &self.permissions)
            .field("access", &self.access)
            .finish()
    }
}
