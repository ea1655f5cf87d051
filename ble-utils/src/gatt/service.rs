//! Attribute table composition.

use super::{
    attribute::{Access, Attribute},
    characteristic::{Characteristic, Kind},
    dispatch::Dispatch,
};
use crate::{
    att::{AttUuid, Permissions, PRIMARY_SERVICE_UUID16},
    config::{MAX_ATTR, SVC_ATTR_SIZE},
    host::Host,
};
use core::cell::Cell;
use heapless::Vec;

/// A primary service and its attribute table.
///
/// The table holds at most `N` attributes, including the service declaration in slot 0.
/// Characteristics are appended in registration order, which is also the order in which the host
/// assigns handles.
///
/// # Lifecycle
///
/// A service starts out unregistered. Characteristics can only be added with [`register_char`]
/// in that state. [`init`] publishes the table to the host; from then on the table no longer
/// changes, except for the handles the host writes into it.
///
/// [`register_char`]: #method.register_char
/// [`init`]: #method.init
pub struct Service<'a, const N: usize = MAX_ATTR> {
    uuid: AttUuid,
    attrs: Vec<Attribute<'a>, N>,
    registered: Cell<bool>,
}

impl<'a, const N: usize> Service<'a, N> {
    /// Creates a service whose table only contains the service declaration.
    pub fn new(uuid: impl Into<AttUuid>) -> Self {
        assert!(N >= SVC_ATTR_SIZE, "service table has no room for its declaration");

        let uuid = uuid.into();
        let mut attrs = Vec::new();
        attrs.extend(Some(Attribute::new(
            PRIMARY_SERVICE_UUID16.into(),
            Permissions::READ,
            Access::Service(uuid),
        )));

        Self {
            uuid,
            attrs,
            registered: Cell::new(false),
        }
    }

    pub fn uuid(&self) -> AttUuid {
        self.uuid
    }

    /// Appends the attributes of `chrc` to the table.
    ///
    /// # Panics
    ///
    /// Panics if the attributes do not fit into the table, or if the service has already been
    /// published. The table is left untouched in both cases.
    pub fn register_char<H, K: Kind>(&mut self, chrc: &'a Characteristic<H, K>)
    where
        Characteristic<H, K>: Dispatch,
    {
        assert!(
            !self.is_registered(),
            "characteristic registered after the service was published"
        );
        assert!(
            self.can_register(chrc),
            "service table full: {} + {} attributes exceed capacity {}",
            self.attrs.len(),
            chrc.attr_size(),
            N
        );

        self.attrs.extend(chrc.attributes());
        debug!(
            "registered {:?} ({} attributes, {} of {} used)",
            chrc.uuid(),
            chrc.attr_size(),
            self.attrs.len(),
            N
        );
    }

    /// Publishes the table to `host`.
    ///
    /// Returns the host's status unchanged. The service only counts as registered when the host
    /// reports success.
    pub fn init<T: Host<'a> + ?Sized>(&'a self, host: &mut T) -> i32 {
        let ret = host.register_service(&self.attrs);
        if ret == 0 {
            self.registered.set(true);
            debug!("published {:?} with {} attributes", self.uuid, self.attrs.len());
        } else {
            warn!("publishing {:?} failed: {}", self.uuid, ret);
        }
        ret
    }

    /// The attribute table in its current state.
    pub fn attributes(&self) -> &[Attribute<'a>] {
        &self.attrs
    }

    /// Number of attributes in the table, including the service declaration.
    pub fn attr_count(&self) -> usize {
        self.attrs.len()
    }

    pub fn capacity(&self) -> usize {
        N
    }

    /// Number of free slots left in the table.
    pub fn remaining(&self) -> usize {
        N - self.attrs.len()
    }

    /// Returns whether `chrc` would fit into the remaining table slots.
    pub fn can_register<H, K: Kind>(&self, chrc: &Characteristic<H, K>) -> bool {
        chrc.attr_size() <= self.remaining()
    }

    pub fn is_registered(&self) -> bool {
        self.registered.get()
    }
}
