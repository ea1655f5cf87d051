//! Interface to the BLE host stack.
//!
//! The host owns everything this crate does not: the ATT server, connections, per-peer CCC
//! tables and the actual delivery of notifications and indications. This crate only describes the
//! attribute table and asks the host to push data.
//!
//! All results are the host's own status codes, passed through untouched: `0` or positive for
//! success, negative for a host-defined failure.

use crate::{
    att::AttUuid,
    gatt::{dispatch, Attribute, Dispatch, IndicateParams},
};
use core::fmt;

/// The operations this crate needs from a BLE host stack.
///
/// `'a` is the lifetime of the published attribute table. The host may keep references to the
/// table and to in-flight [`Indication`]s for that long.
///
/// [`Indication`]: struct.Indication.html
pub trait Host<'a> {
    /// Publishes a finished attribute table as one service.
    ///
    /// The host assigns handles through `Attribute::set_handle`. Returns `0` on success.
    fn register_service(&mut self, attrs: &'a [Attribute<'a>]) -> i32;

    /// Notifies `data` to subscribed peers of the characteristic value with type `uuid`.
    fn notify(&mut self, uuid: &AttUuid, data: &[u8]) -> i32;

    /// Starts a confirmed send of `data` to subscribed peers.
    ///
    /// If this returns a non-negative status, the host must call [`Indication::complete`] once
    /// the peer has confirmed the indication or it has failed.
    ///
    /// [`Indication::complete`]: struct.Indication.html#method.complete
    fn indicate(&mut self, indication: Indication<'a>, data: &[u8]) -> i32;
}

/// Parameters of an indication handed to the host.
///
/// Refers to the single parameter slot of the indicating characteristic and to the
/// characteristic itself, which is notified when the host calls [`complete`].
///
/// The host owns this value until it calls [`complete`], which consumes it, so each indication is
/// completed at most once:
///
/// ```compile_fail
/// fn confirm_twice(indication: ble_utils::host::Indication<'_>) {
///     indication.complete();
///     indication.complete();
/// }
/// ```
///
/// [`complete`]: #method.complete
pub struct Indication<'a> {
    params: &'a IndicateParams,
    owner: &'a dyn Dispatch,
}

impl<'a> Indication<'a> {
    pub(crate) fn new(params: &'a IndicateParams, owner: &'a dyn Dispatch) -> Self {
        Self { params, owner }
    }

    /// UUID of the indicated characteristic value.
    pub fn uuid(&self) -> AttUuid {
        self.params.uuid
    }

    /// Length of the indicated data.
    pub fn len(&self) -> usize {
        self.params.len.get()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reports that the indication was confirmed by the peer, or has failed.
    ///
    /// Invokes the characteristic's `indicate_rsp` callback.
    pub fn complete(self) {
        dispatch::indicate_complete(self);
    }

    pub(crate) fn params(&self) -> &'a IndicateParams {
        self.params
    }

    pub(crate) fn owner(&self) -> &'a dyn Dispatch {
        self.owner
    }
}

impl fmt::Debug for Indication<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Indication")
            .field("uuid", &self.uuid())
            .field("len", &self.len())
            .field("pending", &self.params.is_pending())
            .finish()
    }
}

/// A recording host for tests.
#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use crate::{att::AttHandle, gatt::Access};
    use std::vec::Vec;

    /// Returned by `notify` and `indicate` when no published value attribute has the UUID.
    pub const ENOENT: i32 = 2;

    pub struct MockHost<'a> {
        /// Status returned by `register_service`; tables are only published when this is `0`.
        pub register_status: i32,
        pub services: Vec<&'a [Attribute<'a>]>,
        pub notifications: Vec<(AttUuid, Vec<u8>)>,
        pub indications: Vec<(Indication<'a>, Vec<u8>)>,
        next_handle: u16,
    }

    impl<'a> MockHost<'a> {
        pub fn new() -> Self {
            Self {
                register_status: 0,
                services: Vec::new(),
                notifications: Vec::new(),
                indications: Vec::new(),
                next_handle: 1,
            }
        }

        fn is_published(&self, uuid: &AttUuid) -> bool {
            self.services
                .iter()
                .flat_map(|attrs| attrs.iter())
                .any(|attr| matches!(attr.access(), Access::Value(_)) && attr.uuid() == *uuid)
        }
    }

    impl<'a> Host<'a> for MockHost<'a> {
        fn register_service(&mut self, attrs: &'a [Attribute<'a>]) -> i32 {
            if self.register_status != 0 {
                return self.register_status;
            }
            for attr in attrs {
                attr.set_handle(AttHandle::from_raw(self.next_handle));
                self.next_handle += 1;
            }
            self.services.push(attrs);
            0
        }

        fn notify(&mut self, uuid: &AttUuid, data: &[u8]) -> i32 {
            if !self.is_published(uuid) {
                return -ENOENT;
            }
            self.notifications.push((*uuid, data.to_vec()));
            0
        }

        fn indicate(&mut self, indication: Indication<'a>, data: &[u8]) -> i32 {
            if !self.is_published(&indication.uuid()) {
                return -ENOENT;
            }
            self.indications.push((indication, data.to_vec()));
            0
        }
    }
}
