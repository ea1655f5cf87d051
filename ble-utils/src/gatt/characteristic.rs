//! Characteristics and their attribute spans.
//!
//! A characteristic is built by composition rather than by a type hierarchy: a [`Declaration`]
//! record, the value's permissions, an optional CCC record and a *kind* tag selecting plain,
//! notify or indicate behavior. The application supplies the behavior of the value through a
//! handler implementing [`ValueHandler`] (plus [`CccHandler`] / [`IndicateHandler`] for the
//! subscribable kinds).
//!
//! [`Declaration`]: ../struct.Declaration.html
//! [`ValueHandler`]: trait.ValueHandler.html
//! [`CccHandler`]: trait.CccHandler.html
//! [`IndicateHandler`]: trait.IndicateHandler.html

use super::{
    attribute::{Access, Attribute, Declaration},
    ccc::{CccRecord, CccValue},
    dispatch::Dispatch,
};
use crate::{
    att::{AttHandle, AttUuid, Permissions, CCC_UUID16, CHARACTERISTIC_UUID16},
    host::{Host, Indication},
    utils::HexSlice,
};
use bitflags::bitflags;
use core::cell::Cell;
use heapless::Vec;

/// Number of attributes occupied by a characteristic without CCC descriptor.
pub const ATTR_SIZE: usize = 2;

/// Number of attributes occupied by a characteristic with CCC descriptor.
pub const CCC_ATTR_SIZE: usize = 3;

bitflags! {
    /// Characteristic properties, as advertised in the characteristic declaration.
    pub struct Properties: u8 {
        const BROADCAST    = 0x01;
        const READ         = 0x02;
        const WRITE_NO_RSP = 0x04;
        const WRITE        = 0x08;
        const NOTIFY       = 0x10;
        const INDICATE     = 0x20;
        const AUTH_WRITES  = 0x40;
        const EXTENDED     = 0x80;
    }
}

/// Application callbacks backing a characteristic value.
///
/// Both callbacks return the number of bytes transferred, or a negative error created with
/// `att::gatt_err`. The defaults transfer nothing.
pub trait ValueHandler {
    /// Called when a peer reads the value. Fill `buf` and return the number of bytes written.
    fn read_cb(&self, _buf: &mut [u8]) -> isize {
        0
    }

    /// Called when a peer writes `data` to the value.
    fn write_cb(&self, _data: &[u8]) -> isize {
        0
    }
}

/// Callbacks of characteristics that peers can subscribe to.
pub trait CccHandler: ValueHandler {
    /// Called whenever the CCC configuration changes.
    fn ccc_changed(&self, _value: CccValue) {}
}

/// Callbacks of indicate characteristics.
pub trait IndicateHandler: CccHandler {
    /// Called once the last indication has been confirmed by the peer, or has failed.
    ///
    /// This is the only report of an indication's outcome; the return value of `indicate` only
    /// tells whether the host accepted the request.
    fn indicate_rsp(&self) {}
}

impl ValueHandler for () {}
impl CccHandler for () {}
impl IndicateHandler for () {}

mod private {
    pub trait Sealed {}
}

/// Selects the behavior of a [`Characteristic`].
///
/// Implemented by [`Plain`], [`Notify`] and [`Indicate`] only.
///
/// [`Characteristic`]: struct.Characteristic.html
/// [`Plain`]: struct.Plain.html
/// [`Notify`]: struct.Notify.html
/// [`Indicate`]: struct.Indicate.html
pub trait Kind: private::Sealed {
    /// Properties added on top of the ones passed at construction.
    const PROPERTIES: Properties;
}

/// Characteristic with declaration and value attributes only.
#[derive(Debug)]
pub struct Plain;

/// Characteristic that can notify subscribed peers.
#[derive(Debug)]
pub struct Notify;

/// Characteristic that can indicate to subscribed peers.
#[derive(Debug)]
pub struct Indicate {
    params: IndicateParams,
}

impl private::Sealed for Plain {}
impl private::Sealed for Notify {}
impl private::Sealed for Indicate {}

impl Kind for Plain {
    const PROPERTIES: Properties = Properties::empty();
}

impl Kind for Notify {
    const PROPERTIES: Properties = Properties::NOTIFY;
}

impl Kind for Indicate {
    const PROPERTIES: Properties = Properties::INDICATE;
}

/// Single-slot parameters of the indication in flight.
///
/// Every indicate characteristic owns exactly one of these, so only one indication per
/// characteristic may be outstanding at a time.
#[derive(Debug)]
pub struct IndicateParams {
    pub(crate) uuid: AttUuid,
    pub(crate) len: Cell<usize>,
    pub(crate) pending: Cell<bool>,
}

impl IndicateParams {
    fn new(uuid: AttUuid) -> Self {
        Self {
            uuid,
            len: Cell::new(0),
            pending: Cell::new(false),
        }
    }

    /// Whether an indication has been handed to the host and not completed yet.
    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    pub(crate) fn finish(&self) {
        self.pending.set(false);
    }
}

/// A GATT characteristic.
///
/// `H` is the application handler, `K` one of [`Plain`], [`Notify`] or [`Indicate`].
///
/// A characteristic must stay in place while a published service refers to it. This is enforced
/// by borrowing: [`Service::register_char`] keeps a shared borrow of the characteristic for the
/// service's lifetime.
///
/// [`Plain`]: struct.Plain.html
/// [`Notify`]: struct.Notify.html
/// [`Indicate`]: struct.Indicate.html
/// [`Service::register_char`]: ../struct.Service.html#method.register_char
pub struct Characteristic<H, K = Plain> {
    declaration: Declaration,
    permissions: Permissions,
    ccc: Option<CccRecord>,
    kind: K,
    handler: H,
}

impl<H, K: Kind> Characteristic<H, K> {
    fn with_kind(
        uuid: AttUuid,
        properties: Properties,
        permissions: Permissions,
        ccc: Option<CccRecord>,
        kind: K,
        handler: H,
    ) -> Self {
        Self {
            declaration: Declaration {
                uuid,
                value_handle: AttHandle::NULL,
                properties: properties | K::PROPERTIES,
            },
            permissions,
            ccc,
            kind,
            handler,
        }
    }

    /// UUID of the characteristic value.
    pub fn uuid(&self) -> AttUuid {
        self.declaration.uuid
    }

    pub fn properties(&self) -> Properties {
        self.declaration.properties
    }

    /// Permissions of the value attribute.
    pub fn permissions(&self) -> Permissions {
        self.permissions
    }

    pub fn has_ccc(&self) -> bool {
        self.ccc.is_some()
    }

    /// Number of attributes this characteristic occupies in a service table.
    pub fn attr_size(&self) -> usize {
        if self.has_ccc() {
            CCC_ATTR_SIZE
        } else {
            ATTR_SIZE
        }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// The last configured CCC value, or `None` for characteristics without CCC descriptor.
    pub fn ccc_value(&self) -> Option<CccValue> {
        self.ccc.as_ref().map(CccRecord::value)
    }

    /// Computes the attributes of this characteristic, in table order.
    ///
    /// These are the declaration, the value and, if present, the CCC descriptor. Computing them
    /// has no side effects.
    pub fn attributes<'a>(&'a self) -> Vec<Attribute<'a>, CCC_ATTR_SIZE>
    where
        Self: Dispatch,
    {
        let declaration = Attribute::new(
            CHARACTERISTIC_UUID16.into(),
            Permissions::READ,
            Access::Declaration(&self.declaration),
        );
        let value = Attribute::new(self.uuid(), self.permissions, Access::Value(self));
        let ccc = self.ccc.as_ref().map(|_| {
            Attribute::new(
                CCC_UUID16.into(),
                Permissions::READ | Permissions::WRITE,
                Access::Ccc(self),
            )
        });

        let mut attrs = Vec::new();
        attrs.extend(IntoIterator::into_iter([declaration, value]).chain(ccc));
        attrs
    }
}

impl<H: ValueHandler> Characteristic<H, Plain> {
    /// Creates a characteristic with declaration and value attributes.
    pub fn new(
        uuid: impl Into<AttUuid>,
        properties: Properties,
        permissions: Permissions,
        handler: H,
    ) -> Self {
        Self::with_kind(uuid.into(), properties, permissions, None, Plain, handler)
    }
}

impl<H: CccHandler> Characteristic<H, Notify> {
    /// Creates a notify characteristic. `Properties::NOTIFY` is added to `properties`.
    pub fn new_notify(
        uuid: impl Into<AttUuid>,
        properties: Properties,
        permissions: Permissions,
        handler: H,
    ) -> Self {
        let ccc = Some(CccRecord::new());
        Self::with_kind(uuid.into(), properties, permissions, ccc, Notify, handler)
    }

    /// Creates a notify characteristic whose value can't be read or written by peers.
    pub fn notify_only(uuid: impl Into<AttUuid>, handler: H) -> Self {
        Self::new_notify(uuid, Properties::empty(), Permissions::empty(), handler)
    }

    /// Asks the host to notify `data` to subscribed peers.
    ///
    /// Returns the host's status unchanged. There is no delivery confirmation.
    pub fn notify<'h, T: Host<'h> + ?Sized>(&self, host: &mut T, data: &[u8]) -> i32 {
        let ret = host.notify(&self.declaration.uuid, data);
        trace!("notify {:?} {:?} -> {}", self.uuid(), HexSlice(data), ret);
        ret
    }
}

impl<H: IndicateHandler> Characteristic<H, Indicate> {
    /// Creates an indicate characteristic. `Properties::INDICATE` is added to `properties`.
    pub fn new_indicate(
        uuid: impl Into<AttUuid>,
        properties: Properties,
        permissions: Permissions,
        handler: H,
    ) -> Self {
        let uuid = uuid.into();
        let kind = Indicate {
            params: IndicateParams::new(uuid),
        };
        let ccc = Some(CccRecord::new());
        Self::with_kind(uuid, properties, permissions, ccc, kind, handler)
    }

    /// Creates an indicate characteristic whose value can't be read or written by peers.
    pub fn indicate_only(uuid: impl Into<AttUuid>, handler: H) -> Self {
        Self::new_indicate(uuid, Properties::empty(), Permissions::empty(), handler)
    }

    /// Asks the host to indicate `data` to subscribed peers.
    ///
    /// Returns the host's status unchanged; a non-negative value only means the request was
    /// accepted. The outcome is reported later through `IndicateHandler::indicate_rsp`.
    ///
    /// Only one indication per characteristic may be in flight. Starting another one before the
    /// previous has completed panics in debug builds.
    pub fn indicate<'a, T: Host<'a> + ?Sized>(&'a self, host: &mut T, data: &[u8]) -> i32 {
        let params = &self.kind.params;
        debug_assert!(
            !params.is_pending(),
            "indication on {:?} still in flight",
            params.uuid
        );

        params.len.set(data.len());
        params.pending.set(true);
        let ret = host.indicate(Indication::new(params, self), data);
        if ret < 0 {
            params.finish();
        }

        trace!("indicate {:?} {:?} -> {}", self.uuid(), HexSlice(data), ret);
        ret
    }

    /// Whether an indication is waiting for completion.
    pub fn indication_pending(&self) -> bool {
        self.kind.params.is_pending()
    }
}

impl<H: ValueHandler> Dispatch for Characteristic<H, Plain> {
    fn read(&self, buf: &mut [u8]) -> isize {
        self.handler.read_cb(buf)
    }

    fn write(&self, data: &[u8]) -> isize {
        self.handler.write_cb(data)
    }
}

impl<H: CccHandler> Dispatch for Characteristic<H, Notify> {
    fn read(&self, buf: &mut [u8]) -> isize {
        self.handler.read_cb(buf)
    }

    fn write(&self, data: &[u8]) -> isize {
        self.handler.write_cb(data)
    }

    fn ccc(&self) -> Option<&CccRecord> {
        self.ccc.as_ref()
    }

    fn ccc_changed(&self, value: CccValue) {
        self.handler.ccc_changed(value);
    }
}

impl<H: IndicateHandler> Dispatch for Characteristic<H, Indicate> {
    fn read(&self, buf: &mut [u8]) -> isize {
        self.handler.read_cb(buf)
    }

    fn write(&self, data: &[u8]) -> isize {
        self.handler.write_cb(data)
    }

    fn ccc(&self) -> Option<&CccRecord> {
        self.ccc.as_ref()
    }

    fn ccc_changed(&self, value: CccValue) {
        self.handler.ccc_changed(value);
    }

    fn indicate_complete(&self) {
        self.handler.indicate_rsp();
    }
}
