//! Client Characteristic Configuration (CCC).
//!
//! A peer subscribes to notifications or indications of a characteristic by writing to its CCC
//! descriptor. The per-peer bookkeeping is done by the host; the [`CccRecord`] here caches the
//! last configured value, and every change is reported to the application as a [`CccValue`].
//!
//! [`CccRecord`]: struct.CccRecord.html
//! [`CccValue`]: enum.CccValue.html

use core::cell::Cell;

/// Raw CCC bit enabling notifications.
pub const CCC_NOTIFY: u16 = 0x0001;
/// Raw CCC bit enabling indications.
pub const CCC_INDICATE: u16 = 0x0002;

/// Subscription state reported to `CccHandler::ccc_changed`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CccValue {
    /// Neither notifications nor indications are enabled.
    Disabled,
    /// Notifications are enabled.
    Notify,
    /// Indications are enabled.
    Indicate,
    /// The peer wrote a value that is neither of the above.
    NotApplicable,
}

impl CccValue {
    /// Maps a raw CCC value onto the subscription state.
    ///
    /// Anything besides `0`, `CCC_NOTIFY` and `CCC_INDICATE` (including both bits set at once)
    /// becomes `NotApplicable`.
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            0 => CccValue::Disabled,
            CCC_NOTIFY => CccValue::Notify,
            CCC_INDICATE => CccValue::Indicate,
            _ => CccValue::NotApplicable,
        }
    }
}

impl From<u16> for CccValue {
    fn from(raw: u16) -> Self {
        Self::from_raw(raw)
    }
}

/// CCC state owned by a notify or indicate characteristic.
#[derive(Debug)]
pub struct CccRecord {
    value: Cell<u16>,
}

impl CccRecord {
    pub(crate) const fn new() -> Self {
        Self {
            value: Cell::new(0),
        }
    }

    /// Returns the last configured raw value.
    pub fn raw(&self) -> u16 {
        self.value.get()
    }

    /// Returns the last configured value as subscription state.
    pub fn value(&self) -> CccValue {
        CccValue::from_raw(self.raw())
    }

    pub fn notify_enabled(&self) -> bool {
        self.raw() & CCC_NOTIFY != 0
    }

    pub fn indicate_enabled(&self) -> bool {
        self.raw() & CCC_INDICATE != 0
    }

    /// Stores `raw`, returning whether the value changed.
    pub(crate) fn update(&self, raw: u16) -> bool {
        self.value.replace(raw) != raw
    }
}
