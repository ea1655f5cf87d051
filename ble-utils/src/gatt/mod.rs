//! Generic Attribute Profile (GATT) services and characteristics.
//!
//! Applications describe their services with the types in here:
//!
//! 1. Create the [`Characteristic`]s, giving each a handler implementing [`ValueHandler`] (and
//!    [`CccHandler`] / [`IndicateHandler`] for notify and indicate characteristics).
//! 2. Create a [`Service`] and [`register_char`] every characteristic, in the order their
//!    attributes should appear in the table.
//! 3. Publish the table with [`Service::init`].
//!
//! Afterwards the host routes peer accesses through the functions in [`dispatch`], and the
//! application pushes data with `notify` and `indicate`.
//!
//! [`Characteristic`]: struct.Characteristic.html
//! [`ValueHandler`]: trait.ValueHandler.html
//! [`CccHandler`]: trait.CccHandler.html
//! [`IndicateHandler`]: trait.IndicateHandler.html
//! [`Service`]: struct.Service.html
//! [`register_char`]: struct.Service.html#method.register_char
//! [`Service::init`]: struct.Service.html#method.init
//! [`dispatch`]: dispatch/index.html

mod attribute;
mod ccc;
mod characteristic;
pub mod dispatch;
mod service;

pub use self::attribute::{Access, Attribute, Declaration};
pub use self::ccc::{CccRecord, CccValue, CCC_INDICATE, CCC_NOTIFY};
pub use self::characteristic::{
    CccHandler, Characteristic, IndicateHandler, IndicateParams, Indicate, Kind, Notify, Plain,
    Properties, ValueHandler, ATTR_SIZE, CCC_ATTR_SIZE,
};
pub use self::dispatch::Dispatch;
pub use self::service::Service;
