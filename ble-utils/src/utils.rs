use core::fmt;

/// Declares an enum backed by a primitive type, where values without a named variant are kept in
/// a catch-all `Unknown` variant instead of being rejected.
///
/// Conversions in both directions are provided through `From`.
macro_rules! enum_with_unknown {
    (
        $( #[$enum_attr:meta] )*
        $v:vis enum $name:ident($ty:ty) {
            $(
              $( #[$variant_attr:meta] )*
              $variant:ident = $value:expr $(,)*
            ),*
        }
    ) => {
        $( #[$enum_attr] )*
        $v enum $name {
            $(
              $( #[$variant_attr] )*
              $variant,
            )*
            Unknown($ty)
        }

        impl ::core::convert::From<$ty> for $name {
            fn from(raw: $ty) -> Self {
                match raw {
                    $( $value => $name::$variant, )*
                    other => $name::Unknown(other)
                }
            }
        }

        impl ::core::convert::From<$name> for $ty {
            fn from(value: $name) -> Self {
                match value {
                    $( $name::$variant => $value, )*
                    $name::Unknown(other) => other
                }
            }
        }
    }
}

/// `Debug`-formats a byte slice as a list of hexadecimal bytes.
///
/// Used when tracing notification and indication payloads.
#[derive(Copy, Clone)]
pub struct HexSlice<T>(pub T)
where
    T: AsRef<[u8]>;

impl<T: AsRef<[u8]>> fmt::Debug for HexSlice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, byte) in self.0.as_ref().iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:02x}", byte)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    enum_with_unknown! {
        #[derive(Debug, Copy, Clone, PartialEq)]
        enum Level(u8) {
            Low = 1,
            High = 2,
        }
    }

    #[test]
    fn unknown_values_are_preserved() {
        assert_eq!(Level::from(1), Level::Low);
        assert_eq!(Level::from(7), Level::Unknown(7));
        assert_eq!(u8::from(Level::Unknown(7)), 7);
        assert_eq!(u8::from(Level::High), 2);
    }

    #[test]
    fn hex_slice_debug() {
        assert_eq!(format!("{:?}", HexSlice(&[0x01u8, 0xab][..])), "[01, ab]");
        assert_eq!(format!("{:?}", HexSlice(&[] as &[u8])), "[]");
    }
}
