use core::fmt;

/// Failures of the byte codec and of the owned advertising tables.
///
/// Host stack failures never show up here. Those are handed back as the host's own status code.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A length field or an input slice has a length the format does not allow.
    InvalidLength,

    /// The buffer ran out.
    ///
    /// Writers return this when the encoded value does not fit; readers return it when the input
    /// ends early.
    Eof,

    /// Every slot of a fixed-capacity table is taken.
    CapacityExceeded,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::InvalidLength => "invalid length",
            Error::Eof => "unexpected end of buffer",
            Error::CapacityExceeded => "table capacity exceeded",
        };
        f.write_str(msg)
    }
}
