use std::fmt;

/// Reasons a raw datagram failed to parse as a DNS question.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// The buffer is shorter than the 12-byte header, or a label/field runs
    /// past the end of the buffer.
    Truncated,
    /// A label length byte exceeds 63 (the RFC 1035 maximum).
    InvalidLabel,
    /// The question name has a terminator with no labels before it.
    EmptyName,
    /// A label length byte had its top two bits set, i.e. looked like a
    /// compression pointer. Questions never use compression in practice;
    /// the codec rejects rather than follows it.
    CompressionPointer,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::Truncated => "datagram truncated",
            Self::InvalidLabel => "label length exceeds 63 bytes",
            Self::EmptyName => "question name has no labels",
            Self::CompressionPointer => "compression pointer in question section",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for ParseError {}
