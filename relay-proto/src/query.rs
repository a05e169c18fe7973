use crate::error::ParseError;

/// Byte offset of the two-byte transaction id in every DNS message.
pub const ID_OFFSET: usize = 0;
/// Byte offset of the two-byte flags field.
pub const FLAGS_OFFSET: usize = 2;
/// Byte offset of the question section, immediately after the 12-byte header.
pub const QUESTION_OFFSET: usize = 12;
/// Minimum length of a well-formed DNS message (header only).
pub const HEADER_LEN: usize = 12;

const QR_BIT: u16 = 0x8000;

/// Flag bits shared by every response the resolver builds.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Flags(pub u16);

impl Flags {
    pub fn is_response(self) -> bool {
        self.0 & QR_BIT != 0
    }
}

/// A zero-copy view over an inbound query's question section.
///
/// `bytes` borrows the original datagram; parsing never copies or
/// allocates beyond the `String` built for the dotted name (the labels
/// themselves are short-lived slices consumed while building it).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QueryView<'a> {
    pub id: u16,
    pub flags: Flags,
    pub qname: String,
    pub qtype: u16,
    pub qclass: u16,
    pub bytes: &'a [u8],
}

impl<'a> QueryView<'a> {
    /// Parses the header and first question out of a raw datagram.
    ///
    /// Only ever reads the first question; a resolver forwarding to a
    /// single upstream per datagram has no use for more than one.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, ParseError> {
        if bytes.len() < HEADER_LEN {
            return Err(ParseError::Truncated);
        }

        let id = u16::from_be_bytes([bytes[0], bytes[1]]);
        let flags = Flags(u16::from_be_bytes([bytes[2], bytes[3]]));

        let (qname, mut pos) = read_name(bytes, QUESTION_OFFSET)?;

        if bytes.len() < pos + 4 {
            return Err(ParseError::Truncated);
        }
        let qtype = u16::from_be_bytes([bytes[pos], bytes[pos + 1]]);
        pos += 2;
        let qclass = u16::from_be_bytes([bytes[pos], bytes[pos + 1]]);

        Ok(Self {
            id,
            flags,
            qname,
            qtype,
            qclass,
            bytes,
        })
    }
}

/// Walks length-prefixed labels starting at `start`, returning the dotted
/// name and the offset immediately after the terminating zero byte.
fn read_name(bytes: &[u8], start: usize) -> Result<(String, usize), ParseError> {
    let mut pos = start;
    let mut labels: Vec<&str> = Vec::new();

    loop {
        let len = *bytes.get(pos).ok_or(ParseError::Truncated)? as usize;

        if len == 0 {
            pos += 1;
            break;
        }
        if len & 0xC0 == 0xC0 {
            return Err(ParseError::CompressionPointer);
        }
        if len > 63 {
            return Err(ParseError::InvalidLabel);
        }

        let label_start = pos + 1;
        let label_end = label_start + len;
        if bytes.len() < label_end {
            return Err(ParseError::Truncated);
        }

        let label =
            std::str::from_utf8(&bytes[label_start..label_end]).map_err(|_| ParseError::InvalidLabel)?;
        labels.push(label);
        pos = label_end;
    }

    if labels.is_empty() {
        return Err(ParseError::EmptyName);
    }

    Ok((labels.join("."), pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question_bytes(name: &str, qtype: u16, qclass: u16) -> Vec<u8> {
        let mut buf = vec![0u8; 12];
        buf[0] = 0x12;
        buf[1] = 0x34;
        for label in name.split('.') {
            buf.push(label.len() as u8);
            buf.extend_from_slice(label.as_bytes());
        }
        buf.push(0);
        buf.extend_from_slice(&qtype.to_be_bytes());
        buf.extend_from_slice(&qclass.to_be_bytes());
        buf
    }

    #[test]
    fn parses_a_simple_question() {
        let bytes = question_bytes("example.com", 1, 1);
        let view = QueryView::parse(&bytes).unwrap();
        assert_eq!(view.id, 0x1234);
        assert_eq!(view.qname, "example.com");
        assert_eq!(view.qtype, 1);
        assert_eq!(view.qclass, 1);
    }

    #[test]
    fn rejects_short_buffer() {
        assert_eq!(QueryView::parse(&[0u8; 11]), Err(ParseError::Truncated));
    }

    #[test]
    fn rejects_label_over_63_bytes() {
        let mut buf = vec![0u8; 12];
        buf.push(64);
        buf.extend_from_slice(&[b'a'; 64]);
        buf.push(0);
        buf.extend_from_slice(&[0, 1, 0, 1]);
        assert_eq!(QueryView::parse(&buf), Err(ParseError::InvalidLabel));
    }

    #[test]
    fn rejects_empty_name() {
        let mut buf = vec![0u8; 12];
        buf.push(0);
        buf.extend_from_slice(&[0, 1, 0, 1]);
        assert_eq!(QueryView::parse(&buf), Err(ParseError::EmptyName));
    }

    #[test]
    fn rejects_compression_pointer_in_question() {
        let mut buf = vec![0u8; 12];
        buf.push(0xC0);
        buf.push(0x0C);
        assert_eq!(
            QueryView::parse(&buf),
            Err(ParseError::CompressionPointer)
        );
    }

    #[test]
    fn rejects_truncated_label() {
        let mut buf = vec![0u8; 12];
        buf.push(10);
        buf.extend_from_slice(b"short");
        assert_eq!(QueryView::parse(&buf), Err(ParseError::Truncated));
    }

    proptest::proptest! {
        #[test]
        fn parse_round_trip_identity(
            labels in proptest::collection::vec("[A-Za-z0-9-]{1,63}", 1..8)
        ) {
            let name = labels.join(".");
            if name.len() > 253 {
                return Ok(());
            }
            let bytes = question_bytes(&name, 1, 1);
            let view = QueryView::parse(&bytes).unwrap();
            proptest::prop_assert_eq!(view.qname, name);
        }
    }
}
