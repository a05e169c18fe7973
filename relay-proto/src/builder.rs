use crate::query::{FLAGS_OFFSET, ID_OFFSET, QUESTION_OFFSET};
use std::net::Ipv4Addr;

const QR_BIT: u8 = 0x80;
const RCODE_MASK: u8 = 0x0F;
const RCODE_NXDOMAIN: u8 = 3;
const RCODE_SERVFAIL: u8 = 2;

const ANCOUNT_OFFSET: usize = 6;
const NSCOUNT_OFFSET: usize = 8;
const ARCOUNT_OFFSET: usize = 10;

const TYPE_A: u16 = 0x0001;
const CLASS_IN: u16 = 0x0001;

/// Sets QR=1 and RCODE=NXDOMAIN in place, zeroing the answer/authority/
/// additional counts. The id and question section are left untouched.
pub fn build_nxdomain_in_place(buffer: &mut [u8]) {
    set_response_rcode(buffer, RCODE_NXDOMAIN);
}

/// Same shape as [`build_nxdomain_in_place`] but with RCODE=SERVFAIL, used
/// when every upstream has been exhausted.
pub fn build_servfail_in_place(buffer: &mut [u8]) {
    set_response_rcode(buffer, RCODE_SERVFAIL);
}

fn set_response_rcode(buffer: &mut [u8], rcode: u8) {
    if buffer.len() < QUESTION_OFFSET {
        return;
    }
    buffer[FLAGS_OFFSET] |= QR_BIT;
    buffer[FLAGS_OFFSET + 1] = (buffer[FLAGS_OFFSET + 1] & !RCODE_MASK) | (rcode & RCODE_MASK);
    buffer[ANCOUNT_OFFSET..ANCOUNT_OFFSET + 2].copy_from_slice(&0u16.to_be_bytes());
    buffer[NSCOUNT_OFFSET..NSCOUNT_OFFSET + 2].copy_from_slice(&0u16.to_be_bytes());
    buffer[ARCOUNT_OFFSET..ARCOUNT_OFFSET + 2].copy_from_slice(&0u16.to_be_bytes());
}

/// Synthesises a complete A-record response from the original query bytes:
/// the query becomes the prefix unchanged, QR and ANCOUNT are set, and one
/// answer RR is appended using a compression pointer back to the question
/// name at offset 12.
pub fn build_a_record_response(query_bytes: &[u8], addr: Ipv4Addr, ttl: u32) -> Vec<u8> {
    let mut out = query_bytes.to_vec();

    if out.len() >= QUESTION_OFFSET {
        out[FLAGS_OFFSET] |= QR_BIT;
        out[ANCOUNT_OFFSET..ANCOUNT_OFFSET + 2].copy_from_slice(&1u16.to_be_bytes());
    }

    out.extend_from_slice(&[0xC0, 0x0C]); // pointer to offset 12
    out.extend_from_slice(&TYPE_A.to_be_bytes());
    out.extend_from_slice(&CLASS_IN.to_be_bytes());
    out.extend_from_slice(&ttl.to_be_bytes());
    out.extend_from_slice(&4u16.to_be_bytes()); // RDLENGTH
    out.extend_from_slice(&addr.octets());

    out
}

/// Copies a two-byte transaction id into the first two bytes of `buffer`.
pub fn rewrite_id(buffer: &mut [u8], id: u16) {
    if buffer.len() >= ID_OFFSET + 2 {
        buffer[ID_OFFSET..ID_OFFSET + 2].copy_from_slice(&id.to_be_bytes());
    }
}
