// ABOUTME: Builds transport packets (fixed 12-byte header + payload) in network byte order
// ABOUTME: Grounded on the teacher's `PduHeader::encode` (infallible write into a `BytesMut`)

use bytes::{BufMut, Bytes, BytesMut};

/// Fixed header byte: version 2, padding 0, extension 0, CSRC count 0 (§4.A).
const VERSION_BYTE: u8 = 0x80;

/// Builds one transport packet: 12-byte header followed by the payload,
/// copied verbatim. No error path; the caller has already range-checked
/// `payload_type` and the marker bit.
pub fn build_packet(
    payload_type: u8,
    marker: bool,
    sequence: u16,
    timestamp: u32,
    ssrc: u32,
    payload: &[u8],
) -> Bytes {
    let mut buf = BytesMut::with_capacity(12 + payload.len());

    buf.put_u8(VERSION_BYTE);

    let marker_bit = if marker { 0x80 } else { 0x00 };
    buf.put_u8(marker_bit | (payload_type & 0x7F));

    buf.put_u16(sequence);
    buf.put_u32(timestamp);
    buf.put_u32(ssrc);
    buf.put_slice(payload);

    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_byte_zero_is_fixed() {
        let packet = build_packet(96, true, 1, 0, 0xdead_beef, b"x");
        assert_eq!(packet[0], 0x80);
    }

    #[test]
    fn marker_and_payload_type_share_byte_one() {
        let marked = build_packet(96, true, 0, 0, 0, &[]);
        assert_eq!(marked[1], 0x80 | 96);

        let unmarked = build_packet(96, false, 0, 0, 0, &[]);
        assert_eq!(unmarked[1], 96);
    }

    #[test]
    fn fields_are_big_endian() {
        let packet = build_packet(96, false, 0x1234, 0xaabb_ccdd, 0x1122_3344, &[]);
        assert_eq!(&packet[2..4], &[0x12, 0x34]);
        assert_eq!(&packet[4..8], &[0xaa, 0xbb, 0xcc, 0xdd]);
        assert_eq!(&packet[8..12], &[0x11, 0x22, 0x33, 0x44]);
    }

    #[test]
    fn payload_follows_twelve_byte_header() {
        let packet = build_packet(96, true, 0, 0, 0, b"payload-bytes");
        assert_eq!(packet.len(), 12 + b"payload-bytes".len());
        assert_eq!(&packet[12..], b"payload-bytes");
    }

    #[test]
    fn payload_type_is_masked_to_seven_bits() {
        let packet = build_packet(0xFF, false, 0, 0, 0, &[]);
        assert_eq!(packet[1], 0x7F);
    }
}
