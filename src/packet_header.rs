use crate::cursor::ByteCursor;
use crate::error::DecodeError;

/// Fixed-size header at the start of every datagram - see the crate documentation for
///  the byte layout.
///
/// `timestamp` and `challenge` are sender-side bookkeeping (send time and connection
///  nonce); they are parsed and surfaced but carry no meaning for decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PacketHeader {
    pub peer_id: i16,
    pub flags: u8,
    pub command_count: u8,
    pub timestamp: i32,
    pub challenge: i32,
}

impl PacketHeader {
    pub const SERIALIZED_LEN: usize = 12;

    /// `flags` value marking the datagram payload as encrypted. The flags byte holds
    ///  whole marker values rather than combinable bits.
    pub const FLAG_ENCRYPTED: u8 = 0x01;
    /// `flags` value announcing a 4-byte checksum word between header and commands.
    pub const FLAG_CRC: u8 = 0xcc;

    pub fn deser(cursor: &mut ByteCursor) -> Result<PacketHeader, DecodeError> {
        let peer_id = cursor.try_get_i16()?;
        let flags = cursor.try_get_u8()?;
        let command_count = cursor.try_get_u8()?;
        let timestamp = cursor.try_get_i32()?;
        let challenge = cursor.try_get_i32()?;

        Ok(PacketHeader {
            peer_id,
            flags,
            command_count,
            timestamp,
            challenge,
        })
    }

    pub fn is_encrypted(&self) -> bool {
        self.flags == Self::FLAG_ENCRYPTED
    }

    pub fn has_crc(&self) -> bool {
        self.flags == Self::FLAG_CRC
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_deser() {
        let buf = [
            0x00, 0x65, // peer id 101
            0xcc, // flags
            0x03, // command count
            0x00, 0x00, 0x30, 0x39, // timestamp 12345
            0xff, 0xff, 0xff, 0xff, // challenge -1
            0xee, 0xee, // trailing bytes stay un-consumed
        ];
        let mut cursor = ByteCursor::new(&buf);

        let header = PacketHeader::deser(&mut cursor).unwrap();

        assert_eq!(
            header,
            PacketHeader {
                peer_id: 101,
                flags: 0xcc,
                command_count: 3,
                timestamp: 12345,
                challenge: -1,
            }
        );
        assert_eq!(cursor.position(), PacketHeader::SERIALIZED_LEN);
        assert_eq!(cursor.remaining(), 2);
    }

    #[rstest]
    #[case::empty(0)]
    #[case::cut_in_the_middle(7)]
    #[case::one_byte_short(11)]
    fn test_deser_truncated(#[case] len: usize) {
        let buf = vec![0u8; len];
        let mut cursor = ByteCursor::new(&buf);
        assert!(matches!(
            PacketHeader::deser(&mut cursor),
            Err(DecodeError::Truncated { .. })
        ));
    }

    #[rstest]
    #[case::plain(0x00, false, false)]
    #[case::encrypted(0x01, true, false)]
    #[case::crc(0xcc, false, true)]
    #[case::unrelated_marker(0xcd, false, false)]
    // a set low bit does not mean encrypted - markers are whole-byte values
    #[case::not_a_bitmask(0x03, false, false)]
    fn test_flag_markers(#[case] flags: u8, #[case] encrypted: bool, #[case] crc: bool) {
        let header = PacketHeader {
            peer_id: 0,
            flags,
            command_count: 0,
            timestamp: 0,
            challenge: 0,
        };
        assert_eq!(header.is_encrypted(), encrypted);
        assert_eq!(header.has_crc(), crc);
    }
}
