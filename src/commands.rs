use crate::cursor::ByteCursor;
use crate::error::DecodeError;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The command types that carry (or affect) RPC messages. The protocol has more -
///  acks, connect / verify-connect handshake, ping - but those carry nothing for the
///  application and are skipped by their declared length.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, TryFromPrimitive, IntoPrimitive)]
pub enum CommandType {
    Disconnect = 4,
    SendReliable = 6,
    SendUnreliable = 7,
    SendFragment = 8,
}

/// Fixed-size header of each command inside a datagram's command list.
///
/// `command_len` is the declared length *including* these 12 header bytes; it is what
///  moves the cursor from one command to the next, so it gets validated rather than
///  trusted (see [`body_len`](CommandHeader::body_len)).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandHeader {
    pub command_type: u8,
    pub channel_id: u8,
    pub command_flags: u8,
    pub command_len: i32,
    pub sequence_number: i32,
}

impl CommandHeader {
    pub const SERIALIZED_LEN: usize = 12;

    pub fn deser(cursor: &mut ByteCursor) -> Result<CommandHeader, DecodeError> {
        let command_type = cursor.try_get_u8()?;
        let channel_id = cursor.try_get_u8()?;
        let command_flags = cursor.try_get_u8()?;
        cursor.skip(1)?; // reserved
        let command_len = cursor.try_get_i32()?;
        let sequence_number = cursor.try_get_i32()?;

        Ok(CommandHeader {
            command_type,
            channel_id,
            command_flags,
            command_len,
            sequence_number,
        })
    }

    /// Number of payload bytes following this header.
    pub fn body_len(&self) -> Result<usize, DecodeError> {
        if self.command_len < Self::SERIALIZED_LEN as i32 {
            return Err(DecodeError::BadCommandLength {
                declared: self.command_len,
            });
        }
        Ok(self.command_len as usize - Self::SERIALIZED_LEN)
    }
}

/// Descriptor at the start of every fragment command's body.
///
/// `start_sequence` is the reliable sequence number of the first fragment and keys the
///  reassembly buffer. `fragment_count` and `fragment_index` are informational here:
///  completion is tracked by bytes written, not by counting fragments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FragmentHeader {
    pub start_sequence: i32,
    pub fragment_count: i32,
    pub fragment_index: i32,
    pub total_len: i32,
    pub offset: i32,
}

impl FragmentHeader {
    pub const SERIALIZED_LEN: usize = 20;

    pub fn deser(cursor: &mut ByteCursor) -> Result<FragmentHeader, DecodeError> {
        let start_sequence = cursor.try_get_i32()?;
        let fragment_count = cursor.try_get_i32()?;
        let fragment_index = cursor.try_get_i32()?;
        let total_len = cursor.try_get_i32()?;
        let offset = cursor.try_get_i32()?;

        Ok(FragmentHeader {
            start_sequence,
            fragment_count,
            fragment_index,
            total_len,
            offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::disconnect(4, Some(CommandType::Disconnect))]
    #[case::reliable(6, Some(CommandType::SendReliable))]
    #[case::unreliable(7, Some(CommandType::SendUnreliable))]
    #[case::fragment(8, Some(CommandType::SendFragment))]
    #[case::ack(1, None)]
    #[case::connect(2, None)]
    #[case::ping(5, None)]
    #[case::far_out(200, None)]
    fn test_command_type_from_wire(#[case] raw: u8, #[case] expected: Option<CommandType>) {
        assert_eq!(CommandType::try_from(raw).ok(), expected);
    }

    #[test]
    fn test_command_header_deser() {
        let buf = [
            0x06, // type
            0x02, // channel
            0x01, // command flags
            0x00, // reserved
            0x00, 0x00, 0x00, 0x14, // length 20 (12 header + 8 body)
            0x00, 0x00, 0x01, 0x00, // sequence number 256
        ];
        let mut cursor = ByteCursor::new(&buf);

        let header = CommandHeader::deser(&mut cursor).unwrap();

        assert_eq!(
            header,
            CommandHeader {
                command_type: 6,
                channel_id: 2,
                command_flags: 1,
                command_len: 20,
                sequence_number: 256,
            }
        );
        assert_eq!(cursor.position(), CommandHeader::SERIALIZED_LEN);
        assert_eq!(header.body_len().unwrap(), 8);
    }

    #[rstest]
    #[case::header_only(12, Some(0))]
    #[case::with_body(40, Some(28))]
    #[case::one_short_of_its_own_header(11, None)]
    #[case::zero(0, None)]
    #[case::negative(-1, None)]
    fn test_body_len(#[case] command_len: i32, #[case] expected: Option<usize>) {
        let header = CommandHeader {
            command_type: 6,
            channel_id: 0,
            command_flags: 0,
            command_len,
            sequence_number: 1,
        };

        match expected {
            Some(expected) => assert_eq!(header.body_len().unwrap(), expected),
            None => assert!(matches!(
                header.body_len(),
                Err(DecodeError::BadCommandLength { declared }) if declared == command_len
            )),
        }
    }

    #[test]
    fn test_command_header_deser_truncated() {
        let buf = [0x06, 0x00, 0x00, 0x00, 0x00, 0x00];
        let mut cursor = ByteCursor::new(&buf);
        assert!(matches!(
            CommandHeader::deser(&mut cursor),
            Err(DecodeError::Truncated { .. })
        ));
    }

    #[test]
    fn test_fragment_header_deser() {
        let buf = [
            0x00, 0x00, 0x00, 0x64, // start sequence 100
            0x00, 0x00, 0x00, 0x03, // fragment count
            0x00, 0x00, 0x00, 0x01, // fragment index
            0x00, 0x00, 0x04, 0x00, // total length 1024
            0x00, 0x00, 0x01, 0xc2, // offset 450
            0xab, // first payload byte
        ];
        let mut cursor = ByteCursor::new(&buf);

        let header = FragmentHeader::deser(&mut cursor).unwrap();

        assert_eq!(
            header,
            FragmentHeader {
                start_sequence: 100,
                fragment_count: 3,
                fragment_index: 1,
                total_len: 1024,
                offset: 450,
            }
        );
        assert_eq!(cursor.position(), FragmentHeader::SERIALIZED_LEN);
        assert_eq!(cursor.rest(), &[0xab]);
    }

    #[test]
    fn test_fragment_header_deser_truncated() {
        let buf = [0u8; 19];
        let mut cursor = ByteCursor::new(&buf);
        assert!(matches!(
            FragmentHeader::deser(&mut cursor),
            Err(DecodeError::Truncated { .. })
        ));
    }
}
