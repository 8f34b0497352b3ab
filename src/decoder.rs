use crate::checksum;
use crate::commands::{CommandHeader, CommandType, FragmentHeader};
use crate::config::DecoderConfig;
use crate::cursor::ByteCursor;
use crate::error::DecodeError;
use crate::packet_header::PacketHeader;
use crate::reassembly::Reassembler;
use crate::rpc::{dispatch_reliable_payload, RpcDeserializer, RpcHandler};
use tracing::{debug, span, trace, Level};

/// What happened to a datagram handed to [`DatagramDecoder::decode`].
///
/// Everything except [`Dispatched`](DecodeOutcome::Dispatched) is a drop the protocol
///  asks for: no callback has fired, no state has changed, and no error is raised -
///  hostile *malformed* input is a `DecodeError` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// The command list was processed. `commands` is the number of commands consumed,
    ///  including those that carry no RPC payload; a disconnect command ends the count
    ///  early.
    Dispatched { commands: usize },
    /// Shorter than a packet header, so not a protocol datagram at all.
    TooShort { len: usize },
    /// Encrypted datagrams are intentionally rejected, decryption is out of scope.
    Encrypted,
    /// The checksum embedded in the datagram does not match the recomputed one; the
    ///  whole datagram is discarded.
    CrcMismatch { transmitted: u32, computed: u32 },
}

/// Drives the full pipeline for one datagram at a time: packet header, optional
///  checksum validation, then the command list with per-command dispatch. Fragmented
///  payloads are carried across `decode` calls until they complete, everything else is
///  stateless per datagram.
///
/// Not internally synchronized - callers decode a peer's datagrams from one thread at
///  a time (or shard one decoder per peer), in arrival order.
pub struct DatagramDecoder<D, H> {
    deserializer: D,
    handler: H,
    reassembler: Reassembler,
}

impl<D, H> DatagramDecoder<D, H>
where
    D: RpcDeserializer,
    H: RpcHandler<Parameters = D::Parameters>,
{
    pub fn new(deserializer: D, handler: H, config: DecoderConfig) -> anyhow::Result<DatagramDecoder<D, H>> {
        config.validate()?;

        Ok(DatagramDecoder {
            deserializer,
            handler,
            reassembler: Reassembler::new(&config),
        })
    }

    /// Number of partially reassembled payloads currently buffered, for diagnostics.
    pub fn pending_payloads(&self) -> usize {
        self.reassembler.pending_payloads()
    }

    /// Decodes one datagram, invoking the handler for every RPC message in it.
    ///
    /// `Ok` reports what happened, including the drops the protocol asks for;
    ///  `Err` means the datagram lied about its own structure and decoding stopped
    ///  there. Dispatch is streaming: callbacks for commands that precede a malformed
    ///  one have fired by the time the error is returned.
    pub fn decode(&mut self, datagram: &[u8]) -> Result<DecodeOutcome, DecodeError> {
        if datagram.len() < PacketHeader::SERIALIZED_LEN {
            debug!("datagram of {} bytes is shorter than a packet header - dropping", datagram.len());
            return Ok(DecodeOutcome::TooShort { len: datagram.len() });
        }

        let mut cursor = ByteCursor::new(datagram);
        let header = PacketHeader::deser(&mut cursor)?;

        let span = span!(Level::TRACE, "datagram", peer_id = header.peer_id, challenge = header.challenge);
        let _entered = span.enter();

        trace!(
            "datagram of {} bytes: flags {:#04x}, {} commands announced",
            datagram.len(),
            header.flags,
            header.command_count
        );

        if header.is_encrypted() {
            debug!("encrypted datagram - dropping");
            return Ok(DecodeOutcome::Encrypted);
        }

        if header.has_crc() {
            // the checksum word sits right after the packet header and is zeroed for
            //  validation; commands start after it
            let transmitted = cursor.try_get_u32()?;
            let computed = checksum::crc32_with_field_zeroed(datagram, PacketHeader::SERIALIZED_LEN);

            if transmitted != computed {
                debug!(
                    "checksum mismatch: datagram carries {:#010x}, computed {:#010x} - dropping",
                    transmitted, computed
                );
                return Ok(DecodeOutcome::CrcMismatch { transmitted, computed });
            }
        }

        let mut commands = 0;
        for _ in 0..header.command_count {
            let command = CommandHeader::deser(&mut cursor)?;
            // slicing off exactly the declared body puts the cursor at the next command
            //  header no matter what the individual handlers consume
            let body = cursor.try_take(command.body_len()?)?;
            commands += 1;

            trace!(
                "command type {} on channel {}, sequence number {}, {} body bytes",
                command.command_type,
                command.channel_id,
                command.sequence_number,
                body.len()
            );

            match CommandType::try_from(command.command_type) {
                Ok(CommandType::Disconnect) => {
                    debug!("disconnect command - dropping the remaining commands of this datagram");
                    break;
                }
                Ok(CommandType::SendReliable) => self.on_reliable(body)?,
                Ok(CommandType::SendUnreliable) => self.on_unreliable(body)?,
                Ok(CommandType::SendFragment) => self.on_fragment(body)?,
                Err(_) => {
                    trace!("command type {} carries no messages - skipping", command.command_type);
                }
            }
        }

        Ok(DecodeOutcome::Dispatched { commands })
    }

    fn on_reliable(&self, body: &[u8]) -> Result<(), DecodeError> {
        dispatch_reliable_payload(&self.deserializer, &self.handler, body)
    }

    fn on_unreliable(&self, body: &[u8]) -> Result<(), DecodeError> {
        let mut cursor = ByteCursor::new(body);
        let unreliable_sequence = cursor.try_get_i32()?;
        trace!("unreliable sequence number {}", unreliable_sequence);

        dispatch_reliable_payload(&self.deserializer, &self.handler, cursor.rest())
    }

    fn on_fragment(&mut self, body: &[u8]) -> Result<(), DecodeError> {
        let mut cursor = ByteCursor::new(body);
        let fragment_header = FragmentHeader::deser(&mut cursor)?;

        if let Some(payload) = self.reassembler.write_fragment(&fragment_header, cursor.rest())? {
            // a completed buffer is a reliable payload in its own right
            return dispatch_reliable_payload(&self.deserializer, &self.handler, &payload);
        }
        Ok(())
    }
}
