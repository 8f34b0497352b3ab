//! Decoder for the datagram format spoken by a family of proprietary game-networking
//!  stacks: an ENet-derived framing layer (sequenced commands with channels and
//!  fragmentation, several to a UDP datagram) carrying an RPC message format on top -
//!  operation requests, operation responses and server-pushed events, each identified
//!  by a numeric code and an opaque parameter table.
//!
//! The crate turns raw datagram bytes into handler callbacks and does nothing else:
//!
//! * no sockets or capture - callers bring the bytes (a pcap loop, a proxy, a replay
//!   file) and feed them to [`decoder::DatagramDecoder::decode`] in arrival order
//! * no decryption - encrypted datagrams are detected and reported, not parsed
//! * no parameter decoding - the serialization of operation parameters is a separate
//!   protocol layer with its own types and versioning, reached through the
//!   [`rpc::RpcDeserializer`] seam; decoded messages leave through [`rpc::RpcHandler`]
//!
//! Everything in a datagram is attacker-controlled (this is a decoder for *received*
//!  traffic), so all reads are bounds-checked, all declared lengths are validated, and
//!  the state kept across datagrams is capped (see [`config::DecoderConfig`]).
//!
//! ## Datagram layout
//!
//! All numbers are big-endian. Every datagram starts with a fixed 12-byte header:
//!
//! ```ascii
//! 0:  peer id (i16)
//! 2:  flags (u8) - whole-byte markers, not combinable bits:
//!       0x01  payload is encrypted (rejected here)
//!       0xCC  a checksum word follows the header
//! 3:  command count (u8) - number of commands in this datagram
//! 4:  timestamp (i32) - sender send time, informational
//! 8:  challenge (i32) - connection nonce, informational
//! ```
//!
//! If `flags == 0xCC`, bytes 12..16 hold a CRC-32 of the *whole* datagram, computed by
//!  the sender with this field still zeroed. Validation therefore zeroes the field
//!  again, recomputes, and compares with the transmitted word; a mismatch discards the
//!  datagram. The variant is the reflected 0xEDB88320 polynomial with initial value
//!  0xFFFFFFFF and no final xor (JAMCRC) - see [`checksum`].
//!
//! ## Commands
//!
//! After the header (and the optional checksum word), `command count` commands follow
//!  back to back, each with its own 12-byte header:
//!
//! ```ascii
//! 0:  command type (u8)
//! 1:  channel id (u8)
//! 2:  command flags (u8)
//! 3:  reserved (u8)
//! 4:  command length (i32) - *including* these 12 bytes; moves the cursor to the
//!      next command, so it is validated against the datagram bounds
//! 8:  reliable sequence number (i32)
//! ```
//!
//! Command types and what this decoder does with them:
//!
//! * `4` disconnect - stops processing of the remaining commands in the datagram
//! * `6` send reliable - the body is an RPC payload (see below)
//! * `7` send unreliable - a 4-byte unreliable sequence number, then an RPC payload
//! * `8` send fragment - one slice of an RPC payload too big for a single datagram
//! * anything else (acks, connect handshake, ping, ...) is skipped by its declared
//!   length
//!
//! ## Fragmented payloads
//!
//! A fragment command's body starts with a 20-byte descriptor:
//!
//! ```ascii
//! 0:  start sequence number (i32) - reliable sequence number of the first fragment;
//!      shared by all fragments of one payload and keys the reassembly buffer
//! 4:  fragment count (i32)
//! 8:  fragment index (i32)
//! 12: total payload length (i32)
//! 16: fragment offset (i32) - where this fragment's bytes land in the payload
//! ```
//!
//! Fragments may arrive in any order and across any number of datagrams. The first one
//!  seen for a start sequence allocates a zero-filled buffer of the declared total
//!  length; the payload is complete once as many bytes arrived as the total declares,
//!  and is then dispatched like a reliable payload. See [`reassembly::Reassembler`]
//!  for the caps and validations applied along the way.
//!
//! ## RPC payloads
//!
//! A reliable payload (direct, after an unreliable sequence number, or reassembled)
//!  carries a 2-byte envelope:
//!
//! ```ascii
//! 0:  reserved (u8) - skipped without inspection
//! 1:  message type (u8):
//!       2  operation request   -> on_request(code, parameters)
//!       3  operation response  -> on_response(code, return_code, parameters)
//!       4  event               -> on_event(code, parameters)
//!       anything else is ignored
//! 2:  operation bytes - handed to the RpcDeserializer unparsed
//! ```
//!
//! ## Error handling
//!
//! Undersized datagrams, encrypted datagrams and checksum mismatches are drops the
//!  protocol asks for: `decode` reports them as a [`decoder::DecodeOutcome`], fires
//!  no callback and raises no error. Structurally broken input - truncated headers,
//!  lying lengths, fragments pointing outside their buffer - is an
//!  [`error::DecodeError`]; it aborts the current datagram, never panics, and never
//!  corrupts reassembly state of unrelated payloads. Dispatch is streaming, so
//!  callbacks that fired before a mid-datagram error stay fired.

pub mod checksum;
pub mod commands;
pub mod config;
pub mod cursor;
pub mod decoder;
pub mod error;
pub mod packet_header;
pub mod reassembly;
pub mod rpc;
