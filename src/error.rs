use thiserror::Error;

/// Failure modes for malformed or hostile datagram content.
///
/// These are distinct from the drops the protocol *asks* for (undersized datagrams,
///  encrypted traffic, checksum mismatches - see `DecodeOutcome`): an error means the
///  datagram lied about its own structure. Decoding of the offending datagram stops,
///  reassembly state for unrelated start sequences is untouched, and the caller decides
///  whether to log, count or ignore it.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// A read ran past the end of the available bytes. This covers truncated headers as
    ///  well as declared lengths that overrun the datagram.
    #[error("truncated input: {requested} bytes requested, {available} available")]
    Truncated {
        requested: usize,
        available: usize,
    },

    /// A command declared a length too small to contain its own header.
    #[error("command declares a length of {declared} bytes which cannot hold its own header")]
    BadCommandLength {
        declared: i32,
    },

    /// A fragment declared a non-positive total length, or one above the configured
    ///  maximum. The buffer for the whole payload is allocated up front, so declared
    ///  sizes are never trusted blindly.
    #[error("fragment declares a total payload length of {declared} bytes, allowed is 1..={max}")]
    FragmentOversize {
        declared: i32,
        max: usize,
    },

    /// A fragment would write outside the payload buffer announced for its start sequence.
    #[error("fragment at offset {offset} with {len} bytes does not fit a payload of {total} bytes")]
    FragmentBounds {
        offset: i32,
        len: usize,
        total: usize,
    },

    /// A fragment announced a different total payload length than an earlier fragment
    ///  with the same start sequence.
    #[error("fragment for start sequence {start_sequence} declares a total length of {declared} bytes, previously announced were {existing}")]
    FragmentTotalMismatch {
        start_sequence: i32,
        declared: usize,
        existing: usize,
    },

    /// The structured deserializer rejected the operation bytes of an RPC message.
    #[error("undecodable message payload: {0}")]
    Rpc(anyhow::Error),
}
