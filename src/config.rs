use anyhow::bail;

/// Limits for the state a decoder keeps across datagrams.
///
/// The decoder itself is stateless per datagram with one exception: partially reassembled
///  fragmented payloads survive between calls. Both knobs below exist to bound what a
///  hostile or buggy sender can make the decoder hold on to.
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Upper bound for the total length a fragmented payload may declare. The buffer for
    ///  the whole payload is allocated when its first fragment arrives, so without this
    ///  limit a single small datagram could demand an arbitrarily large allocation.
    ///
    /// Must cover the full reliable payload including the two envelope bytes. The default
    ///  of 2 MiB is far above what the known server implementations send.
    pub max_payload_len: usize,

    /// Maximum number of partially reassembled payloads kept at a time. Fragments of a
    ///  payload that never completes (sender gone, packets lost forever) would otherwise
    ///  pin their buffers indefinitely - there is no clock at this layer to expire them.
    ///  When a new start sequence arrives at the cap, the entry admitted longest ago is
    ///  evicted.
    pub max_pending_payloads: usize,
}

impl Default for DecoderConfig {
    fn default() -> DecoderConfig {
        DecoderConfig {
            max_payload_len: 2 * 1024 * 1024,
            max_pending_payloads: 64,
        }
    }
}

impl DecoderConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_payload_len == 0 {
            bail!("Maximum payload length must be positive");
        }
        if self.max_pending_payloads == 0 {
            bail!("At least one pending payload must be allowed");
        }
        Ok(())
    }
}
