use crate::commands::FragmentHeader;
use crate::config::DecoderConfig;
use crate::error::DecodeError;
use bytes::{Bytes, BytesMut};
use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

struct PendingPayload {
    total_len: usize,
    bytes_written: usize,
    /// admission ordinal, used to pick the eviction victim when the table is full
    admitted: u64,
    buf: BytesMut,
}

/// Reassembles payloads that were too big for one datagram and arrived as fragment
///  commands, keyed by the start sequence number all fragments of one payload share.
///
/// The first fragment seen for a start sequence allocates a zero-filled buffer of the
///  declared total length; every fragment copies its bytes at its declared offset. The
///  payload is complete once as many bytes were written as the total length declares,
///  matching the sender contract that fragments partition the payload. A duplicated
///  fragment therefore counts its bytes twice - the sender protocol never produces one,
///  and the bounds checks below contain what a hostile one could do with it.
///
/// All validation happens before any state is touched: a rejected fragment leaves the
///  table exactly as it was, including a partially filled buffer under the same key.
pub struct Reassembler {
    max_payload_len: usize,
    max_pending_payloads: usize,
    pending: FxHashMap<i32, PendingPayload>,
    admission_counter: u64,
}

impl Reassembler {
    pub fn new(config: &DecoderConfig) -> Reassembler {
        Reassembler {
            max_payload_len: config.max_payload_len,
            max_pending_payloads: config.max_pending_payloads,
            pending: FxHashMap::default(),
            admission_counter: 0,
        }
    }

    /// Number of partially reassembled payloads currently held.
    pub fn pending_payloads(&self) -> usize {
        self.pending.len()
    }

    /// Copies one fragment into the buffer for its start sequence, creating the buffer on
    ///  first contact. Returns the full payload once it completes; the entry is removed
    ///  in the same step, so every payload is handed out exactly once.
    pub fn write_fragment(
        &mut self,
        header: &FragmentHeader,
        fragment: &[u8],
    ) -> Result<Option<Bytes>, DecodeError> {
        if header.total_len <= 0 || header.total_len as usize > self.max_payload_len {
            return Err(DecodeError::FragmentOversize {
                declared: header.total_len,
                max: self.max_payload_len,
            });
        }
        let total_len = header.total_len as usize;

        if header.offset < 0 || header.offset as usize + fragment.len() > total_len {
            return Err(DecodeError::FragmentBounds {
                offset: header.offset,
                len: fragment.len(),
                total: total_len,
            });
        }

        if let Some(pending) = self.pending.get(&header.start_sequence) {
            if pending.total_len != total_len {
                return Err(DecodeError::FragmentTotalMismatch {
                    start_sequence: header.start_sequence,
                    declared: total_len,
                    existing: pending.total_len,
                });
            }
        }
        else {
            self.admit(header.start_sequence, total_len);
        }

        let pending = self.pending.get_mut(&header.start_sequence)
            .expect("entry was just checked or admitted");

        let offset = header.offset as usize;
        pending.buf[offset..offset + fragment.len()].copy_from_slice(fragment);
        pending.bytes_written += fragment.len();

        trace!(
            "fragment {} of {} for start sequence {}: {} bytes at offset {}, {}/{} bytes written",
            header.fragment_index,
            header.fragment_count,
            header.start_sequence,
            fragment.len(),
            offset,
            pending.bytes_written,
            pending.total_len
        );

        if pending.bytes_written < pending.total_len {
            return Ok(None);
        }

        let completed = self.pending.remove(&header.start_sequence)
            .expect("completed entry is still in the table");
        debug!(
            "payload for start sequence {} completed with {} bytes",
            header.start_sequence, completed.total_len
        );
        Ok(Some(completed.buf.freeze()))
    }

    fn admit(&mut self, start_sequence: i32, total_len: usize) {
        if self.pending.len() >= self.max_pending_payloads {
            self.evict_stalest();
        }

        trace!(
            "new pending payload for start sequence {}, declared total length {}",
            start_sequence, total_len
        );
        let admitted = self.admission_counter;
        self.admission_counter += 1;
        self.pending.insert(start_sequence, PendingPayload {
            total_len,
            bytes_written: 0,
            admitted,
            buf: BytesMut::zeroed(total_len),
        });
    }

    fn evict_stalest(&mut self) {
        if let Some((&start_sequence, _)) = self.pending.iter().min_by_key(|(_, p)| p.admitted) {
            warn!(
                "pending payload table is full - evicting the incomplete payload for start sequence {}",
                start_sequence
            );
            self.pending.remove(&start_sequence);
        }
    }
}
