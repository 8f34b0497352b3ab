use crate::cursor::ByteCursor;
use crate::error::DecodeError;
#[cfg(test)] use mockall::automock;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use tracing::{debug, trace};

/// Discriminator in the second byte of every reliable payload, selecting the message
///  shape that follows. Values outside this enum are silently ignored - current servers
///  use a few internal ones that carry nothing for the application.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, TryFromPrimitive, IntoPrimitive)]
pub enum MessageType {
    OperationRequest = 2,
    OperationResponse = 3,
    Event = 4,
}

/// Decodes the operation bytes of an RPC message, i.e. everything after the two envelope
///  bytes. Parameter tables are opaque to this crate: their serialization is a separate
///  protocol layer with its own types and versioning, so it stays behind this seam.
///
/// Failures are wrapped in [`DecodeError::Rpc`] and abort the current datagram only.
#[cfg_attr(test, automock(type Parameters = rustc_hash::FxHashMap<u8, i32>;))]
pub trait RpcDeserializer {
    type Parameters;

    /// Operation code and parameters of a request.
    fn deserialize_request(&self, payload: &[u8]) -> anyhow::Result<(u8, Self::Parameters)>;

    /// Operation code, return code and parameters of a response.
    fn deserialize_response(&self, payload: &[u8]) -> anyhow::Result<(u8, i16, Self::Parameters)>;

    /// Event code and parameters of a server-pushed event.
    fn deserialize_event(&self, payload: &[u8]) -> anyhow::Result<(u8, Self::Parameters)>;
}

/// Receives every decoded message. Callbacks run synchronously inside
///  `DatagramDecoder::decode`, in wire order, so implementations should be cheap and
///  must not re-enter the decoder.
#[cfg_attr(test, automock(type Parameters = rustc_hash::FxHashMap<u8, i32>;))]
pub trait RpcHandler {
    type Parameters;

    fn on_request(&self, code: u8, parameters: Self::Parameters);

    fn on_response(&self, code: u8, return_code: i16, parameters: Self::Parameters);

    fn on_event(&self, code: u8, parameters: Self::Parameters);
}

/// Takes a complete reliable payload - from a reliable command, the tail of an
///  unreliable command, or a reassembled fragment buffer - and routes it through the
///  deserializer to the matching handler callback.
pub(crate) fn dispatch_reliable_payload<D, H>(
    deserializer: &D,
    handler: &H,
    payload: &[u8],
) -> Result<(), DecodeError>
where
    D: RpcDeserializer,
    H: RpcHandler<Parameters = D::Parameters>,
{
    let mut cursor = ByteCursor::new(payload);
    cursor.skip(1)?; // reserved, skipped without inspection
    let raw_message_type = cursor.try_get_u8()?;
    let operation_bytes = cursor.rest();

    match MessageType::try_from(raw_message_type) {
        Ok(MessageType::OperationRequest) => {
            let (code, parameters) = deserializer
                .deserialize_request(operation_bytes)
                .map_err(DecodeError::Rpc)?;
            trace!("operation request, code {}", code);
            handler.on_request(code, parameters);
        }
        Ok(MessageType::OperationResponse) => {
            let (code, return_code, parameters) = deserializer
                .deserialize_response(operation_bytes)
                .map_err(DecodeError::Rpc)?;
            trace!("operation response, code {}, return code {}", code, return_code);
            handler.on_response(code, return_code, parameters);
        }
        Ok(MessageType::Event) => {
            let (code, parameters) = deserializer
                .deserialize_event(operation_bytes)
                .map_err(DecodeError::Rpc)?;
            trace!("event, code {}", code);
            handler.on_event(code, parameters);
        }
        Err(_) => {
            debug!("unsupported message type {} - skipping", raw_message_type);
        }
    }
    Ok(())
}
