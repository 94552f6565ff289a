use bytes::BytesMut;
use d7amux_engine::{
    decode_session_result, encode_session_result, CodecError, IdType, SessionResult,
    SESSION_RESULT_BASE_LEN,
};

use crate::directory::ITF_ID_D7ASP;

/// Fixed part of a session interface status record.
pub const STATUS_BASE_LEN: usize = SESSION_RESULT_BASE_LEN;

/// Encoded status length for an addressee of type `id_type`.
pub fn status_len(id_type: IdType) -> usize {
    STATUS_BASE_LEN + id_type.id_length()
}

/// Interface status delivered with inbound traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceStatus {
    pub itf_id: u8,
    /// Encoded length of `result`.
    pub len: usize,
    pub result: SessionResult,
}

impl InterfaceStatus {
    /// Status for a session result; the length follows the addressee id type.
    pub fn for_session(result: SessionResult) -> Self {
        Self {
            itf_id: ITF_ID_D7ASP,
            len: status_len(result.addressee.id_type),
            result,
        }
    }

    /// Append the encoded status (exactly `len` bytes).
    pub fn encode(&self, dst: &mut BytesMut) {
        encode_session_result(&self.result, dst);
    }

    /// Read back a status record written by [`encode`](Self::encode).
    pub fn decode(src: &[u8]) -> Result<Self, CodecError> {
        decode_session_result(src).map(Self::for_session)
    }
}
