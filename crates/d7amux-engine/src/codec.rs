use bytes::{Buf, BufMut, BytesMut};

use crate::error::CodecError;
use crate::types::{
    Addressee, Channel, IdType, NlsMethod, Qos, ResultStatus, SessionConfig, SessionResult,
};

/// Encoded session config: qos (1) + dormant timeout (1) + control (1) + access class (1) + id (8).
pub const SESSION_CONFIG_LEN: usize = 12;

/// Fixed part of an encoded session result, before the addressee id.
pub const SESSION_RESULT_BASE_LEN: usize = 15;

/// Longest encoded session result (UID addressee).
pub const SESSION_RESULT_MAX_LEN: usize = SESSION_RESULT_BASE_LEN + 8;

/// Encode a session config into its fixed-size record.
///
/// ```text
/// ┌─────┬─────────┬─────────┬──────────────┬─────────────┐
/// │ QoS │ Dormant │ Control │ Access class │ Id (8B)      │
/// └─────┴─────────┴─────────┴──────────────┴─────────────┘
/// ```
///
/// The id field is always 8 bytes; unused trailing bytes are kept as-is.
pub fn encode_session_config(config: &SessionConfig, dst: &mut BytesMut) {
    dst.reserve(SESSION_CONFIG_LEN);
    dst.put_u8(config.qos.to_byte());
    dst.put_u8(config.dormant_timeout);
    dst.put_u8(config.addressee.control());
    dst.put_u8(config.addressee.access_class);
    dst.put_slice(&config.addressee.id);
}

/// Decode a session config record.
pub fn decode_session_config(mut src: &[u8]) -> Result<SessionConfig, CodecError> {
    ensure_len(src, SESSION_CONFIG_LEN)?;

    let qos = Qos::from_byte(src.get_u8())?;
    let dormant_timeout = src.get_u8();
    let control = src.get_u8();
    let access_class = src.get_u8();
    let mut id = [0u8; 8];
    src.copy_to_slice(&mut id);

    Ok(SessionConfig {
        qos,
        dormant_timeout,
        addressee: Addressee {
            id_type: IdType::from_bits((control >> 4) & 0x03)?,
            nls_method: NlsMethod::from_bits(control & 0x0F)?,
            access_class,
            id,
        },
    })
}

/// Encode a session result. Writes `SESSION_RESULT_BASE_LEN` plus the
/// addressee id length.
///
/// Multi-byte fields are big-endian.
pub fn encode_session_result(result: &SessionResult, dst: &mut BytesMut) {
    let id = result.addressee.id_bytes();
    dst.reserve(SESSION_RESULT_BASE_LEN + id.len());
    dst.put_u8(result.channel.header);
    dst.put_u16(result.channel.center_freq_index);
    dst.put_u8(result.rx_level);
    dst.put_u8(result.link_budget);
    dst.put_u8(result.target_rx_level);
    dst.put_u8(result.status.to_byte());
    dst.put_u8(result.fifo_token);
    dst.put_u8(result.seqnr);
    dst.put_u32(result.response_to);
    dst.put_u8(result.addressee.control());
    dst.put_u8(result.addressee.access_class);
    dst.put_slice(id);
}

/// Decode a session result record.
pub fn decode_session_result(mut src: &[u8]) -> Result<SessionResult, CodecError> {
    ensure_len(src, SESSION_RESULT_BASE_LEN)?;

    let channel = Channel {
        header: src.get_u8(),
        center_freq_index: src.get_u16(),
    };
    let rx_level = src.get_u8();
    let link_budget = src.get_u8();
    let target_rx_level = src.get_u8();
    let status = ResultStatus::from_byte(src.get_u8());
    let fifo_token = src.get_u8();
    let seqnr = src.get_u8();
    let response_to = src.get_u32();
    let control = src.get_u8();
    let access_class = src.get_u8();

    let id_type = IdType::from_bits((control >> 4) & 0x03)?;
    let nls_method = NlsMethod::from_bits(control & 0x0F)?;
    let id_len = id_type.id_length();
    if src.len() < id_len {
        return Err(CodecError::Truncated {
            needed: SESSION_RESULT_BASE_LEN + id_len,
            got: SESSION_RESULT_BASE_LEN + src.len(),
        });
    }
    let mut id = [0u8; 8];
    src.copy_to_slice(&mut id[..id_len]);

    Ok(SessionResult {
        channel,
        rx_level,
        link_budget,
        target_rx_level,
        status,
        fifo_token,
        seqnr,
        response_to,
        addressee: Addressee {
            id_type,
            nls_method,
            access_class,
            id,
        },
    })
}

fn ensure_len(src: &[u8], needed: usize) -> Result<(), CodecError> {
    if src.len() < needed {
        return Err(CodecError::Truncated {
            needed,
            got: src.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResponseMode;

    fn sample_result(addressee: Addressee) -> SessionResult {
        SessionResult {
            channel: Channel {
                header: 0x32,
                center_freq_index: 0x0105,
            },
            rx_level: 70,
            link_budget: 45,
            target_rx_level: 80,
            status: ResultStatus {
                unicast: true,
                nls: false,
                retry: false,
                missed: true,
            },
            fifo_token: 9,
            seqnr: 3,
            response_to: 1024,
            addressee,
        }
    }

    #[test]
    fn session_config_layout() {
        let config = SessionConfig {
            qos: Qos {
                response_mode: ResponseMode::All,
                retry_mode: 1,
                stop_on_error: false,
                record: true,
            },
            dormant_timeout: 4,
            addressee: Addressee::uid([1, 2, 3, 4, 5, 6, 7, 8], 0x11)
                .with_nls_method(NlsMethod::AesCcm128),
        };

        let mut buf = BytesMut::new();
        encode_session_config(&config, &mut buf);

        assert_eq!(buf.len(), SESSION_CONFIG_LEN);
        assert_eq!(&buf[..4], &[0x49, 0x04, 0x25, 0x11]);
        assert_eq!(decode_session_config(&buf), Ok(config));
    }

    #[test]
    fn session_config_truncated() {
        assert_eq!(
            decode_session_config(&[0x02, 0x00, 0x10]),
            Err(CodecError::Truncated {
                needed: SESSION_CONFIG_LEN,
                got: 3
            })
        );
    }

    #[test]
    fn session_config_rejects_unknown_method() {
        let mut raw = [0u8; SESSION_CONFIG_LEN];
        raw[0] = 0x02;
        raw[2] = 0x1F;
        assert_eq!(
            decode_session_config(&raw),
            Err(CodecError::InvalidNlsMethod(0x0F))
        );
    }

    #[test]
    fn session_result_length_follows_id_type() {
        for (addressee, id_len) in [
            (Addressee::broadcast(1), 0),
            (Addressee::vid([0xAB, 0xCD], 1), 2),
            (Addressee::uid([9; 8], 1), 8),
        ] {
            let mut buf = BytesMut::new();
            encode_session_result(&sample_result(addressee), &mut buf);
            assert_eq!(buf.len(), SESSION_RESULT_BASE_LEN + id_len);
        }
    }

    #[test]
    fn session_result_decodes_what_was_encoded() {
        let result = sample_result(Addressee::vid([0xAB, 0xCD], 0x21));
        let mut buf = BytesMut::new();
        encode_session_result(&result, &mut buf);

        assert_eq!(decode_session_result(&buf), Ok(result));
    }

    #[test]
    fn session_result_missing_id_bytes() {
        let mut buf = BytesMut::new();
        encode_session_result(&sample_result(Addressee::uid([7; 8], 1)), &mut buf);
        buf.truncate(SESSION_RESULT_BASE_LEN + 3);

        assert_eq!(
            decode_session_result(&buf),
            Err(CodecError::Truncated {
                needed: SESSION_RESULT_BASE_LEN + 8,
                got: SESSION_RESULT_BASE_LEN + 3
            })
        );
    }
}
