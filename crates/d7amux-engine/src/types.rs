//! Values exchanged with the session engine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Size of the security header added by the CTR and CCM methods.
pub const SECURITY_HEADER_SIZE: usize = 5;

/// Identifier of a registered client. Dense and zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClientId(pub u8);

impl ClientId {
    /// Table index for this id.
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle of one transaction, meaningful to the engine and the router only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionHandle(pub u16);

impl fmt::Display for TransactionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Addressee identifier type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdType {
    /// Broadcast, with an estimate of the number of responders.
    Nbid = 0,
    /// Broadcast without identifier.
    Noid = 1,
    /// 64-bit globally unique identifier.
    Uid = 2,
    /// 16-bit network-assigned virtual identifier.
    Vid = 3,
}

impl IdType {
    /// Encoded length of an identifier of this type.
    pub const fn id_length(self) -> usize {
        match self {
            IdType::Nbid => 1,
            IdType::Noid => 0,
            IdType::Uid => 8,
            IdType::Vid => 2,
        }
    }

    /// Decode from the two id-type bits of an addressee control byte.
    pub fn from_bits(bits: u8) -> Result<Self, CodecError> {
        match bits {
            0 => Ok(IdType::Nbid),
            1 => Ok(IdType::Noid),
            2 => Ok(IdType::Uid),
            3 => Ok(IdType::Vid),
            other => Err(CodecError::InvalidIdType(other)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            IdType::Nbid => "NBID",
            IdType::Noid => "NOID",
            IdType::Uid => "UID",
            IdType::Vid => "VID",
        }
    }
}

/// Network-layer security method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NlsMethod {
    None = 0,
    AesCtr = 1,
    AesCbcMac128 = 2,
    AesCbcMac64 = 3,
    AesCbcMac32 = 4,
    AesCcm128 = 5,
    AesCcm64 = 6,
    AesCcm32 = 7,
}

impl NlsMethod {
    /// Every method, in control-field order.
    pub const ALL: [NlsMethod; 8] = [
        NlsMethod::None,
        NlsMethod::AesCtr,
        NlsMethod::AesCbcMac128,
        NlsMethod::AesCbcMac64,
        NlsMethod::AesCbcMac32,
        NlsMethod::AesCcm128,
        NlsMethod::AesCcm64,
        NlsMethod::AesCcm32,
    ];

    /// Size of the authentication tag appended to the payload.
    pub const fn mac_size(self) -> usize {
        match self {
            NlsMethod::None | NlsMethod::AesCtr => 0,
            NlsMethod::AesCbcMac128 | NlsMethod::AesCcm128 => 16,
            NlsMethod::AesCbcMac64 | NlsMethod::AesCcm64 => 8,
            NlsMethod::AesCbcMac32 | NlsMethod::AesCcm32 => 4,
        }
    }

    /// Whether the method carries the security header.
    pub const fn has_security_header(self) -> bool {
        matches!(
            self,
            NlsMethod::AesCtr | NlsMethod::AesCcm128 | NlsMethod::AesCcm64 | NlsMethod::AesCcm32
        )
    }

    /// Bytes this method takes away from the application payload.
    pub const fn overhead(self) -> usize {
        let header = if self.has_security_header() {
            SECURITY_HEADER_SIZE
        } else {
            0
        };
        self.mac_size() + header
    }

    /// Largest overhead of any method.
    pub fn max_overhead() -> usize {
        Self::ALL
            .iter()
            .map(|method| method.overhead())
            .max()
            .unwrap_or(0)
    }

    /// Decode from the four method bits of an addressee control byte.
    pub fn from_bits(bits: u8) -> Result<Self, CodecError> {
        Self::ALL
            .get(usize::from(bits))
            .copied()
            .ok_or(CodecError::InvalidNlsMethod(bits))
    }

    pub fn name(self) -> &'static str {
        match self {
            NlsMethod::None => "none",
            NlsMethod::AesCtr => "aes-ctr",
            NlsMethod::AesCbcMac128 => "aes-cbc-mac-128",
            NlsMethod::AesCbcMac64 => "aes-cbc-mac-64",
            NlsMethod::AesCbcMac32 => "aes-cbc-mac-32",
            NlsMethod::AesCcm128 => "aes-ccm-128",
            NlsMethod::AesCcm64 => "aes-ccm-64",
            NlsMethod::AesCcm32 => "aes-ccm-32",
        }
    }
}

/// Target of a session, or origin of a received packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addressee {
    pub id_type: IdType,
    pub nls_method: NlsMethod,
    pub access_class: u8,
    /// Identifier bytes; only the first `id_type.id_length()` are significant.
    pub id: [u8; 8],
}

impl Addressee {
    /// Broadcast addressee without identifier.
    pub fn broadcast(access_class: u8) -> Self {
        Self {
            id_type: IdType::Noid,
            nls_method: NlsMethod::None,
            access_class,
            id: [0; 8],
        }
    }

    /// Unicast addressee by unique identifier.
    pub fn uid(uid: [u8; 8], access_class: u8) -> Self {
        Self {
            id_type: IdType::Uid,
            nls_method: NlsMethod::None,
            access_class,
            id: uid,
        }
    }

    /// Unicast addressee by virtual identifier.
    pub fn vid(vid: [u8; 2], access_class: u8) -> Self {
        let mut id = [0; 8];
        id[..2].copy_from_slice(&vid);
        Self {
            id_type: IdType::Vid,
            nls_method: NlsMethod::None,
            access_class,
            id,
        }
    }

    /// Same addressee with a different security method.
    pub fn with_nls_method(mut self, nls_method: NlsMethod) -> Self {
        self.nls_method = nls_method;
        self
    }

    /// Significant identifier bytes.
    pub fn id_bytes(&self) -> &[u8] {
        &self.id[..self.id_type.id_length()]
    }

    /// Control byte: id type in bits 5..4, security method in bits 3..0.
    pub fn control(&self) -> u8 {
        ((self.id_type as u8) << 4) | (self.nls_method as u8)
    }
}

impl Default for Addressee {
    fn default() -> Self {
        Self::broadcast(0x01)
    }
}

/// Response mode of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseMode {
    No = 0,
    All = 1,
    Any = 2,
    NoRepeat = 4,
    OnError = 5,
    Preferred = 6,
}

impl ResponseMode {
    pub fn from_bits(bits: u8) -> Result<Self, CodecError> {
        match bits {
            0 => Ok(ResponseMode::No),
            1 => Ok(ResponseMode::All),
            2 => Ok(ResponseMode::Any),
            4 => Ok(ResponseMode::NoRepeat),
            5 => Ok(ResponseMode::OnError),
            6 => Ok(ResponseMode::Preferred),
            other => Err(CodecError::InvalidResponseMode(other)),
        }
    }
}

/// Quality-of-service parameters of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Qos {
    pub response_mode: ResponseMode,
    /// Retry policy index, 0..=7. Interpreted by the engine.
    pub retry_mode: u8,
    pub stop_on_error: bool,
    pub record: bool,
}

impl Qos {
    /// Packed form: stop-on-error bit 7, record bit 6, retry bits 5..3, response bits 2..0.
    pub fn to_byte(&self) -> u8 {
        (u8::from(self.stop_on_error) << 7)
            | (u8::from(self.record) << 6)
            | ((self.retry_mode & 0x07) << 3)
            | (self.response_mode as u8)
    }

    pub fn from_byte(byte: u8) -> Result<Self, CodecError> {
        Ok(Self {
            response_mode: ResponseMode::from_bits(byte & 0x07)?,
            retry_mode: (byte >> 3) & 0x07,
            stop_on_error: byte & 0x80 != 0,
            record: byte & 0x40 != 0,
        })
    }
}

impl Default for Qos {
    fn default() -> Self {
        Self {
            response_mode: ResponseMode::Any,
            retry_mode: 0,
            stop_on_error: false,
            record: false,
        }
    }
}

/// Configuration of one session, owned by the sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    pub qos: Qos,
    pub dormant_timeout: u8,
    pub addressee: Addressee,
}

/// Radio channel a packet was received on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Channel {
    pub header: u8,
    pub center_freq_index: u16,
}

/// Status flags of a received packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResultStatus {
    pub unicast: bool,
    pub nls: bool,
    pub retry: bool,
    pub missed: bool,
}

impl ResultStatus {
    /// Packed form: nls bit 7, missed bit 6, retry bit 5, unicast bit 4.
    pub fn to_byte(&self) -> u8 {
        (u8::from(self.nls) << 7)
            | (u8::from(self.missed) << 6)
            | (u8::from(self.retry) << 5)
            | (u8::from(self.unicast) << 4)
    }

    pub fn from_byte(byte: u8) -> Self {
        Self {
            nls: byte & 0x80 != 0,
            missed: byte & 0x40 != 0,
            retry: byte & 0x20 != 0,
            unicast: byte & 0x10 != 0,
        }
    }
}

/// Reception metadata delivered with every inbound payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionResult {
    pub channel: Channel,
    pub rx_level: u8,
    pub link_budget: u8,
    pub target_rx_level: u8,
    pub status: ResultStatus,
    pub fifo_token: u8,
    pub seqnr: u8,
    /// Response timeout, in engine ticks.
    pub response_to: u32,
    pub addressee: Addressee,
}

/// Radio transmit power index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxPower(u8);

impl TxPower {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 16;

    /// Returns `None` when `level` is outside `1..=16`.
    pub fn new(level: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&level).then_some(Self(level))
    }

    pub fn level(self) -> u8 {
        self.0
    }
}
