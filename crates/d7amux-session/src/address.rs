use std::fmt;

use d7amux_engine::{Addressee, IdType};
use d7amux_store::{DeviceStore, StoreError};

/// Stored VID value meaning "no virtual identifier assigned".
pub const VID_UNSET: [u8; 2] = [0xFF, 0xFF];

/// Active address of this device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceAddress {
    Uid([u8; 8]),
    Vid([u8; 2]),
}

impl DeviceAddress {
    pub fn id_type(&self) -> IdType {
        match self {
            DeviceAddress::Uid(_) => IdType::Uid,
            DeviceAddress::Vid(_) => IdType::Vid,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            DeviceAddress::Uid(uid) => uid,
            DeviceAddress::Vid(vid) => vid,
        }
    }

    /// Addressee targeting this device.
    pub fn to_addressee(&self, access_class: u8) -> Addressee {
        match *self {
            DeviceAddress::Uid(uid) => Addressee::uid(uid, access_class),
            DeviceAddress::Vid(vid) => Addressee::vid(vid, access_class),
        }
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.as_bytes() {
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

/// Resolve the device's active address from stored configuration.
///
/// The VID is read first; when it is [`VID_UNSET`] the UID is authoritative.
pub fn resolve_device_address<S: DeviceStore + ?Sized>(
    store: &S,
) -> Result<DeviceAddress, StoreError> {
    let vid = store.read_vid()?;
    if vid == VID_UNSET {
        return Ok(DeviceAddress::Uid(store.read_uid()?));
    }
    Ok(DeviceAddress::Vid(vid))
}

#[cfg(test)]
mod tests {
    use d7amux_store::{DeviceRecord, MemoryStore};

    use super::*;

    fn store_with(uid: [u8; 8], vid: [u8; 2]) -> MemoryStore {
        let mut store = MemoryStore::new(DeviceRecord {
            uid,
            vid,
            active_access_class: 0x01,
        });
        store.init().unwrap();
        store
    }

    #[test]
    fn unset_vid_falls_back_to_uid() {
        let store = store_with([1, 2, 3, 4, 5, 6, 7, 8], VID_UNSET);
        let address = resolve_device_address(&store).unwrap();

        assert_eq!(address, DeviceAddress::Uid([1, 2, 3, 4, 5, 6, 7, 8]));
        assert_eq!(address.id_type(), IdType::Uid);
        assert_eq!(address.to_string(), "0102030405060708");
    }

    #[test]
    fn assigned_vid_wins() {
        let store = store_with([1; 8], [0x12, 0x34]);
        let address = resolve_device_address(&store).unwrap();

        assert_eq!(address, DeviceAddress::Vid([0x12, 0x34]));
        assert_eq!(address.as_bytes(), &[0x12, 0x34]);
    }

    #[test]
    fn half_set_vid_is_a_vid() {
        for vid in [[0xFF, 0x00], [0x00, 0xFF], [0x00, 0x00]] {
            let store = store_with([1; 8], vid);
            assert_eq!(
                resolve_device_address(&store).unwrap().id_type(),
                IdType::Vid
            );
        }
    }

    #[test]
    fn addressee_from_device_address() {
        let addressee = DeviceAddress::Vid([0xAB, 0xCD]).to_addressee(0x21);
        assert_eq!(addressee.id_type, IdType::Vid);
        assert_eq!(addressee.id_bytes(), &[0xAB, 0xCD]);
        assert_eq!(addressee.access_class, 0x21);
    }

    #[test]
    fn uninitialized_store_is_an_error() {
        let store = MemoryStore::default();
        assert!(matches!(
            resolve_device_address(&store),
            Err(StoreError::NotInitialized)
        ));
    }
}
