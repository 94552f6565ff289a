use d7amux_session::{resolve_device_address, DeviceAddress};
use d7amux_store::{DeviceStore, JsonFileStore, MemoryStore};
use serde::Serialize;

use crate::cmd::AddressArgs;
use crate::exit::{store_error, CliResult, SUCCESS};
use crate::output::{print_records, OutputFormat, Render};

#[derive(Debug, Serialize)]
struct AddressRow {
    id_type: &'static str,
    address: String,
    access_class: u8,
}

impl Render for AddressRow {
    fn headers() -> Vec<&'static str> {
        vec!["TYPE", "ADDRESS", "ACCESS CLASS"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id_type.to_string(),
            self.address.clone(),
            format!("0x{:02X}", self.access_class),
        ]
    }

    fn pretty(&self) -> String {
        format!(
            "{}={} access_class=0x{:02X}",
            self.id_type, self.address, self.access_class
        )
    }
}

pub fn run(args: AddressArgs, format: OutputFormat) -> CliResult<i32> {
    let row = match args.store {
        Some(path) => {
            let mut store = JsonFileStore::new(&path);
            store
                .init()
                .map_err(|err| store_error(&format!("failed loading {}", path.display()), err))?;
            address_row(&store)?
        }
        None => {
            let mut store = MemoryStore::default();
            store
                .init()
                .map_err(|err| store_error("store init failed", err))?;
            address_row(&store)?
        }
    };

    print_records(&[row], format);
    Ok(SUCCESS)
}

fn address_row<S: DeviceStore>(store: &S) -> CliResult<AddressRow> {
    let address: DeviceAddress =
        resolve_device_address(store).map_err(|err| store_error("address lookup failed", err))?;
    let access_class = store
        .read_active_access_class()
        .map_err(|err| store_error("access class lookup failed", err))?;
    Ok(AddressRow {
        id_type: address.id_type().name(),
        address: address.to_string(),
        access_class,
    })
}
