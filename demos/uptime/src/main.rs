//! Uptime service demo.
//!
//! Publishes the uptime service to a simulated host, advertises it and then updates the uptime
//! once per second while a simulated peer subscribes, reads and confirms indications.

mod logger;
mod sim;
mod uptime;

use ble_utils::{
    adv::{AdStructure, Flags, ScanResponse, LEGACY_PAYLOAD_LEN},
    bytes::encode,
    gatt::{CCC_INDICATE, CCC_NOTIFY},
};
use log::{error, info, warn};
use std::{
    process, thread,
    time::{Duration, Instant},
};

use crate::{
    sim::SimHost,
    uptime::{Characteristics, BASIC_UUID, INDICATE_UUID, NOTIFY_UUID, SERVICE_UUID},
};

/// Number of uptime updates before the demo exits.
const TICKS: u32 = 5;

fn main() {
    logger::init();
    info!("Starting Uptime BLE Utils sample");

    let characteristics = Characteristics::new();
    let service = characteristics.service();

    let mut scan_rsp: ScanResponse = ScanResponse::new();
    if let Err(e) = scan_rsp.register_service(SERVICE_UUID) {
        warn!("service not announced in scan response: {}", e);
    }

    let mut host = SimHost::new();
    let ret = service.init(&mut host);
    if ret != 0 {
        error!("Service init failed (err {})", ret);
        process::exit(1);
    }
    info!("Service published ({} attributes)", service.attr_count());

    advertise(&scan_rsp);

    let start = Instant::now();
    for tick in 0..TICKS {
        match tick {
            1 => host.peer_subscribe(NOTIFY_UUID, CCC_NOTIFY),
            2 => host.peer_subscribe(INDICATE_UUID, CCC_INDICATE),
            4 => host.peer_subscribe(NOTIFY_UUID, 0),
            _ => {}
        }

        let uptime = start.elapsed().as_secs() as u32;
        characteristics.update(&mut host, uptime);
        host.peer_read(BASIC_UUID);
        host.peer_confirm();

        thread::sleep(Duration::from_secs(1));
    }

    info!("Done after {} updates", TICKS);
}

/// Logs the advertising data and scan response the host would send.
fn advertise(scan_rsp: &ScanResponse) {
    let mut buf = [0; LEGACY_PAYLOAD_LEN];
    match encode(&AdStructure::from(Flags::discoverable()), &mut buf) {
        Ok(bytes) => info!("advertising data: {:02x?}", bytes),
        Err(e) => error!("cannot encode advertising data: {}", e),
    }

    let mut buf = [0; LEGACY_PAYLOAD_LEN];
    match encode(scan_rsp, &mut buf) {
        Ok(bytes) => info!("scan response: {:02x?}", bytes),
        Err(e) => error!("cannot encode scan response: {}", e),
    }
}
