// procfs module - Local port to owning process resolution
//
// Read-only operations: lists sockets with netstat2 and names their owners
// with sysinfo. Scans run on a background thread and are published as a
// whole, so the render path only ever does a non-blocking read of the last
// completed scan.

use crate::relay::{PortUsageTracker, ProcessInfo, ProcessLookup};
use netstat2::{get_sockets_info, AddressFamilyFlags, ProtocolFlags, ProtocolSocketInfo};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use sysinfo::{Pid, ProcessesToUpdate, System};
use thiserror::Error;
use tracing::{debug, warn};

/// How often the worker checks whether it has been asked to stop
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(100);

type PortTable = HashMap<u16, ProcessInfo>;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("failed to list sockets: {0}")]
    Sockets(String),

    #[error("port table lock poisoned")]
    Poisoned,
}

/// Resolves local ports to the process holding them
///
/// `fetch` reports `Pending` until the first scan completes, and also while
/// a new scan is being published; callers are expected to simply try again
/// on their next redraw.
pub struct SystemPortTracker {
    ports: Arc<RwLock<Option<PortTable>>>,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl SystemPortTracker {
    /// Spawn the scanning thread, rescanning every `interval`
    pub fn start(interval: Duration) -> Self {
        let ports = Arc::new(RwLock::new(None));
        let running = Arc::new(AtomicBool::new(true));

        let worker = {
            let ports = Arc::clone(&ports);
            let running = Arc::clone(&running);
            thread::Builder::new()
                .name("port-tracker".to_string())
                .spawn(move || run_worker(ports, running, interval))
        };

        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!(error = %e, "Cannot spawn port tracker thread, process names unavailable");
                None
            }
        };

        Self {
            ports,
            running,
            worker,
        }
    }

    /// Stop the scanning thread and wait for it to exit
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                warn!("Port tracker thread panicked");
            }
        }
    }

    /// Whether a scan has completed yet
    pub fn is_ready(&self) -> bool {
        self.ports
            .try_read()
            .map(|table| table.is_some())
            .unwrap_or(false)
    }
}

impl Drop for SystemPortTracker {
    fn drop(&mut self) {
        self.stop();
    }
}

impl PortUsageTracker for SystemPortTracker {
    fn fetch(&self, port: u16) -> ProcessLookup {
        match self.ports.try_read() {
            Ok(table) => match table.as_ref() {
                Some(table) => table
                    .get(&port)
                    .cloned()
                    .map(ProcessLookup::Resolved)
                    .unwrap_or(ProcessLookup::Unknown),
                None => ProcessLookup::Pending,
            },
            // being written, or a writer panicked; neither is worth blocking on
            Err(_) => ProcessLookup::Pending,
        }
    }
}

fn run_worker(ports: Arc<RwLock<Option<PortTable>>>, running: Arc<AtomicBool>, interval: Duration) {
    let mut system = System::new();

    while running.load(Ordering::Relaxed) {
        let started = Instant::now();

        match scan(&mut system).and_then(|table| publish(&ports, table)) {
            Ok(count) => debug!(ports = count, elapsed = ?started.elapsed(), "Port scan complete"),
            // keep serving the last good table
            Err(e) => warn!(error = %e, "Port scan failed"),
        }

        while running.load(Ordering::Relaxed) && started.elapsed() < interval {
            thread::sleep(STOP_POLL_INTERVAL.min(interval));
        }
    }

    debug!("Port tracker stopped");
}

fn publish(ports: &RwLock<Option<PortTable>>, table: PortTable) -> Result<usize, TrackerError> {
    let count = table.len();
    let mut guard = ports.write().map_err(|_| TrackerError::Poisoned)?;
    *guard = Some(table);
    Ok(count)
}

/// One pass over every TCP/UDP socket on the system
fn scan(system: &mut System) -> Result<PortTable, TrackerError> {
    let af_flags = AddressFamilyFlags::IPV4 | AddressFamilyFlags::IPV6;
    let proto_flags = ProtocolFlags::TCP | ProtocolFlags::UDP;
    let sockets = get_sockets_info(af_flags, proto_flags)
        .map_err(|e| TrackerError::Sockets(e.to_string()))?;

    system.refresh_processes(ProcessesToUpdate::All, true);

    let owners = sockets.into_iter().map(|si| {
        let local_port = match &si.protocol_socket_info {
            ProtocolSocketInfo::Tcp(tcp) => tcp.local_port,
            ProtocolSocketInfo::Udp(udp) => udp.local_port,
        };
        (local_port, si.associated_pids)
    });

    Ok(index_owners(owners, |pid| {
        system
            .process(Pid::from_u32(pid))
            .map(|process| process.name().to_string_lossy().into_owned())
    }))
}

/// Build the port table from (local port, owning pids) pairs
///
/// The first socket seen for a port wins. Sockets without an owner we can
/// see (other users' processes without privileges) are left out, so those
/// ports resolve to `Unknown`.
fn index_owners<I, F>(owners: I, name_of: F) -> PortTable
where
    I: IntoIterator<Item = (u16, Vec<u32>)>,
    F: Fn(u32) -> Option<String>,
{
    let mut table = PortTable::new();

    for (port, pids) in owners {
        if table.contains_key(&port) {
            continue;
        }
        let Some(&pid) = pids.first() else {
            continue;
        };
        let info = match name_of(pid) {
            Some(name) => ProcessInfo {
                name,
                pid: Some(pid),
            },
            // exited between the socket listing and the process refresh
            None => continue,
        };
        table.insert(port, info);
    }

    table
}
