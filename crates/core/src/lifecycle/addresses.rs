use std::net::IpAddr;

use tracing::warn;

/// `http://<ip>:<port>` for every IPv4 address on this host.
pub fn local_ipv4_urls(port: u16) -> Vec<String> {
    let interfaces = match if_addrs::get_if_addrs() {
        Ok(interfaces) => interfaces,
        Err(e) => {
            warn!("Unable to list network interfaces: {}", e);
            return Vec::new();
        }
    };

    interfaces
        .into_iter()
        .filter_map(|iface| match iface.ip() {
            IpAddr::V4(ip) => Some(format!("http://{}:{}", ip, port)),
            IpAddr::V6(_) => None,
        })
        .collect()
}
