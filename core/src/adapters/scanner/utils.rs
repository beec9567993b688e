//! Address parsing shared by the platform scanners.

pub struct Utils;

impl Utils {
    /// Port of an `address:port` socket string.
    ///
    /// Handles multiple address formats:
    /// - IPv4: "127.0.0.1:3000" or "*:8080"
    /// - IPv6: "\[::1]:3000" or "\[fe80::1]:8080"
    /// - Interface scoped: "127.0.0.1%lo:3000"
    pub fn parse_port(address: &str) -> Option<u16> {
        let port = if address.starts_with('[') {
            let bracket_end = address.find(']')?;
            address[bracket_end + 1..].strip_prefix(':')?
        } else {
            let last_colon = address.rfind(':')?;
            &address[last_colon + 1..]
        };
        port.parse().ok()
    }

    /// Local side of an lsof connection name such as
    /// `127.0.0.1:3130->127.0.0.1:52100`.
    pub fn local_side(name: &str) -> &str {
        name.split("->").next().unwrap_or(name)
    }
}
