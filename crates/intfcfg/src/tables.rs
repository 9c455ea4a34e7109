//! YANG container and leaf name constants

// openconfig-interfaces containers
pub const OC_INTERFACES: &str = "openconfig-interfaces:interfaces";
pub const OC_CONFIG: &str = "openconfig-interfaces:config";
pub const OC_ENABLED: &str = "openconfig-interfaces:enabled";

// openconfig-if-ethernet containers
pub const OC_ETHERNET_CONFIG: &str = "openconfig-if-ethernet:config";

// sonic-port leaves
pub const SONIC_VALID_SPEEDS: &str = "sonic-port:valid_speeds";

// Path suffixes below an interface resource
pub mod paths {
    pub const CONFIG: &str = "/config";
    pub const DESCRIPTION: &str = "/config/description";
    pub const ENABLED: &str = "/config/enabled";
    pub const MTU: &str = "/config/mtu";
    pub const PORT_FEC: &str = "/openconfig-if-ethernet-ext2:port-fec";
    pub const PORT_SPEED: &str = "/port-speed";
    pub const AUTO_NEGOTIATE: &str = "/auto-negotiate";
    pub const ADVERTISED_SPEED: &str = "/openconfig-if-ethernet-ext2:advertised-speed";
    pub const VALID_SPEEDS: &str = "/valid_speeds";
}

// Interface config leaves
pub mod intf_fields {
    pub const NAME: &str = "name";
    pub const CONFIG: &str = "config";
    pub const DESCRIPTION: &str = "description";
    pub const ENABLED: &str = "enabled";
    pub const MTU: &str = "mtu";
    pub const INTERFACE: &str = "interface";
}

// Ethernet config leaves
pub mod eth_fields {
    pub const PORT_SPEED: &str = "port-speed";
    pub const AUTO_NEGOTIATE: &str = "auto-negotiate";
    pub const PORT_FEC: &str = "openconfig-if-ethernet-ext2:port-fec";
    pub const ADVERTISED_SPEED: &str = "openconfig-if-ethernet-ext2:advertised-speed";
}
