use std::net::Ipv4Addr;

use ios_intent::parse::{CdpNeighborParser, CommandParser, InterfaceBriefParser};

#[test]
fn test_interface_brief_trailing_fields() {
    let output = "\
Interface              IP-Address      OK? Method Status                Protocol
GigabitEthernet0/0     198.51.100.11   YES NVRAM  up                    up
GigabitEthernet0/1     unassigned      YES unset  administratively down down
Loopback0              1.1.1.1         YES manual up                    up
";
    let table = InterfaceBriefParser.parse(output).unwrap();

    let rows: Vec<_> = table
        .iter()
        .map(|(name, s)| {
            (
                name,
                s.ip,
                s.ok.as_str(),
                s.method.as_str(),
                s.status.as_str(),
                s.protocol.as_str(),
            )
        })
        .collect();
    assert_eq!(
        rows,
        vec![
            ("g0/0", Some(Ipv4Addr::new(198, 51, 100, 11)), "YES", "NVRAM", "up", "up"),
            ("g0/1", None, "YES", "unset", "down", "down"),
            ("lo0", Some(Ipv4Addr::new(1, 1, 1, 1)), "YES", "manual", "up", "up"),
        ]
    );
}

#[test]
fn test_cdp_three_row_sample() {
    let output = "\
Capability Codes: R - Router, T - Trans Bridge, B - Source Route Bridge
                  S - Switch, H - Host, I - IGMP, r - Repeater, P - Phone,
                  D - Remote, C - CVTA, M - Two-port Mac Relay

Device ID        Local Intrfce     Holdtme    Capability  Platform  Port ID
R2.npa.com       Gig 0/1           150           R B S I  CISCO2911 Gig 0/1
S1.npa.com       Gig 0/0           128             S I    WS-C3750  Gig 1/0/2
R3.lab.net       Gig 0/2           139           R B S I  CISCO2911 Gig 0/0

Total cdp entries displayed : 3
";
    let neighbors = CdpNeighborParser::default().parse(output).unwrap();
    let rows: Vec<_> = neighbors
        .iter()
        .map(|n| {
            (
                n.local_interface.as_str(),
                n.remote_port.as_str(),
                n.remote_device.as_str(),
            )
        })
        .collect();
    assert_eq!(
        rows,
        vec![("Gig0/1", "Gig 0/1", "R2"), ("Gig0/0", "Gig 1/0/2", "S1")]
    );

    let lab = CdpNeighborParser::new(".lab.net").parse(output).unwrap();
    assert_eq!(lab.len(), 1);
    assert_eq!(lab[0].remote_device, "R3");
}
