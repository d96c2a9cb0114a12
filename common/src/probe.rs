// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Probe-type selection. The probe type fixes both the wire-level
//! probing method and the address family of a run: the `6`-suffixed
//! variants probe over IPv6, everything else over IPv4.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Raised for `--type` tokens outside the supported set.
#[derive(Debug, Error, PartialEq, Eq)]
#[error(
    "unknown probe type '{0}' (expected ICMP, ICMP_REPLY, TCP_SYN, TCP_ACK, \
     UDP, ICMP6, UDP6, TCP6_SYN or TCP6_ACK)"
)]
pub struct UnknownProbeType(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeType {
    Icmp,
    IcmpReply,
    TcpSyn,
    #[default]
    TcpAck,
    Udp,
    Icmp6,
    Udp6,
    Tcp6Syn,
    Tcp6Ack,
}

impl ProbeType {
    /// Canonical token, as accepted by `--type` and reported in the
    /// output header.
    pub const fn token(self) -> &'static str {
        match self {
            ProbeType::Icmp => "ICMP",
            ProbeType::IcmpReply => "ICMP_REPLY",
            ProbeType::TcpSyn => "TCP_SYN",
            ProbeType::TcpAck => "TCP_ACK",
            ProbeType::Udp => "UDP",
            ProbeType::Icmp6 => "ICMP6",
            ProbeType::Udp6 => "UDP6",
            ProbeType::Tcp6Syn => "TCP6_SYN",
            ProbeType::Tcp6Ack => "TCP6_ACK",
        }
    }

    pub const fn is_ipv6(self) -> bool {
        matches!(
            self,
            ProbeType::Icmp6 | ProbeType::Udp6 | ProbeType::Tcp6Syn | ProbeType::Tcp6Ack
        )
    }

    /// Destination port used when `--port` is absent: DNS for the UDP
    /// types, HTTP for everything else.
    pub const fn default_port(self) -> u16 {
        match self {
            ProbeType::Udp | ProbeType::Udp6 => 53,
            _ => 80,
        }
    }
}

impl fmt::Display for ProbeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for ProbeType {
    type Err = UnknownProbeType;

    /// Tokens match case-sensitively; `udp` is not a probe type.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ICMP" => Ok(ProbeType::Icmp),
            "ICMP_REPLY" => Ok(ProbeType::IcmpReply),
            "TCP_SYN" => Ok(ProbeType::TcpSyn),
            "TCP_ACK" => Ok(ProbeType::TcpAck),
            "UDP" => Ok(ProbeType::Udp),
            "ICMP6" => Ok(ProbeType::Icmp6),
            "UDP6" => Ok(ProbeType::Udp6),
            "TCP6_SYN" => Ok(ProbeType::Tcp6Syn),
            "TCP6_ACK" => Ok(ProbeType::Tcp6Ack),
            other => Err(UnknownProbeType(other.to_string())),
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_map_to_type_and_family() {
        let table = [
            ("ICMP", ProbeType::Icmp, false),
            ("ICMP_REPLY", ProbeType::IcmpReply, false),
            ("TCP_SYN", ProbeType::TcpSyn, false),
            ("TCP_ACK", ProbeType::TcpAck, false),
            ("UDP", ProbeType::Udp, false),
            ("ICMP6", ProbeType::Icmp6, true),
            ("UDP6", ProbeType::Udp6, true),
            ("TCP6_SYN", ProbeType::Tcp6Syn, true),
            ("TCP6_ACK", ProbeType::Tcp6Ack, true),
        ];

        for (token, expected, ipv6) in table {
            let parsed: ProbeType = token.parse().unwrap();
            assert_eq!(parsed, expected);
            assert_eq!(parsed.is_ipv6(), ipv6, "wrong family for {token}");
            assert_eq!(parsed.token(), token);
            assert_eq!(parsed.to_string(), token);
        }
    }

    #[test]
    fn unknown_tokens_are_rejected() {
        let err = "GRE".parse::<ProbeType>().unwrap_err();
        assert_eq!(err, UnknownProbeType("GRE".to_string()));
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!("udp".parse::<ProbeType>().is_err());
        assert!("tcp_ack".parse::<ProbeType>().is_err());
        assert!("Icmp6".parse::<ProbeType>().is_err());
    }

    #[test]
    fn udp_types_default_to_dns_port() {
        assert_eq!(ProbeType::Udp.default_port(), 53);
        assert_eq!(ProbeType::Udp6.default_port(), 53);
        assert_eq!(ProbeType::Icmp.default_port(), 80);
        assert_eq!(ProbeType::TcpSyn.default_port(), 80);
        assert_eq!(ProbeType::Tcp6Ack.default_port(), 80);
    }

    #[test]
    fn default_type_is_tcp_ack() {
        assert_eq!(ProbeType::default(), ProbeType::TcpAck);
    }
}
