// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! This module is commonly used for **Medium Access Control (MAC)** address operations.
//!
//! Gateway and host MAC overrides arrive on the command line as textual
//! literals; the link-layer sender needs them in binary form.

use pnet::util::MacAddr;
use thiserror::Error;

/// Why a MAC literal failed to decode.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MacParseError {
    #[error("expected 6 colon-separated hex octets, got {0}")]
    GroupCount(usize),
    #[error("invalid hex octet '{0}'")]
    InvalidOctet(String),
}

/// Decodes a literal such as `aa:bb:cc:dd:ee:ff`. Single-digit groups
/// are accepted (`0:1:2:3:4:5`); a literal without exactly six groups,
/// or with a group that does not parse as a hex byte, is rejected with
/// the offending part named.
pub fn parse_mac(s: &str) -> Result<MacAddr, MacParseError> {
    let groups: Vec<&str> = s.split(':').collect();
    if groups.len() != 6 {
        return Err(MacParseError::GroupCount(groups.len()));
    }

    let mut octets = [0u8; 6];
    for (octet, group) in octets.iter_mut().zip(&groups) {
        *octet = u8::from_str_radix(group, 16)
            .map_err(|_| MacParseError::InvalidOctet((*group).to_string()))?;
    }

    Ok(MacAddr::new(
        octets[0], octets[1], octets[2], octets[3], octets[4], octets[5],
    ))
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
    use proptest::prelude::*;

    #[test]
    fn decodes_octets_in_order() {
        let mac = parse_mac("aa:bb:cc:dd:ee:ff").unwrap();
        assert_eq!(mac, MacAddr::new(0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF));
    }

    #[test]
    fn accepts_short_and_mixed_case_groups() {
        assert_eq!(
            parse_mac("0:1:2:3:4:5").unwrap(),
            MacAddr::new(0x00, 0x01, 0x02, 0x03, 0x04, 0x05)
        );
        assert_eq!(
            parse_mac("DE:ad:BE:ef:00:01").unwrap(),
            MacAddr::new(0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x01)
        );
    }

    #[test]
    fn wrong_group_count_is_reported() {
        assert_eq!(parse_mac("aa:bb:cc:dd:ee"), Err(MacParseError::GroupCount(5)));
        assert_eq!(
            parse_mac("aa:bb:cc:dd:ee:ff:00"),
            Err(MacParseError::GroupCount(7))
        );
        assert_eq!(parse_mac(""), Err(MacParseError::GroupCount(1)));
    }

    #[test]
    fn invalid_octets_are_reported() {
        assert_eq!(
            parse_mac("aa:bb:cc:dd:ee:fg"),
            Err(MacParseError::InvalidOctet("fg".to_string()))
        );
        assert_eq!(
            parse_mac("aa:bb:cc:dd:ee:"),
            Err(MacParseError::InvalidOctet("".to_string()))
        );
        assert_eq!(
            parse_mac("1ff:bb:cc:dd:ee:00"),
            Err(MacParseError::InvalidOctet("1ff".to_string()))
        );
    }

    proptest! {
        #[test]
        fn formatted_octets_round_trip(bytes in any::<[u8; 6]>()) {
            let text = format!(
                "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
                bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5]
            );
            let mac = parse_mac(&text).unwrap();
            prop_assert_eq!(mac.octets(), bytes);
        }

        #[test]
        fn arbitrary_input_never_panics(s in ".*") {
            let _ = parse_mac(&s);
        }
    }
}
