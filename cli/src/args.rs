// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Command Line Interface Definitions
//!
//! This module defines the strict schema for user input.
//!
//! It serves as the single source of truth for the application's command-line
//! interface: every flag, its short and long spelling, and its help text live
//! here and nowhere else.
//!
//! ## Architectural Role
//!
//! This module performs two key architectural functions:
//!
//! 1.  **Input Normalization**: It uses `clap` to validate user inputs, making sure
//!     that numeric flags are strictly typed, probe types come from the supported
//!     set, and MAC and IPv6 literals decode to their binary form before the
//!     application attempts to run.
//! 2.  **State Translation**: via the `From<&CommandLine> for Config` implementation,
//!     it decouples the external interface (CLI flags) from the internal application
//!     state (`Config`). This allows the probing engine to remain agnostic of the
//!     user interface layer.
//!
//! Parsing never terminates the process: [`CommandLine::parse_args`] hands usage
//! failures (including help requests and an empty argument vector) back to the
//! caller as values, and the binary owns the exit path.

use std::net::Ipv6Addr;

use clap::{ArgAction, Parser};
use pnet::util::MacAddr;
use yawp_common::config::Config;
use yawp_common::probe::ProbeType;
use yawp_common::utils::mac::parse_mac;

const TARGET_HELP: &str = "\
Targets:
  List of IPv4 or IPv6 prefixes.
    Example: 192.168.1.0/24
             2602:306:8b92:b000::/47";

#[derive(Parser, Debug)]
#[command(name = "yawp")]
#[command(about = "High-speed stateless Internet route prober.")]
#[command(after_help = TARGET_HELP, arg_required_else_help = true)]
pub struct CommandLine {
    /// Input target file
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: Option<String>,

    /// Output file (default: output.ywp, `-` for stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<String>,

    /// Probes to issue (default: unlimited)
    #[arg(short = 'c', long = "count", value_name = "N")]
    pub count: Option<u32>,

    /// Probe type: ICMP, ICMP_REPLY, TCP_SYN, TCP_ACK, UDP, ICMP6, UDP6, TCP6_SYN, TCP6_ACK
    #[arg(short = 't', long = "type", value_name = "TYPE", default_value_t = ProbeType::default())]
    pub probe_type: ProbeType,

    /// Scan rate in pps
    #[arg(short = 'r', long = "rate", value_name = "PPS", default_value_t = 10)]
    pub rate: u32,

    /// Maximum TTL
    #[arg(short = 'm', long = "maxttl", value_name = "TTL", default_value_t = 16)]
    pub max_ttl: u8,

    /// Increase logging detail (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbosity: u8,

    /// Fill mode maxttl
    #[arg(short = 'F', long = "fillmode", value_name = "TTL", default_value_t = 32)]
    pub fill_mode: u8,

    /// Scan sequentially (default: random)
    #[arg(short = 's', long = "sequential")]
    pub sequential: bool,

    /// Neighborhood TTL
    #[arg(short = 'n', long = "neighborhood", value_name = "TTL", default_value_t = 0)]
    pub ttl_neighborhood: u8,

    /// BGP table (default: none)
    #[arg(short = 'b', long = "bgp", value_name = "FILE")]
    pub bgp: Option<String>,

    /// Prefix blocklist (default: none)
    #[arg(short = 'B', long = "blocklist", value_name = "FILE")]
    pub blocklist: Option<String>,

    /// Seed (default: random)
    #[arg(short = 'S', long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,

    /// Transport dst port (default: 80, 53 for UDP types)
    #[arg(short = 'p', long = "port", value_name = "PORT")]
    pub port: Option<u16>,

    /// Prober instance (default: 0)
    #[arg(short = 'E', long = "instance", value_name = "N")]
    pub instance: Option<u8>,

    /// Don't send probes (default: off)
    #[arg(short = 'T', long = "testing")]
    pub testing: bool,

    /// Entire IPv4/IPv6 Internet (default: off)
    #[arg(short = 'Q', long = "entire")]
    pub entire: bool,

    /// Poisson TTLs (default: uniform)
    #[arg(short = 'Z', long = "poisson", value_name = "MEAN")]
    pub poisson: Option<u8>,

    /// Network interface (required for IPv6)
    #[arg(short = 'I', long = "interface", value_name = "IFACE")]
    pub interface: Option<String>,

    /// IPv6 address of the probing host (default: auto)
    #[arg(short = 'a', long = "srcaddr", value_name = "ADDR")]
    pub src_addr: Option<Ipv6Addr>,

    /// MAC of gateway router (default: auto)
    #[arg(short = 'G', long = "dstmac", value_name = "MAC", value_parser = parse_mac)]
    pub dst_mac: Option<MacAddr>,

    /// MAC of probing host (default: auto)
    #[arg(short = 'M', long = "srcmac", value_name = "MAC", value_parser = parse_mac)]
    pub src_mac: Option<MacAddr>,

    /// Record RTTs with millisecond granularity
    #[arg(short = 'C', long = "coarse", hide = true)]
    pub coarse: bool,

    /// Probe from the given source spec without receiving
    #[arg(short = 'P', long = "probeonly", value_name = "SPEC", hide = true)]
    pub probe_only: Option<String>,

    /// Receive responses without probing
    #[arg(short = 'R', long = "receiveonly", hide = true)]
    pub receive_only: bool,

    #[arg(value_name = "TARGETS")]
    pub targets: Vec<String>,
}

impl CommandLine {
    pub fn parse_args() -> Result<Self, clap::Error> {
        Self::try_parse()
    }
}

impl From<&CommandLine> for Config {
    /// Applies every present flag to a freshly defaulted configuration.
    ///
    /// Flags worth reporting are echoed into the parameter table as they are
    /// applied; derived entries (seed, rate, resolved port and friends) are
    /// recorded later by [`Config::finalize`].
    fn from(cmd: &CommandLine) -> Self {
        let mut cfg = Config {
            probe_type: cmd.probe_type,
            ipv6: cmd.probe_type.is_ipv6(),
            max_ttl: cmd.max_ttl,
            fill_mode: cmd.fill_mode,
            ttl_neighborhood: cmd.ttl_neighborhood,
            rate: cmd.rate,
            verbosity: cmd.verbosity,
            testing: cmd.testing,
            entire: cmd.entire,
            coarse: cmd.coarse,
            interface: cmd.interface.clone(),
            src_addr: cmd.src_addr,
            src_mac: cmd.src_mac,
            dst_mac: cmd.dst_mac,
            targets: cmd.targets.clone(),
            ..Config::default()
        };

        if let Some(seed) = cmd.seed {
            cfg.seed = seed;
        }
        if let Some(port) = cmd.port {
            cfg.dst_port = port;
        }
        if cmd.sequential {
            cfg.random_scan = false;
            cfg.params.set("Sequential", true, true);
        }
        if cmd.coarse {
            cfg.params.set("RTT_Granularity", "ms", true);
        }
        if let Some(count) = cmd.count {
            cfg.count = count;
            cfg.params.set("Count", count, true);
        }
        if let Some(instance) = cmd.instance {
            cfg.instance = instance;
            cfg.params.set("Instance", instance, true);
        }
        if let Some(poisson) = cmd.poisson {
            cfg.poisson = poisson;
            cfg.params.set("Poisson", poisson, true);
        }
        if let Some(input) = &cmd.input {
            cfg.input_file = Some(input.clone());
            cfg.params.set("Targets", input.clone(), true);
        }
        if let Some(bgp) = &cmd.bgp {
            cfg.bgp_file = Some(bgp.clone());
            cfg.params.set("BGP_table", bgp.clone(), true);
        }
        if let Some(blocklist) = &cmd.blocklist {
            cfg.blocklist = Some(blocklist.clone());
            cfg.params.set("Blocklist", blocklist.clone(), true);
        }
        if let Some(output) = &cmd.output {
            cfg.output = Some(output.clone());
            cfg.params.set("Output", output.clone(), true);
        }
        if let Some(spec) = &cmd.probe_only {
            cfg.probe_src = Some(spec.clone());
            cfg.receive = false;
        }
        if cmd.receive_only {
            cfg.probe = false;
        }

        cfg
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
