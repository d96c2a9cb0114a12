//! Global configuration options for a probing run.
//!
//! The command-line layer fills this struct incrementally, then calls
//! [`Config::finalize`] exactly once to resolve everything still unset.
//! From that point on the configuration is read-only for the life of
//! the process; the probing and receiving halves consume it as-is.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::net::Ipv6Addr;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use pnet::util::MacAddr;

use crate::debug;
use crate::params::ParamTable;
use crate::probe::ProbeType;

/// Output file used when `--output` is absent (outside testing mode).
pub const DEFAULT_OUTPUT: &str = "output.ywp";

/// Field list of the record format written after the header.
const OUTPUT_FIELDS: &str =
    "target sec usec type code ttl hop rtt ipid psize rsize rttl rtos count";

/// Where resolved records go: standard output when `--output -` was
/// given, otherwise the named file opened for appending.
#[derive(Debug)]
pub enum OutputSink {
    Stdout,
    File(File),
}

impl OutputSink {
    /// `-` selects stdout. Any other path is created if missing and
    /// opened in append mode, so reruns extend an existing capture
    /// instead of truncating it.
    pub fn open(path: &str) -> io::Result<Self> {
        if path == "-" {
            Ok(OutputSink::Stdout)
        } else {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Ok(OutputSink::File(file))
        }
    }
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputSink::Stdout => io::stdout().write(buf),
            OutputSink::File(file) => file.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputSink::Stdout => io::stdout().flush(),
            OutputSink::File(file) => file.flush(),
        }
    }
}

/// Fully resolved state of a single run.
#[derive(Debug)]
pub struct Config {
    /// Probing method and address family, from `--type`.
    pub probe_type: ProbeType,

    /// Address family shortcut derived from `probe_type`.
    ///
    /// IPv6 runs build their own Ethernet frames, which is why they
    /// additionally require `interface` and accept the MAC overrides.
    pub ipv6: bool,

    /// Transport destination port.
    ///
    /// Stays `0` through flag processing when `--port` was absent;
    /// [`Config::finalize`] replaces `0` with the probe type's default
    /// (DNS for UDP types, HTTP otherwise). Never `0` afterwards.
    pub dst_port: u16,

    /// Highest TTL probed per target.
    pub max_ttl: u8,

    /// TTL up to which fill probes are issued.
    pub fill_mode: u8,

    /// Neighborhood TTL below which every address of a prefix is probed.
    pub ttl_neighborhood: u8,

    /// Probing rate in packets per second.
    pub rate: u32,

    /// Seed for the target permutation. Defaults to the current Unix
    /// time, so two unseeded runs probe in different orders.
    pub seed: u64,

    /// Probe budget for the run.
    ///
    /// `0` (the default) means unlimited: the run ends when the target
    /// space is exhausted rather than after a fixed number of probes.
    pub count: u32,

    /// Probe targets in a random permutation; `--sequential` clears it.
    pub random_scan: bool,

    /// Mean of the Poisson TTL distribution; `0` keeps TTLs uniform.
    pub poisson: u8,

    /// Record RTTs in milliseconds instead of microseconds.
    pub coarse: bool,

    /// Probing half enabled; cleared by `--receiveonly`.
    pub probe: bool,

    /// Receiving half enabled; cleared by `--probeonly`.
    pub receive: bool,

    /// Prober instance for multi-vantage runs.
    pub instance: u8,

    /// Dry run: resolve the configuration but never send a probe and
    /// never touch the output file.
    pub testing: bool,

    /// Diagnostic verbosity, one step per `-v`.
    pub verbosity: u8,

    /// Walk the entire address space of the selected family.
    pub entire: bool,

    /// File of target prefixes, from `--input`.
    pub input_file: Option<String>,

    /// BGP RIB used to restrict probing to announced space.
    pub bgp_file: Option<String>,

    /// File of prefixes that must never be probed.
    pub blocklist: Option<String>,

    /// Output destination as given on the command line, or
    /// [`DEFAULT_OUTPUT`] once finalized.
    pub output: Option<String>,

    /// Open sink behind `output`. `None` until finalized, and stays
    /// `None` for the whole run in testing mode.
    pub out: Option<OutputSink>,

    /// Network interface to probe from; required for IPv6 runs.
    pub interface: Option<String>,

    /// Source spec of a probe-only run.
    pub probe_src: Option<String>,

    /// Source MAC override for self-built frames.
    pub src_mac: Option<MacAddr>,

    /// Gateway MAC override for self-built frames.
    pub dst_mac: Option<MacAddr>,

    /// Source address override for IPv6 runs.
    pub src_addr: Option<Ipv6Addr>,

    /// Prefixes given directly on the command line.
    pub targets: Vec<String>,

    /// Parameter table dumped as the output header.
    pub params: ParamTable,
}

impl Default for Config {
    fn default() -> Self {
        let mut params = ParamTable::new();
        params.set("Program", program_banner(), true);
        params.set("RTT_Granularity", "us", true);
        params.set("Targets", "entire", true);

        Config {
            probe_type: ProbeType::default(),
            ipv6: false,
            dst_port: 0,
            max_ttl: 16,
            fill_mode: 32,
            ttl_neighborhood: 0,
            rate: 10,
            seed: unix_time(),
            count: 0,
            random_scan: true,
            poisson: 0,
            coarse: false,
            probe: true,
            receive: true,
            instance: 0,
            testing: false,
            verbosity: 0,
            entire: false,
            input_file: None,
            bgp_file: None,
            blocklist: None,
            output: None,
            out: None,
            interface: None,
            probe_src: None,
            src_mac: None,
            dst_mac: None,
            src_addr: None,
            targets: Vec::new(),
            params,
        }
    }
}

impl Config {
    /// Resolves everything still unset once flag processing is done and
    /// records the derived parameter entries.
    ///
    /// In testing mode the output step is skipped entirely: no default
    /// name is chosen and no file is opened. Failing to open the output
    /// is the only error here and is fatal to the caller.
    pub fn finalize(&mut self) -> Result<()> {
        if !self.testing {
            let path = self
                .output
                .get_or_insert_with(|| DEFAULT_OUTPUT.to_string())
                .clone();
            debug!("output destination: {path}");
            let sink = OutputSink::open(&path).with_context(|| format!("cannot open {path}"))?;
            self.out = Some(sink);
        }

        if self.dst_port == 0 {
            self.dst_port = self.probe_type.default_port();
        }

        self.params.set("Program", program_banner(), true);
        self.params.set("Seed", self.seed, true);
        self.params.set("Random", self.random_scan, true);
        self.params.set("Rate", self.rate, true);
        self.params.set("Trace_Type", self.probe_type.token(), true);
        self.params.set("Start", "unknown", true);
        self.params.set("Fill_Mode", self.fill_mode, true);
        self.params.set("Max_TTL", self.max_ttl, true);
        self.params.set("TTL_Nbrhd", self.ttl_neighborhood, true);
        self.params.set("Dst_Port", self.dst_port, true);
        self.params.set("Output_Fields", OUTPUT_FIELDS, true);

        Ok(())
    }

    /// Dumps the parameter table into the output sink as the header of
    /// the record stream. A no-op when no sink is open (testing mode).
    pub fn write_header(&mut self) -> io::Result<()> {
        match &mut self.out {
            Some(out) => self.params.dump(out),
            None => Ok(()),
        }
    }
}

fn program_banner() -> String {
    format!("yawp v{}", env!("CARGO_PKG_VERSION"))
}

fn unix_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
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
    use crate::params::ParamValue;

    fn testing_config() -> Config {
        Config {
            testing: true,
            ..Config::default()
        }
    }

    #[test]
    fn port_defaults_follow_the_probe_type() {
        let table = [
            (ProbeType::Icmp, 80),
            (ProbeType::IcmpReply, 80),
            (ProbeType::TcpSyn, 80),
            (ProbeType::TcpAck, 80),
            (ProbeType::Udp, 53),
            (ProbeType::Icmp6, 80),
            (ProbeType::Udp6, 53),
            (ProbeType::Tcp6Syn, 80),
            (ProbeType::Tcp6Ack, 80),
        ];

        for (probe_type, port) in table {
            let mut cfg = testing_config();
            cfg.probe_type = probe_type;
            cfg.finalize().unwrap();
            assert_eq!(cfg.dst_port, port, "wrong default port for {probe_type}");
        }
    }

    #[test]
    fn explicit_port_survives_finalize() {
        let mut cfg = testing_config();
        cfg.probe_type = ProbeType::Udp;
        cfg.dst_port = 8080;
        cfg.finalize().unwrap();

        assert_eq!(cfg.dst_port, 8080);
        assert_eq!(cfg.params.get("Dst_Port"), Some(&ParamValue::Int(8080)));
    }

    #[test]
    fn testing_mode_never_touches_the_output() {
        let mut cfg = testing_config();
        cfg.finalize().unwrap();

        assert!(cfg.output.is_none());
        assert!(cfg.out.is_none());
        cfg.write_header().unwrap();
    }

    #[test]
    fn derived_entries_are_always_recorded() {
        let mut cfg = testing_config();
        cfg.finalize().unwrap();

        for name in [
            "Program",
            "Seed",
            "Random",
            "Rate",
            "Trace_Type",
            "Start",
            "Fill_Mode",
            "Max_TTL",
            "TTL_Nbrhd",
            "Dst_Port",
            "Output_Fields",
        ] {
            assert!(cfg.params.get(name).is_some(), "missing entry {name}");
        }
        assert_eq!(
            cfg.params.get("Trace_Type"),
            Some(&ParamValue::Str("TCP_ACK".to_string()))
        );
        assert_eq!(cfg.params.get("Start"), Some(&ParamValue::Str("unknown".to_string())));
    }

    #[test]
    fn dash_output_selects_stdout() {
        let mut cfg = Config::default();
        cfg.output = Some("-".to_string());
        cfg.finalize().unwrap();

        assert!(matches!(cfg.out, Some(OutputSink::Stdout)));
    }

    #[test]
    fn missing_output_defaults_to_the_fixed_filename() {
        let mut cfg = Config::default();
        cfg.finalize().unwrap();

        assert_eq!(cfg.output.as_deref(), Some(DEFAULT_OUTPUT));
        assert!(matches!(cfg.out, Some(OutputSink::File(_))));

        drop(cfg);
        let _ = std::fs::remove_file(DEFAULT_OUTPUT);
    }

    #[test]
    fn unopenable_output_is_an_error() {
        let mut cfg = Config::default();
        cfg.output = Some("/nonexistent-dir/run.ywp".to_string());

        assert!(cfg.finalize().is_err());
    }

    #[test]
    fn header_lands_in_the_output_file() {
        let path = std::env::temp_dir().join(format!("yawp-header-{}.ywp", std::process::id()));
        let path_str = path.to_string_lossy().into_owned();
        let _ = std::fs::remove_file(&path);

        let mut cfg = Config::default();
        cfg.output = Some(path_str);
        cfg.finalize().unwrap();
        cfg.write_header().unwrap();
        drop(cfg);

        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let banner = format!("# Program: yawp v{}\n", env!("CARGO_PKG_VERSION"));
        assert!(text.starts_with(&banner), "header starts with {text:?}");
        assert!(text.contains("# Trace_Type: TCP_ACK\n"));
        assert!(text.contains("# RTT_Granularity: us\n"));
        assert!(text.lines().all(|line| line.starts_with("# ")));
    }
}
