// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Ordered table of run parameters, dumped as the self-describing
//! header of an output stream. Entries keep the position of their
//! first insertion even when overwritten, so the header layout is
//! stable across reruns with the same flags.

use std::fmt;
use std::io::{self, Write};

use crate::trace;

/// A single typed parameter value. Values stay typed until dump time,
/// where they render through [`fmt::Display`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Int(u64),
    Str(String),
    Bool(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Str(v) => write!(f, "{v}"),
            ParamValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Str(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<u8> for ParamValue {
    fn from(v: u8) -> Self {
        ParamValue::Int(v.into())
    }
}

impl From<u16> for ParamValue {
    fn from(v: u16) -> Self {
        ParamValue::Int(v.into())
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::Int(v.into())
    }
}

impl From<u64> for ParamValue {
    fn from(v: u64) -> Self {
        ParamValue::Int(v)
    }
}

/// One named entry. Invisible entries are bookkeeping only and never
/// appear in the dump.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub value: ParamValue,
    pub visible: bool,
}

/// Insertion-ordered parameter collection.
#[derive(Debug, Clone, Default)]
pub struct ParamTable {
    entries: Vec<Param>,
}

impl ParamTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `name`, overwriting value and visibility in place when the
    /// name already exists. The slot keeps its original position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ParamValue>, visible: bool) {
        let name = name.into();
        let value = value.into();
        trace!("param {name} = {value}");
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => {
                entry.value = value;
                entry.visible = visible;
            }
            None => self.entries.push(Param { name, value, visible }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|e| e.name == name).map(|e| &e.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes every visible entry as a `# name: value` line in insertion
    /// order, then flushes. Dumping is read-only; a second dump to another
    /// writer produces identical text.
    pub fn dump<W: Write>(&self, w: &mut W) -> io::Result<()> {
        for entry in self.entries.iter().filter(|e| e.visible) {
            writeln!(w, "# {}: {}", entry.name, entry.value)?;
        }
        w.flush()
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
