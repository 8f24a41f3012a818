//! Syscall number translation.
//!
//! The front end names syscalls with Linux x86-64 numbers. The code generator
//! needs the number the *target* kernel expects, which differs per OS and,
//! on Linux, per architecture. Translation goes through a fixed catalogue of
//! the calls the toolchain recognizes; anything else is an error rather than
//! a pass-through.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use miette::Diagnostic;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// XNU routes BSD calls through class 2 on x86-64 (`SYSCALL_CLASS_UNIX << 24`).
const MACOS_BSD_CLASS: i64 = 0x200_0000;

/// Operating system and architecture of the emitted code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Target {
    #[serde(rename = "linux-x86_64")]
    LinuxX86_64,
    #[serde(rename = "linux-aarch64")]
    LinuxAarch64,
    #[serde(rename = "macos-x86_64")]
    MacosX86_64,
    #[serde(rename = "macos-aarch64")]
    MacosAarch64,
}

impl Target {
    pub const ALL: [Target; 4] = [
        Target::LinuxX86_64,
        Target::LinuxAarch64,
        Target::MacosX86_64,
        Target::MacosAarch64,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Target::LinuxX86_64 => "linux-x86_64",
            Target::LinuxAarch64 => "linux-aarch64",
            Target::MacosX86_64 => "macos-x86_64",
            Target::MacosAarch64 => "macos-aarch64",
        }
    }

    /// The machine the toolchain was built for, falling back to
    /// `linux-x86_64` on hosts without a table.
    pub fn host() -> Self {
        if cfg!(all(target_os = "macos", target_arch = "aarch64")) {
            Target::MacosAarch64
        } else if cfg!(all(target_os = "macos", target_arch = "x86_64")) {
            Target::MacosX86_64
        } else if cfg!(all(target_os = "linux", target_arch = "aarch64")) {
            Target::LinuxAarch64
        } else {
            Target::LinuxX86_64
        }
    }
}

impl Default for Target {
    fn default() -> Self {
        Target::host()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Target {
    type Err = SyscallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::ALL
            .iter()
            .copied()
            .find(|target| target.name() == s)
            .ok_or_else(|| SyscallError::UnknownTarget(s.to_string()))
    }
}

/// A syscall the toolchain knows how to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Syscall {
    pub name: &'static str,
    /// Number in the toolchain's own (Linux x86-64) convention.
    pub number: i64,
    linux_aarch64: Option<i64>,
    macos_bsd: Option<i64>,
}

impl Syscall {
    const fn new(
        name: &'static str,
        number: i64,
        linux_aarch64: Option<i64>,
        macos_bsd: Option<i64>,
    ) -> Self {
        Self { name, number, linux_aarch64, macos_bsd }
    }

    /// The number to emit for `target`, or `None` if that kernel has no
    /// equivalent call.
    pub fn number_for(&self, target: Target) -> Option<i64> {
        match target {
            Target::LinuxX86_64 => Some(self.number),
            Target::LinuxAarch64 => self.linux_aarch64,
            Target::MacosX86_64 => self.macos_bsd.map(|n| MACOS_BSD_CLASS | n),
            Target::MacosAarch64 => self.macos_bsd,
        }
    }
}

// Linux numbers: arch/x86/entry/syscalls/syscall_64.tbl and
// include/uapi/asm-generic/unistd.h. macOS numbers: bsd/kern/syscalls.master
// (stat/fstat are the 64-bit-inode variants).
#[rustfmt::skip]
static CATALOGUE: &[Syscall] = &[
    Syscall::new("read",          0, Some(63),  Some(3)),
    Syscall::new("write",         1, Some(64),  Some(4)),
    Syscall::new("open",          2, None,      Some(5)),
    Syscall::new("close",         3, Some(57),  Some(6)),
    Syscall::new("stat",          4, None,      Some(338)),
    Syscall::new("fstat",         5, Some(80),  Some(339)),
    Syscall::new("lseek",         8, Some(62),  Some(199)),
    Syscall::new("mmap",          9, Some(222), Some(197)),
    Syscall::new("mprotect",     10, Some(226), Some(74)),
    Syscall::new("munmap",       11, Some(215), Some(73)),
    Syscall::new("brk",          12, Some(214), None),
    Syscall::new("ioctl",        16, Some(29),  Some(54)),
    Syscall::new("pipe",         22, None,      Some(42)),
    Syscall::new("dup",          32, Some(23),  Some(41)),
    Syscall::new("dup2",         33, None,      Some(90)),
    Syscall::new("nanosleep",    35, Some(101), None),
    Syscall::new("getpid",       39, Some(172), Some(20)),
    Syscall::new("socket",       41, Some(198), Some(97)),
    Syscall::new("connect",      42, Some(203), Some(98)),
    Syscall::new("fork",         57, None,      Some(2)),
    Syscall::new("execve",       59, Some(221), Some(59)),
    Syscall::new("exit",         60, Some(93),  Some(1)),
    Syscall::new("wait4",        61, Some(260), Some(7)),
    Syscall::new("kill",         62, Some(129), Some(37)),
    Syscall::new("fcntl",        72, Some(25),  Some(92)),
    Syscall::new("fsync",        74, Some(82),  Some(95)),
    Syscall::new("ftruncate",    77, Some(46),  Some(201)),
    Syscall::new("getcwd",       79, Some(17),  None),
    Syscall::new("chdir",        80, Some(49),  Some(12)),
    Syscall::new("rename",       82, None,      Some(128)),
    Syscall::new("mkdir",        83, None,      Some(136)),
    Syscall::new("rmdir",        84, None,      Some(137)),
    Syscall::new("unlink",       87, None,      Some(10)),
    Syscall::new("gettimeofday", 96, Some(169), Some(116)),
    Syscall::new("getuid",      102, Some(174), Some(24)),
    Syscall::new("getppid",     110, Some(173), Some(39)),
    Syscall::new("exit_group",  231, Some(94),  None),
    Syscall::new("openat",      257, Some(56),  Some(463)),
];

lazy_static! {
    static ref BY_NUMBER: FxHashMap<i64, &'static Syscall> = {
        let map: FxHashMap<_, _> = CATALOGUE.iter().map(|sc| (sc.number, sc)).collect();
        debug_assert_eq!(map.len(), CATALOGUE.len(), "duplicate syscall number in catalogue");
        map
    };

    static ref BY_NAME: FxHashMap<&'static str, &'static Syscall> =
        CATALOGUE.iter().map(|sc| (sc.name, sc)).collect();

    /// Per-target translation tables, original number -> emitted number.
    static ref TRANSLATIONS: FxHashMap<Target, FxHashMap<i64, i64>> = Target::ALL
        .iter()
        .map(|&target| {
            let table: FxHashMap<i64, i64> = CATALOGUE
                .iter()
                .filter_map(|sc| sc.number_for(target).map(|n| (sc.number, n)))
                .collect();
            log::trace!("built {} syscall table with {} entries", target, table.len());
            (target, table)
        })
        .collect();
}

/// Why a syscall number could not be translated.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum SyscallError {
    #[error("unknown syscall number {0}")]
    #[diagnostic(
        code("SYSCALL-001"),
        help("only syscalls listed by `quartz-cli syscall --list` can be emitted")
    )]
    Unknown(i64),

    #[error("syscall `{name}` ({number}) has no equivalent on {target}")]
    #[diagnostic(code("SYSCALL-002"))]
    Unsupported {
        name: &'static str,
        number: i64,
        target: Target,
    },

    #[error("unknown target `{0}`")]
    #[diagnostic(
        code("SYSCALL-003"),
        help("expected one of: linux-x86_64, linux-aarch64, macos-x86_64, macos-aarch64")
    )]
    UnknownTarget(String),
}

/// Every syscall the toolchain recognizes, ordered by original number.
pub fn catalogue() -> &'static [Syscall] {
    CATALOGUE
}

pub fn lookup(original_id: i64) -> Option<&'static Syscall> {
    BY_NUMBER.get(&original_id).copied()
}

pub fn by_name(name: &str) -> Option<&'static Syscall> {
    BY_NAME.get(name).copied()
}

/// Translates `original_id` for `target` without terminating on failure.
pub fn try_translate(target: Target, original_id: i64) -> Result<i64, SyscallError> {
    if let Some(&translated) = TRANSLATIONS.get(&target).and_then(|t| t.get(&original_id)) {
        return Ok(translated);
    }

    match lookup(original_id) {
        Some(sc) => Err(SyscallError::Unsupported {
            name: sc.name,
            number: sc.number,
            target,
        }),
        None => Err(SyscallError::Unknown(original_id)),
    }
}

/// Translates `original_id` for `target`, raising a fatal diagnostic if the
/// number is unknown or has no equivalent there.
pub fn translate_syscall_for(target: Target, original_id: i64) -> i64 {
    match try_translate(target, original_id) {
        Ok(translated) => translated,
        Err(err) => crate::fail!("{}", err),
    }
}

/// Translates `original_id` for the host target. See [`translate_syscall_for`].
pub fn translate_syscall(original_id: i64) -> i64 {
    translate_syscall_for(Target::host(), original_id)
}
