//! Support code shared by every phase of the Quartz toolchain.
//!
//! - [`diagnostic`]: fatal, process-terminating error reporting
//!   ([`fail!`] and [`fail_at!`])
//! - [`syscall`]: translation of syscall numbers to the emission target's
//!   convention
//! - [`arith`]: `min`/`max` and power-of-two alignment
//!
//! The syscall tables are built once on first use and only read afterwards.
//! The only other shared state is the diagnostic render options, which a
//! driver sets once at startup. All of it may be called from any thread.

pub mod arith;
pub mod diagnostic;
pub mod syscall;

pub use arith::{align_up, is_power_of_two, max, min};
pub use diagnostic::{render_options, set_render_options, Fatal, Origin, RenderOptions, FATAL_EXIT_CODE};
pub use syscall::{
    translate_syscall, translate_syscall_for, try_translate, Syscall, SyscallError, Target,
};

// Locations are part of this crate's interface.
pub use quartz_source::Location;
