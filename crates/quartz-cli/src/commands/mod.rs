pub mod align;
pub mod init;
pub mod report;
pub mod syscall;
