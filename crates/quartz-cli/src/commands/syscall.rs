use quartz_utils::{fail, syscall, translate_syscall_for, Target};

use crate::config::Config;
use crate::error::CliError;

/// Prints the translation of `id` for the resolved target, or the whole
/// table with `list`. Ids the target cannot take are fatal.
pub fn handle_syscall(config: &Config, id: Option<String>, target: Option<Target>, list: bool) -> Result<(), CliError> {
    let target = config.target(target);

    if list {
        print!("{}", format_table(target));
        return Ok(());
    }

    let id = id.ok_or_else(|| CliError::InternalError("syscall id is required without --list".to_string()))?;
    let original = match resolve_id(&id) {
        Some(original) => original,
        None => fail!("unknown syscall `{}`", id),
    };

    log::debug!("translating syscall {} for {}", original, target);
    println!("{}", translate_syscall_for(target, original));
    Ok(())
}

/// Accepts a number in the toolchain's convention or a catalogue name.
fn resolve_id(id: &str) -> Option<i64> {
    id.parse::<i64>()
        .ok()
        .or_else(|| syscall::by_name(id).map(|sc| sc.number))
}

fn format_table(target: Target) -> String {
    let mut out = format!("{:<14} {:>8} {:>10}\n", "name", "original", target.name());
    for sc in syscall::catalogue() {
        let translated = sc
            .number_for(target)
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        out.push_str(&format!("{:<14} {:>8} {:>10}\n", sc.name, sc.number, translated));
    }
    out
}
