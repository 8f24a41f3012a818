use quartz_utils::{align_up, is_power_of_two};

use crate::error::CliError;

pub fn handle_align(value: i64, alignment: i64) -> Result<(), CliError> {
    println!("{}", checked_align(value, alignment)?);
    Ok(())
}

/// Validates what `align_up` leaves to its callers, then aligns.
fn checked_align(value: i64, alignment: i64) -> Result<i64, CliError> {
    if !is_power_of_two(alignment) {
        return Err(CliError::InvalidAlignment { alignment });
    }
    if value.checked_add(alignment - 1).is_none() {
        return Err(CliError::AlignmentOverflow { value, alignment });
    }
    Ok(align_up(value, alignment))
}
