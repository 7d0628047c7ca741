//! Plain-text lag report, one block per visited package

use std::io::{self, Write};

use chrono::TimeDelta;

use crate::lag::calculator::LagResult;

const SECONDS_PER_DAY: i64 = 86_400;
const INDENT: &str = "  ";

/// Render a time lag as `[-]D day[s], H:MM:SS[.ffffff]`, omitting the day part when zero.
///
/// Days are floored, so a lag of minus one hour reads `-1 day, 23:00:00`.
pub fn format_time_lag(lag: TimeDelta) -> String {
    let mut seconds = lag.num_seconds();
    let mut nanos = lag.subsec_nanos();
    if nanos < 0 {
        seconds -= 1;
        nanos += 1_000_000_000;
    }

    let days = seconds.div_euclid(SECONDS_PER_DAY);
    let rest = seconds.rem_euclid(SECONDS_PER_DAY);
    let clock = format!("{}:{:02}:{:02}", rest / 3600, rest % 3600 / 60, rest % 60);
    let micros = nanos / 1_000;
    let clock = if micros != 0 {
        format!("{clock}.{micros:06}")
    } else {
        clock
    };

    match days {
        0 => clock,
        1 | -1 => format!("{days} day, {clock}"),
        _ => format!("{days} days, {clock}"),
    }
}

/// Write the report block of one package at `depth`
pub fn write_node<W: Write>(out: &mut W, depth: usize, result: &LagResult) -> io::Result<()> {
    let indent = INDENT.repeat(depth);
    writeln!(
        out,
        "{indent}Package: {}, release considered: {}.",
        result.package, result.version
    )?;
    writeln!(out, "{indent}Lag (number of releases): {}", result.release_count)?;
    writeln!(
        out,
        "{indent}Lag (release dates): {}",
        format_time_lag(result.time_lag)
    )?;
    writeln!(out, "{indent}Dependencies: {}", result.dependencies.join(","))
}

/// Write the terminal line emitted instead of revisiting a package on its own path
pub fn write_cycle<W: Write>(
    out: &mut W,
    depth: usize,
    package: &str,
    constraint: &str,
) -> io::Result<()> {
    let indent = INDENT.repeat(depth);
    writeln!(out, "{indent}Package: {package} ({constraint}), cycle detected.")
}
