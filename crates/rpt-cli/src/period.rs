//! Choosing the reference period of a run.

use std::io::{self, BufRead, Write};

use rpt_model::ReferencePeriod;
use tracing::warn;

/// Parses prompt answers; `None` for anything that is not a valid year and
/// month.
pub fn parse_period_input(year: &str, month: &str) -> Option<ReferencePeriod> {
    let year = year.trim().parse().ok()?;
    let month = month.trim().parse().ok()?;
    ReferencePeriod::new(year, month).ok()
}

/// Asks for year and month on `output`, reading answers from `input`.
///
/// Unusable answers fall back to the current month with a warning.
pub fn prompt_period<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
) -> io::Result<ReferencePeriod> {
    let year = ask(&mut input, &mut output, "Report year (e.g. 2025): ")?;
    let month = ask(&mut input, &mut output, "Report month (1-12): ")?;
    Ok(match parse_period_input(&year, &month) {
        Some(period) => period,
        None => {
            let current = ReferencePeriod::current();
            warn!(
                year = %year.trim(),
                month = %month.trim(),
                fallback = %current,
                "invalid period entered, using current month"
            );
            current
        }
    })
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> io::Result<String> {
    write!(output, "{question}")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line)
}

/// Resolves the period from flags, an interactive prompt, or the clock.
pub fn resolve_period(
    year: Option<i32>,
    month: Option<u32>,
    interactive: bool,
) -> io::Result<ReferencePeriod> {
    if let (Some(year), Some(month)) = (year, month) {
        if let Ok(period) = ReferencePeriod::new(year, month) {
            return Ok(period);
        }
        warn!(year, month, "invalid period given, using current month");
        return Ok(ReferencePeriod::current());
    }
    if interactive {
        let stdin = io::stdin();
        return prompt_period(stdin.lock(), io::stderr());
    }
    let current = ReferencePeriod::current();
    warn!(period = %current, "no period given and no terminal, using current month");
    Ok(current)
}
