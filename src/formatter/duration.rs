//! Clock rendering of a number of seconds (`00:00:00`)

use chrono::TimeDelta;

use crate::formatter::{Output, RunState};

/// Hours, minutes and seconds of an elapsed time
struct TimeComponents {
    hours: i128,  // Unbounded
    minutes: i64, // 0-59
    seconds: i64, // 0-59
}

fn time_components(total_seconds: f64) -> TimeComponents {
    match i64::try_from(total_seconds as i128)
        .ok()
        .and_then(TimeDelta::try_seconds)
    {
        Some(delta) => TimeComponents {
            hours: i128::from(delta.num_hours()),
            minutes: delta.num_minutes() % 60,
            seconds: delta.num_seconds() % 60,
        },
        // Beyond the range of TimeDelta, which counts milliseconds in an i64.
        None => {
            let seconds = total_seconds as i128;
            TimeComponents {
                hours: seconds / 3600,
                minutes: (seconds / 60 % 60) as i64,
                seconds: (seconds % 60) as i64,
            }
        }
    }
}

/// Render the value as `H:MM:SS`, rounding the total with the run's rounding
pub(super) fn clock(state: &RunState<'_>, output: &mut Output, slot: usize) {
    let total = (state.round)(state.num.abs());
    let time = time_components(total);
    let sign = if state.num < 0.0 && total > 0.0 { "-" } else { "" };

    output.set(
        slot,
        format!(
            "{sign}{}:{:02}:{:02}",
            time.hours, time.minutes, time.seconds
        ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_split_seconds() {
        let time = time_components(25.0);
        assert_eq!((time.hours, time.minutes, time.seconds), (0, 0, 25));

        let time = time_components(238.0);
        assert_eq!((time.hours, time.minutes, time.seconds), (0, 3, 58));

        let time = time_components(63846.0);
        assert_eq!((time.hours, time.minutes, time.seconds), (17, 44, 6));
    }

    #[test]
    fn components_keep_hours_beyond_time_delta() {
        let time = time_components(1e19);
        assert_eq!(
            (time.hours, time.minutes, time.seconds),
            (2_777_777_777_777_777, 46, 40)
        );
    }

    #[test]
    fn components_saturate_out_of_range_values() {
        let time = time_components(f64::NAN);
        assert_eq!((time.hours, time.minutes, time.seconds), (0, 0, 0));
        assert!(time_components(f64::MAX).hours > 0);
    }
}
