use std::time::Duration;

/// Format seconds as `m:ss`. Anything that is not a finite, non-negative
/// number renders as `"0:00"`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{minutes}:{secs:02}")
}

fn secs_or_nan(d: Option<Duration>) -> f64 {
    d.map(|d| d.as_secs_f64()).unwrap_or(f64::NAN)
}

/// Progress of the loaded track, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    /// 0 to 100.
    pub percent: f64,
    pub elapsed: String,
    pub total: String,
}

impl Default for Progress {
    fn default() -> Self {
        Self::compute(Duration::ZERO, None)
    }
}

impl Progress {
    pub fn compute(position: Duration, duration: Option<Duration>) -> Self {
        let current = position.as_secs_f64();
        let total = secs_or_nan(duration);

        let percent = if total.is_finite() && total > 0.0 {
            (current / total * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        Self {
            percent,
            elapsed: format_time(current),
            total: format_time(total),
        }
    }

    /// `percent` as a 0.0 to 1.0 ratio, for gauges.
    pub fn ratio(&self) -> f64 {
        self.percent / 100.0
    }
}
