//! Pure stopwatch logic with no terminal dependencies.
//! Testable on host; time is passed in as milliseconds.

/// Fixed tick period. Elapsed time advances by exactly this much per tick.
pub const TICK_PERIOD_MS: u64 = 10;

/// What the host must do with its tick source after a transition.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Schedule {
    Start,
    Cancel,
}

/// Timer/lap controller: elapsed time, running flag and lap list.
#[derive(Clone, Debug, Default)]
pub struct Stopwatch {
    elapsed_ms: u64,
    running: bool,
    laps: Vec<u64>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_running(&mut self) -> Schedule {
        self.running = !self.running;
        if self.running {
            Schedule::Start
        } else {
            Schedule::Cancel
        }
    }

    pub fn reset(&mut self) -> Schedule {
        self.running = false;
        self.elapsed_ms = 0;
        self.laps.clear();
        Schedule::Cancel
    }

    /// Snapshot the current elapsed time, running or not.
    pub fn record_lap(&mut self) -> u64 {
        self.laps.push(self.elapsed_ms);
        self.elapsed_ms
    }

    /// Advance by one period. Ignored while stopped so a late tick can't
    /// move a frozen clock.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(TICK_PERIOD_MS);
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Laps in recording order.
    pub fn laps(&self) -> &[u64] {
        &self.laps
    }

    /// Laps most-recent-first, numbered from `laps().len()` down to 1.
    pub fn lap_rows(&self) -> impl Iterator<Item = LapRow> + '_ {
        let count = self.laps.len();
        self.laps
            .iter()
            .rev()
            .enumerate()
            .map(move |(index, &elapsed_ms)| LapRow {
                number: count - index,
                elapsed_ms,
            })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LapRow {
    pub number: usize,
    pub elapsed_ms: u64,
}

/// Single source of ticks. Holds a deadline instead of a thread, so
/// `stop()` cancels synchronously.
#[derive(Clone, Debug)]
pub struct Pump {
    interval_ms: u64,
    next_due_ms: Option<u64>,
}

impl Default for Pump {
    fn default() -> Self {
        Self::new()
    }
}

impl Pump {
    pub fn new() -> Self {
        Self {
            interval_ms: TICK_PERIOD_MS,
            next_due_ms: None,
        }
    }

    pub fn start(&mut self, now_ms: u64, interval_ms: u64) {
        if self.is_running() {
            return;
        }
        self.interval_ms = if interval_ms == 0 { TICK_PERIOD_MS } else { interval_ms };
        self.next_due_ms = Some(now_ms.saturating_add(self.interval_ms));
    }

    pub fn stop(&mut self) {
        self.next_due_ms = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due_ms.is_some()
    }

    /// Report at most one tick. Re-arms a period after the previous due time;
    /// missed periods are dropped, not caught up.
    pub fn fire(&mut self, now_ms: u64) -> bool {
        match self.next_due_ms {
            Some(due) if now_ms >= due => {
                let mut next = due.saturating_add(self.interval_ms);
                if now_ms >= next {
                    next = now_ms.saturating_add(self.interval_ms);
                }
                self.next_due_ms = Some(next);
                true
            }
            _ => false,
        }
    }

    pub fn timeout_ms(&self, now_ms: u64) -> Option<u64> {
        self.next_due_ms.map(|due| due.saturating_sub(now_ms))
    }
}

/// Format milliseconds as "MM:SS.CC". Minutes are not wrapped.
pub fn format_display(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    let centis = (ms % 1000) / 10;
    format!("{:02}:{:02}.{:02}", minutes, seconds, centis)
}

/// "MM:SS" and "CC" halves of `format_display`.
pub fn split_display(ms: u64) -> (String, String) {
    let text = format_display(ms);
    match text.split_once('.') {
        Some((whole, centis)) => (whole.to_string(), centis.to_string()),
        None => (text, String::from("00")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_ticks(sw: &mut Stopwatch, n: u64) {
        for _ in 0..n {
            sw.tick();
        }
    }

    #[test]
    fn test_format_display() {
        assert_eq!(format_display(0), "00:00.00");
        assert_eq!(format_display(61_234), "01:01.23");
        assert_eq!(format_display(9), "00:00.00");
        assert_eq!(format_display(59_999), "00:59.99");
        // 100 minutes, not wrapped
        assert_eq!(format_display(6_000_000), "100:00.00");
    }

    #[test]
    fn test_format_fields_truncate() {
        let mut ms = 0u64;
        while ms < 7_300_000 {
            let text = format_display(ms);
            let (mins, rest) = text.split_once(':').unwrap();
            let (secs, centis) = rest.split_once('.').unwrap();
            assert_eq!(mins.parse::<u64>().unwrap(), ms / 60_000);
            assert_eq!(secs.parse::<u64>().unwrap(), (ms % 60_000) / 1000);
            assert_eq!(centis.parse::<u64>().unwrap(), (ms % 1000) / 10);
            ms += 7_919;
        }
    }

    #[test]
    fn test_split_display() {
        assert_eq!(split_display(61_234), ("01:01".to_string(), "23".to_string()));
    }

    #[test]
    fn test_toggle_and_tick() {
        let mut sw = Stopwatch::new();
        assert!(!sw.is_running());
        assert_eq!(sw.toggle_running(), Schedule::Start);
        run_ticks(&mut sw, 150);
        assert_eq!(sw.toggle_running(), Schedule::Cancel);
        assert_eq!(sw.elapsed_ms(), 150 * TICK_PERIOD_MS);

        // Stale ticks after stop are ignored
        run_ticks(&mut sw, 5);
        assert_eq!(sw.elapsed_ms(), 150 * TICK_PERIOD_MS);

        // Resume continues from the frozen value
        sw.toggle_running();
        run_ticks(&mut sw, 2);
        assert_eq!(sw.elapsed_ms(), 152 * TICK_PERIOD_MS);
    }

    #[test]
    fn test_tick_saturates() {
        let mut sw = Stopwatch::new();
        sw.elapsed_ms = u64::MAX - 5;
        sw.toggle_running();
        sw.tick();
        sw.tick();
        assert_eq!(sw.elapsed_ms(), u64::MAX);

        let minutes = u64::MAX / 60_000;
        let seconds = (u64::MAX % 60_000) / 1000;
        let centis = (u64::MAX % 1000) / 10;
        assert_eq!(
            format_display(u64::MAX),
            format!("{}:{:02}.{:02}", minutes, seconds, centis)
        );
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut sw = Stopwatch::new();
        sw.toggle_running();
        run_ticks(&mut sw, 42);
        sw.record_lap();
        assert_eq!(sw.reset(), Schedule::Cancel);
        assert_eq!(sw.elapsed_ms(), 0);
        assert!(!sw.is_running());
        assert!(sw.laps().is_empty());

        // Reset while already stopped and empty
        sw.reset();
        assert_eq!(sw.elapsed_ms(), 0);
        assert!(!sw.is_running());
    }

    #[test]
    fn test_record_lap() {
        let mut sw = Stopwatch::new();
        // Allowed while stopped
        assert_eq!(sw.record_lap(), 0);

        sw.toggle_running();
        run_ticks(&mut sw, 3);
        sw.record_lap();
        sw.record_lap();
        assert_eq!(sw.laps(), &[0, 30, 30]);
        assert!(sw.laps().iter().all(|&lap| lap <= sw.elapsed_ms()));
    }

    #[test]
    fn test_lap_rows() {
        let mut sw = Stopwatch::new();
        sw.toggle_running();
        for _ in 0..3 {
            run_ticks(&mut sw, 10);
            sw.record_lap();
        }
        let rows: Vec<LapRow> = sw.lap_rows().collect();
        assert_eq!(
            rows,
            vec![
                LapRow { number: 3, elapsed_ms: 300 },
                LapRow { number: 2, elapsed_ms: 200 },
                LapRow { number: 1, elapsed_ms: 100 },
            ]
        );
    }

    #[test]
    fn test_pump_basic() {
        let mut pump = Pump::new();
        assert!(!pump.is_running());
        assert_eq!(pump.timeout_ms(0), None);
        assert!(!pump.fire(1000));

        pump.start(1000, 10);
        assert!(pump.is_running());
        assert_eq!(pump.timeout_ms(1004), Some(6));
        assert!(!pump.fire(1009));
        assert!(pump.fire(1010));
        assert!(!pump.fire(1015));
        assert!(pump.fire(1020));

        pump.stop();
        assert!(!pump.fire(5000));
        assert_eq!(pump.timeout_ms(5000), None);
    }

    #[test]
    fn test_pump_late_fire_not_caught_up() {
        let mut pump = Pump::new();
        pump.start(0, 10);
        // 95ms late: one tick, then due again a full period later
        assert!(pump.fire(105));
        assert!(!pump.fire(106));
        assert_eq!(pump.timeout_ms(106), Some(9));
        assert_eq!(pump.timeout_ms(200), Some(0));
    }

    #[test]
    fn test_pump_small_lateness_keeps_period() {
        let mut sw = Stopwatch::new();
        let mut pump = Pump::new();
        sw.toggle_running();
        pump.start(0, TICK_PERIOD_MS);

        // Every wakeup lands 1ms after its due time
        for now in (11..=1101).step_by(TICK_PERIOD_MS as usize) {
            if pump.fire(now) {
                sw.tick();
            }
        }
        assert_eq!(sw.elapsed_ms(), 1100);
        assert_eq!(pump.timeout_ms(1101), Some(9));
    }

    #[test]
    fn test_pump_start_while_running() {
        let mut pump = Pump::new();
        pump.start(0, 10);
        pump.start(8, 10);
        assert!(pump.fire(10));

        let mut pump = Pump::new();
        pump.start(0, 0);
        assert_eq!(pump.timeout_ms(0), Some(TICK_PERIOD_MS));
    }

    #[test]
    fn test_pump_drives_stopwatch() {
        let mut sw = Stopwatch::new();
        let mut pump = Pump::new();

        if sw.toggle_running() == Schedule::Start {
            pump.start(0, TICK_PERIOD_MS);
        }
        for now in 1..=100 {
            if pump.fire(now) {
                sw.tick();
            }
        }
        assert_eq!(sw.elapsed_ms(), 100);

        if sw.toggle_running() == Schedule::Cancel {
            pump.stop();
        }
        for now in 101..=200 {
            if pump.fire(now) {
                sw.tick();
            }
        }
        assert_eq!(sw.elapsed_ms(), 100);
    }
}
