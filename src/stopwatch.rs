use stopwatch_core::{LapRow, Schedule, Stopwatch};

pub struct StopwatchState {
    pub timer: Stopwatch,
    pub lap_scroll_offset: usize,
}

impl StopwatchState {
    pub fn new() -> Self {
        Self {
            timer: Stopwatch::new(),
            lap_scroll_offset: 0,
        }
    }

    pub fn toggle_running(&mut self) -> Schedule {
        let schedule = self.timer.toggle_running();
        log::debug!("stopwatch {:?} at {} ms", schedule, self.timer.elapsed_ms());
        schedule
    }

    pub fn record_lap(&mut self) {
        let lap_time = self.timer.record_lap();
        // Keep the newest lap in view
        self.lap_scroll_offset = 0;
        log::debug!("lap {} at {} ms", self.timer.laps().len(), lap_time);
    }

    pub fn reset(&mut self) -> Schedule {
        self.lap_scroll_offset = 0;
        log::debug!("stopwatch reset");
        self.timer.reset()
    }

    pub fn tick(&mut self) {
        self.timer.tick();
    }

    pub fn scroll_up(&mut self) {
        self.lap_scroll_offset = self.lap_scroll_offset.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        if self.lap_scroll_offset + 1 < self.timer.laps().len() {
            self.lap_scroll_offset += 1;
        }
    }

    pub fn visible_laps(&self, max_visible: usize) -> Vec<LapRow> {
        self.timer
            .lap_rows()
            .skip(self.lap_scroll_offset)
            .take(max_visible)
            .collect()
    }
}
