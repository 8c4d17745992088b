use arrayvec::ArrayVec;

/*
Parameter Automation Timeline
=============================

A timeline is a list of value changes scheduled against the engine clock.
Instead of a control loop nudging a parameter every block, callers describe
WHERE the value should be and WHEN, and the renderer reads the value back at
any sample time. This is the same model as an audio-rate "automation lane".

Vocabulary
----------

  event       A (time, value) pair with a shape. `SetValue` jumps to the value
              at its time. `LinearRamp` arrives at its value at its time,
              travelling in a straight line from the previous event.

  anchor      The last event at or before the time being evaluated. Ramps
              interpolate from the anchor's (time, value).

  default     The value reported before any event applies.

  cancel      Dropping every event at or after a time. Events already in the
              past stay, so the curve up to that time is unchanged.


Evaluation
----------

    value
      ^                 ramp(1.0, t2)
      |               ___x
      |           ___/    \___ ramp(0.5, t3)
      |       ___/            x_______________  (holds last value)
      |   ___/
      |  x set(0.0, t1)
      +--|---------|----------|------------------> time
         t1        t2         t3

  t <  t1         default
  t1 <= t < t2    0.0 + (1.0 - 0.0) * (t - t1) / (t2 - t1)
  t2 <= t < t3    1.0 + (0.5 - 1.0) * (t - t2) / (t3 - t2)
  t >= t3         0.5

Events with equal times keep insertion order, so `set(v, t)` followed by
`ramp(w, t)` ends at `w`.


Storage
-------

Events live in a fixed-capacity array so scheduling never allocates on the
audio thread. `prune` drops events that can no longer influence the curve:
everything before the current anchor.
*/

/// Maximum number of pending events per timeline.
pub const MAX_PARAM_EVENTS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamEvent {
    /// Jump to `value` at `time`.
    SetValue { time: f64, value: f32 },
    /// Arrive at `value` at `time`, linearly from the previous event.
    LinearRamp { time: f64, value: f32 },
}

impl ParamEvent {
    pub fn time(&self) -> f64 {
        match *self {
            ParamEvent::SetValue { time, .. } | ParamEvent::LinearRamp { time, .. } => time,
        }
    }

    pub fn value(&self) -> f32 {
        match *self {
            ParamEvent::SetValue { value, .. } | ParamEvent::LinearRamp { value, .. } => value,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParamTimeline {
    default_value: f32,
    events: ArrayVec<ParamEvent, MAX_PARAM_EVENTS>,
}

impl ParamTimeline {
    pub fn new(default_value: f32) -> Self {
        Self {
            default_value,
            events: ArrayVec::new(),
        }
    }

    pub fn default_value(&self) -> f32 {
        self.default_value
    }

    pub fn events(&self) -> &[ParamEvent] {
        &self.events
    }

    pub fn set_value_at_time(&mut self, value: f32, time: f64) {
        self.insert(ParamEvent::SetValue { time, value });
    }

    /// Schedule a straight line from the previous event to `(time, value)`.
    ///
    /// A ramp with nothing before it starts from the default value at time 0.
    pub fn linear_ramp_to_value_at_time(&mut self, value: f32, time: f64) {
        if self.events.is_empty() {
            self.insert(ParamEvent::SetValue {
                time: 0.0,
                value: self.default_value,
            });
        }
        self.insert(ParamEvent::LinearRamp { time, value });
    }

    /// Remove every event scheduled at or after `time`.
    pub fn cancel_scheduled_values(&mut self, time: f64) {
        self.events.retain(|e| e.time() < time);
    }

    /// Value of the curve at `time`.
    pub fn value_at(&self, time: f64) -> f32 {
        let mut anchor: Option<&ParamEvent> = None;

        for event in &self.events {
            if event.time() <= time {
                anchor = Some(event);
                continue;
            }

            // First event in the future: only a ramp changes the current value.
            return match (*event, anchor) {
                (ParamEvent::LinearRamp { time: t1, value: v1 }, Some(prev)) => {
                    let (t0, v0) = (prev.time(), prev.value());
                    let progress = ((time - t0) / (t1 - t0)) as f32;
                    v0 + (v1 - v0) * progress
                }
                (_, Some(prev)) => prev.value(),
                (_, None) => self.default_value,
            };
        }

        anchor.map_or(self.default_value, |e| e.value())
    }

    /// Drop events that end before the anchor for `now`.
    pub fn prune(&mut self, now: f64) {
        let anchor = self.events.iter().rposition(|e| e.time() <= now);
        if let Some(idx) = anchor {
            if idx > 0 {
                self.events.drain(..idx);
            }
        }
    }

    fn insert(&mut self, event: ParamEvent) {
        // Equal timestamps stay in insertion order.
        let idx = self
            .events
            .iter()
            .position(|e| e.time() > event.time())
            .unwrap_or(self.events.len());

        if self.events.try_insert(idx, event).is_err() {
            log::warn!("parameter timeline full, dropping {:?}", event);
        }
    }
}

impl Default for ParamTimeline {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn default_value_before_any_event() {
        let timeline = ParamTimeline::new(0.25);
        assert_eq!(timeline.value_at(0.0), 0.25);
        assert_eq!(timeline.value_at(100.0), 0.25);
    }

    #[test]
    fn ramp_interpolates_from_previous_event() {
        let mut timeline = ParamTimeline::new(0.0);
        timeline.set_value_at_time(0.0, 1.0);
        timeline.linear_ramp_to_value_at_time(1.0, 2.0);

        assert!(close(timeline.value_at(0.5), 0.0));
        assert!(close(timeline.value_at(1.0), 0.0));
        assert!(close(timeline.value_at(1.25), 0.25));
        assert!(close(timeline.value_at(1.5), 0.5));
        assert!(close(timeline.value_at(2.0), 1.0));
        assert!(close(timeline.value_at(3.0), 1.0));
    }

    #[test]
    fn chained_ramps_follow_each_other() {
        let mut timeline = ParamTimeline::new(0.0);
        timeline.set_value_at_time(0.0, 0.0);
        timeline.linear_ramp_to_value_at_time(1.0, 1.0);
        timeline.linear_ramp_to_value_at_time(0.5, 2.0);

        assert!(close(timeline.value_at(1.5), 0.75));
        assert!(close(timeline.value_at(10.0), 0.5));
    }

    #[test]
    fn set_value_steps_without_interpolation() {
        let mut timeline = ParamTimeline::new(0.0);
        timeline.set_value_at_time(0.8, 1.0);

        assert!(close(timeline.value_at(0.999), 0.0));
        assert!(close(timeline.value_at(1.0), 0.8));
    }

    #[test]
    fn equal_times_keep_insertion_order() {
        let mut timeline = ParamTimeline::new(0.0);
        timeline.set_value_at_time(0.3, 1.0);
        timeline.set_value_at_time(0.6, 1.0);

        assert!(close(timeline.value_at(1.0), 0.6));
    }

    #[test]
    fn cancel_keeps_the_past_and_drops_the_future() {
        let mut timeline = ParamTimeline::new(0.0);
        timeline.set_value_at_time(0.0, 0.0);
        timeline.linear_ramp_to_value_at_time(1.0, 1.0);
        timeline.linear_ramp_to_value_at_time(0.5, 2.0);

        timeline.cancel_scheduled_values(0.5);

        assert_eq!(timeline.events().len(), 1);
        assert!(close(timeline.value_at(0.75), 0.0));
    }

    #[test]
    fn ramp_without_anchor_starts_from_default_at_zero() {
        let mut timeline = ParamTimeline::new(1.0);
        timeline.linear_ramp_to_value_at_time(0.0, 2.0);

        assert!(close(timeline.value_at(1.0), 0.5));
    }

    #[test]
    fn prune_keeps_curve_intact() {
        let mut timeline = ParamTimeline::new(0.0);
        timeline.set_value_at_time(0.0, 0.0);
        timeline.linear_ramp_to_value_at_time(1.0, 1.0);
        timeline.linear_ramp_to_value_at_time(0.0, 3.0);

        let before = timeline.value_at(2.0);
        timeline.prune(1.5);

        assert_eq!(timeline.events().len(), 2);
        assert!(close(timeline.value_at(2.0), before));
    }

    #[test]
    fn overflow_drops_new_events() {
        let mut timeline = ParamTimeline::new(0.0);
        for i in 0..(MAX_PARAM_EVENTS + 4) {
            timeline.set_value_at_time(i as f32, i as f64);
        }

        assert_eq!(timeline.events().len(), MAX_PARAM_EVENTS);
        assert!(close(
            timeline.value_at(1_000.0),
            (MAX_PARAM_EVENTS - 1) as f32
        ));
    }
}
