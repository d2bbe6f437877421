/*
Parameter Automation
====================

An automated parameter is a default value plus a time-ordered list of
events. Evaluating the parameter at time `t` walks the events that have
already happened, then lets a ramp that is still underway interpolate toward
its end point.

Events
------

  SetValue        jump to `value` at `time`
  LinearRamp      arrive at `value` at `end_time`, straight line from the
                  previous event
  ExponentialRamp arrive at `value` at `end_time`, geometric curve from the
                  previous event (both ends must share a sign and be nonzero)
  SetTarget       from `start_time`, approach `target` exponentially:

                    v(t) = target + (v0 - target) * e^(-(t - start) / tau)

                  after 3 tau the curve has covered ~95% of the distance,
                  which is why envelopes pass `duration / 3` as tau.

Each event is ordered (and cancelled) by its *time*: the set time, the ramp
end time, or the target start time.


Cancellation
------------

  cancel_scheduled_values(T)   remove every event whose time is >= T.
                               Earlier events stay, so a SetTarget that
                               started before T keeps pulling.
  cancel_and_hold(T)           same, but the parameter freezes at the value
                               it had at T (a ramp crossing T is shortened
                               to end there).
*/

/// One scheduled change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamEvent {
    SetValue { value: f32, time: f64 },
    LinearRamp { value: f32, end_time: f64 },
    ExponentialRamp { value: f32, end_time: f64 },
    SetTarget { target: f32, start_time: f64, time_constant: f64 },
}

impl ParamEvent {
    /// The time the event is ordered and cancelled by.
    pub fn time(&self) -> f64 {
        match *self {
            ParamEvent::SetValue { time, .. } => time,
            ParamEvent::LinearRamp { end_time, .. } => end_time,
            ParamEvent::ExponentialRamp { end_time, .. } => end_time,
            ParamEvent::SetTarget { start_time, .. } => start_time,
        }
    }
}

/// Curve in effect after the last event that has already happened.
#[derive(Debug, Clone, Copy)]
enum Segment {
    Hold(f32),
    Target { from: f32, target: f32, start: f64, time_constant: f64 },
}

impl Segment {
    fn value_at(self, time: f64) -> f32 {
        match self {
            Segment::Hold(value) => value,
            Segment::Target { from, target, start, time_constant } => {
                if time <= start {
                    return from;
                }
                let decay = (-(time - start) / time_constant).exp() as f32;
                target + (from - target) * decay
            }
        }
    }
}

/// The automation timeline of a single parameter.
#[derive(Debug, Clone)]
pub struct Automation {
    default: f32,
    events: Vec<ParamEvent>,
}

impl Automation {
    pub fn new(default: f32) -> Self {
        Self { default, events: Vec::new() }
    }

    pub fn default_value(&self) -> f32 {
        self.default
    }

    pub fn events(&self) -> &[ParamEvent] {
        &self.events
    }

    /// Immediate assignment.
    ///
    /// With nothing scheduled this replaces the default; otherwise it is a
    /// `SetValue` at `now` so it cannot rewrite history.
    pub fn set_value(&mut self, value: f32, now: f64) {
        if self.events.is_empty() {
            self.default = value;
        } else {
            self.insert(ParamEvent::SetValue { value, time: now });
        }
    }

    /// Insert keeping time order; events sharing a time keep insertion order.
    pub fn insert(&mut self, event: ParamEvent) {
        let index = self.events.partition_point(|e| e.time() <= event.time());
        self.events.insert(index, event);
    }

    pub fn cancel_scheduled_values(&mut self, time: f64) {
        self.events.retain(|e| e.time() < time);
    }

    pub fn cancel_and_hold(&mut self, time: f64) {
        let held = self.value_at(time);
        let first_cancelled = self.events.partition_point(|e| e.time() < time);

        let replacement = match self.events.get(first_cancelled) {
            Some(ParamEvent::LinearRamp { .. }) => ParamEvent::LinearRamp {
                value: held,
                end_time: time,
            },
            Some(ParamEvent::ExponentialRamp { .. }) => ParamEvent::ExponentialRamp {
                value: held,
                end_time: time,
            },
            _ => ParamEvent::SetValue { value: held, time },
        };

        self.events.truncate(first_cancelled);
        self.events.push(replacement);
    }

    /// Value of the automation curve at `time` (seconds).
    pub fn value_at(&self, time: f64) -> f32 {
        let mut segment = Segment::Hold(self.default);
        // Where a following ramp starts from.
        let mut anchor = (0.0_f64, self.default);

        for event in &self.events {
            if event.time() > time {
                return match *event {
                    ParamEvent::LinearRamp { value, end_time } => {
                        let (t0, v0) = anchor;
                        if end_time <= t0 {
                            return value;
                        }
                        let progress = ((time - t0) / (end_time - t0)) as f32;
                        v0 + (value - v0) * progress
                    }
                    ParamEvent::ExponentialRamp { value, end_time } => {
                        let (t0, v0) = anchor;
                        if end_time <= t0 {
                            return value;
                        }
                        if v0 == 0.0 || v0.signum() != value.signum() {
                            return v0;
                        }
                        let progress = ((time - t0) / (end_time - t0)) as f32;
                        v0 * (value / v0).powf(progress)
                    }
                    _ => segment.value_at(time),
                };
            }

            match *event {
                ParamEvent::SetValue { value, time } => {
                    segment = Segment::Hold(value);
                    anchor = (time, value);
                }
                ParamEvent::LinearRamp { value, end_time }
                | ParamEvent::ExponentialRamp { value, end_time } => {
                    segment = Segment::Hold(value);
                    anchor = (end_time, value);
                }
                ParamEvent::SetTarget { target, start_time, time_constant } => {
                    let from = segment.value_at(start_time);
                    segment = Segment::Target {
                        from,
                        target,
                        start: start_time,
                        time_constant,
                    };
                    anchor = (start_time, from);
                }
            }
        }

        segment.value_at(time)
    }

    /// Fill `out` with the values at consecutive frames from `first_frame`.
    pub fn fill(&self, first_frame: u64, sample_rate: f64, out: &mut [f32]) {
        if self.events.is_empty() {
            out.fill(self.default);
            return;
        }
        for (i, value) in out.iter_mut().enumerate() {
            *value = self.value_at((first_frame + i as u64) as f64 / sample_rate);
        }
    }
}
