//! Bounded voltage trace for charting.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::electrophysiology::Phase;
use crate::error::{Result, SimulationError};

/// One sample produced per simulation tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationSample {
    /// Simulation time (ms)
    pub time_ms: f64,
    /// Membrane voltage (mV)
    pub voltage_mV: f64,
    /// Whether the stimulus pulse was on
    pub stimulated: bool,
    /// Action potential phase
    pub phase: Phase,
}

/// Ring buffer of the most recent samples, discarding the oldest
#[derive(Debug, Clone)]
pub struct Trace {
    samples: VecDeque<SimulationSample>,
    capacity: usize,
}

impl Trace {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(SimulationError::InvalidCapacity(capacity));
        }
        Ok(Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Append a sample, dropping the oldest when full
    pub fn push(&mut self, sample: SimulationSample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent sample
    pub fn latest(&self) -> Option<&SimulationSample> {
        self.samples.back()
    }

    /// Samples from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &SimulationSample> + '_ {
        self.samples.iter()
    }

    /// The `n` most recent samples, oldest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &SimulationSample> + '_ {
        self.samples.iter().skip(self.samples.len().saturating_sub(n))
    }

    pub fn to_vec(&self) -> Vec<SimulationSample> {
        self.samples.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time_ms: f64) -> SimulationSample {
        SimulationSample {
            time_ms,
            voltage_mV: -90.0,
            stimulated: false,
            phase: Phase::Phase4,
        }
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(Trace::new(0), Err(SimulationError::InvalidCapacity(0))));
    }

    #[test]
    fn test_discards_oldest() {
        let mut trace = Trace::new(3).unwrap();
        for t in 1..=5 {
            trace.push(sample(t as f64));
        }
        assert_eq!(trace.len(), trace.capacity());
        let times: Vec<f64> = trace.iter().map(|s| s.time_ms).collect();
        assert_eq!(times, vec![3.0, 4.0, 5.0]);
        assert_eq!(trace.to_vec(), vec![sample(3.0), sample(4.0), sample(5.0)]);
        assert_eq!(trace.latest().unwrap().time_ms, 5.0);
    }

    #[test]
    fn test_recent_window() {
        let mut trace = Trace::new(10).unwrap();
        for t in 1..=4 {
            trace.push(sample(t as f64));
        }
        let last_two: Vec<f64> = trace.recent(2).map(|s| s.time_ms).collect();
        assert_eq!(last_two, vec![3.0, 4.0]);
        assert_eq!(trace.recent(100).count(), 4);
    }
}
