//! Simulation session: owns the drug state, trace and tick loop.

use crate::config::SessionParameters;
use crate::electrophysiology::{self, CellType, Phase};
use crate::error::{Result, SimulationError};
use crate::pharmacology::{Drug, DrugState};
use crate::scheduler::{RunId, Tick, TickScheduler};

use super::metrics::{ActiveDrug, SessionMetrics, SignalAnalysis};
use super::trace::{SimulationSample, Trace};

/// One running experiment
///
/// All mutable state (drug doses, pacing, time, trace) lives here and is
/// changed only through validated setters. Setters never partially apply:
/// on error the session is unchanged.
#[derive(Debug, Clone)]
pub struct SimulationSession {
    params: SessionParameters,
    drugs: DrugState,
    time_ms: f64,
    trace: Trace,
    scheduler: TickScheduler,
}

impl SimulationSession {
    pub fn new(params: SessionParameters) -> Result<Self> {
        params.validate()?;
        let trace = Trace::new(params.trace_capacity)?;
        let scheduler = TickScheduler::new(params.tick_interval_ms);
        Ok(Self {
            params,
            drugs: DrugState::new(),
            time_ms: 0.0,
            trace,
            scheduler,
        })
    }

    // === Lifecycle ===

    /// Start the tick loop, cancelling any previous run
    pub fn start(&mut self) -> RunId {
        let run = self.scheduler.start();
        log::info!("Simulation started (run {})", run.0);
        run
    }

    /// Stop scheduling ticks; time and trace are kept
    pub fn stop(&mut self) {
        if self.scheduler.is_running() {
            log::info!("Simulation stopped at {:.1} ms", self.time_ms);
        }
        self.scheduler.cancel();
    }

    /// Start if stopped, stop if running
    pub fn toggle(&mut self) {
        if self.is_running() {
            self.stop();
        } else {
            self.start();
        }
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Ticks fired in the current run, including skipped ones
    pub fn ticks_fired(&self) -> u64 {
        self.scheduler.fired()
    }

    /// Stop and clear time and trace
    pub fn reset(&mut self) {
        self.scheduler.cancel();
        self.time_ms = 0.0;
        self.trace.clear();
        log::info!("Simulation reset");
    }

    // === Ticking ===

    /// Poll the scheduler and step if a tick is due
    pub fn advance(&mut self, now_ms: f64) -> Option<SimulationSample> {
        let tick = self.scheduler.poll(now_ms)?;
        self.deliver(tick)
    }

    /// Handle a tick; stale ticks from cancelled runs are ignored
    ///
    /// A tick whose evaluation fails is skipped with a warning and leaves
    /// the session as it was.
    pub fn deliver(&mut self, tick: Tick) -> Option<SimulationSample> {
        if !self.scheduler.is_current(&tick) {
            log::debug!("Dropping stale tick {} from run {}", tick.sequence, tick.run.0);
            return None;
        }
        match self.step() {
            Ok(sample) => Some(sample),
            Err(e) => {
                log::warn!("Skipping tick {}: {}", tick.sequence, e);
                None
            }
        }
    }

    /// Advance simulation time by one tick and record a sample
    ///
    /// Fails without recording when the speed is too small to move time
    /// forward at the current magnitude.
    pub fn step(&mut self) -> Result<SimulationSample> {
        let time_ms = self.time_ms + self.params.speed;
        if time_ms <= self.time_ms {
            return Err(SimulationError::InvalidSpeed(self.params.speed));
        }
        let rate = self.params.stimulation_rate_hz;

        let stimulated =
            electrophysiology::is_stimulus_window(time_ms, rate, self.params.stimulus_window_ms)?;
        let point = electrophysiology::evaluate(time_ms, self.params.cell_type, rate, &self.drugs)?;

        let sample = SimulationSample {
            time_ms,
            voltage_mV: point.voltage_mV,
            stimulated,
            phase: point.phase,
        };
        self.time_ms = time_ms;
        self.trace.push(sample);
        Ok(sample)
    }

    /// Step until simulation time reaches `duration_ms` past the current time
    ///
    /// Independent of the scheduler; used for headless runs. Returns the
    /// number of samples produced.
    pub fn run_for(&mut self, duration_ms: f64) -> Result<usize> {
        if !duration_ms.is_finite() || duration_ms < 0.0 {
            return Err(SimulationError::InvalidTime(duration_ms));
        }
        let end = self.time_ms + duration_ms;
        let mut produced = 0;
        while self.time_ms + self.params.speed <= end {
            self.step()?;
            produced += 1;
        }
        Ok(produced)
    }

    // === Settings ===

    pub fn set_cell_type(&mut self, cell_type: CellType) {
        log::debug!("Cell type: {}", cell_type);
        self.params.cell_type = cell_type;
    }

    pub fn set_stimulation_rate(&mut self, rate_hz: f64) -> Result<()> {
        electrophysiology::cycle_length_ms(rate_hz)?;
        log::debug!("Stimulation rate: {} Hz", rate_hz);
        self.params.stimulation_rate_hz = rate_hz;
        Ok(())
    }

    pub fn set_speed(&mut self, speed: f64) -> Result<()> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(SimulationError::InvalidSpeed(speed));
        }
        log::debug!("Speed: {}x", speed);
        self.params.speed = speed;
        Ok(())
    }

    pub fn set_drug_concentration(&mut self, drug: Drug, concentration_uM: f64) -> Result<()> {
        self.drugs.set_concentration(drug, concentration_uM)?;
        log::debug!("{} concentration: {} μM", drug, concentration_uM);
        Ok(())
    }

    pub fn set_drug_active(&mut self, drug: Drug, active: bool) {
        log::debug!("{} {}", drug, if active { "applied" } else { "washed out" });
        self.drugs.set_active(drug, active);
    }

    /// Set a drug by name, e.g. from user input
    pub fn set_drug_by_name(&mut self, name: &str, concentration_uM: f64, active: bool) -> Result<()> {
        let drug: Drug = name.parse()?;
        self.set_drug_concentration(drug, concentration_uM)?;
        self.set_drug_active(drug, active);
        Ok(())
    }

    /// Apply a `NAME=μM` spec, activating the drug
    pub fn apply_drug_spec(&mut self, spec: &str) -> Result<()> {
        let (name, value) = spec
            .split_once('=')
            .ok_or_else(|| SimulationError::InvalidDrugSpec(spec.to_string()))?;
        let concentration: f64 = value
            .trim()
            .parse()
            .map_err(|_| SimulationError::InvalidDrugSpec(spec.to_string()))?;
        self.set_drug_by_name(name, concentration, true)
    }

    // === Accessors ===

    pub fn params(&self) -> &SessionParameters {
        &self.params
    }

    pub fn drugs(&self) -> &DrugState {
        &self.drugs
    }

    pub fn time_ms(&self) -> f64 {
        self.time_ms
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Snapshot for display or export
    pub fn metrics(&self) -> SessionMetrics {
        let cell = self.params.cell_type.parameters();
        let latest = self.trace.latest();
        let voltage_mV = latest.map_or(cell.resting_potential_mV, |s| s.voltage_mV);

        SessionMetrics {
            simulation_time_ms: self.time_ms,
            running: self.is_running(),
            sample_count: self.trace.len(),
            cell_type: self.params.cell_type,
            stimulation_rate_hz: self.params.stimulation_rate_hz,
            speed: self.params.speed,
            voltage_mV,
            stimulated: latest.is_some_and(|s| s.stimulated),
            phase: latest.map_or(Phase::Phase4, |s| s.phase),
            above_threshold: cell.is_above_threshold(voltage_mV),
            active_drugs: self
                .drugs
                .active_drugs()
                .into_iter()
                .map(|(drug, concentration_uM)| ActiveDrug {
                    drug,
                    concentration_uM,
                })
                .collect(),
            channel_block: self.drugs.channel_block(),
            analysis: SignalAnalysis::from_samples(self.trace.recent(self.params.analysis_window)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SimulationSession {
        SimulationSession::new(SessionParameters {
            tick_interval_ms: 0.0,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_step_advances_by_speed() {
        let mut s = session();
        s.set_speed(2.5).unwrap();
        let sample = s.step().unwrap();
        assert_eq!(sample.time_ms, 2.5);
        assert!(sample.stimulated);
        assert_eq!(s.trace().len(), 1);
    }

    #[test]
    fn test_invalid_settings_leave_state_unchanged() {
        let mut s = session();
        assert!(s.set_stimulation_rate(0.0).is_err());
        assert!(s.set_speed(-1.0).is_err());
        assert!(s.set_drug_concentration(Drug::Ttx, -0.5).is_err());
        assert_eq!(s.params().stimulation_rate_hz, 1.0);
        assert_eq!(s.params().speed, 1.0);
        assert_eq!(s.drugs().dose(Drug::Ttx).concentration_uM, 0.0);
    }

    #[test]
    fn test_drug_spec() {
        let mut s = session();
        s.apply_drug_spec("verapamil=0.2").unwrap();
        let dose = s.drugs().dose(Drug::Verapamil);
        assert!(dose.active);
        assert_eq!(dose.concentration_uM, 0.2);

        assert!(matches!(
            s.apply_drug_spec("verapamil"),
            Err(SimulationError::InvalidDrugSpec(_))
        ));
        assert!(matches!(
            s.apply_drug_spec("aspirin=1"),
            Err(SimulationError::UnknownDrug(_))
        ));
    }

    #[test]
    fn test_metrics_before_first_sample() {
        let s = session();
        let m = s.metrics();
        assert_eq!(m.voltage_mV, -90.0);
        assert_eq!(m.phase, Phase::Phase4);
        assert!(m.analysis.is_none());
        assert!(!m.stimulated);
    }

    #[test]
    fn test_run_for() {
        let mut s = session();
        let produced = s.run_for(1000.0).unwrap();
        assert_eq!(produced, 1000);
        assert_eq!(s.time_ms(), 1000.0);
        assert_eq!(s.trace().len(), 1000);
    }
}
