// Copyright (c) 2024 Mike Tsao

use super::{LivenessRegistry, ModulationRegistry, OwnedNodes, SignalChain, StageKind, Waveform};
use crate::{
    error::{OscillatorError, Result},
    graph::ParamId,
    prelude::*,
    types::map_range,
    util::OscillatorSettings,
};
use delegate::delegate;
use log::{debug, trace, warn};

/// A periodic signal source whose pitch, loudness, stereo position, and phase
/// can each be scheduled or driven by other signals, and whose output path can
/// be extended with processing stages while it plays.
///
/// The oscillator owns a small node graph inside its [AudioContext]'s backend:
///
/// ```text
/// generator -> [delay] -> output gain -> [stages...] -> panner -> destination
/// ```
///
/// The generator is one-shot, so every [start()](Self::start) allocates a
/// fresh one and rebuilds it from state kept here: the waveform, the nominal
/// frequency, and the registered frequency modulators. Everything else in the
/// graph survives restarts.
///
/// Time arguments are offsets from the context's current clock time.
///
/// Disposal is explicit. Dropping an oscillator without calling
/// [dispose()](Self::dispose) leaves its nodes in the graph until
/// [AudioContext::dispose_all()] sweeps them up.
#[derive(Debug)]
pub struct ModulatableOscillator<B: AudioBackend = VirtualBackend> {
    uid: OscillatorUid,
    context: AudioContext<B>,

    waveform: Waveform,
    frequency: FrequencyHz,
    amplitude: ParameterType,
    pan: BipolarNormal,
    phase: Option<f64>,
    max_phase_delay: Seconds,

    is_started: bool,
    is_disposed: bool,

    generator: Option<NodeUid>,
    delay: Option<NodeUid>,
    pan_node: NodeUid,
    chain: SignalChain,

    frequency_modulators: ModulationRegistry,
    amplitude_modulators: ModulationRegistry,
    destination: Option<Destination>,
}
/// The modulation tap is the output gain node, ahead of any processing
/// stages. A modulator's depth is its amplitude; stages only shape what is
/// heard at its destination.
impl<B: AudioBackend> HasOutput for ModulatableOscillator<B> {
    fn output(&self) -> NodeUid {
        self.chain.output()
    }
}
impl<B: AudioBackend> ModulatableOscillator<B> {
    /// Creates an oscillator with default settings apart from its frequency
    /// and waveform.
    pub fn new_with(
        context: &AudioContext<B>,
        frequency: impl Into<FrequencyHz>,
        waveform: Waveform,
    ) -> Result<Self> {
        Self::new_with_settings(
            context,
            &OscillatorSettings {
                frequency: frequency.into(),
                waveform,
                ..Default::default()
            },
        )
    }

    /// Creates an oscillator and wires it to the context's default
    /// destination. Its generator is allocated but silent until
    /// [start()](Self::start).
    pub fn new_with_settings(
        context: &AudioContext<B>,
        settings: &OscillatorSettings,
    ) -> Result<Self> {
        check_finite("frequency", settings.frequency.0)?;
        check_finite("amplitude", settings.amplitude)?;
        check_pan(settings.pan.0)?;
        if !settings.max_phase_delay.is_finite() || settings.max_phase_delay.0 <= 0.0 {
            return Err(OscillatorError::invalid(
                "max_phase_delay",
                format!("{} must be positive", settings.max_phase_delay),
            ));
        }

        let mut ctx = context.lock();
        let inner = &mut *ctx;
        let uid = inner.uid_factory.mint_next();
        let backend = &mut inner.backend;
        let now = backend.now();

        let generator = backend.create_generator(settings.waveform, settings.frequency.abs());
        let output = backend.create_gain();
        let pan_node = backend.create_panner();
        backend.set_value_at_time(ParamId::gain(output), settings.amplitude, now);
        backend.set_value_at_time(ParamId::pan(pan_node), settings.pan.0, now);
        backend.connect(generator, output);
        backend.connect(output, pan_node);
        let destination = backend.default_destination();
        backend.connect(pan_node, destination);

        let oscillator = Self {
            uid,
            context: context.clone(),
            waveform: settings.waveform,
            frequency: settings.frequency,
            amplitude: settings.amplitude,
            pan: settings.pan,
            phase: None,
            max_phase_delay: settings.max_phase_delay,
            is_started: false,
            is_disposed: false,
            generator: Some(generator),
            delay: None,
            pan_node,
            chain: SignalChain::new_with(output),
            frequency_modulators: ModulationRegistry::default(),
            amplitude_modulators: ModulationRegistry::default(),
            destination: Some(Destination::Default),
        };
        oscillator.sync(&mut inner.registry);
        debug!(
            "oscillator {uid}: created {} at {}",
            oscillator.waveform, oscillator.frequency
        );
        Ok(oscillator)
    }

    /// Starts a new generator `at` seconds from now. If the oscillator is
    /// already playing, the current generator is stopped first. A `frequency`
    /// replaces the nominal frequency.
    ///
    /// Every registered frequency modulator is attached to the new generator,
    /// in registration order.
    pub fn start(
        &mut self,
        at: impl Into<Seconds>,
        frequency: Option<FrequencyHz>,
    ) -> Result<()> {
        let at = check_offset("at", at.into())?;
        if let Some(frequency) = frequency {
            check_finite("frequency", frequency.0)?;
        }
        let context = self.context.clone();
        let mut ctx = context.lock();
        let inner = &mut *ctx;
        self.check_live(&inner.registry)?;

        let backend = &mut inner.backend;
        let now = backend.now();
        if self.is_started {
            if let Some(generator) = self.generator {
                backend.stop(generator, now);
            }
            self.is_started = false;
            debug!("oscillator {}: restarting", self.uid);
        }
        if let Some(frequency) = frequency {
            self.frequency = frequency;
        }
        if let Some(old) = self.generator.take() {
            backend.disconnect(old);
            backend.release(old);
        }

        let generator = backend.create_generator(self.waveform, self.frequency.abs());
        backend.connect(generator, self.delay.unwrap_or(self.chain.output()));
        backend.start(generator, now + at);
        self.frequency_modulators
            .attach_all(backend, ParamId::frequency(generator));
        self.generator = Some(generator);
        self.is_started = true;
        self.sync(&mut inner.registry);
        debug!(
            "oscillator {}: started generator {generator} at {}",
            self.uid,
            now + at
        );
        Ok(())
    }

    /// Stops the generator `at` seconds from now. The oscillator counts as
    /// stopped immediately, even if the generator falls silent later.
    /// Stopping a stopped or disposed oscillator does nothing.
    pub fn stop(&mut self, at: impl Into<Seconds>) -> Result<()> {
        let at = check_offset("at", at.into())?;
        if !self.is_started || self.is_disposed {
            return Ok(());
        }
        let context = self.context.clone();
        let mut ctx = context.lock();
        if !ctx.registry.contains(self.uid) {
            self.forget_nodes();
            return Ok(());
        }
        let backend = &mut ctx.backend;
        let when = backend.now() + at;
        if let Some(generator) = self.generator {
            backend.stop(generator, when);
        }
        self.is_started = false;
        debug!("oscillator {}: stopping at {when}", self.uid);
        Ok(())
    }

    /// Sets the output gain.
    ///
    /// A value ramps linearly to its target, starting `delay` seconds from
    /// now and arriving `ramp` seconds after that. A zero `ramp` sets the
    /// value at the start time.
    ///
    /// A signal source is instead connected to the gain parameter, where it
    /// stays until [disconnect()](Self::disconnect) or disposal. `ramp` and
    /// `delay` are ignored.
    pub fn set_amplitude(
        &mut self,
        value: impl Into<ParamInput>,
        ramp: impl Into<Seconds>,
        delay: impl Into<Seconds>,
    ) -> Result<()> {
        let value = value.into();
        let ramp = check_offset("ramp", ramp.into())?;
        let delay = check_offset("delay", delay.into())?;
        if let ParamInput::Value(v) = value {
            check_finite("amplitude", v)?;
        }
        let context = self.context.clone();
        let mut ctx = context.lock();
        let inner = &mut *ctx;
        self.check_live(&inner.registry)?;

        let backend = &mut inner.backend;
        let param = ParamId::gain(self.chain.output());
        match value {
            ParamInput::Value(v) => {
                let start = backend.now() + delay;
                if ramp.is_zero() {
                    backend.set_value_at_time(param, v, start);
                } else {
                    let from = backend.param_value(param, start).unwrap_or(self.amplitude);
                    backend.set_value_at_time(param, from, start);
                    backend.linear_ramp_to_value_at_time(param, v, start + ramp);
                }
                self.amplitude = v;
                trace!(
                    "oscillator {}: amplitude -> {v} from {start} over {ramp}",
                    self.uid
                );
            }
            ParamInput::Source(source) => {
                self.amplitude_modulators.register(source);
                backend.connect_param(source, param);
                debug!("oscillator {}: amplitude modulated by {source}", self.uid);
            }
        }
        Ok(())
    }

    /// The output gain's value right now. After disposal, the last known
    /// value.
    pub fn amplitude(&self) -> ParameterType {
        if self.is_disposed {
            return self.amplitude;
        }
        let ctx = self.context.lock();
        ctx.backend
            .param_value(ParamId::gain(self.chain.output()), ctx.backend.now())
            .unwrap_or(self.amplitude)
    }

    /// The output gain parameter, for connecting modulators directly.
    pub fn amplitude_param(&self) -> Result<ParamId> {
        self.ensure_live()?;
        Ok(ParamId::gain(self.chain.output()))
    }

    /// Sets the frequency.
    ///
    /// A value becomes the new nominal frequency. With a zero `ramp` it is set
    /// `delay` seconds from now. Otherwise the generator glides to it over
    /// `ramp` seconds after the delay: exponentially for a positive target,
    /// linearly for anything else. A phase offset, if one is set, is
    /// recomputed for the new period.
    ///
    /// A signal source is connected to the generator's frequency parameter and
    /// registered, so it is re-attached whenever the oscillator restarts. The
    /// nominal frequency and phase are left alone.
    pub fn set_frequency(
        &mut self,
        value: impl Into<ParamInput>,
        ramp: impl Into<Seconds>,
        delay: impl Into<Seconds>,
    ) -> Result<()> {
        let value = value.into();
        let ramp = check_offset("ramp", ramp.into())?;
        let delay = check_offset("delay", delay.into())?;
        if let ParamInput::Value(v) = value {
            check_finite("frequency", v)?;
        }
        let context = self.context.clone();
        let mut ctx = context.lock();
        let inner = &mut *ctx;
        self.check_live(&inner.registry)?;

        let backend = &mut inner.backend;
        match value {
            ParamInput::Value(v) => {
                self.frequency = FrequencyHz(v);
                if let Some(generator) = self.generator {
                    let param = ParamId::frequency(generator);
                    let start = backend.now() + delay;
                    if ramp.is_zero() {
                        backend.set_value_at_time(param, v, start);
                    } else {
                        let from = backend.param_value(param, start).unwrap_or(v);
                        backend.set_value_at_time(param, from, start);
                        if v > 0.0 {
                            backend.exponential_ramp_to_value_at_time(param, v, start + ramp);
                        } else {
                            backend.linear_ramp_to_value_at_time(param, v, start + ramp);
                        }
                    }
                    trace!(
                        "oscillator {}: frequency -> {v} from {start} over {ramp}",
                        self.uid
                    );
                }
                if let Some(fraction) = self.phase {
                    self.apply_phase(backend, fraction);
                }
            }
            ParamInput::Source(source) => {
                self.frequency_modulators.register(source);
                if self.is_started {
                    if let Some(generator) = self.generator {
                        backend.connect_param(source, ParamId::frequency(generator));
                    }
                }
                debug!("oscillator {}: frequency modulated by {source}", self.uid);
            }
        }
        Ok(())
    }

    /// The nominal frequency: the last value set, not the instantaneous value
    /// of a glide in progress.
    pub fn frequency(&self) -> FrequencyHz {
        self.frequency
    }

    /// The playing generator's frequency right now, ignoring modulators.
    pub fn current_frequency(&self) -> Result<FrequencyHz> {
        let param = self.frequency_param()?;
        let ctx = self.context.lock();
        ctx.backend
            .param_value(param, ctx.backend.now())
            .map(FrequencyHz)
            .ok_or(OscillatorError::InactiveGenerator(self.uid))
    }

    /// The playing generator's frequency parameter. It changes on every
    /// restart, so it's an error to ask for it while stopped.
    pub fn frequency_param(&self) -> Result<ParamId> {
        self.ensure_live()?;
        match self.generator {
            Some(generator) if self.is_started => Ok(ParamId::frequency(generator)),
            _ => Err(OscillatorError::InactiveGenerator(self.uid)),
        }
    }

    /// Changes the waveform, now and for every later restart.
    pub fn set_waveform(&mut self, waveform: Waveform) -> Result<()> {
        let context = self.context.clone();
        let mut ctx = context.lock();
        let inner = &mut *ctx;
        self.check_live(&inner.registry)?;
        self.waveform = waveform;
        if let Some(generator) = self.generator {
            inner.backend.set_waveform(generator, waveform);
        }
        Ok(())
    }

    #[allow(missing_docs)]
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Moves the oscillator in the stereo field `delay` seconds from now.
    pub fn set_pan(&mut self, value: f64, delay: impl Into<Seconds>) -> Result<()> {
        check_pan(value)?;
        let delay = check_offset("delay", delay.into())?;
        let context = self.context.clone();
        let mut ctx = context.lock();
        let inner = &mut *ctx;
        self.check_live(&inner.registry)?;

        let backend = &mut inner.backend;
        let when = backend.now() + delay;
        backend.set_value_at_time(ParamId::pan(self.pan_node), value, when);
        self.pan = BipolarNormal::new(value);
        trace!("oscillator {}: pan -> {value} at {when}", self.uid);
        Ok(())
    }

    /// The most recently requested pan position.
    pub fn pan(&self) -> BipolarNormal {
        self.pan
    }

    /// Offsets the waveform by `fraction` of its period, in `[0, 1)`. The
    /// offset stays a fraction: later frequency changes recompute the delay.
    ///
    /// The first call splices a delay line between the generator and the
    /// output gain, and it stays there from then on.
    pub fn set_phase(&mut self, fraction: f64) -> Result<()> {
        if !fraction.is_finite() || !(0.0..1.0).contains(&fraction) {
            return Err(OscillatorError::invalid(
                "phase",
                format!("{fraction} is outside [0, 1)"),
            ));
        }
        let context = self.context.clone();
        let mut ctx = context.lock();
        let inner = &mut *ctx;
        self.check_live(&inner.registry)?;

        let backend = &mut inner.backend;
        if self.delay.is_none() {
            let delay = backend.create_delay(self.max_phase_delay);
            let output = self.chain.output();
            if let Some(generator) = self.generator {
                backend.disconnect_from(generator, output);
                backend.connect(generator, delay);
            }
            backend.connect(delay, output);
            self.delay = Some(delay);
            self.sync(&mut inner.registry);
            debug!("oscillator {}: inserted phase delay {delay}", self.uid);
        }
        self.phase = Some(fraction);
        self.apply_phase(&mut inner.backend, fraction);
        Ok(())
    }

    #[allow(missing_docs)]
    pub fn phase(&self) -> Option<f64> {
        self.phase
    }

    /// The delay currently implementing the phase offset, if there is one.
    pub fn phase_delay(&self) -> Option<Seconds> {
        let delay = self.delay?;
        let ctx = self.context.lock();
        ctx.backend
            .param_value(ParamId::delay_time(delay), ctx.backend.now())
            .map(Seconds)
    }

    /// Routes the oscillator's finished signal to `destination`, replacing
    /// wherever it went before. A node that doesn't exist is refused, and the
    /// existing routing is kept.
    pub fn connect(&mut self, destination: impl Into<Destination>) -> Result<()> {
        let destination = destination.into();
        let context = self.context.clone();
        let mut ctx = context.lock();
        let inner = &mut *ctx;
        self.check_live(&inner.registry)?;

        let backend = &mut inner.backend;
        let target = match destination {
            Destination::Default => backend.default_destination(),
            Destination::Node(node) => node,
        };
        if !backend.is_live(target) {
            return Err(OscillatorError::invalid(
                "destination",
                format!("{target} doesn't exist"),
            ));
        }
        backend.disconnect(self.pan_node);
        backend.connect(self.pan_node, target);
        self.destination = Some(destination);
        debug!("oscillator {}: routed to {target}", self.uid);
        Ok(())
    }

    /// Cuts the oscillator off from everything downstream of it, including
    /// anything it was modulating, and detaches its amplitude modulators.
    /// Internal wiring stays intact. Nothing is heard until the caller
    /// [connect()](Self::connect)s it again.
    pub fn disconnect(&mut self) -> Result<()> {
        let context = self.context.clone();
        let mut ctx = context.lock();
        let inner = &mut *ctx;
        self.check_live(&inner.registry)?;

        let backend = &mut inner.backend;
        let output = self.chain.output();
        self.amplitude_modulators
            .detach_all(backend, ParamId::gain(output));
        self.amplitude_modulators.clear();
        backend.disconnect(output);
        self.chain.link(backend, self.pan_node);
        backend.disconnect(self.pan_node);
        self.destination = None;
        debug!("oscillator {}: disconnected", self.uid);
        Ok(())
    }

    /// Adds `value` to the output signal, replacing any earlier offset.
    pub fn add_offset(&mut self, value: f64) -> Result<&mut Self> {
        check_finite("offset", value)?;
        self.splice(StageKind::Offset(value))
    }

    /// Multiplies the output signal by `value`, replacing any earlier
    /// multiplier.
    pub fn multiply_by(&mut self, value: f64) -> Result<&mut Self> {
        check_finite("multiplier", value)?;
        self.splice(StageKind::Multiply(value))
    }

    /// Maps the output signal from `in_min..in_max` onto `out_min..out_max`,
    /// replacing any earlier rescale.
    pub fn rescale(
        &mut self,
        in_min: f64,
        in_max: f64,
        out_min: f64,
        out_max: f64,
    ) -> Result<&mut Self> {
        check_finite("in_min", in_min)?;
        check_finite("in_max", in_max)?;
        check_finite("out_min", out_min)?;
        check_finite("out_max", out_max)?;
        if in_min == in_max {
            return Err(OscillatorError::invalid(
                "in_max",
                format!("input range {in_min}..{in_max} is empty"),
            ));
        }
        self.splice(StageKind::Rescale {
            in_min,
            in_max,
            out_min,
            out_max,
        })
    }

    /// Maps a bipolar signal onto `out_min..out_max`.
    pub fn rescale_bipolar(&mut self, out_min: f64, out_max: f64) -> Result<&mut Self> {
        self.rescale(BipolarNormal::MIN, BipolarNormal::MAX, out_min, out_max)
    }

    fn splice(&mut self, kind: StageKind) -> Result<&mut Self> {
        let context = self.context.clone();
        let mut ctx = context.lock();
        let inner = &mut *ctx;
        self.check_live(&inner.registry)?;

        self.chain.splice(&mut inner.backend, kind, self.pan_node);
        self.sync(&mut inner.registry);
        Ok(self)
    }

    /// Stops the oscillator, severs and releases every node it owns, and
    /// removes it from its context's registry. Modulators it referenced are
    /// left alone. Disposing twice does nothing.
    pub fn dispose(&mut self) {
        if self.is_disposed {
            return;
        }
        self.amplitude = self.amplitude();
        let context = self.context.clone();
        let mut ctx = context.lock();
        let inner = &mut *ctx;
        if inner.registry.remove(self.uid).is_some() {
            self.owned_nodes().teardown(&mut inner.backend);
            debug!("oscillator {}: disposed", self.uid);
        } else {
            debug!("oscillator {}: nodes were already torn down", self.uid);
        }
        self.forget_nodes();
    }

    /// Whether the oscillator's nodes are gone, either through
    /// [dispose()](Self::dispose) or [AudioContext::dispose_all()].
    pub fn is_disposed(&self) -> bool {
        self.is_disposed || !self.context.is_live(self.uid)
    }

    #[allow(missing_docs)]
    pub fn uid(&self) -> OscillatorUid {
        self.uid
    }

    /// Whether the oscillator is logically playing.
    pub fn is_started(&self) -> bool {
        self.is_started
    }

    #[allow(missing_docs)]
    pub fn context(&self) -> &AudioContext<B> {
        &self.context
    }

    /// The post-output processing chain.
    pub fn chain(&self) -> &SignalChain {
        &self.chain
    }

    #[allow(missing_docs)]
    pub fn frequency_modulators(&self) -> &ModulationRegistry {
        &self.frequency_modulators
    }

    #[allow(missing_docs)]
    pub fn amplitude_modulators(&self) -> &ModulationRegistry {
        &self.amplitude_modulators
    }

    /// Where the finished signal goes, or None after
    /// [disconnect()](Self::disconnect).
    pub fn destination(&self) -> Option<Destination> {
        self.destination
    }

    delegate! {
        to self.chain {
            /// The output gain node, which stays the same across restarts.
            #[call(output)]
            pub fn output_node(&self) -> NodeUid;
        }
    }

    #[allow(missing_docs)]
    pub fn pan_node(&self) -> NodeUid {
        self.pan_node
    }

    #[allow(missing_docs)]
    pub fn delay_node(&self) -> Option<NodeUid> {
        self.delay
    }

    /// The current generator. It is replaced on every start.
    pub fn generator_node(&self) -> Option<NodeUid> {
        self.generator
    }

    #[allow(missing_docs)]
    pub fn max_phase_delay(&self) -> Seconds {
        self.max_phase_delay
    }

    fn apply_phase(&self, backend: &mut B, fraction: f64) {
        let Some(delay) = self.delay else {
            return;
        };
        let period = self.frequency.period();
        let mut seconds = Seconds(map_range(fraction, 0.0, 1.0, 0.0, period));
        if seconds > self.max_phase_delay {
            warn!(
                "oscillator {}: phase delay {seconds} exceeds {}; capping it",
                self.uid, self.max_phase_delay
            );
            seconds = self.max_phase_delay;
        }
        let now = backend.now();
        backend.set_value_at_time(ParamId::delay_time(delay), seconds.0, now);
        trace!("oscillator {}: phase {fraction} -> {seconds}", self.uid);
    }

    fn owned_nodes(&self) -> OwnedNodes {
        OwnedNodes {
            generator: self.generator,
            delay: self.delay,
            output: self.chain.output(),
            pan: self.pan_node,
            stages: self.chain.stage_nodes(),
        }
    }

    fn sync(&self, registry: &mut LivenessRegistry) {
        registry.insert(self.uid, self.owned_nodes());
    }

    // AudioContext::dispose_all() can tear down the nodes behind our back, so
    // every mutation checks the registry before touching the graph.
    fn check_live(&mut self, registry: &LivenessRegistry) -> Result<()> {
        if !self.is_disposed && !registry.contains(self.uid) {
            debug!("oscillator {}: found torn down by its context", self.uid);
            self.forget_nodes();
        }
        self.ensure_not_disposed()
    }

    // For accessors that can't record a teardown by the context, only report
    // it.
    fn ensure_live(&self) -> Result<()> {
        self.ensure_not_disposed()?;
        if self.context.is_live(self.uid) {
            Ok(())
        } else {
            Err(OscillatorError::Disposed(self.uid))
        }
    }

    fn ensure_not_disposed(&self) -> Result<()> {
        if self.is_disposed {
            Err(OscillatorError::Disposed(self.uid))
        } else {
            Ok(())
        }
    }

    fn forget_nodes(&mut self) {
        self.is_disposed = true;
        self.is_started = false;
        self.generator = None;
        self.delay = None;
        self.frequency_modulators.clear();
        self.amplitude_modulators.clear();
        self.destination = None;
    }
}

fn check_finite(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(OscillatorError::invalid(name, format!("{value} is not finite")))
    }
}

fn check_offset(name: &'static str, value: Seconds) -> Result<Seconds> {
    if value.is_finite() && value.0 >= 0.0 {
        Ok(value)
    } else {
        Err(OscillatorError::invalid(
            name,
            format!("{value} is not a time in the future"),
        ))
    }
}

fn check_pan(value: f64) -> Result<f64> {
    if BipolarNormal::contains(value) {
        Ok(value)
    } else {
        Err(OscillatorError::invalid(
            "pan",
            format!("{value} is outside -1.0..=1.0"),
        ))
    }
}
