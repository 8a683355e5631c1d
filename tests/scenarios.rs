// Copyright (c) 2024 Mike Tsao

use ensnare_oscillator::{oscillator::presets, prelude::*};
use float_cmp::approx_eq;
use more_asserts::{assert_gt, assert_lt};

fn advance_to(context: &AudioContext, when: f64) {
    context.with_backend(|b| b.set_time(Seconds(when)));
}

// A pitch glide: 440 Hz up an octave over one second. Because the target is
// positive, the glide is exponential, so the halfway point is the geometric
// mean of the two frequencies rather than the arithmetic one.
#[test]
fn octave_glide() {
    let context: AudioContext = AudioContext::default();
    let mut oscillator = presets::sine(&context, 440.0).unwrap();
    oscillator.start(0.0, None).unwrap();
    oscillator.set_frequency(880.0, 1.0, 0.0).unwrap();
    assert_eq!(oscillator.frequency(), FrequencyHz(880.0));

    advance_to(&context, 0.5);
    let halfway = oscillator.current_frequency().unwrap().0;
    assert!(approx_eq!(
        f64,
        halfway,
        (440.0f64 * 880.0).sqrt(),
        epsilon = 1e-9
    ));
    assert_lt!(halfway, 660.0);

    advance_to(&context, 1.0);
    assert_eq!(oscillator.current_frequency(), Ok(FrequencyHz(880.0)));
    assert_eq!(oscillator.frequency(), FrequencyHz(880.0));
}

// A fade-in that waits 0.2 seconds, then ramps linearly from silence to full
// volume over the next 0.5 seconds.
#[test]
fn delayed_fade_in() {
    let context: AudioContext = AudioContext::default();
    let mut oscillator = presets::sine(&context, 220.0).unwrap();
    oscillator.set_amplitude(0.0, 0.0, 0.0).unwrap();
    oscillator.set_amplitude(1.0, 0.5, 0.2).unwrap();

    advance_to(&context, 0.1);
    assert_eq!(oscillator.amplitude(), 0.0, "The ramp hasn't begun yet");
    advance_to(&context, 0.2);
    assert_eq!(oscillator.amplitude(), 0.0);
    advance_to(&context, 0.45);
    assert!(approx_eq!(f64, oscillator.amplitude(), 0.5, epsilon = 1e-9));
    advance_to(&context, 0.7);
    assert!(approx_eq!(f64, oscillator.amplitude(), 1.0, epsilon = 1e-9));
    advance_to(&context, 5.0);
    assert_eq!(oscillator.amplitude(), 1.0);
}

// Phase is a fraction of the period, so it follows the frequency around.
#[test]
fn phase_tracks_frequency() {
    let context: AudioContext = AudioContext::default();
    let mut oscillator = presets::sine(&context, 440.0).unwrap();
    oscillator.start(0.0, None).unwrap();
    oscillator.set_phase(0.5).unwrap();

    let delay = oscillator.delay_node().unwrap();
    let generator = oscillator.generator_node().unwrap();
    context.with_backend(|b| {
        assert_eq!(b.node_outputs(generator), vec![delay]);
        assert_eq!(b.node_outputs(delay), vec![oscillator.output_node()]);
    });
    assert!(approx_eq!(
        f64,
        oscillator.phase_delay().unwrap().0,
        (1.0 / 440.0) / 2.0,
        epsilon = 1e-12
    ));

    oscillator.set_frequency(880.0, 0.0, 0.0).unwrap();
    assert!(approx_eq!(
        f64,
        oscillator.phase_delay().unwrap().0,
        (1.0 / 880.0) / 2.0,
        epsilon = 1e-12
    ));
    assert_eq!(oscillator.phase(), Some(0.5));

    oscillator.set_phase(0.25).unwrap();
    assert_eq!(
        oscillator.delay_node(),
        Some(delay),
        "The delay line is created once"
    );

    // A restarted generator feeds the existing delay line.
    oscillator.stop(0.0).unwrap();
    oscillator.start(0.0, None).unwrap();
    let generator = oscillator.generator_node().unwrap();
    assert_eq!(
        context.with_backend(|b| b.node_outputs(generator)),
        vec![delay]
    );
}

// Modulating frequency from a source leaves the phase alone.
#[test]
fn modulation_does_not_touch_phase() {
    let context: AudioContext = AudioContext::default();
    let lfo = presets::sine(&context, 1.0).unwrap();
    let mut oscillator = presets::sine(&context, 100.0).unwrap();
    oscillator.set_phase(0.5).unwrap();
    let before = oscillator.phase_delay();

    oscillator.set_frequency(&lfo, 0.0, 0.0).unwrap();
    assert_eq!(oscillator.phase_delay(), before);
    assert_eq!(oscillator.frequency(), FrequencyHz(100.0));
}

// Vibrato: one oscillator wobbles another's pitch. The LFO is tapped at its
// output gain, so its amplitude sets the depth: a full-scale swing of the LFO
// moves the carrier 4 Hz either way. Processing stages on the LFO shape only
// what it sends to its own destination.
#[test]
fn vibrato() {
    let context: AudioContext = AudioContext::default();
    let mut lfo = presets::sine(&context, 5.0).unwrap();
    lfo.set_amplitude(4.0, 0.0, 0.0).unwrap();
    lfo.multiply_by(100.0).unwrap();
    lfo.disconnect().unwrap();

    let mut carrier = presets::sawtooth(&context, 440.0).unwrap();
    carrier.set_frequency(&lfo, 0.0, 0.0).unwrap();
    carrier.start(0.0, None).unwrap();
    lfo.start(0.0, None).unwrap();

    let param = carrier.frequency_param().unwrap();
    let stage = lfo.chain().stages()[0].node;
    context.with_backend(|b| {
        assert_eq!(b.param_sources(param), vec![lfo.output_node()]);
        assert_eq!(
            b.param_value(ParamId::gain(lfo.output_node()), b.now()),
            Some(4.0),
            "The depth is the gain at the tap"
        );
        assert!(
            !b.outputs(stage).contains(&Connection::Param(param)),
            "The multiplier doesn't reach the carrier"
        );
        assert!(b.is_emitting(lfo.generator_node().unwrap(), b.now()));
    });

    // A glide still works underneath the modulation.
    carrier.set_frequency(220.0, 2.0, 1.0).unwrap();
    advance_to(&context, 1.0);
    assert!(approx_eq!(
        f64,
        carrier.current_frequency().unwrap().0,
        440.0,
        epsilon = 1e-9
    ));
    advance_to(&context, 2.0);
    let midway = carrier.current_frequency().unwrap().0;
    assert_gt!(midway, 220.0);
    assert_lt!(midway, 440.0);

    assert_eq!(context.dispose_all(), 2);
}

// A pan move that waits a second.
#[test]
fn delayed_pan() {
    let context: AudioContext = AudioContext::default();
    let mut left = presets::square(&context, 110.0).unwrap();
    left.set_pan(-1.0, 0.0).unwrap();
    left.set_pan(1.0, 1.0).unwrap();
    assert_eq!(left.pan(), BipolarNormal::maximum());

    let pan_param = ParamId::pan(left.pan_node());
    context.with_backend(|b| {
        assert_eq!(b.param_value(pan_param, Seconds(0.5)), Some(-1.0));
        assert_eq!(b.param_value(pan_param, Seconds(1.0)), Some(1.0));
    });
}
