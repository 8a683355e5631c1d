// Copyright (c) 2024 Mike Tsao

use ensnare_oscillator::{oscillator::presets, prelude::*};
use float_cmp::approx_eq;

// Follows every edge out of the oscillator's output node and checks that the
// path to its destination is a single strand with no duplicated edges.
fn assert_single_strand(context: &AudioContext, oscillator: &ModulatableOscillator) {
    let expected: Vec<NodeUid> = oscillator
        .chain()
        .nodes()
        .chain([oscillator.pan_node()])
        .collect();
    context.with_backend(|b| {
        for pair in expected.windows(2) {
            assert_eq!(b.outputs(pair[0]), vec![Connection::Node(pair[1])]);
        }
    });
}

#[test]
fn repeated_offsets_replace_each_other() {
    let context: AudioContext = AudioContext::default();
    let mut oscillator = presets::sine(&context, 440.0).unwrap();
    oscillator.start(0.0, None).unwrap();

    oscillator.add_offset(1.0).unwrap().add_offset(2.0).unwrap();
    let chain = oscillator.chain();
    assert_eq!(chain.node_count(), 2);
    assert_eq!(chain.categories(), vec![StageCategory::Additive]);
    assert_eq!(chain.stages()[0].kind, StageKind::Offset(2.0));
    assert_single_strand(&context, &oscillator);
}

#[test]
fn categories_are_independent() {
    let context: AudioContext = AudioContext::default();
    let mut oscillator = presets::sine(&context, 440.0).unwrap();

    oscillator
        .multiply_by(3.0)
        .unwrap()
        .rescale_bipolar(200.0, 400.0)
        .unwrap()
        .add_offset(-1.0)
        .unwrap();
    assert_eq!(oscillator.chain().node_count(), 4);
    assert_eq!(
        oscillator.chain().categories(),
        vec![
            StageCategory::Multiplicative,
            StageCategory::RangeScale,
            StageCategory::Additive
        ]
    );

    oscillator.multiply_by(0.5).unwrap();
    oscillator.rescale(0.0, 1.0, -1.0, 1.0).unwrap();
    assert_eq!(
        oscillator.chain().node_count(),
        4,
        "Replacing stages never grows the chain"
    );
    assert_eq!(
        oscillator.chain().categories(),
        vec![
            StageCategory::Multiplicative,
            StageCategory::RangeScale,
            StageCategory::Additive
        ],
        "Replacements keep their original positions"
    );
    assert_eq!(
        oscillator
            .chain()
            .stage(StageCategory::Multiplicative)
            .map(|s| s.kind),
        Some(StageKind::Multiply(0.5))
    );
    assert_single_strand(&context, &oscillator);
}

#[test]
fn replaced_stages_are_released() {
    let context: AudioContext = AudioContext::default();
    let mut oscillator = presets::sine(&context, 440.0).unwrap();
    oscillator.add_offset(1.0).unwrap();
    let old = oscillator.chain().stages()[0].node;
    let node_count = context.with_backend(|b| b.node_count());

    oscillator.add_offset(5.0).unwrap();
    context.with_backend(|b| {
        assert!(!b.is_live(old));
        assert_eq!(b.node_count(), node_count, "One out, one in");
        assert_eq!(b.node_inputs(oscillator.pan_node()).len(), 1);
    });
    assert!(!context
        .live_oscillators()
        .is_empty());
}

#[test]
fn the_chain_processes_signal_in_order() {
    let context: AudioContext = AudioContext::default();
    let mut oscillator = presets::sine(&context, 440.0).unwrap();
    oscillator.set_amplitude(1.0, 0.0, 0.0).unwrap();
    oscillator
        .add_offset(1.0)
        .unwrap()
        .multiply_by(10.0)
        .unwrap();
    let generator = oscillator.generator_node().unwrap();

    // (0.5 * 1.0 + 1.0) * 10.0
    let value = context.with_backend(|b| b.probe(generator, 0.5)).unwrap();
    assert!(approx_eq!(f64, value, 15.0));

    oscillator.add_offset(-0.5).unwrap();
    let value = context.with_backend(|b| b.probe(generator, 0.5)).unwrap();
    assert!(approx_eq!(f64, value, 0.0));

    oscillator.rescale_bipolar(0.0, 100.0).unwrap();
    let value = context.with_backend(|b| b.probe(generator, 0.5)).unwrap();
    assert!(approx_eq!(f64, value, 50.0));
}

#[test]
fn connect_replaces_the_destination() {
    struct Bus {
        input: NodeUid,
    }
    impl HasInput for Bus {
        fn input(&self) -> NodeUid {
            self.input
        }
    }

    let context: AudioContext = AudioContext::default();
    let bus = Bus {
        input: context.with_backend(|b| b.create_gain()),
    };
    let mut oscillator = presets::sine(&context, 440.0).unwrap();
    let pan = oscillator.pan_node();

    oscillator.connect(&bus).unwrap();
    assert_eq!(oscillator.destination(), Some(Destination::Node(bus.input)));
    assert_eq!(
        context.with_backend(|b| b.node_outputs(pan)),
        vec![bus.input]
    );

    oscillator.connect(Destination::Default).unwrap();
    assert_eq!(
        context.with_backend(|b| b.node_outputs(pan)),
        vec![context.with_backend(|b| b.default_destination())]
    );
}

#[test]
fn connecting_to_a_missing_node_keeps_the_old_route() {
    let context: AudioContext = AudioContext::default();
    let mut oscillator = presets::sine(&context, 440.0).unwrap();
    let pan = oscillator.pan_node();
    let released = context.with_backend(|b| {
        let gain = b.create_gain();
        b.release(gain);
        gain
    });

    assert!(matches!(
        oscillator.connect(Destination::Node(released)),
        Err(OscillatorError::InvalidParameter {
            name: "destination",
            ..
        })
    ));
    assert_eq!(oscillator.destination(), Some(Destination::Default));
    assert_eq!(
        context.with_backend(|b| b.node_outputs(pan)),
        vec![context.with_backend(|b| b.default_destination())],
        "The existing route should be untouched"
    );
}

#[test]
fn disconnect_cuts_only_external_edges() {
    let context: AudioContext = AudioContext::default();
    let mut lfo = presets::sine(&context, 2.0).unwrap();
    let mut carrier = presets::sine(&context, 440.0).unwrap();
    lfo.multiply_by(20.0).unwrap();
    carrier.start(0.0, None).unwrap();
    carrier.set_frequency(&lfo, 0.0, 0.0).unwrap();

    lfo.disconnect().unwrap();
    assert_eq!(lfo.destination(), None);
    let param = carrier.frequency_param().unwrap();
    context.with_backend(|b| {
        assert!(b.param_sources(param).is_empty());
        assert!(b.outputs(lfo.pan_node()).is_empty());
        assert!(
            b.probe(lfo.output_node(), 1.0).is_none(),
            "Nothing reaches the destination until connect() is called again"
        );
    });
    assert_single_strand(&context, &lfo);

    lfo.connect(Destination::Default).unwrap();
    let reached = context.with_backend(|b| b.probe(lfo.output_node(), 1.0));
    assert_eq!(reached, Some(10.0), "0.5 gain, then times 20");
}
