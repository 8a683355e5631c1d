// Copyright (c) 2024 Mike Tsao

//! The `vibrato` example wires one oscillator to wobble another's pitch, then
//! walks the clock forward and prints what the carrier is doing.

use clap::Parser;
use ensnare_oscillator::{oscillator::presets, prelude::*};
use log::info;

#[derive(Parser, Debug, Default)]
#[clap(author, about, long_about = None)]
struct Args {
    /// Oscillator settings for the carrier, as JSON
    #[clap(short = 's', long, value_parser)]
    settings: Option<String>,

    /// Vibrato rate, in Hertz
    #[clap(short = 'r', long, value_parser, default_value_t = 5.0)]
    rate: f64,

    /// Vibrato depth, in Hertz on either side of the carrier frequency
    #[clap(short = 'd', long, value_parser, default_value_t = 6.0)]
    depth: f64,

    /// How long to run, in seconds
    #[clap(short = 't', long, value_parser, default_value_t = 2.0)]
    duration: f64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let settings = match args.settings {
        Some(json) => OscillatorSettings::from_json(&json)?,
        None => OscillatorSettings::default(),
    };
    let context = AudioContext::<VirtualBackend>::default();

    // The LFO's amplitude is the depth in Hertz, since a modulator is tapped at
    // its output gain. It's kept out of the mix.
    let mut lfo = presets::sine(&context, args.rate)?;
    lfo.set_amplitude(args.depth, 0.0, 0.0)?;
    lfo.disconnect()?;

    let mut carrier = ModulatableOscillator::new_with_settings(&context, &settings)?;
    carrier.set_frequency(&lfo, 0.0, 0.0)?;
    carrier.set_amplitude(0.0, 0.0, 0.0)?;
    carrier.set_amplitude(settings.amplitude, 0.25, 0.0)?;
    lfo.start(0.0, None)?;
    carrier.start(0.0, None)?;
    info!(
        "carrier {} at {} with a {} Hz vibrato {} Hz deep",
        carrier.waveform(),
        carrier.frequency(),
        args.rate,
        args.depth
    );

    // Halfway through, glide down a fifth.
    let glide_at = args.duration / 2.0;
    carrier.set_frequency(carrier.frequency() * (2.0 / 3.0), 0.5, glide_at)?;

    let step = Seconds(0.125);
    while context.now().0 < args.duration {
        context.with_backend(|b| b.advance(step));
        println!(
            "{}  carrier {}  amplitude {:0.3}",
            context.now(),
            carrier.current_frequency()?,
            carrier.amplitude(),
        );
    }

    let disposed = context.dispose_all();
    info!("done; disposed {disposed} oscillators");
    Ok(())
}
