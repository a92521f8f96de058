use amitick_std::{Simulation, clap::Parser, report};

fn main() -> anyhow::Result<()> {
    let args = amitick_std::Cli::parse();
    amitick_std::init_tracing(args.log())?;

    let options = args.options()?;
    tracing::info!(
        rate = %options.rate,
        counter_hz = options.config.clock.counter_hz(),
        loop_cycles = options.loop_cycles,
        periods = args.periods(),
        "running simulation"
    );

    let report = Simulation::new(options)?.run_periods(args.periods())?;

    if args.json() {
        println!("{}", report::to_json(&report)?);
    } else {
        println!("{report}");
    }

    Ok(())
}
