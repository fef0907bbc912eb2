use std::process::ExitCode;

use clap::Parser;
use log::{error, info};
use lr35902_run::cli::Args;
use lr35902_run::serial::printable;
use lr35902_run::{RunError, Runner};

fn init_logging(filter: Option<&str>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(filter) = filter {
        builder.parse_filters(filter);
    }
    builder.init();
}

fn run(args: &Args) -> Result<(), RunError> {
    let config = args.run_config()?;
    let program = std::fs::read(&args.program).map_err(|source| RunError::Io {
        path: args.program.clone(),
        source,
    })?;

    info!(
        "loaded {} ({} bytes) at {:04X}, entry {:04X}, {:?} mode",
        args.program.display(),
        program.len(),
        config.load_address,
        config.entry,
        config.model
    );

    let echo = config.serial_echo;
    let mut runner = Runner::new(config, &program);
    let result = runner.run();

    if echo && !runner.bus.output().is_empty() {
        println!();
    }
    if !echo {
        let serial = runner.bus.take_output();
        if !serial.is_empty() {
            let text: String = serial.iter().map(|&b| printable(b)).collect();
            println!("[SERIAL] {text}");
        }
    }
    if args.dump_state {
        println!("{}", runner.cpu.debug_state());
    }

    let summary = result?;
    info!("{summary}");
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
