//! eyelight - realtime noise texture
//!
//! Run with: cargo run --release
//!
//! Environment:
//!   RUST_LOG                 log filter (default: info)
//!   EYELIGHT_SYNTH_SEED      seed for block synthesis
//!   EYELIGHT_RESELECT_SEED   seed for block reselection

use std::sync::mpsc;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use eyelight::{
    host::{AudioHost, CpalHost},
    EngineConfig, NoiseEngine, CLIENT_NAME,
};

/// Why the process is stopping.
enum Shutdown {
    Signal,
    Host(String),
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = EngineConfig::from_env()?;
    log::debug!("{config:?}");

    let mut host = CpalHost::open(CLIENT_NAME).wrap_err("cannot open audio host")?;

    let mut engine = NoiseEngine::new(&config).wrap_err("cannot build block pool")?;
    engine.register_ports(&mut host)?;

    let (tx, rx) = mpsc::channel();
    {
        let tx = tx.clone();
        host.on_shutdown(Box::new(move |reason| {
            let _ = tx.send(Shutdown::Host(reason));
        }));
    }
    ctrlc::set_handler(move || {
        let _ = tx.send(Shutdown::Signal);
    })
    .wrap_err("cannot install signal handler")?;

    let session = host.activate(engine).wrap_err("cannot activate client")?;
    println!("{} running. Press Ctrl+C to stop", session.client_name());

    // Run until interrupted
    let outcome = match rx.recv() {
        Ok(Shutdown::Signal) => {
            log::info!("signal received, exiting");
            Ok(())
        }
        Ok(Shutdown::Host(reason)) => Err(eyre!("audio host shut down: {reason}")),
        Err(_) => Err(eyre!("shutdown channel closed")),
    };

    drop(session);
    outcome
}
