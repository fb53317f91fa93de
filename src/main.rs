//! evchar - print the characters typed on any attached input device
//!
//! Discovers every readable /dev/input/eventN node, listens to all of them
//! at once, and prints each resolved symbol until SIGINT/SIGTERM.

use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use std::sync::Arc;

use evchar::config::{self, Config};
use evchar::input::{
    cancel_pair, describe_symbol, discover_devices, start_listening, CancelHandle, CancelSignal,
    EvdevBackend, EventKind, EventReceiver, ListenOptions, Translator,
};

fn print_help() {
    println!(
        r#"evchar {} - merge all input devices into one character stream

USAGE:
    evchar [OPTIONS]

OPTIONS:
    -h, --help              Print this help message
    -V, --version           Print version information
    -l, --list-devices      List input devices that can be opened, then exit
    -r, --raw               Print raw events instead of translated characters
    --init-config           Write the default config file
    -f, --force             Overwrite an existing config file

CONFIG FILE:
    $EVCHAR_CONFIG, ~/.config/evchar/config.toml or /etc/evchar/config.toml

Reading /dev/input usually requires root or membership in the 'input' group.
"#,
        env!("CARGO_PKG_VERSION")
    );
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let has_flag = |long: &str, short: &str| args.iter().any(|a| a == long || a == short);

    if has_flag("--help", "-h") {
        print_help();
        return Ok(());
    }

    if has_flag("--version", "-V") {
        println!("evchar {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.iter().any(|a| a == "--init-config") {
        return init_config(has_flag("--force", "-f"));
    }

    let config = Config::load();
    let backend = EvdevBackend::from_config(&config.devices);

    if has_flag("--list-devices", "-l") {
        list_devices(&backend);
        return Ok(());
    }

    let raw_mode = has_flag("--raw", "-r");
    let keymaps = Arc::new(config.keymap.keymaps().context("Invalid keymap config")?);
    let options = ListenOptions::from_config(&config.reader);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| anyhow!("Failed to create tokio runtime: {}", e))?;

    let (listener, events) = start_listening(&backend, &options)?;
    let _ = sd_notify::notify(true, &[sd_notify::NotifyState::Ready]);

    let (handle, cancel) = cancel_pair();
    rt.block_on(async move {
        tokio::spawn(cancel_on_signal(handle));

        if raw_mode {
            dump_raw(events, cancel).await;
        } else {
            let (out_tx, mut out_rx) = tokio::sync::mpsc::unbounded_channel();
            let translator = tokio::spawn(Translator::new(keymaps).run(events, out_tx, cancel));
            while let Some(sym) = out_rx.recv().await {
                println!("{}", describe_symbol(sym));
            }
            if let Err(e) = translator.await {
                warn!("Translator task failed: {}", e);
            }
        }
    });

    let _ = sd_notify::notify(true, &[sd_notify::NotifyState::Stopping]);
    listener.shutdown();
    info!("evchar exiting");
    Ok(())
}

/// Write the default config, asking before overwriting
fn init_config(force: bool) -> Result<()> {
    if let Some(path) = config::default_config_path() {
        if path.exists() && !force {
            println!("Config file already exists: {}", path.display());
            print!("Overwrite? [y/N]: ");
            std::io::Write::flush(&mut std::io::stdout())?;

            let mut input = String::new();
            std::io::stdin().read_line(&mut input)?;
            let input = input.trim().to_lowercase();

            if input != "y" && input != "yes" {
                println!("Aborted.");
                return Ok(());
            }
        }
    }

    let path = Config::write_default_config()?;
    println!("Config written: {}", path.display());
    Ok(())
}

/// Print every device that opens, with its kernel name
fn list_devices(backend: &EvdevBackend) {
    let devices = discover_devices(backend);
    if devices.is_empty() {
        println!("No input devices could be opened.");
        return;
    }
    for found in devices {
        let name = found.device.name().unwrap_or_else(|| "unknown".to_string());
        println!("{}\t{}", found.path.display(), name);
    }
}

/// Print raw events until cancelled or every reader is gone
async fn dump_raw(mut events: EventReceiver, mut cancel: CancelSignal) {
    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => break,
            event = events.recv() => {
                let Some(event) = event else { break };
                let kind = match event.kind {
                    EventKind::Key => "KEY".to_string(),
                    EventKind::Relative => "REL".to_string(),
                    EventKind::Other(ty) => format!("type {}", ty),
                };
                println!("{:<8} code {:>4} value {:>6}", kind, event.code, event.value);
            }
        }
    }
}

/// Cancel on SIGINT or SIGTERM
async fn cancel_on_signal(handle: CancelHandle) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            warn!("Cannot install SIGTERM handler: {}", e);
            if tokio::signal::ctrl_c().await.is_ok() {
                handle.cancel();
            }
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("SIGINT received"),
        _ = terminate.recv() => info!("SIGTERM received"),
    }
    handle.cancel();
}
