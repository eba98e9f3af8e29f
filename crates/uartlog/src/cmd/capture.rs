use std::fs::File;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::info;
use uartlog_capture::{configure_link, CaptureConfig, FlushPolicy, LogSink, Session, MAX_PORTS};
use uartlog_port::{ByteSource, LinkConfig, ReplaySource, SerialLink};

use crate::cmd::CaptureArgs;
use crate::exit::{capture_error, io_error, port_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_capture_summary, OutputFormat};

pub fn run(args: CaptureArgs, format: OutputFormat) -> CliResult<i32> {
    let config = capture_config(&args)?;
    let sources = open_sources(&args)?;

    let log = File::create(&args.log)
        .map_err(|err| io_error(&format!("failed to create {}", args.log.display()), err))?;
    let sink = LogSink::new(log, !args.quiet);

    let mut session =
        Session::new(sources, config, sink).map_err(|err| capture_error("capture failed", err))?;
    let ports: Vec<String> = session
        .port_names()
        .into_iter()
        .map(str::to_string)
        .collect();
    info!(
        ports = %ports.join(","),
        log = %args.log.display(),
        style = ?config.style,
        wire = ?config.format,
        "capture started"
    );

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let stats = session
        .run(&running)
        .map_err(|err| capture_error("capture failed", err))?;

    print_capture_summary(&ports, &args.log, &stats, format);
    Ok(SUCCESS)
}

fn capture_config(args: &CaptureArgs) -> CliResult<CaptureConfig> {
    if !args.gap_ms.is_finite() || args.gap_ms < 0.0 {
        return Err(CliError::new(USAGE, "--gap-ms must be a non-negative number"));
    }
    if args.ports.len() > MAX_PORTS {
        return Err(CliError::new(
            USAGE,
            format!("at most {MAX_PORTS} --port values are supported"),
        ));
    }

    Ok(CaptureConfig {
        format: args.wire.into(),
        policy: FlushPolicy::from_gap_ms(args.max_bytes, args.gap_ms),
        style: args.style.into(),
        ..CaptureConfig::default()
    })
}

fn open_sources(args: &CaptureArgs) -> CliResult<Vec<Box<dyn ByteSource>>> {
    if let Some(path) = &args.replay {
        let source =
            ReplaySource::open(path).map_err(|err| port_error("replay failed", err))?;
        return Ok(vec![Box::new(source)]);
    }

    let link_config = LinkConfig {
        baud: args.baud.unwrap_or_default(),
        parity: args.parity.unwrap_or_default(),
        invert: args.invert == Some(1),
    };

    let mut sources: Vec<Box<dyn ByteSource>> = Vec::with_capacity(args.ports.len());
    for name in &args.ports {
        let mut link = SerialLink::open(name).map_err(|err| port_error("open failed", err))?;
        configure_link(&mut link, name, &link_config)
            .map_err(|err| capture_error("configure failed", err))?;
        sources.push(Box::new(link));
    }
    Ok(sources)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
