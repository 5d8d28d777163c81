//! Runs the serial adder on the terminal, or on a simulated serial port fed from a file.

use std::{fs, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use uart_calc::{ByteIo, Calculator, Mode, SimulatedSerialPort, State, Step, Terminal, Uart};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// File whose contents are received on the simulated serial port.
    #[arg(long)]
    serin: Option<PathBuf>,

    /// File receiving the transmitted output instead of stdout.
    #[arg(long, requires = "serin")]
    serout: Option<PathBuf>,

    /// Reference output to compare the transmitted output against.
    #[arg(long, requires = "serin", conflicts_with = "expect_file")]
    expect: Option<String>,

    /// File holding the reference output.
    #[arg(long, requires = "serin")]
    expect_file: Option<PathBuf>,

    /// Stop after a single add cycle.
    #[arg(long)]
    once: bool,

    /// Status polls before each received byte becomes ready.
    #[arg(long, default_value_t = 0)]
    rx_latency: u32,

    /// Status polls the transmitter stays busy after each byte.
    #[arg(long, default_value_t = 0)]
    tx_latency: u32,
}

impl Args {
    fn mode(&self) -> Mode {
        if self.once { Mode::Once } else { Mode::Loop }
    }

    fn reference(&self) -> Result<Option<Vec<u8>>> {
        if let Some(expect) = &self.expect {
            return Ok(Some(expect.clone().into_bytes()));
        }
        self.expect_file
            .as_ref()
            .map(|path| {
                fs::read(path).with_context(|| format!("reading reference {}", path.display()))
            })
            .transpose()
    }
}

fn main() -> Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();

    let Some(serin) = &args.serin else {
        let mut calc: Calculator<Terminal> = Calculator::new(Terminal::new());
        interact(&mut calc, args.mode());
        return Ok(ExitCode::SUCCESS);
    };

    let input = fs::read(serin).with_context(|| format!("reading {}", serin.display()))?;
    let port = SimulatedSerialPort::new(&input).with_latency(args.rx_latency, args.tx_latency);
    let mut calc: Calculator<_> = Calculator::new(Uart::new(port));
    simulate(&mut calc, args.mode());

    let port = calc.into_io().into_registers();
    if !port.pending().is_empty() {
        warn!("{} input bytes left unread", port.pending().len());
    }
    let stats = port.stats();
    info!(
        "rx-status-reads: {} tx-status-reads: {}",
        stats.rx_status_reads, stats.tx_status_reads
    );

    let output = port.transmitted();
    match &args.serout {
        Some(path) => {
            fs::write(path, output).with_context(|| format!("writing {}", path.display()))?
        }
        None => print!("{}", String::from_utf8_lossy(output)),
    }

    if let Some(reference) = args.reference()? {
        let report = diff(&reference, output);
        if !report.is_empty() {
            eprintln!("UART does not match");
            for line in report {
                eprintln!("{line}");
            }
            return Ok(ExitCode::FAILURE);
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Runs the calculator on a live port.
///
/// A failed cycle ends the run like a completed one; the calculator has already logged it.
fn interact<P: ByteIo>(calc: &mut Calculator<P>, mode: Mode) {
    if let Ok(sum) = calc.run(mode) {
        info!("replied {sum}");
    }
}

/// Steps the calculator while the simulated input can satisfy the next read.
///
/// A real port blocks forever once the input runs dry, here the run ends instead.
fn simulate(calc: &mut Calculator<Uart<SimulatedSerialPort>>, mode: Mode) {
    loop {
        let state = calc.state();
        let reads_line = !matches!(state, State::ComputeAndReply { .. });
        if reads_line && !calc.io().registers().has_line_pending() {
            return;
        }
        let done = matches!(calc.step(), Ok(Step::Replied(_)) | Err(_));
        if done && mode == Mode::Once {
            return;
        }
    }
}

/// Byte-wise comparison of `expected` against `actual`, one line per differing position.
fn diff(expected: &[u8], actual: &[u8]) -> Vec<String> {
    let hex = |byte: Option<&u8>| byte.map_or_else(|| "None".to_string(), |b| format!("{b:02x}"));
    (0..expected.len().max(actual.len()))
        .filter(|&i| expected.get(i) != actual.get(i))
        .map(|i| {
            format!(
                "position {i}: expected {}, got {}",
                hex(expected.get(i)),
                hex(actual.get(i))
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_reports_changed_and_missing_bytes() {
        assert!(diff(b"42\n", b"42\n").is_empty());
        assert_eq!(
            diff(b"42\n", b"43"),
            vec![
                "position 1: expected 32, got 33".to_string(),
                "position 2: expected 0a, got None".to_string(),
            ]
        );
    }

    #[test]
    fn simulation_stops_when_input_runs_dry() {
        let port = SimulatedSerialPort::new(b"1\n2\n3\n4\n5\n");
        let mut calc: Calculator<_> = Calculator::new(Uart::new(port));
        simulate(&mut calc, Mode::Loop);
        assert_eq!(calc.state(), State::ReadSecond { first: 5 });
        assert_eq!(calc.io().registers().transmitted(), b"3\n7\n");
    }

    #[test]
    fn interactive_once_keeps_failed_cycle_local() {
        let port = SimulatedSerialPort::new(b"\n1\n2\n");
        let mut calc: Calculator<_> = Calculator::new(Uart::new(port));
        interact(&mut calc, Mode::Once);
        assert_eq!(calc.state(), State::ReadFirst);
        assert!(calc.io().registers().transmitted().is_empty());
        assert_eq!(calc.io().registers().pending(), b"1\n2\n");
    }

    #[test]
    fn interactive_once_replies() {
        let port = SimulatedSerialPort::new(b"1\n2\n");
        let mut calc: Calculator<_> = Calculator::new(Uart::new(port));
        interact(&mut calc, Mode::Once);
        assert_eq!(calc.io().registers().transmitted(), b"3\n");
    }

    #[test]
    fn once_stops_after_failed_cycle() {
        let port = SimulatedSerialPort::new(b"\n1\n2\n");
        let mut calc: Calculator<_> = Calculator::new(Uart::new(port));
        simulate(&mut calc, Mode::Once);
        assert!(calc.io().registers().transmitted().is_empty());
        assert_eq!(calc.io().registers().pending(), b"1\n2\n");
    }
}
