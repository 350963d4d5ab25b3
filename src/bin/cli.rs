//! RCON CLI Client
//!
//! Command-line interface for running console commands on a game server.

use std::io::{self, BufRead, Write};

use clap::Parser;
use rcon_client::config::{DEFAULT_PORT, DEFAULT_TIMEOUT_MS};
use rcon_client::{Config, Connection, RconError, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// RCON CLI
#[derive(Parser, Debug)]
#[command(name = "rcon-cli")]
#[command(about = "Run console commands on a server over RCON")]
#[command(version)]
struct Args {
    /// Server host
    #[arg(short = 'H', long, env = "RCON_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Server RCON port
    #[arg(short, long, env = "RCON_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// RCON password
    #[arg(short = 'P', long, env = "RCON_PASSWORD", hide_env_values = true)]
    password: String,

    /// TCP connect timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    connect_timeout_ms: u64,

    /// Read/write timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    io_timeout_ms: u64,

    /// Commands to run in order; reads from stdin when omitted
    commands: Vec<String>,
}

fn main() {
    // Logs go to stderr; stdout carries server replies only
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,rcon_client=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .host(&args.host)
        .port(args.port)
        .password(&args.password)
        .connect_timeout_ms(args.connect_timeout_ms)
        .io_timeout_ms(args.io_timeout_ms)
        .build();

    tracing::info!("Connecting to {}", config.address());

    let mut connection = match Connection::connect(&config) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to connect to {}: {}", config.address(), e);
            std::process::exit(1);
        }
    };

    let result = if args.commands.is_empty() {
        run_interactive(&mut connection)
    } else {
        run_batch(&mut connection, &args.commands)
    };

    connection.close();

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

/// Run each command from the argument list
fn run_batch(connection: &mut Connection, commands: &[String]) -> Result<()> {
    for command in commands {
        let reply = connection.run(command)?;
        println!("{}", reply);
    }
    Ok(())
}

/// Read commands from stdin until EOF, `exit` or `quit`
fn run_interactive(connection: &mut Connection) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        write!(stdout, "> ").map_err(terminal_error)?;
        stdout.flush().map_err(terminal_error)?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).map_err(terminal_error)? == 0 {
            return Ok(());
        }

        let command = line.trim();
        match command {
            "" => continue,
            "exit" | "quit" => return Ok(()),
            _ => {}
        }

        let reply = connection.run(command)?;
        writeln!(stdout, "{}", reply).map_err(terminal_error)?;
    }
}

fn terminal_error(e: io::Error) -> RconError {
    RconError::from_io(e, "terminal I/O failed")
}
