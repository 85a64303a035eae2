//! SKKServ Client Binary
//!
//! Reads headwords from stdin, one per line, and prints the server's replies.

use clap::{Parser, ValueEnum};
use skkserv::network::{cancellation, ConnectOutcome, Connector};
use skkserv::session::ConsoleReporter;
use skkserv::{ClientConfig, InputPolicy, Session, TextEncoding};
use tracing_subscriber::{fmt, EnvFilter};

/// SKKServ client
#[derive(Parser, Debug)]
#[command(name = "skkserv-client")]
#[command(about = "Interactive client for SKKServ dictionary servers")]
#[command(version)]
struct Args {
    /// Server host
    host: String,

    /// Server port
    #[arg(default_value_t = skkserv::config::DEFAULT_PORT)]
    port: u16,

    /// Encoding the server answers in
    #[arg(short, long, value_enum, default_value = "eucJp")]
    encoding: EncodingArg,

    /// Encoding lookup keys are sent in
    #[arg(long, value_enum, default_value = "utf8")]
    request_encoding: EncodingArg,

    /// Connect timeout in milliseconds
    #[arg(long, default_value = "5000")]
    connect_timeout_ms: u64,

    /// Read timeout in milliseconds (0 waits forever)
    #[arg(long, default_value = "0")]
    read_timeout_ms: u64,

    /// Treat every line as a lookup, including "version", "host" and "end"
    #[arg(long)]
    lookup_only: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EncodingArg {
    #[value(name = "eucJp", alias = "euc-jp")]
    EucJp,
    #[value(name = "utf8", alias = "utf-8")]
    Utf8,
}

impl From<EncodingArg> for TextEncoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::EucJp => TextEncoding::EucJp,
            EncodingArg::Utf8 => TextEncoding::Utf8,
        }
    }
}

fn main() {
    // Initialize tracing/logging; stdout is reserved for replies
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,skkserv=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!("skkserv-client v{}", skkserv::VERSION);

    // Build config from args
    let config = ClientConfig::builder()
        .host(&args.host)
        .port(args.port)
        .response_encoding(args.encoding.into())
        .request_encoding(args.request_encoding.into())
        .connect_timeout_ms(args.connect_timeout_ms)
        .read_timeout_ms(args.read_timeout_ms)
        .input_policy(if args.lookup_only {
            InputPolicy::LookupOnly
        } else {
            InputPolicy::ControlCommands
        })
        .build();

    // Nothing cancels the attempt from the command line; the timeout bounds it
    let (_cancel, token) = cancellation();
    let connector = Connector::new(config.clone());
    let connection = match connector.connect(&token) {
        Ok(ConnectOutcome::Ready(connection)) => connection,
        Ok(ConnectOutcome::Cancelled) => {
            eprintln!("Cancelled");
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut session = Session::new(connection, ConsoleReporter::stdio(), &config);
    let stdin = std::io::stdin();
    match session.run(stdin.lock()) {
        Ok(stats) => {
            tracing::info!(
                "Session finished: {} requests, {} responses, {} errors",
                stats.requests,
                stats.responses,
                stats.errors
            );
            let (connection, _) = session.into_parts();
            if let Err(e) = connection.shutdown() {
                tracing::debug!("Shutdown failed: {}", e);
            }
        }
        Err(e) => {
            tracing::error!("Session error: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
