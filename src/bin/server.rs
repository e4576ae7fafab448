use std::{
    env,
    fs::OpenOptions,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use fintrack::{
    AppState, AuthConfig, build_router,
    csv_import::{DateFormat, ImportConfig, ImportMode},
    graceful_shutdown, logging_middleware,
};

/// The REST API server for fintrack.
///
/// Bearer tokens are verified with the secret in the `AUTH_SECRET`
/// environment variable.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: PathBuf,

    /// The address to serve the API from.
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    host: IpAddr,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The expected issuer of bearer tokens. If not set, the issuer is not checked.
    #[arg(long)]
    auth_issuer: Option<String>,

    /// What to do with CSV rows that cannot be imported.
    #[arg(long, value_enum, default_value_t = ImportMode::Lenient)]
    import_mode: ImportMode,

    /// A date format to try when importing CSV files. Repeat to set the order
    /// formats are tried in.
    #[arg(long = "date-format", value_enum)]
    date_formats: Vec<DateFormat>,

    /// Also write debug logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    setup_logging(args.log_file.as_ref());

    let addr = SocketAddr::from((args.host, args.port));

    let secret =
        env::var("AUTH_SECRET").expect("The environment variable 'AUTH_SECRET' must be set");
    let auth_config = AuthConfig::new(secret, args.auth_issuer);

    let import_config = ImportConfig {
        mode: args.import_mode,
        date_formats: if args.date_formats.is_empty() {
            DateFormat::DEFAULT_PRECEDENCE.to_vec()
        } else {
            args.date_formats
        },
    };
    tracing::info!("Importing CSV files with {import_config:?}");

    let conn = Connection::open(&args.db_path).expect("Could not open the database.");
    let state = AppState::new(conn, &auth_config, import_config)
        .expect("Could not initialize the database.");

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_router(state).layer(middleware::from_fn(logging_middleware));
    let router = add_tracing_layer(router);

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("The server stopped unexpectedly.");
}

fn setup_logging(log_file: Option<&PathBuf>) {
    let stdout_log = tracing_subscriber::fmt::layer().pretty().with_filter(
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "fintrack=debug,tower_http=debug".into()),
    );

    let debug_log = log_file.map(|path| {
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .expect("Could not create log file");

        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(Arc::new(log_file))
            .with_filter(filter::LevelFilter::DEBUG)
    });

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Errors are logged where they are handled, so skip the default 5xx logging.
        .on_failure(());

    router.layer(tracing_layer)
}
