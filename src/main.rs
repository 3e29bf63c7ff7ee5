use clap::Parser;
use pruefungstrainer::db::Db;
use pruefungstrainer::email::ResendMailer;
use pruefungstrainer::AppState;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// PostgreSQL connection string.
    #[clap(env)]
    database_url: String,

    /// The address to bind to.
    #[arg(short, long, env, default_value = "127.0.0.1:1414")]
    address: String,

    /// Resend API key. Leave empty to disable outgoing mail.
    #[arg(long, env, default_value = "")]
    resend_api_key: String,

    /// Public base URL, used in access-code emails.
    #[arg(long, env, default_value = "http://localhost:1414")]
    base_url: String,

    /// Mark session cookies as Secure (set when serving over HTTPS).
    #[arg(long, env, default_value_t = false)]
    secure_cookies: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "tracing=info,axum=info,pruefungstrainer=debug".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .init();

    let args = Args::parse();

    let db = Db::new(&args.database_url).await?;
    let mailer = ResendMailer::new(args.resend_api_key, args.base_url);
    let state = AppState::new(db, mailer, args.secure_cookies);
    let routes = pruefungstrainer::router(state);

    let listener = tokio::net::TcpListener::bind(&args.address).await?;
    tracing::info!("listening on {}", args.address);
    axum::serve(listener, routes).await?;

    Ok(())
}
