use std::io;

use anyhow::Result;
use bikeshare_stats::{app, Config, Console};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // logs go to stderr so they never interleave with the dialogue on stdout
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();
    info!("startup");

    let config = Config::locate()?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut console = Console::new(stdin.lock(), stdout.lock());

    app::run(&config, &mut console)?;
    info!("done");
    Ok(())
}
