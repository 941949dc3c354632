use clap::Parser;
use semflow_cli::app;
use semflow_cli::commands::cli;
use semflow_cli::error::CliError;
use semflow_cli::telemetry;

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            e.exit_code()
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, CliError> {
    let args = cli::Args::parse();
    let cfg = semflow_core::config::load_default().map_err(|e| CliError::Config(format!("{e:#}")))?;
    telemetry::init_tracing(&cfg.logging)?;

    app::run_command(args, cfg).await
}
