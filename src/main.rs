use clap::Parser;
use client_workflow::runner::run;
use options::run_options::RunOptions;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = RunOptions::parse();

    let outcome = run(args).await?;

    Ok(outcome.into())
}
