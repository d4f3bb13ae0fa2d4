use appfetch_lib::cli::{
    Command, ResolvedCommand, parse_args, resolve_command, run_build, run_fetch, run_validate,
};
use appfetch_lib::error::AppFetchError;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, AppFetchError> {
    color_eyre::install()?;

    let args = parse_args();

    match run(args.command).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(AppFetchError::Validation(err)) => {
            eprintln!("{}", err.log_line());
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err),
    }
}

async fn run(command: Command) -> Result<(), AppFetchError> {
    match resolve_command(command)? {
        ResolvedCommand::Build(params) => run_build(params).await?,
        ResolvedCommand::Fetch(params) => {
            run_fetch(params).await?;
        }
        ResolvedCommand::Validate(params) => run_validate(&params)?,
    }

    Ok(())
}
