mod cli;
mod paths;
mod run;

use anyhow::Result;
use cli::{Command, ConfigAction, RunArgs};
use paths::AppPaths;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::Config(config_cmd)) => handle_config_command(config_cmd.action, &cli.run),
        None => run::run(cli.run),
    }
}

fn handle_config_command(action: ConfigAction, args: &RunArgs) -> Result<()> {
    let paths = AppPaths::discover()?;

    match action {
        ConfigAction::Print => {
            let config = run::load_config(args, &paths)?;
            print!("{}", config.to_toml_string()?);
        }
        ConfigAction::Where => {
            println!("{}", run::config_path(args, &paths).display());
        }
    }
    Ok(())
}
