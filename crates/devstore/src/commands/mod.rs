//! Command dispatch: bridges CLI args -> core operations -> stdout.

pub mod decode;
pub mod encode;
pub mod util;
pub mod wait;

use devstore_config::Config;

use crate::cli::{Cli, Command, CompletionsArgs, GlobalOpts};
use crate::error::CliError;

/// Dispatch a parsed command to its handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    match cmd {
        Command::Encode(args) => encode::handle(&args, global),
        Command::Decode(args) => decode::handle(&args, global),
        Command::Wait(args) => wait::handle(&args, global, cfg).await,
        Command::Completions(args) => {
            completions(&args);
            Ok(())
        }
    }
}

fn completions(args: &CompletionsArgs) {
    use clap::CommandFactory;
    use clap_complete::generate;

    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "devstore", &mut std::io::stdout());
}
