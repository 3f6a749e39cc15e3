pub mod init;
pub mod run;
pub mod validators;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create a starter spark config")]
    Init(init::InitArgs),
}
