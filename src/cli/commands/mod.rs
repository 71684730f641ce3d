//! Command execution functions.
//!
//! Each subcommand has its own executor; this module validates arguments,
//! dispatches, and turns failures into an exit code with recovery hints.

mod cp;
mod make_app;
mod mesh;

use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::Result;

use cp::execute_cp;
use make_app::execute_make_app;
use mesh::execute_mesh_literals;

/// Execute the main command based on parsed arguments
pub async fn execute_command(args: Args) -> Result<i32> {
    let config = RuntimeConfig::from(&args);

    if let Err(validation_error) = args.validate() {
        config.error_println(&format!("Invalid arguments: {}", validation_error));
        return Ok(1);
    }

    let result = match &args.command {
        Command::MakeApp { .. } => execute_make_app(&args, &config).await,
        Command::Cp { .. } => execute_cp(&args, &config).await,
        Command::MeshLiterals { .. } => execute_mesh_literals(&args, &config).await,
    };

    match result {
        Ok(exit_code) => Ok(exit_code),
        Err(e) => {
            log::debug!("{} failed: {:?}", args.command.name(), e);
            config.error_println(&format!(
                "Command '{}' failed: {}",
                args.command.name(),
                e
            ));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                config.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    config.indent(&format!("• {}", suggestion));
                }
            }

            Ok(1)
        }
    }
}
