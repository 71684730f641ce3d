//! `mesh-literals` command implementation.

use crate::cli::{Args, Command, RuntimeConfig};
use crate::error::Result;
use crate::mesh::MeshGeometry;
use anyhow::Context as _;
use tokio::io::AsyncWriteExt;

/// Execute mesh-literals command
pub(super) async fn execute_mesh_literals(args: &Args, config: &RuntimeConfig) -> Result<i32> {
    let Command::MeshLiterals {
        input,
        name,
        output,
    } = &args.command
    else {
        unreachable!("execute_mesh_literals called with non-MeshLiterals command");
    };

    // Generated source may go to stdout
    let status = config.on_stderr();

    let json = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("failed to read mesh {}", input.display()))?;
    let mesh = MeshGeometry::from_json(&json)?;
    status.verbose_println(&format!(
        "Read {} triangles and {} vertices from {}",
        mesh.cells.len(),
        mesh.positions.len(),
        input.display()
    ));

    let literals = mesh.render_literals(name)?;

    match output {
        Some(path) => {
            tokio::fs::write(path, &literals)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            status.success_println(&format!("Wrote {}", path.display()));
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(literals.as_bytes()).await?;
            stdout.flush().await?;
        }
    }

    Ok(0)
}
