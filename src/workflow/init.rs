//! Workflow init step.
//!
//! Init writes a default config so later runs are described by a file the
//! user can edit.
use crate::cli::InitArgs;
use crate::enrich;
use anyhow::{anyhow, Result};

/// Write the default config, refusing to clobber an existing one.
pub fn run_init(args: &InitArgs) -> Result<()> {
    if args.config.is_file() && !args.force {
        return Err(anyhow!(
            "config already exists at {} (use --force to overwrite)",
            args.config.display()
        ));
    }
    let config = enrich::default_config();
    enrich::write_config(&args.config, &config)?;
    println!("wrote {}", args.config.display());
    Ok(())
}
