use std::path::Path;

use crate::config::Config;

pub fn cmd_init(path: &Path) -> anyhow::Result<()> {
    if Config::create_default_if_missing(path)? {
        println!("✓ Created default config: {}", path.display());
        println!("Edit it, then start the server with: movie-catalog serve");
    } else {
        println!("Config already exists: {}", path.display());
    }
    Ok(())
}
