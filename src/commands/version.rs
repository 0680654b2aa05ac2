use anyhow::Result;

pub fn execute() -> Result<()> {
    println!("mata-sentry version {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
