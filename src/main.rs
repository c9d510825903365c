use anyhow::Context;
use glint::{AppConfig, GlintApp};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args_os().nth(1);
    let config = AppConfig::load_or_default(config_path.as_ref())
        .context("failed to load configuration")?;

    GlintApp::new(config)
        .context("failed to create the application")?
        .run()
        .context("application exited with an error")?;
    Ok(())
}
