use anyhow::Result;
use clap::Parser;
use winit::event_loop::EventLoop;

use notegrid::cli::CliArgs;
use notegrid::config::GridConfig;

mod runtime;

use runtime::App;

fn main() -> Result<()> {
    notegrid::tracing::init();

    let args = CliArgs::parse();
    let startup = args
        .into_config(GridConfig::load())
        .map_err(|e| anyhow::anyhow!(e))?;

    let event_loop = EventLoop::new()?;
    let mut app = App::new(startup)?;
    event_loop.run_app(&mut app)?;

    Ok(())
}
