use anyhow::Result;

mod app;
mod logging;

fn main() -> Result<()> {
    let args = atomic_save::cli::parse();
    app::run(args)
}
