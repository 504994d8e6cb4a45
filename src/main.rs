use anyhow::Result;

mod app;
mod logging;

fn main() -> Result<()> {
    let args = tree_merge::cli::parse();
    app::run(args)
}
