use anyhow::Result;

fn main() -> Result<()> {
    canned_cycle_expander::cli::run()
}
