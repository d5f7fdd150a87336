fn main() -> anyhow::Result<()> {
    dialogchain::cli::run_cli()
}
