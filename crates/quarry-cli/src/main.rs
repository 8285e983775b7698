fn main() -> anyhow::Result<()> {
    quarry_cli::QuarryCli::new().parse_and_run()
}
