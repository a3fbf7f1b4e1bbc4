fn main() -> anyhow::Result<()> {
    temperature_overlay_lib::run()
}
