fn main() -> anyhow::Result<()> {
    parley_client_lib::run()
}
