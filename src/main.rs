use vitrine::{App, Viewer};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let viewer = Viewer::new()?;
    App::new(viewer).with_title("Vitrine").run()?;

    Ok(())
}
