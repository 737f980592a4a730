use std::process::ExitCode;

use learn_ngin::{
    DemoConfig, DemoError, Engine, InitStage, Result,
    data_structures::scene::Viewport,
    flow::{Stage, init_logging},
    render::ClearOptions,
    wgpu,
};

const SIZE: u32 = 64;

async fn hello(config: &DemoConfig) -> Result<()> {
    let mut engine = Engine::new(config, None).await?;
    let swap_chain = engine.create_headless_swap_chain(SIZE, SIZE);
    let stage = Stage::create(&mut engine, swap_chain, Viewport::new(SIZE, SIZE))?;
    engine.set_clear_options(
        stage.renderer,
        ClearOptions {
            clear_color: wgpu::Color::GREEN,
            clear: true,
        },
    )?;

    stage.draw(&mut engine)?;
    let pixels = engine.read_pixels(swap_chain).await?;
    let centre = pixels.get_pixel(SIZE / 2, SIZE / 2);
    log::info!("centre pixel {:?}", centre.0);

    println!(
        "Hello, engine! {} objects alive, {}x{} frame rendered.",
        engine.resources().len(),
        pixels.width(),
        pixels.height()
    );
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    let config = DemoConfig::new("00 hello");
    let result = tokio::runtime::Runtime::new()
        .map_err(|e| DemoError::init(InitStage::EventLoop, e))
        .and_then(|runtime| runtime.block_on(hello(&config)));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
