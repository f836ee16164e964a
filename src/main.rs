use crate::{abs::App, application::Application, config::Config, error::Result};

mod abs;
mod application;
mod config;
mod error;
mod logger;

fn run(config: &Config) -> Result<()> {
    let mut app = App::new(&config.window)?;
    let mut application = Application::new(&app.gl, config, app.drawable_size())?;

    'running: loop {
        for event in app.event_pump.poll_iter() {
            match event {
                sdl2::event::Event::Quit { .. }
                | sdl2::event::Event::KeyDown {
                    keycode: Some(sdl2::keyboard::Keycode::Escape),
                    ..
                } => break 'running,
                sdl2::event::Event::Window {
                    win_event: sdl2::event::WindowEvent::SizeChanged(..),
                    ..
                } => {
                    let (width, height) = app.window.drawable_size();
                    application.resize(width, height);
                }
                _ => {}
            }
        }

        application.update();
        app.window.gl_swap_window();
    }

    log::info!("Exiting after {:.2} rad of rotation", application.rotation());
    Ok(())
}

fn main() {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = logger::init(config.log_level()) {
        eprintln!("Failed to set up logging: {}", e);
    }

    if let Err(e) = run(&config) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
