//! Main application entry point.

use printdesk_app::{Args, run};

fn main() {
    env_logger::init();
    log::info!("Starting PrintDesk");

    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    match pollster::block_on(run(&args)) {
        Ok(session) => {
            let state = session.editor().present();
            let stats = session.stats();
            println!(
                "{}: {} objects, {} primitives drawn",
                state.name,
                state.len(),
                session.surface().object_ids().len()
            );
            println!(
                "{} steps, {} committed, {} ignored, {} undo / {} redo entries",
                stats.steps,
                stats.committed,
                stats.ignored,
                session.editor().history().past().len(),
                session.editor().history().future().len()
            );
            if stats.images_failed > 0 {
                println!("{} images failed to load", stats.images_failed);
            }
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
