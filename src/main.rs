//! Snowfield headless runner
//!
//! Builds a scene, drives a scripted walk/turn/jump sequence at 60 Hz and
//! logs what happened. Usage: `snowfield [config.json] [seed]`.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    use snowfield::SceneConfig;
    use snowfield::consts::FRAME_DT;
    use snowfield::sim::{InputEvent, Scene, SceneEvent, TickInput, tick};

    env_logger::init();
    log::info!("Snowfield (native) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) if path != "-" => SceneConfig::load(&path)?,
        _ => SceneConfig::default(),
    };
    let seed = match args.next() {
        Some(s) => s.parse::<u64>()?,
        None => 2024,
    };

    let mut scene = Scene::new(seed, config)?;

    // (frame, events) pairs; frames without an entry get no input
    let script: &[(u64, &[InputEvent])] = &[
        (1, &[InputEvent::ForwardDown]),
        (90, &[InputEvent::TurnLeft, InputEvent::TurnLeft, InputEvent::TurnLeft]),
        (120, &[InputEvent::JumpTrigger]),
        (200, &[InputEvent::ForwardUp]),
        (230, &[InputEvent::TurnRight]),
        (240, &[InputEvent::BackwardDown]),
        (330, &[InputEvent::JumpTrigger]),
        (400, &[InputEvent::BackwardUp]),
    ];
    let total_frames = 480;

    for frame in 1..=total_frames {
        let input = script
            .iter()
            .find(|(f, _)| *f == frame)
            .map(|(_, events)| TickInput::new(events.iter().copied()))
            .unwrap_or_default();

        let report = tick(&mut scene, &input, FRAME_DT);
        for event in &report.events {
            match event {
                SceneEvent::Animation { clip, fade } => {
                    log::debug!("frame {frame}: fade to {} over {fade}s", clip.name());
                }
                SceneEvent::Collected { id, position } => {
                    log::info!("frame {frame}: picked up gift {id} at {position}");
                }
            }
        }
    }

    let actor = &scene.actor;
    println!("Seed:        {}", scene.seed);
    println!("Frames:      {}", scene.frame);
    println!("Obstacles:   {}", scene.bounds.len());
    println!("Trees:       {}", scene.trees.len());
    println!(
        "Gifts:       {} collected, {} left",
        scene.gifts.collected(),
        scene.gifts.len()
    );
    println!("Actor:       {} facing {:.2} rad ({:?})", actor.position, actor.facing, actor.state());
    println!("Camera:      {}", scene.camera.position);
    if !scene.skipped.is_empty() {
        println!("Skipped:     {:?}", scene.skipped);
    }

    Ok(())
}
