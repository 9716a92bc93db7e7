// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two screens sharing an `"image"` element, driven by increment/decrement presses.
//!
//! Screen 0 shows a 400x200 image centered at the top; screen 1 shows the same
//! image full width and 600 tall. The whole container is translated 100 down,
//! which the overlay must follow since it is drawn inside the same container.
//!
//! Run:
//! - `cargo run -p understory_examples --example shared_element_screens -- increment decrement decrement`
//! - `RUST_LOG=understory_shared_element=trace cargo run -p understory_examples --example shared_element_screens`
//! - `cargo run -p understory_examples --example shared_element_screens -- --config transition.json increment`
//!
//! where `transition.json` holds transition options, for example
//! `{"stiffness": 200, "damping": 20, "mass": 1, "overshootClamping": true}`.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use kurbo::{Rect, Vec2};
use tracing::{debug, info};
use understory_shared_element::{
    AnimatedValue, ElementOptions, MountPolicy, SharedElements, Step, TransitionConfig,
    TransitionOptions,
};

/// A node in the fake scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct NodeId(u32);

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Press {
    Increment,
    Decrement,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Policy {
    Stack,
    ActiveOnly,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Button presses to replay, in order
    #[arg(value_enum, default_values_t = [Press::Increment, Press::Decrement])]
    presses: Vec<Press>,

    /// Timing duration in milliseconds, used when no config file is given
    #[arg(long, default_value = "2000")]
    duration: f64,

    /// JSON file with transition options
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Frame interval in milliseconds
    #[arg(long, default_value = "16")]
    frame: f64,

    /// Viewport width
    #[arg(long, default_value = "800")]
    width: f64,

    /// Which screens stay mounted at rest
    #[arg(long, value_enum, default_value = "stack")]
    policy: Policy,
}

/// Layout of the fake scene, in each screen root's coordinate space.
struct Scene {
    layout: HashMap<NodeId, Rect>,
    translate: Vec2,
}

impl Scene {
    const SCREEN_COUNT: usize = 2;

    fn new(width: f64) -> Self {
        let mut layout = HashMap::new();
        layout.insert(
            Self::image(0),
            Rect::from_origin_size(((width - 400.0) / 2.0, 0.0), (400.0, 200.0)),
        );
        layout.insert(Self::image(1), Rect::new(0.0, 0.0, width, 600.0));
        Self {
            layout,
            translate: Vec2::new(0.0, 100.0),
        }
    }

    fn root(screen: i32) -> NodeId {
        NodeId(100 + screen.unsigned_abs())
    }

    fn image(screen: i32) -> NodeId {
        NodeId(screen.unsigned_abs())
    }

    fn measure(&self, element: &NodeId, _root: &NodeId) -> Option<Rect> {
        self.layout.get(element).copied()
    }

    /// Register every mounted screen, as a render pass would.
    fn render(&self, screens: &mut SharedElements<NodeId, NodeId>) {
        let options = ElementOptions {
            debug: Some(true),
            ..ElementOptions::default()
        };
        for index in screens.mounted_screens() {
            let mut screen = screens.screen(index);
            screen.mount(Self::root(index));
            screen.element(Some(Self::image(index)), "image", Some(&options));
        }
        debug!(mounted = ?screens.mounted_screens(), "rendered");
    }
}

fn load_config(args: &Args) -> Result<TransitionConfig> {
    let Some(path) = &args.config else {
        return Ok(TransitionConfig::timing(args.duration));
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading transition options from {}", path.display()))?;
    let options: TransitionOptions = serde_json::from_str(&text)
        .with_context(|| format!("parsing transition options in {}", path.display()))?;
    Ok(options.resolve())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let policy = match args.policy {
        Policy::Stack => MountPolicy::Stack,
        Policy::ActiveOnly => MountPolicy::ActiveOnly,
    };

    let scene = Scene::new(args.width);
    let animated_index = AnimatedValue::new(0.0);
    let mut screens = SharedElements::new(Scene::SCREEN_COUNT, 0, animated_index.clone())
        .with_transition_config(config)
        .context("invalid transition config")?
        .with_mount_policy(policy);
    scene.render(&mut screens);
    screens.evaluate();

    let measure = |element: &NodeId, root: &NodeId| scene.measure(element, root);
    for press in &args.presses {
        let target = match press {
            Press::Increment => screens.active_index() + 1,
            Press::Decrement => screens.active_index() - 1,
        };
        info!(?press, active_index = target, "pressed");
        screens.set_active_index(target);
        scene.render(&mut screens);
        let mut step = screens.evaluate();
        info!(?step, "evaluated");

        let mut elapsed = 0.0;
        while matches!(step, Step::Started(_) | Step::Running | Step::Chained { .. }) {
            step = screens.tick(args.frame);
            elapsed += args.frame;
            for (id, frame) in screens.frames(&measure) {
                let window = frame.bounds + scene.translate;
                debug!(
                    id,
                    elapsed,
                    progress = screens.progress().get(),
                    animated_index = animated_index.get(),
                    ?window,
                    start_opacity = frame.start_opacity,
                    end_opacity = frame.end_opacity,
                    "frame"
                );
            }
        }
        info!(
            ?step,
            elapsed,
            current = screens.current_index(),
            animated_index = animated_index.get(),
            mounted = ?screens.mounted_screens(),
            "settled"
        );
        scene.render(&mut screens);
    }
    Ok(())
}
