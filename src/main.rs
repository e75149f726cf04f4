mod app;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use siteswap_graph::export::settle;
use siteswap_graph::graph::siteswap::parse_pattern;
use siteswap_graph::{GraphRequest, LayoutConfig, SessionHost, Viewport};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Number of balls in the generated pattern family.
    #[arg(long, default_value_t = 3)]
    num_balls: usize,

    /// Highest throw allowed in the generated pattern family.
    #[arg(long, default_value_t = 6)]
    max_throw: usize,

    /// Load a graph payload from a JSON file instead of generating one.
    #[arg(long)]
    graph: Option<PathBuf>,

    /// JSON file overriding layout constants.
    #[arg(long)]
    layout_config: Option<PathBuf>,

    /// Settle the layout without opening a window and print it as JSON.
    #[arg(long)]
    headless: bool,

    /// Siteswap to mark in the `--headless` output, e.g. 531.
    #[arg(long, requires = "headless")]
    pattern: Option<String>,

    /// Tick cap for `--headless` when the layout does not settle sooner.
    #[arg(long, default_value_t = 600)]
    max_ticks: usize,

    /// Layout viewport width, overriding the layout config.
    #[arg(long)]
    width: Option<f32>,

    /// Layout viewport height, overriding the layout config.
    #[arg(long)]
    height: Option<f32>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = match &args.layout_config {
        Some(path) => LayoutConfig::from_path(path)?,
        None => LayoutConfig::default(),
    };
    if args.width.is_some() || args.height.is_some() {
        config.viewport = Viewport::new(
            args.width.unwrap_or(config.viewport.width),
            args.height.unwrap_or(config.viewport.height),
        );
    }

    let request = GraphRequest {
        num_balls: args.num_balls,
        max_throw: args.max_throw,
        file: args.graph.clone(),
    };

    if args.headless {
        run_headless(config, &request, args.pattern.as_deref(), args.max_ticks)
    } else {
        run_viewer(config, request)
    }
}

fn run_headless(
    config: LayoutConfig,
    request: &GraphRequest,
    pattern: Option<&str>,
    max_ticks: usize,
) -> Result<()> {
    let graph = request.fetch()?.into_snapshot()?;
    let mut host = SessionHost::new(config);
    host.load(graph, Some(&request.ground_state()));

    let session = host
        .session_mut()
        .ok_or_else(|| anyhow!("no session after load"))?;
    if let Some(pattern) = pattern {
        let throws = parse_pattern(pattern)?;
        let max_throw = session
            .graph()
            .nodes()
            .first()
            .map_or(request.max_throw, |node| node.id.chars().count());
        session
            .trace_pattern(&throws, max_throw)
            .with_context(|| format!("cannot trace {pattern}"))?;
    }
    let export = settle(session, max_ticks);
    let json = serde_json::to_string_pretty(&export).context("failed to encode layout")?;
    println!("{json}");
    Ok(())
}

fn run_viewer(config: LayoutConfig, request: GraphRequest) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "siteswap-graph",
        options,
        Box::new(move |cc| Ok(Box::new(app::SiteswapGraphApp::new(cc, request, config)))),
    )
    .map_err(|error| anyhow!("viewer failed: {error}"))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn every_option_is_documented() {
        let help = Args::command().render_long_help().to_string();
        assert!(help.contains("Tick cap for `--headless`"));
        assert!(help.contains("Layout viewport width"));
        assert!(help.contains("Layout viewport height"));
        assert!(help.contains("Siteswap to mark"));
    }

    #[test]
    fn pattern_only_applies_headless() {
        let args = Args::try_parse_from([
            "siteswap-graph",
            "--headless",
            "--pattern",
            "531",
            "--width",
            "640",
        ])
        .unwrap();
        assert_eq!(args.pattern.as_deref(), Some("531"));
        assert_eq!(args.width, Some(640.0));
        assert_eq!(args.max_ticks, 600);

        assert!(Args::try_parse_from(["siteswap-graph", "--pattern", "531"]).is_err());
    }
}
