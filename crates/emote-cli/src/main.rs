//! `emote` - run the slot pass over a serialized avatar
//!
//! ```text
//! emote build   avatar.json [-o out.json] [--config emote.toml] [--deny-warnings]
//! emote preview avatar.json --slot-node 7 [--config emote.toml]
//! emote setup   avatar.json [--config emote.toml]
//! ```
//!
//! Log verbosity follows `RUST_LOG` and defaults to `info`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use emote_core::{preview_for_node, suggest_setup, BuildConfig, BuildInput};
use emote_slots::NodeId;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    let input = Arg::new("input")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Build input (avatar plus asset library) as JSON");
    let config = Arg::new("config")
        .long("config")
        .value_parser(value_parser!(PathBuf))
        .help("Build configuration as TOML");

    Command::new("emote")
        .version(emote_core::VERSION)
        .about("Merge emote slot templates into an avatar")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("build")
                .about("Run the pass and write the patched avatar with its report")
                .arg(input.clone())
                .arg(config.clone())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_parser(value_parser!(PathBuf))
                        .help("Where to write the build output (stdout if omitted)"),
                )
                .arg(
                    Arg::new("deny-warnings")
                        .long("deny-warnings")
                        .action(ArgAction::SetTrue)
                        .help("Exit non-zero if any unit was skipped"),
                ),
        )
        .subcommand(
            Command::new("preview")
                .about("Show how a template's target menu would change")
                .arg(input.clone())
                .arg(config.clone())
                .arg(
                    Arg::new("slot-node")
                        .long("slot-node")
                        .required(true)
                        .value_parser(value_parser!(u64))
                        .help("Hierarchy node holding the template"),
                ),
        )
        .subcommand(
            Command::new("setup")
                .about("Suggest start, end, scope and target menu for a new template")
                .arg(input)
                .arg(config),
        )
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    match matches.subcommand() {
        Some(("build", args)) => run_build(args),
        Some(("preview", args)) => run_preview(args),
        Some(("setup", args)) => run_setup(args),
        _ => Ok(ExitCode::FAILURE),
    }
}

fn run_build(args: &ArgMatches) -> Result<ExitCode> {
    let input = read_input(args)?;
    let config = read_config(args)?;
    let output = input.build(config).context("build failed")?;

    let report = &output.report;
    for diagnostic in report.warnings() {
        warn!(kind = %diagnostic.kind, slot = ?diagnostic.slot, "{}", diagnostic.message);
    }
    for lint in &report.lints {
        warn!(lint = %lint.kind, slot = %lint.slot, "{}", lint.message);
    }
    info!(
        winners = report.winners.len(),
        actions = report.action_machines.len(),
        effects = report.effect_layers.len(),
        menu_controls = report.menu_controls_applied,
        "build finished"
    );

    emit(args.get_one::<PathBuf>("output"), &output.to_json_pretty()?)?;

    let deny = args.get_flag("deny-warnings");
    Ok(if deny && report.has_warnings() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn run_preview(args: &ArgMatches) -> Result<ExitCode> {
    let input = read_input(args)?;
    let config = read_config(args)?;
    let node = args
        .get_one::<u64>("slot-node")
        .copied()
        .map(NodeId::new)
        .context("missing --slot-node")?;

    match preview_for_node(&input.avatar, &input.library, &config, node).context("preview failed")? {
        Some(preview) => {
            println!("{}", serde_json::to_string_pretty(&preview)?);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            warn!(%node, "no winning template with a reachable target menu");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run_setup(args: &ArgMatches) -> Result<ExitCode> {
    let input = read_input(args)?;
    let config = read_config(args)?;
    let suggestion =
        suggest_setup(&input.avatar.descriptor, &input.avatar.menus, &config).context("setup detection failed")?;
    println!("{}", serde_json::to_string_pretty(&suggestion)?);
    Ok(ExitCode::SUCCESS)
}

fn read_input(args: &ArgMatches) -> Result<BuildInput> {
    let path = args.get_one::<PathBuf>("input").context("missing input path")?;
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    BuildInput::from_json(&text).with_context(|| format!("parsing {}", path.display()))
}

fn read_config(args: &ArgMatches) -> Result<BuildConfig> {
    match args.get_one::<PathBuf>("config") {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            BuildConfig::from_toml_str(&text).with_context(|| format!("parsing {}", path.display()))
        }
        None => Ok(BuildConfig::default()),
    }
}

fn emit(output: Option<&PathBuf>, text: &str) -> Result<()> {
    match output.map(PathBuf::as_path) {
        Some(path) => write_file(path, text),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}

fn write_file(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "output written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use emote_core::{AssetLibrary, Avatar, AvatarDescriptor, BaseLayer, BuildOutput, LayerKind};
    use emote_model::AssetRef;
    use emote_slots::SlotTemplate;
    use emote_test_utils::{action_template, hierarchy, host_action_graph, menu_tree, END, START};
    use pretty_assertions::assert_eq;

    fn sample_input() -> (BuildInput, NodeId) {
        let (tree, nodes) = hierarchy(&["Wave"]);
        let fixture = menu_tree(&[1, 2, 3, 4]);
        let descriptor = AvatarDescriptor::new("Avatar")
            .with_layer(BaseLayer::custom(LayerKind::Action, host_action_graph().graph))
            .with_menu_root(fixture.root);
        let mut avatar = Avatar::new(descriptor, tree);
        avatar.menus = fixture.store;

        let mut library = AssetLibrary::new();
        let wave = AssetRef::new("wave");
        library.insert_graph(&wave, action_template("Wave", 1.0));
        avatar.add_template(SlotTemplate::new(nodes[0], 2).with_name("Wave").with_action(wave, START, END));
        (BuildInput { avatar, library }, nodes[0])
    }

    fn write_input(dir: &Path) -> (PathBuf, NodeId) {
        let (input, node) = sample_input();
        let path = dir.join("avatar.json");
        fs::write(&path, serde_json::to_string(&input).unwrap()).unwrap();
        (path, node)
    }

    #[test]
    fn command_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn build_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let (input, _) = write_input(dir.path());
        let out = dir.path().join("out.json");
        let matches = cli()
            .try_get_matches_from(["emote", "build", input.to_str().unwrap(), "-o", out.to_str().unwrap()])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();

        let code = run_build(args).unwrap();

        assert_eq!(code, ExitCode::SUCCESS);
        let output: BuildOutput = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(output.report.action_machines, vec!["EmoteSlot_2".to_string()]);
        assert!(!output.report.has_warnings());
    }

    #[test]
    fn config_file_renames_machines() {
        let dir = tempfile::tempdir().unwrap();
        let (input, _) = write_input(dir.path());
        let config = dir.path().join("emote.toml");
        fs::write(&config, "action_machine_prefix = \"Slot_\"\n").unwrap();
        let out = dir.path().join("out.json");
        let matches = cli()
            .try_get_matches_from([
                "emote",
                "build",
                input.to_str().unwrap(),
                "--config",
                config.to_str().unwrap(),
                "--output",
                out.to_str().unwrap(),
            ])
            .unwrap();

        run_build(matches.subcommand().unwrap().1).unwrap();

        let output: BuildOutput = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(output.report.action_machines, vec!["Slot_2".to_string()]);
    }

    #[test]
    fn invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let (input, _) = write_input(dir.path());
        let config = dir.path().join("emote.toml");
        fs::write(&config, "menu_auto_detect_min_controls = 0\n").unwrap();
        let matches = cli()
            .try_get_matches_from(["emote", "setup", input.to_str().unwrap(), "--config", config.to_str().unwrap()])
            .unwrap();

        assert!(run_setup(matches.subcommand().unwrap().1).is_err());
    }

    #[test]
    fn preview_requires_slot_node() {
        let result = cli().try_get_matches_from(["emote", "preview", "avatar.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn preview_of_unknown_node_fails() {
        let dir = tempfile::tempdir().unwrap();
        let (input, node) = write_input(dir.path());
        let unknown = (node.get() + 100).to_string();
        let matches = cli()
            .try_get_matches_from(["emote", "preview", input.to_str().unwrap(), "--slot-node", &unknown])
            .unwrap();

        assert_eq!(run_preview(matches.subcommand().unwrap().1).unwrap(), ExitCode::FAILURE);
    }

    #[test]
    fn missing_input_file_is_reported() {
        let matches = cli()
            .try_get_matches_from(["emote", "setup", "/nonexistent/avatar.json"])
            .unwrap();
        let err = run_setup(matches.subcommand().unwrap().1).unwrap_err();
        assert!(err.to_string().contains("reading"));
    }
}
