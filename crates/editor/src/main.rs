use std::io::Read;
use std::path::PathBuf;

use classroom_editor_lib::command::{execute_json_batch, CommandResponse};
use classroom_editor_lib::state::{EditorSettings, SceneState};

/// Command line: `--scene <path>`, `--commands <path>` (stdin when absent),
/// `--save <path>`
#[derive(Default)]
struct Args {
    scene: Option<PathBuf>,
    commands: Option<PathBuf>,
    save: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "classroom_editor=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args();
    if let Err(e) = run(args) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), String> {
    let mut scene = SceneState::with_settings(EditorSettings::load());

    if let Some(path) = &args.scene {
        scene.load_from_path(path)?;
    }

    let commands = match &args.commands {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read commands file {}: {e}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("Failed to read stdin: {e}"))?;
            buf
        }
    };

    let responses = if commands.trim().is_empty() {
        Vec::new()
    } else {
        execute_json_batch(&mut scene, &commands)?
    };
    print_responses(&responses)?;

    let refused = responses.iter().filter(|r| !r.success).count();
    if refused > 0 {
        tracing::warn!("{refused} of {} commands were refused", responses.len());
    }

    if let Some(path) = &args.save {
        scene.save_to_path(path)?;
    }
    Ok(())
}

fn print_responses(responses: &[CommandResponse]) -> Result<(), String> {
    let json = serde_json::to_string_pretty(responses).map_err(|e| format!("Serialize error: {e}"))?;
    println!("{json}");
    Ok(())
}

fn parse_args() -> Args {
    let mut args = Args::default();
    let argv: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < argv.len() {
        let value = argv.get(i + 1).map(PathBuf::from);
        match argv[i].as_str() {
            "--scene" => args.scene = value,
            "--commands" => args.commands = value,
            "--save" => args.save = value,
            other => {
                tracing::warn!("Ignoring unknown argument {other}");
                i += 1;
                continue;
            }
        }
        i += 2;
    }
    args
}
