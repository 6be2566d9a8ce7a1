use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use stash_config::ConfigFile;
use stash_log::{Level, LogLayer, Logger};
use stash_store::ObjectStore;
use stash_util::CaseSensitivity;
use tracing_subscriber::layer::SubscriberExt;

use crate::cli::*;
use crate::note::Note;
use crate::settings::{self, Settings};

type NoteStore = ObjectStore<Note>;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mut config = settings::open(&cli.config)?;
    let settings = Settings::from_config(&config)?;
    let logger = Arc::new(settings.build_logger(cli.verbose)?);
    install_tracing(&logger);

    if let Command::Config(args) = &cli.command {
        return cmd_config(&mut config, args);
    }

    let mut store = NoteStore::with_config(settings.store_config())
        .with_context(|| format!("failed to open store {}", settings.data_path.display()))?;
    if let Err(e) = store.load() {
        logger.log_error(&e, Level::Error);
        return Err(e).context("failed to load notes");
    }

    let format = cli.format;
    let mutated = match cli.command {
        Command::Set(args) => cmd_set(&mut store, args)?,
        Command::Get(args) => cmd_get(&store, args, format)?,
        Command::List => cmd_list(&store, format)?,
        Command::Remove(args) => cmd_remove(&mut store, args)?,
        Command::Find(args) => cmd_find(&store, args, format)?,
        Command::Config(_) => false,
    };

    if mutated && !store.auto_persist() {
        store.save().context("failed to save notes")?;
    }
    Ok(())
}

fn install_tracing(logger: &Arc<Logger>) {
    let subscriber = tracing_subscriber::registry().with(LogLayer::new(Arc::clone(logger)));
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        logger.log("tracing subscriber already installed", Level::Debug);
    }
}

/// Returns whether the store changed.
fn cmd_set(store: &mut NoteStore, args: SetArgs) -> anyhow::Result<bool> {
    let note = Note {
        id: args.id,
        title: args.title,
        body: args.body,
        tags: args.tags,
    };
    let replaced = store.contains(&note.id);
    store.set(&note)?;
    let verb = if replaced { "Updated" } else { "Created" };
    println!("{} {} note {}", "✓".green().bold(), verb, note.id.to_string().yellow());
    Ok(true)
}

fn cmd_get(store: &NoteStore, args: GetArgs, format: OutputFormat) -> anyhow::Result<bool> {
    match store.get(&args.id)? {
        Some(note) => print_notes(&[note], format)?,
        None => println!("No note {}.", args.id.to_string().yellow()),
    }
    Ok(false)
}

fn cmd_list(store: &NoteStore, format: OutputFormat) -> anyhow::Result<bool> {
    let notes = sorted(store.get_all()?.into_values().collect());
    print_notes(&notes, format)?;
    Ok(false)
}

fn cmd_remove(store: &mut NoteStore, args: RemoveArgs) -> anyhow::Result<bool> {
    let existed = store.remove(&args.id)?;
    if existed {
        println!("{} Removed note {}", "✓".green().bold(), args.id.to_string().yellow());
    } else {
        println!("No note {}.", args.id.to_string().yellow());
    }
    Ok(existed)
}

fn cmd_find(store: &NoteStore, args: FindArgs, format: OutputFormat) -> anyhow::Result<bool> {
    let case = if args.ignore_case {
        CaseSensitivity::Insensitive
    } else {
        CaseSensitivity::Sensitive
    };
    let notes = sorted(
        store
            .get_all()?
            .into_values()
            .filter(|note| note.has_tag(&args.tag, case))
            .collect(),
    );
    print_notes(&notes, format)?;
    Ok(false)
}

fn cmd_config(config: &mut ConfigFile, args: &ConfigArgs) -> anyhow::Result<()> {
    match (&args.key, &args.value) {
        (Some(key), Some(value)) => {
            config.set(key, value.as_str())?;
            config.write()?;
            println!("Set {} = {}", key.bold(), value);
        }
        (Some(key), None) => println!("{} = {}", key.bold(), config.get(key)?),
        _ => {
            for entry in config.entries() {
                let marker = if entry.is_default() { "" } else { " (changed)" };
                println!("{} = {}{}", entry.name().bold(), entry.value(), marker.dimmed());
            }
        }
    }
    Ok(())
}

fn sorted(mut notes: Vec<Note>) -> Vec<Note> {
    notes.sort_by_key(|note| note.id);
    notes
}

fn print_notes(notes: &[Note], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(notes)?),
        OutputFormat::Text if notes.is_empty() => println!("No notes."),
        OutputFormat::Text => {
            for note in notes {
                println!("{}  {}", note.id.to_string().yellow().bold(), note.title.bold());
                if !note.body.is_empty() {
                    println!("  {}", note.body);
                }
                if !note.tags.is_empty() {
                    println!("  {}", note.tags.join(", ").cyan());
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use clap::Parser;

    use super::*;

    fn write_config(dir: &Path, auto_persist: bool) -> String {
        let config = dir.join("stash.toml");
        fs::write(
            &config,
            format!(
                "data_path = {:?}\nauto_persist = \"{auto_persist}\"\nlog_level = \"warn\"\n\
                 log_file = \"\"\nstderr_level = \"off\"\n",
                dir.join("data").join("notes.bin").to_string_lossy()
            ),
        )
        .unwrap();
        config.to_string_lossy().into_owned()
    }

    fn run(config: &str, args: &[&str]) -> anyhow::Result<()> {
        let mut argv = vec!["stash", "--config", config];
        argv.extend_from_slice(args);
        run_command(Cli::try_parse_from(argv)?)
    }

    fn load_notes(dir: &Path) -> NoteStore {
        let mut store =
            NoteStore::open(crate::note::NOTE, dir.join("data").join("notes.bin")).unwrap();
        store.load().unwrap();
        store
    }

    #[test]
    fn set_then_remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(dir.path(), false);

        run(&config, &["set", "1", "groceries", "-b", "milk", "-t", "home"]).unwrap();
        run(&config, &["set", "2", "report", "--tag", "work"]).unwrap();
        let store = load_notes(dir.path());
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&1).unwrap().unwrap().body, "milk");

        run(&config, &["remove", "1"]).unwrap();
        let store = load_notes(dir.path());
        assert_eq!(store.keys(), vec![2]);
    }

    #[test]
    fn auto_persist_config_also_persists() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(dir.path(), true);
        run(&config, &["set", "5", "auto"]).unwrap();
        assert!(load_notes(dir.path()).contains(&5));
    }

    #[test]
    fn read_commands_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(dir.path(), false);
        run(&config, &["set", "1", "groceries", "-t", "Home"]).unwrap();

        run(&config, &["get", "1"]).unwrap();
        run(&config, &["get", "99"]).unwrap();
        run(&config, &["list"]).unwrap();
        run(&config, &["--format", "json", "list"]).unwrap();
        run(&config, &["find", "home", "--ignore-case"]).unwrap();
    }

    #[test]
    fn invalid_note_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(dir.path(), false);
        assert!(run(&config, &["set", "1", " "]).is_err());
        assert!(load_notes(dir.path()).is_empty());
    }

    #[test]
    fn config_command_updates_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(dir.path(), false);
        run(&config, &["config", "log_level", "debug"]).unwrap();
        assert!(fs::read_to_string(&config)
            .unwrap()
            .contains("log_level = \"debug\""));
        assert!(run(&config, &["config", "no_such_key"]).is_err());
    }

    #[test]
    fn corrupt_data_file_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(dir.path(), false);
        fs::create_dir_all(dir.path().join("data")).unwrap();
        fs::write(dir.path().join("data").join("notes.bin"), b"\x04task").unwrap();
        assert!(run(&config, &["list"]).is_err());
    }
}
