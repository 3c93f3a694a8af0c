//! Command line parsing driven by the meta registry.
//!
//! Every schema entry becomes a `--<name>` flag: strings and integers take a
//! value, booleans are switches. A handful of reserved flags (`--use`,
//! `--signal`, ...) control the process itself and never reach the config
//! store. The command is assembled with clap's builder API because the flag
//! set is only known at runtime.

use crate::error::OptionError;
use crate::meta::MetaRegistry;
use crate::value::{Value, ValueType};
use clap::error::ErrorKind;
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, ColorChoice, Command, value_parser};
use std::ffi::OsString;

/// Flag ids owned by the process rather than the schema.
pub const RESERVED_FLAGS: &[&str] = &[
    "help",
    "version",
    "use",
    "theme",
    "signal",
    "call",
    "dest",
    "param",
    "log-level",
];

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Config values given on the command line.
///
/// Only flags that were actually passed are present; a flag equal to the
/// default is still an override.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionValues {
    values: Vec<(&'static str, Value)>,
}

impl OptionValues {
    /// Record a value, replacing any earlier one for the same key.
    pub fn insert(&mut self, key: &'static str, value: Value) {
        match self.values.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.values.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn is_present(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Reserved process flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    /// `-v/--version`
    pub version: bool,
    /// `-u/--use`: config script override; `NONE` disables it.
    pub config_file: Option<String>,
    /// `-t/--theme`: theme script override; `NONE` disables it.
    pub theme_file: Option<String>,
    /// `-s/--signal`: send a signal to a running instance and exit.
    pub signal: Option<String>,
    /// `-c/--call`: call a method on a running instance and exit.
    pub call: Option<String>,
    /// `-d/--dest`: target context id.
    pub dest: Option<u64>,
    /// `-p/--param`, repeatable.
    pub params: Vec<String>,
    /// `--log-level`
    pub log_level: Option<String>,
}

impl CliOptions {
    /// True when the invocation is an IPC client request.
    pub fn is_client_request(&self) -> bool {
        self.signal.is_some() || self.call.is_some()
    }
}

/// Result of a successful parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    pub options: CliOptions,
    pub values: OptionValues,
}

/// Build the clap command for `meta`.
pub fn build_command(meta: &MetaRegistry) -> Command {
    let mut cmd = Command::new("hookterm")
        .about("Scriptable terminal emulator")
        .disable_version_flag(true)
        .color(ColorChoice::Never)
        .arg(
            Arg::new("version")
                .short('v')
                .long("version")
                .action(ArgAction::SetTrue)
                .help("Print version and exit"),
        )
        .arg(
            Arg::new("use")
                .short('u')
                .long("use")
                .value_name("PATH")
                .help("Config script to load (NONE to skip)"),
        )
        .arg(
            Arg::new("theme")
                .short('t')
                .long("theme")
                .value_name("PATH")
                .help("Theme script to load (NONE to skip)"),
        )
        .arg(
            Arg::new("signal")
                .short('s')
                .long("signal")
                .value_name("NAME")
                .conflicts_with("call")
                .help("Send a signal to a running instance"),
        )
        .arg(
            Arg::new("call")
                .short('c')
                .long("call")
                .value_name("NAME")
                .help("Call a method on a running instance and print the result"),
        )
        .arg(
            Arg::new("dest")
                .short('d')
                .long("dest")
                .value_name("ID")
                .value_parser(value_parser!(u64))
                .help("Target context id (defaults to $HOOKTERM_ID)"),
        )
        .arg(
            Arg::new("param")
                .short('p')
                .long("param")
                .value_name("VALUE")
                .action(ArgAction::Append)
                .help("Parameter for --signal/--call (repeatable)"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .value_parser(LOG_LEVELS)
                .help("Log level for the debug log"),
        );

    let mut doc_lines = Vec::new();
    for flag in meta.cli_schema() {
        if flag.doc_only {
            doc_lines.push(format!("  --{:<26}{}", flag.name, flag.help));
            continue;
        }
        if RESERVED_FLAGS.contains(&flag.name) {
            log::warn!("Config key '{}' shadows a reserved flag; no flag generated", flag.name);
            continue;
        }

        let mut arg = Arg::new(flag.name)
            .long(flag.name)
            .help(flag.help)
            .help_heading("Config keys")
            .hide(flag.hidden);
        if let Some(short) = flag.short {
            arg = arg.short(short);
        }
        arg = match flag.value_type {
            ValueType::String => arg.action(ArgAction::Set).value_name("STRING"),
            ValueType::Integer => arg
                .action(ArgAction::Set)
                .value_name("INT")
                .allow_negative_numbers(true)
                .value_parser(value_parser!(i64)),
            ValueType::Boolean => arg.action(ArgAction::SetTrue),
            ValueType::None => continue,
        };
        cmd = cmd.arg(arg);
    }

    if !doc_lines.is_empty() {
        cmd = cmd.after_help(format!("More config keys:\n{}", doc_lines.join("\n")));
    }
    cmd
}

/// Parse `argv` (including the program name) against `meta`.
pub fn parse_args<I, T>(argv: I, meta: &MetaRegistry) -> Result<ParsedArgs, OptionError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_command(meta)
        .try_get_matches_from(argv)
        .map_err(|e| match e.kind() {
            ErrorKind::DisplayHelp => OptionError::Help(e.to_string()),
            _ => OptionError::Invalid(e.to_string()),
        })?;

    let options = CliOptions {
        version: matches.get_flag("version"),
        config_file: matches.get_one::<String>("use").cloned(),
        theme_file: matches.get_one::<String>("theme").cloned(),
        signal: matches.get_one::<String>("signal").cloned(),
        call: matches.get_one::<String>("call").cloned(),
        dest: matches.get_one::<u64>("dest").copied(),
        params: matches
            .get_many::<String>("param")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        log_level: matches.get_one::<String>("log-level").cloned(),
    };

    let mut values = OptionValues::default();
    for entry in meta.entries() {
        if entry.is_doc_only() || RESERVED_FLAGS.contains(&entry.name) {
            continue;
        }
        if let Some(value) = matched_value(&matches, entry.name, entry.value_type) {
            values.insert(entry.name, value);
        }
    }

    Ok(ParsedArgs { options, values })
}

fn matched_value(matches: &ArgMatches, name: &str, ty: ValueType) -> Option<Value> {
    if matches.value_source(name) != Some(ValueSource::CommandLine) {
        return None;
    }
    match ty {
        ValueType::String => matches.get_one::<String>(name).cloned().map(Value::String),
        ValueType::Integer => matches.get_one::<i64>(name).copied().map(Value::Integer),
        ValueType::Boolean => Some(Value::Boolean(matches.get_flag(name))),
        ValueType::None => None,
    }
}
