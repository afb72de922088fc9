//! Typed name/value registry with command-line parsing
//!
//! Lifecycle: [`Parameters::new`] → [`Parameters::declare`]* →
//! [`Parameters::parse_command_line`] / [`Parameters::set`]* →
//! [`Parameters::check_required`] → [`Parameters::get`]*.
//!
//! # Example
//!
//! ```
//! use frontier_graph::config::{ParameterFlags, Parameters};
//! use frontier_graph::types::ValueType;
//!
//! let mut params = Parameters::new("bfs");
//! params
//!     .declare("src", ParameterFlags::REQUIRED_ARGUMENT, 0, "source vertex", ValueType::Usize)
//!     .unwrap();
//!
//! let rest = params.parse_command_line(["--src", "4", "graph.txt"]).unwrap();
//! assert_eq!(rest, vec!["graph.txt".to_string()]);
//! assert_eq!(params.get::<usize>("src").unwrap(), 4);
//! ```

use super::flags::{Arity, ParameterFlags};
use crate::error::{GraphError, Result};
use crate::types::ValueType;
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{debug, warn};

/// Id of the hidden positional collecting operands; not a valid option name
const OPERANDS: &str = "[operands]";
const REQUIRED_HEADING: &str = "Required arguments";
const OPTIONAL_HEADING: &str = "Optional arguments";

#[derive(Debug, Clone)]
struct ParameterItem {
    flags: ParameterFlags,
    default_value: String,
    description: String,
    value: String,
    use_default: bool,
    value_type: ValueType,
}

impl ParameterItem {
    fn accepts(&self, value: &str) -> bool {
        if self.flags.is_multi_value() {
            value
                .split(',')
                .filter(|part| !part.is_empty())
                .all(|part| self.value_type.validate(part))
        } else {
            value.is_empty() || self.value_type.validate(value)
        }
    }

    fn arg(&self, name: &str) -> Arg {
        let mut help = self.description.clone();
        if !self.default_value.is_empty() {
            help.push_str(&format!(" [default: {}]", self.default_value));
        }
        let arg = Arg::new(name.to_string()).long(name.to_string()).help(help);

        match self.flags.arity() {
            Arity::None => arg.action(ArgAction::Count),
            Arity::Required => arg
                .action(ArgAction::Append)
                .num_args(1)
                .allow_hyphen_values(true)
                .value_name(self.type_label()),
            Arity::Optional => arg
                .action(ArgAction::Append)
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value(if self.value_type == ValueType::Bool {
                    "true"
                } else {
                    ""
                })
                .value_name(self.type_label()),
        }
    }

    fn type_label(&self) -> String {
        if self.flags.is_multi_value() {
            format!("{} list", self.value_type)
        } else {
            self.value_type.to_string()
        }
    }
}

/// Registry of declared parameters
#[derive(Debug, Clone, Default)]
pub struct Parameters {
    summary: String,
    items: BTreeMap<String, ParameterItem>,
}

fn normalize(value_type: ValueType, value: &str) -> String {
    match (value_type, value.trim()) {
        (ValueType::Bool, "1") => "true".to_string(),
        (ValueType::Bool, "0") => "false".to_string(),
        (ValueType::Str, _) => value.to_string(),
        (_, trimmed) => trimmed.to_string(),
    }
}

fn raw_strings(matches: &ArgMatches, id: &str) -> Result<Vec<String>> {
    matches
        .get_raw(id)
        .into_iter()
        .flatten()
        .map(|value| {
            value
                .to_str()
                .map(str::to_string)
                .ok_or_else(|| GraphError::invalid(format!("argument {value:?} is not UTF-8")))
        })
        .collect()
}

fn undefined(name: &str) -> GraphError {
    GraphError::invalid(format!("parameter `{name}` has not been defined"))
}

impl Parameters {
    /// Empty registry; `summary` heads the help text
    #[must_use]
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            items: BTreeMap::new(),
        }
    }

    /// Declare a parameter with its default value
    ///
    /// # Errors
    ///
    /// - `DuplicateDefinition` if `name` is already declared
    /// - `InvalidArgument` for a name that is not usable as `--name`,
    ///   `NO_ARGUMENT` on a non-bool type, or a default that does not
    ///   validate against `value_type`
    pub fn declare(
        &mut self,
        name: &str,
        flags: ParameterFlags,
        default_value: impl ToString,
        description: &str,
        value_type: ValueType,
    ) -> Result<()> {
        let usable = name.starts_with(|c: char| c.is_ascii_alphabetic())
            && !name.contains(|c: char| c == '=' || c == ',' || c.is_whitespace());
        if !usable {
            return Err(GraphError::invalid(format!(
                "`{name}` cannot be used as an option name"
            )));
        }
        if self.items.contains_key(name) {
            return Err(GraphError::DuplicateDefinition {
                name: name.to_string(),
            });
        }
        if flags.arity() == Arity::None && value_type != ValueType::Bool {
            return Err(GraphError::invalid(format!(
                "parameter `{name}` is declared without argument but has type {value_type}"
            )));
        }

        let default_value = normalize(value_type, &default_value.to_string());
        if flags.arity() == Arity::None && default_value == "true" {
            warn!(
                parameter = name,
                "parameter takes no argument but defaults to true, it can never be switched off"
            );
        }

        let item = ParameterItem {
            flags,
            default_value: default_value.clone(),
            description: description.to_string(),
            value: default_value,
            use_default: true,
            value_type,
        };
        if !item.accepts(&item.value) {
            return Err(GraphError::invalid(format!(
                "default `{}` of parameter `{name}` is not a valid {value_type}",
                item.value
            )));
        }

        self.items.insert(name.to_string(), item);
        Ok(())
    }

    /// Whether `name` has been declared
    #[must_use]
    pub fn is_declared(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    /// Whether `name` was given a value after declaration
    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        self.items.get(name).is_some_and(|item| !item.use_default)
    }

    /// Assign a value
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `name` is undeclared or the value does not
    /// validate against its type
    pub fn set(&mut self, name: &str, value: impl ToString) -> Result<()> {
        let item = self.items.get_mut(name).ok_or_else(|| undefined(name))?;
        let value = normalize(item.value_type, &value.to_string());
        if !item.accepts(&value) {
            return Err(GraphError::invalid(format!(
                "`{value}` is not a valid {} for parameter `{name}`",
                item.type_label()
            )));
        }

        debug!(parameter = name, value = %value, "parameter set");
        item.value = value;
        item.use_default = false;
        Ok(())
    }

    /// Raw text value
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `name` is undeclared
    pub fn get_str(&self, name: &str) -> Result<&str> {
        self.items
            .get(name)
            .map(|item| item.value.as_str())
            .ok_or_else(|| undefined(name))
    }

    /// Value parsed as `T`
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `name` is undeclared or the value does not
    /// parse as `T`
    pub fn get<T: FromStr>(&self, name: &str) -> Result<T> {
        let value = self.get_str(name)?;
        value.trim().parse::<T>().map_err(|_| {
            GraphError::invalid(format!(
                "parameter `{name}` value `{value}` is not a valid {}",
                std::any::type_name::<T>()
            ))
        })
    }

    /// Comma-separated value parsed element-wise
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `name` is undeclared or an element does not
    /// parse as `T`
    pub fn get_list<T: FromStr>(&self, name: &str) -> Result<Vec<T>> {
        let value = self.get_str(name)?;
        value
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<T>().map_err(|_| {
                    GraphError::invalid(format!(
                        "parameter `{name}` element `{part}` is not a valid {}",
                        std::any::type_name::<T>()
                    ))
                })
            })
            .collect()
    }

    /// Names of required parameters still without a value
    #[must_use]
    pub fn check_required(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|(_, item)| item.flags.is_required() && item.value.is_empty())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// `clap` command mirroring the declared parameters
    ///
    /// Required parameters are listed first. Every option is appendable so
    /// that repeated single-value options can be reported; the last one wins.
    fn command(&self) -> Command {
        let mut command = Command::new("frontier")
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .help_template("{about-with-newline}\n{all-args}")
            .arg(
                Arg::new(OPERANDS)
                    .num_args(1..)
                    .action(ArgAction::Append)
                    .allow_negative_numbers(true)
                    .hide(true),
            );
        if !self.summary.is_empty() {
            command = command.about(self.summary.clone());
        }

        let (required, optional): (Vec<_>, Vec<_>) =
            self.items.iter().partition(|(_, item)| item.flags.is_required());
        for (heading, section) in [(REQUIRED_HEADING, required), (OPTIONAL_HEADING, optional)] {
            for (name, item) in section {
                command = command.arg(item.arg(name).help_heading(heading));
            }
        }
        command
    }

    /// Apply long options from `args` (program name excluded)
    ///
    /// Accepts `--name value`, `--name=value` and the single-dash forms of
    /// declared names. Optional-argument options take a value only after `=`.
    /// Everything that is not an option, and everything after `--`, is
    /// returned in order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an unknown option, a missing or
    /// unexpected argument, a comma in a single-value option, or a value that
    /// does not validate
    pub fn parse_command_line<I, A>(&mut self, args: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        let mut options_done = false;
        let args: Vec<String> = args
            .into_iter()
            .map(Into::into)
            .map(|arg| {
                if arg == "--" {
                    options_done = true;
                }
                if options_done {
                    arg
                } else {
                    self.long_form(arg)
                }
            })
            .collect();

        let matches = self
            .command()
            .try_get_matches_from(args)
            .map_err(|err| GraphError::invalid(err.to_string().trim_end().to_string()))?;

        let names: Vec<String> = self.items.keys().cloned().collect();
        for name in &names {
            if matches.value_source(name) != Some(ValueSource::CommandLine) {
                continue;
            }
            let values = self.occurrences(&matches, name)?;
            self.apply_occurrences(name, values)?;
        }

        raw_strings(&matches, OPERANDS)
    }

    /// `-name[=value]` → `--name[=value]` for declared names
    fn long_form(&self, arg: String) -> String {
        let declared = arg
            .strip_prefix('-')
            .filter(|rest| rest.starts_with(|c: char| c.is_ascii_alphabetic()))
            .map(|rest| rest.split_once('=').map_or(rest, |(name, _)| name))
            .is_some_and(|name| self.items.contains_key(name));
        if declared {
            format!("-{arg}")
        } else {
            arg
        }
    }

    /// One text value per occurrence of `name`; `""` where none was given
    fn occurrences(&self, matches: &ArgMatches, name: &str) -> Result<Vec<String>> {
        let item = self.items.get(name).ok_or_else(|| undefined(name))?;
        if item.flags.arity() == Arity::None {
            return Ok(vec![String::new(); usize::from(matches.get_count(name))]);
        }

        let Some(occurrences) = matches.get_raw_occurrences(name) else {
            return Ok(Vec::new());
        };
        occurrences
            .map(|mut values| {
                values.next().map_or(Ok(String::new()), |value| {
                    value
                        .to_str()
                        .map(str::to_string)
                        .ok_or_else(|| GraphError::invalid(format!("option `--{name}` is not UTF-8")))
                })
            })
            .collect()
    }

    fn apply_occurrences(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        let item = self.items.get(name).ok_or_else(|| undefined(name))?;
        let (value_type, multi, previously_set) =
            (item.value_type, item.flags.is_multi_value(), !item.use_default);
        let repeated = values.len() > 1 || previously_set;

        let mut arguments = Vec::with_capacity(values.len());
        for value in values {
            if !value.is_empty() {
                arguments.push(value);
            } else if value_type == ValueType::Bool {
                arguments.push("true".to_string());
            } else {
                return Err(GraphError::invalid(format!(
                    "option `--{name}` requires a {value_type} value"
                )));
            }
        }

        let value = if multi {
            let mut parts = Vec::new();
            if previously_set && !item.value.is_empty() {
                parts.push(item.value.clone());
            }
            parts.extend(arguments);
            parts.join(",")
        } else {
            if let Some(bad) = arguments.iter().find(|value| value.contains(',')) {
                return Err(GraphError::invalid(format!(
                    "option `--{name}` takes a single value, got `{bad}`"
                )));
            }
            if repeated {
                warn!(
                    parameter = name,
                    "option given more than once, only the last value is used"
                );
            }
            arguments.pop().unwrap_or_default()
        };
        self.set(name, value)
    }

    /// Usage text: required parameters first, then optional ones
    #[must_use]
    pub fn help(&self) -> String {
        self.command().render_help().to_string()
    }

    /// Current name → value map
    #[must_use]
    pub fn list(&self) -> BTreeMap<String, String> {
        self.items
            .iter()
            .map(|(name, item)| (name.clone(), item.value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Parameters {
        let mut params = Parameters::new("test");
        params
            .declare(
                "src",
                ParameterFlags::REQUIRED_ARGUMENT | ParameterFlags::SINGLE_VALUE,
                0,
                "source vertex",
                ValueType::U32,
            )
            .unwrap();
        params
            .declare("mark-pred", ParameterFlags::DEFAULT, false, "track predecessors", ValueType::Bool)
            .unwrap();
        params
            .declare(
                "quiet",
                ParameterFlags::NO_ARGUMENT | ParameterFlags::SINGLE_VALUE,
                "0",
                "suppress output",
                ValueType::Bool,
            )
            .unwrap();
        params
            .declare(
                "tag",
                ParameterFlags::REQUIRED_ARGUMENT | ParameterFlags::MULTI_VALUE,
                "",
                "labels",
                ValueType::Str,
            )
            .unwrap();
        params
            .declare(
                "graph",
                ParameterFlags::REQUIRED_ARGUMENT | ParameterFlags::REQUIRED_PARAMETER,
                "",
                "input file",
                ValueType::Str,
            )
            .unwrap();
        params
    }

    #[test]
    fn test_declare_and_defaults() {
        let params = registry();
        assert_eq!(params.get::<u32>("src").unwrap(), 0);
        assert!(!params.get::<bool>("mark-pred").unwrap());
        assert_eq!(params.get_str("quiet").unwrap(), "false");
        assert!(!params.is_set("src"));
    }

    #[test]
    fn test_duplicate_declaration() {
        let mut params = registry();
        let err = params
            .declare("src", ParameterFlags::DEFAULT, 1, "again", ValueType::U32)
            .unwrap_err();
        assert!(matches!(err, GraphError::DuplicateDefinition { ref name } if name == "src"));
    }

    #[test]
    fn test_no_argument_requires_bool() {
        let mut params = Parameters::new("");
        assert!(params
            .declare("n", ParameterFlags::NO_ARGUMENT, 1, "", ValueType::I32)
            .is_err());
    }

    #[test]
    fn test_invalid_default_rejected() {
        let mut params = Parameters::new("");
        assert!(params
            .declare("n", ParameterFlags::DEFAULT, "abc", "", ValueType::I64)
            .is_err());
        assert!(params
            .declare("u", ParameterFlags::DEFAULT, -3, "", ValueType::U32)
            .is_err());
    }

    #[test]
    fn test_set_and_get() {
        let mut params = registry();
        params.set("src", 42).unwrap();
        assert_eq!(params.get::<u64>("src").unwrap(), 42);
        assert!(params.is_set("src"));

        assert!(params.set("src", "forty").is_err());
        assert!(params.set("missing", 1).is_err());
        assert!(params.get::<u32>("missing").is_err());

        params.set("mark-pred", "1").unwrap();
        assert!(params.get::<bool>("mark-pred").unwrap());
    }

    #[test]
    fn test_check_required() {
        let mut params = registry();
        assert_eq!(params.check_required(), vec!["graph".to_string()]);
        params.set("graph", "g.txt").unwrap();
        assert!(params.check_required().is_empty());
    }

    #[test]
    fn test_parse_command_line_forms() {
        let mut params = registry();
        let rest = params
            .parse_command_line(["input.mtx", "--src", "3", "-mark-pred", "--graph=g.txt", "more"])
            .unwrap();

        assert_eq!(rest, vec!["input.mtx".to_string(), "more".to_string()]);
        assert_eq!(params.get::<u32>("src").unwrap(), 3);
        assert!(params.get::<bool>("mark-pred").unwrap());
        assert_eq!(params.get_str("graph").unwrap(), "g.txt");
    }

    #[test]
    fn test_parse_bool_explicit_value() {
        let mut params = registry();
        params.parse_command_line(["--mark-pred=false", "--quiet"]).unwrap();
        assert!(!params.get::<bool>("mark-pred").unwrap());
        assert!(params.get::<bool>("quiet").unwrap());

        assert!(params.parse_command_line(["--quiet=true"]).is_err());
    }

    #[test]
    fn test_parse_single_value_rules() {
        let mut params = registry();
        assert!(params.parse_command_line(["--src=1,2"]).is_err());

        params.parse_command_line(["--src", "1", "--src", "7"]).unwrap();
        assert_eq!(params.get::<u32>("src").unwrap(), 7);
    }

    #[test]
    fn test_parse_multi_value_appends() {
        let mut params = registry();
        params.parse_command_line(["--tag", "a,b", "--tag=c"]).unwrap();
        assert_eq!(params.get_list::<String>("tag").unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_errors() {
        let mut params = registry();
        assert!(params.parse_command_line(["--nope"]).is_err());
        assert!(params.parse_command_line(["--src"]).is_err());
        assert!(params.parse_command_line(["--src", "x"]).is_err());
    }

    #[test]
    fn test_double_dash_ends_options() {
        let mut params = registry();
        let rest = params.parse_command_line(["--", "--src", "-5"]).unwrap();
        assert_eq!(rest, vec!["--src".to_string(), "-5".to_string()]);
        assert!(!params.is_set("src"));
    }

    #[test]
    fn test_help_lists_required_first() {
        let params = registry();
        let help = params.help();

        assert!(help.starts_with("test"));
        let required = help.find("Required arguments:").unwrap();
        let optional = help.find("Optional arguments:").unwrap();
        assert!(required < optional);

        let graph = help.find("--graph <string>").unwrap();
        assert!(required < graph && graph < optional);
        assert!(help.contains("input file"));
        assert!(help.contains("--src <u32>"));
        assert!(help.contains("source vertex [default: 0]"));
        assert!(help.contains("--tag <string list>"));
        assert!(help.contains("--quiet"));
        assert!(!help.contains("operands"));
    }

    #[test]
    fn test_unusable_names_rejected() {
        let mut params = Parameters::new("");
        for name in ["", "-x", "7up", "a=b", "a b", "[operands]"] {
            assert!(
                params
                    .declare(name, ParameterFlags::DEFAULT, 0, "", ValueType::U32)
                    .is_err(),
                "{name:?} accepted"
            );
        }
    }

    #[test]
    fn test_parse_repeated_switch_and_negative_operand() {
        let mut params = registry();
        let rest = params.parse_command_line(["--quiet", "-quiet", "-5"]).unwrap();
        assert_eq!(rest, vec!["-5".to_string()]);
        assert!(params.get::<bool>("quiet").unwrap());
    }

    #[test]
    fn test_optional_argument_takes_value_only_after_equals() {
        let mut params = registry();
        let rest = params.parse_command_line(["--mark-pred", "false"]).unwrap();
        assert_eq!(rest, vec!["false".to_string()]);
        assert!(params.get::<bool>("mark-pred").unwrap());
    }

    #[test]
    fn test_optional_argument_non_bool_needs_value() {
        let mut params = Parameters::new("");
        params
            .declare("depth", ParameterFlags::DEFAULT, 3, "", ValueType::U32)
            .unwrap();
        assert!(params.parse_command_line(["--depth"]).is_err());
        params.parse_command_line(["--depth=5"]).unwrap();
        assert_eq!(params.get::<u32>("depth").unwrap(), 5);
    }

    #[test]
    fn test_list() {
        let mut params = registry();
        params.set("src", 9).unwrap();
        let values = params.list();
        assert_eq!(values.len(), 5);
        assert_eq!(values["src"], "9");
        assert_eq!(values["mark-pred"], "false");
    }
}
