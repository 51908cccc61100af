use std::marker::PhantomData;
use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::logging;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read config file {path}: {source}")]
	Io {
		path: String,
		#[source]
		source: std::io::Error,
	},
	#[error("unsupported config file extension: {0}")]
	UnsupportedExtension(String),
	#[error("yaml: {0}")]
	Yaml(#[from] serde_yaml::Error),
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	#[error("toml: {0}")]
	Toml(#[from] toml::de::Error),
	#[error("invalid cli arguments: {0}")]
	Clap(#[from] clap::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
	/// The log level filter, anything `EnvFilter` accepts
	pub level: String,
	pub mode: logging::Mode,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			mode: logging::Mode::Default,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
	/// The postgres connection string
	pub uri: String,
	/// Run the embedded migrations on startup
	pub migrate: bool,
}

impl Default for DatabaseConfig {
	fn default() -> Self {
		Self {
			uri: "postgres://root@localhost:5432/soraku_dev".to_string(),
			migrate: true,
		}
	}
}

/// Layers sources over the serialized defaults of `C`.
///
/// Later merges win. Mappings merge key by key, every other value is replaced
/// wholesale, so a list in a file fully overrides the default list.
#[derive(Debug, Clone)]
pub struct ConfigParser<C> {
	root: Value,
	_marker: PhantomData<C>,
}

impl<C> ConfigParser<C>
where
	C: serde::Serialize + serde::de::DeserializeOwned,
{
	pub fn new(default: &C) -> Result<Self, ConfigError> {
		Ok(Self {
			root: serde_yaml::to_value(default)?,
			_marker: PhantomData,
		})
	}

	pub fn merge(&mut self, incoming: Value) {
		let root = std::mem::take(&mut self.root);
		self.root = merge_loop(root, incoming);
	}

	pub fn merge_str(&mut self, s: &str) -> Result<(), ConfigError> {
		self.merge(serde_yaml::from_str(s)?);
		Ok(())
	}

	/// Merges a file picked by extension. A missing file is skipped when
	/// `optional` is set, any other read or parse failure is an error.
	pub fn merge_file(&mut self, path: &str, optional: bool) -> Result<bool, ConfigError> {
		let contents = match std::fs::read_to_string(path) {
			Ok(contents) => contents,
			Err(err) if optional && err.kind() == std::io::ErrorKind::NotFound => return Ok(false),
			Err(source) => {
				return Err(ConfigError::Io {
					path: path.to_string(),
					source,
				})
			}
		};

		let extension = Path::new(path)
			.extension()
			.and_then(|e| e.to_str())
			.unwrap_or_default()
			.to_lowercase();

		let incoming = match extension.as_str() {
			"yaml" | "yml" => serde_yaml::from_str(&contents)?,
			"json" => serde_json::from_str(&contents)?,
			"toml" => serde_yaml::to_value(toml::from_str::<toml::Value>(&contents)?)?,
			_ => return Err(ConfigError::UnsupportedExtension(extension)),
		};

		self.merge(incoming);

		Ok(true)
	}

	/// Merges every `{PREFIX}_A__B=value` pair as `a.b: value`.
	///
	/// A value lands on a string field as the raw string. Anywhere else it is
	/// read as a yaml scalar so numbers and booleans keep their type.
	pub fn merge_env(&mut self, prefix: &str, vars: impl IntoIterator<Item = (String, String)>) {
		let prefix = format!("{}_", prefix.to_uppercase());

		for (key, value) in vars {
			let Some(key) = key.strip_prefix(&prefix) else {
				continue;
			};

			let path = key
				.split("__")
				.filter(|s| !s.is_empty())
				.map(|s| s.to_lowercase())
				.collect::<Vec<_>>();

			if path.is_empty() {
				continue;
			}

			let current = path.iter().try_fold(&self.root, |node, key| node.get(key.as_str()));
			let value = match current {
				Some(Value::String(_)) => Value::String(value),
				_ => serde_yaml::from_str(&value).unwrap_or(Value::String(value)),
			};

			let incoming = path
				.into_iter()
				.rev()
				.fold(value, |acc, key| Value::Mapping(Mapping::from_iter([(Value::String(key), acc)])));

			self.merge(incoming);
		}
	}

	pub fn parse(self) -> Result<C, ConfigError> {
		Ok(serde_yaml::from_value(self.root)?)
	}
}

fn merge_loop(root: Value, incoming: Value) -> Value {
	match (root, incoming) {
		(Value::Mapping(mut first), Value::Mapping(second)) => {
			for (key, value) in second {
				let combined = match first.remove(&key) {
					Some(existing) => merge_loop(existing, value),
					None => value,
				};
				first.insert(key, combined);
			}
			Value::Mapping(first)
		}
		(_, second) => second,
	}
}

fn cli() -> clap::Command {
	clap::Command::new(clap::crate_name!())
		.version(clap::crate_version!())
		.arg(
			clap::Arg::new("config")
				.long("config")
				.short('c')
				.help("The configuration file to use")
				.value_name("FILE")
				.action(clap::ArgAction::Set),
		)
}

/// Builds `C` from its defaults, then a config file, then the environment.
///
/// The file is taken from `--config` when `enable_cli` is set, otherwise
/// `default_file` is tried and silently skipped if it does not exist. An
/// explicitly named file must exist. Returns the file that was actually
/// loaded, if any.
pub fn parse<C>(enable_cli: bool, env_prefix: &str, default_file: Option<&str>) -> Result<(C, Option<String>), ConfigError>
where
	C: Default + serde::Serialize + serde::de::DeserializeOwned,
{
	let mut parser = ConfigParser::new(&C::default())?;

	let explicit = match enable_cli {
		true => cli().try_get_matches()?.get_one::<String>("config").cloned(),
		false => None,
	};

	let config_file = match (explicit, default_file) {
		(Some(file), _) => {
			parser.merge_file(&file, false)?;
			Some(file)
		}
		(None, Some(file)) => parser.merge_file(file, true)?.then(|| file.to_string()),
		(None, None) => None,
	};

	parser.merge_env(env_prefix, std::env::vars());

	Ok((parser.parse()?, config_file))
}
