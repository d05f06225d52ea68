//! Launch options and the personalized greeting text.

use crate::config;
use crate::effect::LAYER_ORDER;
use crate::error::SkyError;

pub const FALLBACK_NAME: &str = "Friend";
pub const BASE_TITLE: &str = "Happy New Year 2026";

/// Recipient shown in the greeting line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Greeting {
    /// `None` when no usable name was supplied.
    name: Option<String>,
}

impl Greeting {
    pub fn new(raw: Option<&str>) -> Self {
        let name = raw
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(capitalize_first);
        Self { name }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(FALLBACK_NAME)
    }

    pub fn title(&self) -> String {
        match &self.name {
            Some(name) => format!("{BASE_TITLE} {name}"),
            None => BASE_TITLE.to_string(),
        }
    }
}

/// First character upper-case, the rest lower-case.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LaunchOptions {
    pub name: Option<String>,
    pub seed: u64,
    pub config_path: Option<String>,
    /// Layers allowed to acquire a surface. `None` means all of them.
    pub layers: Option<Vec<&'static str>>,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            name: None,
            seed: config::DEFAULT_SEED,
            config_path: None,
            layers: None,
        }
    }
}

impl LaunchOptions {
    pub fn from_env() -> Result<Self, SkyError> {
        Self::parse_cli(std::env::args().skip(1))
    }

    /// Parse `--name`, `--seed`, `--config` and `--layers`, each taking one value.
    pub fn parse_cli(args: impl IntoIterator<Item = String>) -> Result<Self, SkyError> {
        let mut opts = Self::default();
        let mut args = args.into_iter();
        while let Some(flag) = args.next() {
            let mut value = || {
                args.next()
                    .ok_or_else(|| SkyError::InvalidArgument(format!("{flag} needs a value")))
            };
            match flag.as_str() {
                "--name" => opts.name = Some(value()?),
                "--seed" => {
                    let raw = value()?;
                    opts.seed = raw
                        .parse()
                        .map_err(|_| SkyError::InvalidArgument(format!("bad seed `{raw}`")))?;
                }
                "--config" => opts.config_path = Some(value()?),
                "--layers" => opts.layers = Some(parse_layers(&value()?)?),
                other => {
                    return Err(SkyError::InvalidArgument(format!("unknown flag `{other}`")));
                }
            }
        }
        Ok(opts)
    }

    pub fn greeting(&self) -> Greeting {
        Greeting::new(self.name.as_deref())
    }
}

fn parse_layers(list: &str) -> Result<Vec<&'static str>, SkyError> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|name| {
            LAYER_ORDER
                .iter()
                .copied()
                .find(|known| known.eq_ignore_ascii_case(name))
                .ok_or_else(|| SkyError::UnknownLayer(name.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn name_is_trimmed_and_capitalized() {
        let g = Greeting::new(Some("  aLiCe "));
        assert_eq!(g.display_name(), "Alice");
        assert_eq!(g.title(), "Happy New Year 2026 Alice");
    }

    #[test]
    fn blank_or_missing_name_falls_back_to_friend() {
        for g in [Greeting::new(None), Greeting::new(Some("   "))] {
            assert_eq!(g.display_name(), "Friend");
            assert_eq!(g.title(), "Happy New Year 2026");
        }
    }

    #[test]
    fn parses_all_flags() {
        let opts = LaunchOptions::parse_cli(args(&[
            "--name", "bob", "--seed", "7", "--config", "sky.json", "--layers", "stars, Rockets",
        ]))
        .unwrap();
        assert_eq!(opts.name.as_deref(), Some("bob"));
        assert_eq!(opts.seed, 7);
        assert_eq!(opts.config_path.as_deref(), Some("sky.json"));
        assert_eq!(opts.layers, Some(vec!["stars", "rockets"]));
    }

    #[test]
    fn rejects_unknown_layer_and_bad_seed() {
        let err = LaunchOptions::parse_cli(args(&["--layers", "stars,comets"])).unwrap_err();
        assert!(matches!(err, SkyError::UnknownLayer(ref l) if l == "comets"));

        let err = LaunchOptions::parse_cli(args(&["--seed", "abc"])).unwrap_err();
        assert!(matches!(err, SkyError::InvalidArgument(_)));

        let err = LaunchOptions::parse_cli(args(&["--name"])).unwrap_err();
        assert!(matches!(err, SkyError::InvalidArgument(_)));
    }
}
