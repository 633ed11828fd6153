//! Load-time game parameters.

use crate::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A single game option value.
///
/// Deserializes from plain JSON scalars: `true`, `3`, `0.5`, `"name"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GameParameter {
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
}

impl fmt::Display for GameParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameParameter::Bool(v) => write!(f, "{v}"),
            GameParameter::Int(v) => write!(f, "{v}"),
            GameParameter::Double(v) => write!(f, "{v}"),
            GameParameter::String(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for GameParameter {
    fn from(v: bool) -> Self {
        GameParameter::Bool(v)
    }
}

impl From<i64> for GameParameter {
    fn from(v: i64) -> Self {
        GameParameter::Int(v)
    }
}

impl From<f64> for GameParameter {
    fn from(v: f64) -> Self {
        GameParameter::Double(v)
    }
}

impl From<&str> for GameParameter {
    fn from(v: &str) -> Self {
        GameParameter::String(v.to_string())
    }
}

/// Free-form options forwarded verbatim to a game loader.
pub type GameParameters = BTreeMap<String, GameParameter>;

/// Typed access to a game's parameters with defaults.
///
/// Every accessor records the name it was asked for; `finish` rejects any
/// supplied parameter that the game never read.
pub struct ParamReader<'a> {
    game: &'a str,
    params: &'a GameParameters,
    seen: BTreeSet<&'static str>,
}

impl<'a> ParamReader<'a> {
    pub fn new(game: &'a str, params: &'a GameParameters) -> Self {
        Self {
            game,
            params,
            seen: BTreeSet::new(),
        }
    }

    fn invalid(&self, name: &str, reason: impl Into<String>) -> BridgeError {
        BridgeError::InvalidParameter {
            game: self.game.to_string(),
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub fn int(&mut self, name: &'static str, default: i64) -> Result<i64> {
        self.seen.insert(name);
        match self.params.get(name) {
            None => Ok(default),
            Some(GameParameter::Int(v)) => Ok(*v),
            Some(other) => Err(self.invalid(name, format!("expected an integer, got {other}"))),
        }
    }

    /// Integer parameter constrained to `min..=max`
    pub fn int_in(&mut self, name: &'static str, default: i64, min: i64, max: i64) -> Result<i64> {
        let value = self.int(name, default)?;
        if value < min || value > max {
            return Err(self.invalid(name, format!("{value} is outside {min}..={max}")));
        }
        Ok(value)
    }

    pub fn double(&mut self, name: &'static str, default: f64) -> Result<f64> {
        self.seen.insert(name);
        match self.params.get(name) {
            None => Ok(default),
            Some(GameParameter::Double(v)) => Ok(*v),
            Some(GameParameter::Int(v)) => Ok(*v as f64),
            Some(other) => Err(self.invalid(name, format!("expected a number, got {other}"))),
        }
    }

    pub fn bool(&mut self, name: &'static str, default: bool) -> Result<bool> {
        self.seen.insert(name);
        match self.params.get(name) {
            None => Ok(default),
            Some(GameParameter::Bool(v)) => Ok(*v),
            Some(other) => Err(self.invalid(name, format!("expected a bool, got {other}"))),
        }
    }

    pub fn string(&mut self, name: &'static str, default: &str) -> Result<String> {
        self.seen.insert(name);
        match self.params.get(name) {
            None => Ok(default.to_string()),
            Some(GameParameter::String(v)) => Ok(v.clone()),
            Some(other) => Err(self.invalid(name, format!("expected a string, got {other}"))),
        }
    }

    /// Fail on parameters the game does not understand
    pub fn finish(self) -> Result<()> {
        match self.params.keys().find(|k| !self.seen.contains(k.as_str())) {
            Some(unknown) => Err(self.invalid(unknown, "unknown parameter")),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameters_from_json() {
        let params: GameParameters =
            serde_json::from_str(r#"{"players": 3, "ratio": 0.5, "open": true, "name": "x"}"#)
                .unwrap();
        assert_eq!(params["players"], GameParameter::Int(3));
        assert_eq!(params["ratio"], GameParameter::Double(0.5));
        assert_eq!(params["open"], GameParameter::Bool(true));
        assert_eq!(params["name"], GameParameter::String("x".into()));
    }

    #[test]
    fn test_reader_defaults_and_types() {
        let mut params = GameParameters::new();
        params.insert("players".into(), GameParameter::Int(4));
        let mut reader = ParamReader::new("demo", &params);

        assert_eq!(reader.int("players", 2).unwrap(), 4);
        assert_eq!(reader.int("rounds", 3).unwrap(), 3);
        assert_eq!(reader.double("players", 0.0).unwrap(), 4.0);
        assert!(reader.bool("players", false).is_err());
        assert_eq!(reader.string("variant", "classic").unwrap(), "classic");
        reader.finish().unwrap();
    }

    #[test]
    fn test_reader_rejects_unknown_and_out_of_range() {
        let mut params = GameParameters::new();
        params.insert("players".into(), GameParameter::Int(9));
        params.insert("colour".into(), "red".into());

        let mut reader = ParamReader::new("demo", &params);
        let err = reader.int_in("players", 2, 2, 4).unwrap_err();
        assert!(err.to_string().contains("players"));

        let err = reader.finish().unwrap_err();
        match err {
            BridgeError::InvalidParameter { game, name, .. } => {
                assert_eq!(game, "demo");
                assert_eq!(name, "colour");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
