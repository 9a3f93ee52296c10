use crate::GenerateError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// What kind of code a generation request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Framework {
    #[serde(rename = "react")]
    React,
    #[serde(rename = "p5.js", alias = "p5js")]
    P5js,
    #[serde(rename = "classic")]
    Classic,
    /// Free-form text; the response is returned without code extraction.
    #[serde(rename = "analysis")]
    Analysis,
}

impl Framework {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::React => "react",
            Self::P5js => "p5.js",
            Self::Classic => "classic",
            Self::Analysis => "analysis",
        }
    }

    /// Language the code analysis agent inspects output of this framework as.
    #[must_use]
    pub fn analysis_language(self) -> Option<&'static str> {
        match self {
            Self::React | Self::P5js => Some("javascript"),
            Self::Classic => Some("html"),
            Self::Analysis => None,
        }
    }
}

impl FromStr for Framework {
    type Err = GenerateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "react" => Ok(Self::React),
            "p5.js" | "p5js" => Ok(Self::P5js),
            "classic" => Ok(Self::Classic),
            "analysis" => Ok(Self::Analysis),
            other => Err(GenerateError::UnsupportedFramework(other.to_string())),
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_frameworks_and_aliases() {
        assert_eq!("react".parse::<Framework>().unwrap(), Framework::React);
        assert_eq!("p5.js".parse::<Framework>().unwrap(), Framework::P5js);
        assert_eq!("p5js".parse::<Framework>().unwrap(), Framework::P5js);
        assert_eq!("classic".parse::<Framework>().unwrap(), Framework::Classic);
        assert_eq!("analysis".parse::<Framework>().unwrap(), Framework::Analysis);
    }

    #[test]
    fn rejects_unknown_framework() {
        let err = "vue".parse::<Framework>().unwrap_err();
        assert!(matches!(err, GenerateError::UnsupportedFramework(ref name) if name == "vue"));
    }

    #[test]
    fn serde_uses_wire_names() {
        assert_eq!(serde_json::to_string(&Framework::P5js).unwrap(), "\"p5.js\"");
        let parsed: Framework = serde_json::from_str("\"p5js\"").unwrap();
        assert_eq!(parsed, Framework::P5js);
    }
}
