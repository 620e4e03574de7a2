use std::fmt;
use std::str::FromStr;

/// How many values a field takes: `min..max`, with `max = None` unbounded.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Cardinality {
    pub min: u32,
    pub max: Option<u32>,
}

impl Cardinality {
    pub const EXACTLY_ONE: Cardinality = Cardinality {
        min: 1,
        max: Some(1),
    };
    pub const ZERO_OR_ONE: Cardinality = Cardinality {
        min: 0,
        max: Some(1),
    };
    pub const ZERO_OR_MORE: Cardinality = Cardinality { min: 0, max: None };
    pub const ONE_OR_MORE: Cardinality = Cardinality { min: 1, max: None };

    pub fn new(min: u32, max: Option<u32>) -> Result<Self, String> {
        match max {
            Some(0) => Err("maximum of zero admits no values".to_string()),
            Some(max) if max < min => Err(format!("maximum {} is below minimum {}", max, min)),
            _ => Ok(Cardinality { min, max }),
        }
    }

    /// Builds a cardinality from separate min/max cells. A blank min is 0; a
    /// blank or `*` max is unbounded.
    pub fn from_bounds(min: Option<&str>, max: Option<&str>) -> Result<Self, String> {
        let min = match min {
            Some(m) => parse_count(m)?,
            None => 0,
        };
        let max = match max {
            None | Some("*") | Some("n") => None,
            Some(m) => Some(parse_count(m)?),
        };
        Self::new(min, max)
    }

    pub fn is_required(&self) -> bool {
        self.min > 0
    }
}

fn parse_count(text: &str) -> Result<u32, String> {
    let text = text.trim();
    // workbooks sometimes hand back "1.0"
    let text = text.strip_suffix(".0").unwrap_or(text);
    text.parse::<u32>()
        .map_err(|_| format!("`{}` is not a count", text))
}

impl FromStr for Cardinality {
    type Err = String;

    /// Accepts the named tokens (`exactly-one`, `zero-or-one`, `optional`,
    /// `zero-or-more`, `any`, `one-or-more`), the range form `n..m` / `n..*`,
    /// and a bare count `n`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .map(|c| if c == '_' || c == ' ' { '-' } else { c })
            .collect();
        match token.as_str() {
            "exactly-one" | "one" => Ok(Self::EXACTLY_ONE),
            "zero-or-one" | "optional" => Ok(Self::ZERO_OR_ONE),
            "zero-or-more" | "any" => Ok(Self::ZERO_OR_MORE),
            "one-or-more" => Ok(Self::ONE_OR_MORE),
            _ => {
                if let Some((min, max)) = token.split_once("..") {
                    let max = match max.trim() {
                        "*" | "n" => None,
                        m => Some(parse_count(m)?),
                    };
                    Self::new(parse_count(min)?, max)
                } else {
                    let n = parse_count(&token)?;
                    Self::new(n, Some(n))
                }
            }
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}..{}", self.min, max),
            None => write!(f, "{}..*", self.min),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_tokens() {
        assert_eq!("exactly-one".parse(), Ok(Cardinality::EXACTLY_ONE));
        assert_eq!("Exactly One".parse(), Ok(Cardinality::EXACTLY_ONE));
        assert_eq!("zero_or_more".parse(), Ok(Cardinality::ZERO_OR_MORE));
        assert_eq!("optional".parse(), Ok(Cardinality::ZERO_OR_ONE));
        assert_eq!("one-or-more".parse(), Ok(Cardinality::ONE_OR_MORE));
    }

    #[test]
    fn range_forms() {
        assert_eq!("0..*".parse(), Ok(Cardinality::ZERO_OR_MORE));
        assert_eq!("2..5".parse(), Cardinality::new(2, Some(5)));
        assert_eq!("3".parse(), Cardinality::new(3, Some(3)));
    }

    #[test]
    fn rejects_unknown_and_inverted() {
        assert!("several".parse::<Cardinality>().is_err());
        assert!("5..2".parse::<Cardinality>().is_err());
        assert!("0..0".parse::<Cardinality>().is_err());
        assert!("".parse::<Cardinality>().is_err());
    }

    #[test]
    fn bounds_from_legacy_columns() {
        assert_eq!(
            Cardinality::from_bounds(Some("1.0"), Some("*")),
            Ok(Cardinality::ONE_OR_MORE)
        );
        assert_eq!(
            Cardinality::from_bounds(None, Some("1")),
            Ok(Cardinality::ZERO_OR_ONE)
        );
    }

    #[test]
    fn displays_as_range() {
        assert_eq!(Cardinality::ZERO_OR_MORE.to_string(), "0..*");
        assert_eq!(Cardinality::EXACTLY_ONE.to_string(), "1..1");
    }
}
