// Sizing for code blocks
//
// A block axis can be a percentage of the available span, a fixed cell
// count, or automatic. Parsed from config values and CLI flags.

use anyhow::anyhow;
use std::fmt;
use std::str::FromStr;

/// One axis of a block's requested size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    /// Percentage of the available span, 0-100
    Percent(u16),
    /// Fixed number of terminal cells
    Cells(u16),
    /// Fit content (height) or fill the span (width)
    Auto,
}

impl Dimension {
    /// Resolve against the available span. Percentages floor; no variant
    /// resolves past what the terminal actually has.
    pub fn resolve(&self, available: u16) -> u16 {
        match self {
            Dimension::Percent(pct) => {
                ((available as u32 * *pct as u32 / 100) as u16).min(available)
            }
            Dimension::Cells(n) => (*n).min(available),
            Dimension::Auto => available,
        }
    }
}

impl FromStr for Dimension {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Dimension::Auto);
        }
        if let Some(pct) = s.strip_suffix('%') {
            let pct: u16 = pct
                .trim()
                .parse()
                .map_err(|_| anyhow!("invalid percentage: {}", s))?;
            if pct > 100 {
                return Err(anyhow!("percentage out of range (0-100): {}", s));
            }
            return Ok(Dimension::Percent(pct));
        }
        s.parse()
            .map(Dimension::Cells)
            .map_err(|_| anyhow!("invalid dimension (expected auto, N% or N): {}", s))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Percent(pct) => write!(f, "{}%", pct),
            Dimension::Cells(n) => write!(f, "{}", n),
            Dimension::Auto => write!(f, "auto"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants() {
        assert_eq!("auto".parse::<Dimension>().unwrap(), Dimension::Auto);
        assert_eq!("AUTO".parse::<Dimension>().unwrap(), Dimension::Auto);
        assert_eq!(" 90% ".parse::<Dimension>().unwrap(), Dimension::Percent(90));
        assert_eq!("120".parse::<Dimension>().unwrap(), Dimension::Cells(120));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Dimension>().is_err());
        assert!("110%".parse::<Dimension>().is_err());
        assert!("-5".parse::<Dimension>().is_err());
        assert!("wide".parse::<Dimension>().is_err());
    }

    #[test]
    fn test_resolve_floors_and_clamps() {
        assert_eq!(Dimension::Percent(90).resolve(81), 72);
        assert_eq!(Dimension::Percent(100).resolve(50), 50);
        assert_eq!(Dimension::Cells(200).resolve(80), 80);
        assert_eq!(Dimension::Cells(40).resolve(80), 40);
        assert_eq!(Dimension::Auto.resolve(80), 80);
    }

    #[test]
    fn test_oversize_percent_clamps_to_available() {
        // Percent(150) is constructible even though FromStr rejects it
        assert_eq!(Dimension::Percent(150).resolve(40), 40);
        assert_eq!(Dimension::Percent(150).resolve(0), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Dimension::Percent(90).to_string(), "90%");
        assert_eq!(Dimension::Cells(120).to_string(), "120");
        assert_eq!(Dimension::Auto.to_string(), "auto");
    }
}
