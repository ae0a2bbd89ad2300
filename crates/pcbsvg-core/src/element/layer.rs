//! Physical layer identifiers.

use std::{fmt, str::FromStr};

use serde::Deserialize;

/// Highest inner copper layer index accepted by [`LayerRef`].
pub const MAX_INNER_LAYER: u8 = 30;

/// Which face of the board a feature sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Bottom,
    Top,
}

impl Side {
    pub fn name(self) -> &'static str {
        match self {
            Self::Bottom => "bottom",
            Self::Top => "top",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A layer reference as it appears in circuit data.
///
/// Anything that is not `top`, `bottom` or `inner1`..`inner30` is kept as
/// [`LayerRef::Unknown`]; features on unknown layers are not drawn.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum LayerRef {
    Top,
    Bottom,
    Inner(u8),
    Unknown(String),
}

impl LayerRef {
    /// The board face for outer layers.
    pub fn side(&self) -> Option<Side> {
        match self {
            Self::Top => Some(Side::Top),
            Self::Bottom => Some(Side::Bottom),
            _ => None,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl From<String> for LayerRef {
    fn from(value: String) -> Self {
        let inner = value
            .strip_prefix("inner")
            .and_then(|index| index.parse::<u8>().ok())
            .filter(|index| (1..=MAX_INNER_LAYER).contains(index));

        if value == "top" {
            Self::Top
        } else if value == "bottom" {
            Self::Bottom
        } else if let Some(index) = inner {
            Self::Inner(index)
        } else {
            Self::Unknown(value)
        }
    }
}

impl FromStr for LayerRef {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

impl fmt::Display for LayerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => f.write_str("top"),
            Self::Bottom => f.write_str("bottom"),
            Self::Inner(index) => write!(f, "inner{index}"),
            Self::Unknown(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_ref_parse() {
        assert_eq!("top".parse::<LayerRef>().unwrap(), LayerRef::Top);
        assert_eq!("bottom".parse::<LayerRef>().unwrap(), LayerRef::Bottom);
        assert_eq!("inner1".parse::<LayerRef>().unwrap(), LayerRef::Inner(1));
        assert_eq!("inner30".parse::<LayerRef>().unwrap(), LayerRef::Inner(30));
        assert_eq!(
            "inner31".parse::<LayerRef>().unwrap(),
            LayerRef::Unknown("inner31".to_string())
        );
        assert_eq!(
            "inner0".parse::<LayerRef>().unwrap(),
            LayerRef::Unknown("inner0".to_string())
        );
        assert_eq!(
            "Top".parse::<LayerRef>().unwrap(),
            LayerRef::Unknown("Top".to_string())
        );
    }

    #[test]
    fn test_layer_ref_display_roundtrip() {
        for name in ["top", "bottom", "inner4", "mystery"] {
            assert_eq!(name.parse::<LayerRef>().unwrap().to_string(), name);
        }
    }

    #[test]
    fn test_side_order() {
        assert!(Side::Bottom < Side::Top);
        assert_eq!(LayerRef::Top.side(), Some(Side::Top));
        assert_eq!(LayerRef::Inner(2).side(), None);
    }
}
