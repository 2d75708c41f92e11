use std::fmt;

use serde::{Deserialize, Serialize};

/// Video quality inferred from a resolution tag in the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Quality {
    /// 480p standard definition
    Sd480,
    /// 576p PAL standard definition
    Sd576,
    /// 720p high definition
    Hd720,
    /// 1080p or 1080i full HD
    Hd1080,
    /// 2160p ultra HD (4K)
    Uhd2160,
}

impl Quality {
    /// Maps a lowercase resolution tag (`"720p"`, `"4k"`, ...) to a quality.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "480p" | "480i" => Some(Self::Sd480),
            "576p" | "576i" => Some(Self::Sd576),
            "720p" => Some(Self::Hd720),
            "1080p" | "1080i" => Some(Self::Hd1080),
            "2160p" | "4k" | "uhd" => Some(Self::Uhd2160),
            _ => None,
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sd480 => write!(f, "480p"),
            Self::Sd576 => write!(f, "576p"),
            Self::Hd720 => write!(f, "720p"),
            Self::Hd1080 => write!(f, "1080p"),
            Self::Uhd2160 => write!(f, "2160p"),
        }
    }
}
