//! Per-channel remapping applied to texels before they are encoded.

use std::fmt;
use std::str::FromStr;

use super::error::ParseError;

/// Source of one output channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    R,
    G,
    B,
    A,
    Zero,
    One,
}

impl Channel {
    fn pick(self, texel: [u8; 4]) -> u8 {
        match self {
            Channel::R => texel[0],
            Channel::G => texel[1],
            Channel::B => texel[2],
            Channel::A => texel[3],
            Channel::Zero => 0,
            Channel::One => u8::MAX,
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'r' => Some(Channel::R),
            'g' => Some(Channel::G),
            'b' => Some(Channel::B),
            'a' => Some(Channel::A),
            '0' => Some(Channel::Zero),
            '1' => Some(Channel::One),
            _ => None,
        }
    }

    fn as_char(self) -> char {
        match self {
            Channel::R => 'r',
            Channel::G => 'g',
            Channel::B => 'b',
            Channel::A => 'a',
            Channel::Zero => '0',
            Channel::One => '1',
        }
    }
}

/// Channel routing for the r, g, b and a outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Swizzle {
    pub r: Channel,
    pub g: Channel,
    pub b: Channel,
    pub a: Channel,
}

impl Swizzle {
    pub const IDENTITY: Swizzle = Swizzle {
        r: Channel::R,
        g: Channel::G,
        b: Channel::B,
        a: Channel::A,
    };

    /// Two-channel normal map layout: X in luminance, Y in alpha.
    pub const NORMAL_MAP: Swizzle = Swizzle {
        r: Channel::R,
        g: Channel::R,
        b: Channel::R,
        a: Channel::G,
    };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn apply(&self, texel: [u8; 4]) -> [u8; 4] {
        [
            self.r.pick(texel),
            self.g.pick(texel),
            self.b.pick(texel),
            self.a.pick(texel),
        ]
    }
}

impl Default for Swizzle {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for Swizzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for channel in [self.r, self.g, self.b, self.a] {
            write!(f, "{}", channel.as_char())?;
        }
        Ok(())
    }
}

impl FromStr for Swizzle {
    type Err = ParseError;

    /// Parse exactly four characters from `rgba01`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let channels = s
            .chars()
            .map(Channel::from_char)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| ParseError::Swizzle(s.to_string()))?;

        match channels.as_slice() {
            [r, g, b, a] => Ok(Swizzle {
                r: *r,
                g: *g,
                b: *b,
                a: *a,
            }),
            _ => Err(ParseError::Swizzle(s.to_string())),
        }
    }
}
